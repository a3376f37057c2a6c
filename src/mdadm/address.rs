use std::fmt;

use crate::disk::Geometry;

/// 线性地址分解后的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockAddress {
    pub disk_id: u32,
    pub block_id: u32,
    pub block_offset: u32,
}

impl Geometry {
    /// 把线性地址翻译成 (disk, block, offset)，超出地址空间返回 None
    pub fn locate(&self, addr: u32) -> Option<BlockAddress> {
        if addr as u64 >= self.total_size() {
            return None;
        }

        Some(BlockAddress {
            disk_id: addr / self.disk_size(),
            block_id: (addr % self.disk_size()) / self.block_size(),
            block_offset: addr % self.block_size(),
        })
    }
}

impl fmt::Display for BlockAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "disk {} / block {} / offset {}",
            self.disk_id, self.block_id, self.block_offset
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decomposes_jbod_addresses() {
        let g = Geometry::JBOD;
        assert_eq!(
            g.locate(0),
            Some(BlockAddress { disk_id: 0, block_id: 0, block_offset: 0 })
        );
        assert_eq!(
            g.locate(65536 + 3 * 256 + 17),
            Some(BlockAddress { disk_id: 1, block_id: 3, block_offset: 17 })
        );
        assert_eq!(
            g.locate(1024 * 1024 - 1),
            Some(BlockAddress { disk_id: 15, block_id: 255, block_offset: 255 })
        );
        assert_eq!(g.locate(1024 * 1024), None);
    }

    #[test]
    fn decomposes_small_geometry() {
        let g = Geometry::new(8, 256, 16, 1024).unwrap();
        assert_eq!(
            g.locate(250),
            Some(BlockAddress { disk_id: 0, block_id: 15, block_offset: 10 })
        );
        assert_eq!(
            g.locate(256),
            Some(BlockAddress { disk_id: 1, block_id: 0, block_offset: 0 })
        );
        assert_eq!(g.locate(u32::MAX), None);
    }
}
