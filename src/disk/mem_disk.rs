use std::io::{Error, ErrorKind, Result};

use crate::disk::{
    block_device::BlockDevice,
    types::{pattern_byte, Geometry},
};

/// 内存中的磁盘阵列，所有磁盘首尾相接存放在一个扁平数组里
#[derive(Debug, Clone)]
pub struct MemDisk {
    geometry: Geometry,
    bytes: Vec<u8>,
}

impl MemDisk {
    /// 每个字节都是其线性地址的确定函数，方便校验读出的数据
    pub fn patterned(geometry: Geometry) -> Self {
        let bytes = (0..geometry.total_size()).map(pattern_byte).collect();
        Self { geometry, bytes }
    }

    pub fn from_bytes(geometry: Geometry, bytes: Vec<u8>) -> Result<Self> {
        if bytes.len() as u64 != geometry.total_size() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!(
                    "expected {} bytes, got {}",
                    geometry.total_size(),
                    bytes.len()
                ),
            ));
        }
        Ok(Self { geometry, bytes })
    }
}

impl BlockDevice for MemDisk {
    fn geometry(&self) -> Geometry {
        self.geometry
    }

    fn read_block(&self, disk_id: u32, block_id: u32, buf: &mut [u8]) -> Result<()> {
        let start = self.block_offset(disk_id, block_id) as usize;
        let end = start + self.geometry.block_size() as usize;
        let src = self.bytes.get(start..end).ok_or_else(|| {
            Error::new(
                ErrorKind::UnexpectedEof,
                format!("block {}/{} lies outside the array", disk_id, block_id),
            )
        })?;
        buf.copy_from_slice(src);
        Ok(())
    }
}
