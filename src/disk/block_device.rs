use std::io::Result;

use crate::disk::types::Geometry;

/// 按 (disk, block) 寻址的块设备，一次读一个完整的块
pub trait BlockDevice: Send + Sync {
    fn geometry(&self) -> Geometry;

    /// `buf` 长度必须等于块大小
    fn read_block(&self, disk_id: u32, block_id: u32, buf: &mut [u8]) -> Result<()>;

    /// 块在整个阵列中的线性字节偏移
    fn block_offset(&self, disk_id: u32, block_id: u32) -> u64 {
        let g = self.geometry();
        disk_id as u64 * g.disk_size() as u64 + block_id as u64 * g.block_size() as u64
    }
}
