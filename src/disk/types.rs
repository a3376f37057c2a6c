use crate::mdadm::error::{MdadmError, Result};

/// 阵列中的磁盘数量
pub const JBOD_NUM_DISKS: u32 = 16;

/// 每块磁盘的大小：64KB
pub const JBOD_DISK_SIZE: u32 = 64 * 1024;

/// 每个块（Block）的大小：256B，设备一次读取的最小单位
pub const JBOD_BLOCK_SIZE: u32 = 256;

/// 每块磁盘包含的块数：64KB / 256B = 256 块
pub const JBOD_NUM_BLOCKS_PER_DISK: u32 = JBOD_DISK_SIZE / JBOD_BLOCK_SIZE;

/// 单次 read 请求允许的最大字节数
pub const MAX_IO_SIZE: u32 = 1024;

/// 命令编码中 disk id 字段能表示的磁盘数（4 bit）
pub const MAX_ENCODABLE_DISKS: u32 = 1 << 4;

/// 命令编码中 block id 字段能表示的块数（8 bit）
pub const MAX_ENCODABLE_BLOCKS: u32 = 1 << 8;

/// 地址是 u32，整个地址空间最多 4GB
pub const MAX_ADDRESS_SPACE: u64 = u32::MAX as u64 + 1;

/// 新建镜像的填充内容：模一个素数，保证相邻块的内容互不相同
pub fn pattern_byte(addr: u64) -> u8 {
    (addr % 251) as u8
}

/// 磁盘阵列的几何参数。
///
/// 线性地址空间大小为 `num_disks * disk_size`，每块磁盘被切成
/// `disk_size / block_size` 个块。字段私有，只能通过 [`Geometry::new`]
/// 或 [`Geometry::JBOD`] 得到，因此拿到的值总是合法的。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    num_disks: u32,
    disk_size: u32,
    block_size: u32,
    max_io_size: u32,
}

impl Geometry {
    /// 目标 JBOD 设备的固定几何参数
    pub const JBOD: Geometry = Geometry {
        num_disks: JBOD_NUM_DISKS,
        disk_size: JBOD_DISK_SIZE,
        block_size: JBOD_BLOCK_SIZE,
        max_io_size: MAX_IO_SIZE,
    };

    /// 构造其它几何参数，用于在小阵列上测试。
    ///
    /// 实际设备只用 [`Geometry::JBOD`]。`max_io_size` 只能收紧，不能超过
    /// [`MAX_IO_SIZE`]。
    pub fn new(num_disks: u32, disk_size: u32, block_size: u32, max_io_size: u32) -> Result<Self> {
        if num_disks == 0 || disk_size == 0 || block_size == 0 || max_io_size == 0 {
            return Err(MdadmError::InvalidGeometry(
                "all geometry parameters must be nonzero".to_string(),
            ));
        }
        if disk_size % block_size != 0 {
            return Err(MdadmError::InvalidGeometry(format!(
                "disk size {} is not a multiple of block size {}",
                disk_size, block_size
            )));
        }
        if num_disks > MAX_ENCODABLE_DISKS {
            return Err(MdadmError::InvalidGeometry(format!(
                "{} disks do not fit the disk id field (max {})",
                num_disks, MAX_ENCODABLE_DISKS
            )));
        }
        if disk_size / block_size > MAX_ENCODABLE_BLOCKS {
            return Err(MdadmError::InvalidGeometry(format!(
                "{} blocks per disk do not fit the block id field (max {})",
                disk_size / block_size,
                MAX_ENCODABLE_BLOCKS
            )));
        }

        if max_io_size > MAX_IO_SIZE {
            return Err(MdadmError::InvalidGeometry(format!(
                "request cap {} exceeds {} bytes",
                max_io_size, MAX_IO_SIZE
            )));
        }
        if num_disks as u64 * disk_size as u64 > MAX_ADDRESS_SPACE {
            return Err(MdadmError::InvalidGeometry(format!(
                "{} disks of {} bytes exceed the 32-bit address space",
                num_disks, disk_size
            )));
        }

        Ok(Self {
            num_disks,
            disk_size,
            block_size,
            max_io_size,
        })
    }

    pub fn num_disks(&self) -> u32 {
        self.num_disks
    }

    pub fn disk_size(&self) -> u32 {
        self.disk_size
    }

    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    pub fn max_io_size(&self) -> u32 {
        self.max_io_size
    }

    pub fn blocks_per_disk(&self) -> u32 {
        self.disk_size / self.block_size
    }

    /// 整个线性地址空间的字节数，用 u64 计算避免溢出
    pub fn total_size(&self) -> u64 {
        self.num_disks as u64 * self.disk_size as u64
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::JBOD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jbod_geometry_is_valid() {
        let g = Geometry::new(
            JBOD_NUM_DISKS,
            JBOD_DISK_SIZE,
            JBOD_BLOCK_SIZE,
            MAX_IO_SIZE,
        )
        .unwrap();
        assert_eq!(g, Geometry::JBOD);
        assert_eq!(g.blocks_per_disk(), JBOD_NUM_BLOCKS_PER_DISK);
        assert_eq!(g.total_size(), 1024 * 1024);
    }

    #[test]
    fn rejects_unaligned_disk_size() {
        assert!(matches!(
            Geometry::new(8, 250, 16, 1024),
            Err(MdadmError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn rejects_geometry_wider_than_command_fields() {
        assert!(Geometry::new(17, 256, 16, 1024).is_err());
        assert!(Geometry::new(1, 512 * 16, 16, 1024).is_err());
        assert!(Geometry::new(0, 256, 16, 1024).is_err());
    }

    #[test]
    fn rejects_zero_block_size() {
        assert!(matches!(
            Geometry::new(16, 256, 0, 1024),
            Err(MdadmError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn address_space_must_fit_u32() {
        // 16 × 1GB 超过 4GB
        assert!(Geometry::new(16, 1 << 30, 1 << 22, 1024).is_err());
        let g = Geometry::new(16, 1 << 28, 1 << 20, 1024).unwrap();
        assert_eq!(g.total_size(), MAX_ADDRESS_SPACE);
    }

    #[test]
    fn request_cap_can_only_shrink() {
        assert!(Geometry::new(8, 256, 16, 4096).is_err());
        let g = Geometry::new(8, 256, 16, 64).unwrap();
        assert_eq!(g.max_io_size(), 64);
        assert_eq!(Geometry::default().max_io_size(), MAX_IO_SIZE);
    }
}
