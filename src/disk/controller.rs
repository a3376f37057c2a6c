use std::fmt;

use log::{trace, warn};

use crate::{
    disk::block_device::BlockDevice,
    jbod::{DecodeError, DeviceChannel, JbodCommand, JBOD_ERR, JBOD_OK},
};

/// 设备端拒绝一条命令的原因
#[derive(Debug)]
pub enum DeviceError {
    Decode(DecodeError),
    AlreadyMounted,
    NotMounted,
    DiskOutOfRange(u32),
    BlockOutOfRange(u32),
    MissingBuffer,
    ShortBuffer(usize),
    Io(std::io::Error),
}

impl From<std::io::Error> for DeviceError {
    fn from(e: std::io::Error) -> Self {
        DeviceError::Io(e)
    }
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(e) => write!(f, "bad command: {}", e),
            Self::AlreadyMounted => write!(f, "already mounted"),
            Self::NotMounted => write!(f, "not mounted"),
            Self::DiskOutOfRange(disk) => write!(f, "no such disk {}", disk),
            Self::BlockOutOfRange(block) => write!(f, "no such block {}", block),
            Self::MissingBuffer => write!(f, "read-block without a buffer"),
            Self::ShortBuffer(len) => write!(f, "buffer of {} bytes is shorter than a block", len),
            Self::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for DeviceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Decode(e) => Some(e),
            _ => None,
        }
    }
}

/// JBOD 控制器：解码命令字，维护挂载状态和当前磁头位置，
/// 对底层块设备发起整块读取。
#[derive(Debug)]
pub struct JbodController<D: BlockDevice> {
    device: D,
    mounted: bool,
    disk: u32,
    block: u32,
}

impl<D: BlockDevice> JbodController<D> {
    pub fn new(device: D) -> Self {
        Self {
            device,
            mounted: false,
            disk: 0,
            block: 0,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// 当前定位到的 (disk, block)
    pub fn position(&self) -> (u32, u32) {
        (self.disk, self.block)
    }

    fn execute(&mut self, command: JbodCommand, block: Option<&mut [u8]>) -> Result<(), DeviceError> {
        let geometry = self.device.geometry();

        match command {
            JbodCommand::Mount if self.mounted => return Err(DeviceError::AlreadyMounted),
            JbodCommand::Mount => {}
            _ if !self.mounted => return Err(DeviceError::NotMounted),
            _ => {}
        }

        match command {
            JbodCommand::Mount => {
                self.mounted = true;
                self.disk = 0;
                self.block = 0;
            }
            JbodCommand::Unmount => self.mounted = false,
            JbodCommand::SeekToDisk(disk) => {
                let disk = disk as u32;
                if disk >= geometry.num_disks() {
                    return Err(DeviceError::DiskOutOfRange(disk));
                }
                self.disk = disk;
                self.block = 0;
            }
            JbodCommand::SeekToBlock(block) => {
                let block = block as u32;
                if block >= geometry.blocks_per_disk() {
                    return Err(DeviceError::BlockOutOfRange(block));
                }
                self.block = block;
            }
            JbodCommand::ReadBlock => {
                let buf = block.ok_or(DeviceError::MissingBuffer)?;
                let block_size = geometry.block_size() as usize;
                if buf.len() < block_size {
                    return Err(DeviceError::ShortBuffer(buf.len()));
                }
                if self.block >= geometry.blocks_per_disk() {
                    return Err(DeviceError::BlockOutOfRange(self.block));
                }
                self.device
                    .read_block(self.disk, self.block, &mut buf[..block_size])?;
                // 读完自动移到下一块
                self.block += 1;
            }
        }

        Ok(())
    }
}

impl<D: BlockDevice> DeviceChannel for JbodController<D> {
    fn operation(&mut self, op: u32, block: Option<&mut [u8]>) -> i32 {
        let result = JbodCommand::decode(op)
            .map_err(DeviceError::Decode)
            .and_then(|command| {
                trace!("jbod: {}", command);
                self.execute(command, block)
            });

        match result {
            Ok(()) => JBOD_OK,
            Err(e) => {
                warn!("jbod: rejected command {:#010x}: {}", op, e);
                JBOD_ERR
            }
        }
    }
}
