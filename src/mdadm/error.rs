use std::fmt;

use crate::jbod::JbodCommand;

/// 存储访问层错误类型
#[derive(Debug)]
pub enum MdadmError {
    NotMounted,                                      // 未挂载
    AlreadyMounted,                                  // 已经挂载
    OutOfBounds { addr: u32, len: u32, limit: u64 }, // 请求范围超出地址空间
    RequestTooLarge { len: u32, max: u32 },          // 单次请求过大
    MissingBuffer,                                   // len > 0 却没有目标缓冲区
    BufferTooSmall { len: u32, capacity: usize },    // 目标缓冲区放不下
    Channel { command: JbodCommand, status: i32 },   // 设备操作失败
    InvalidGeometry(String),                         // 几何参数非法
}

impl fmt::Display for MdadmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotMounted => write!(f, "Array is not mounted"),
            Self::AlreadyMounted => write!(f, "Array is already mounted"),
            Self::OutOfBounds { addr, len, limit } => write!(
                f,
                "Read out of bounds: addr {} + len {} exceeds {} bytes",
                addr, len, limit
            ),
            Self::RequestTooLarge { len, max } => {
                write!(f, "Read of {} bytes exceeds the {} byte limit", len, max)
            }
            Self::MissingBuffer => write!(f, "No destination buffer for a nonzero read"),
            Self::BufferTooSmall { len, capacity } => write!(
                f,
                "Destination holds {} bytes, {} requested",
                capacity, len
            ),
            Self::Channel { command, status } => {
                write!(f, "Device rejected {} (status {})", command, status)
            }
            Self::InvalidGeometry(desc) => write!(f, "Invalid geometry: {}", desc),
        }
    }
}

impl std::error::Error for MdadmError {}

/// 状态切换失败：原句柄原样交还，附带错误原因
pub struct Rejected<T> {
    pub handle: T,
    pub error: MdadmError,
}

impl<T> Rejected<T> {
    pub fn into_parts(self) -> (T, MdadmError) {
        (self.handle, self.error)
    }
}

impl<T> fmt::Debug for Rejected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rejected")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Display for Rejected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.error.fmt(f)
    }
}

impl<T> std::error::Error for Rejected<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// 存储访问层统一结果类型
pub type Result<T> = std::result::Result<T, MdadmError>;
