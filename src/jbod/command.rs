use std::fmt;

// 32 位命令字的布局：
//   bits 0-7   block id
//   bits 8-13  保留
//   bits 14-19 opcode
//   bits 20-21 保留
//   bits 22-25 disk id
//   bits 26-31 保留
// opcode 和 disk id 的位置沿用设备原有的移位（14 和 22）。block id 若也左移 14
// 位会和 opcode 重叠，所以放在 opcode 下面空闲的低 8 位。
const BLOCK_ID_SHIFT: u32 = 0;
const BLOCK_ID_MASK: u32 = 0xFF;
const OPCODE_SHIFT: u32 = 14;
const OPCODE_MASK: u32 = 0x3F;
const DISK_ID_SHIFT: u32 = 22;
const DISK_ID_MASK: u32 = 0xF;

const USED_BITS: u32 = (BLOCK_ID_MASK << BLOCK_ID_SHIFT)
    | (OPCODE_MASK << OPCODE_SHIFT)
    | (DISK_ID_MASK << DISK_ID_SHIFT);

/// 设备支持的操作码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Opcode {
    Mount = 0,
    Unmount = 1,
    SeekToDisk = 2,
    SeekToBlock = 3,
    ReadBlock = 4,
}

impl TryFrom<u32> for Opcode {
    type Error = u32;

    fn try_from(value: u32) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Mount),
            1 => Ok(Self::Unmount),
            2 => Ok(Self::SeekToDisk),
            3 => Ok(Self::SeekToBlock),
            4 => Ok(Self::ReadBlock),
            other => Err(other),
        }
    }
}

/// 结构化的设备命令。
///
/// 内部代码只和这个类型打交道，位运算只发生在 [`JbodCommand::encode`]
/// 和 [`JbodCommand::decode`] 里，也就是通道边界上。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JbodCommand {
    Mount,
    Unmount,
    SeekToDisk(u8),
    SeekToBlock(u8),
    ReadBlock,
}

/// 无法解析的命令字
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    UnknownOpcode(u32),
    ReservedBits(u32),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownOpcode(op) => write!(f, "unknown opcode {}", op),
            Self::ReservedBits(word) => write!(f, "reserved bits set in command {:#010x}", word),
        }
    }
}

impl std::error::Error for DecodeError {}

impl JbodCommand {
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::Mount => Opcode::Mount,
            Self::Unmount => Opcode::Unmount,
            Self::SeekToDisk(_) => Opcode::SeekToDisk,
            Self::SeekToBlock(_) => Opcode::SeekToBlock,
            Self::ReadBlock => Opcode::ReadBlock,
        }
    }

    /// 打包成设备要求的 32 位命令字
    pub fn encode(&self) -> u32 {
        let (disk_id, block_id) = match *self {
            Self::SeekToDisk(disk) => (disk as u32, 0),
            Self::SeekToBlock(block) => (0, block as u32),
            _ => (0, 0),
        };

        ((self.opcode() as u32 & OPCODE_MASK) << OPCODE_SHIFT)
            | ((disk_id & DISK_ID_MASK) << DISK_ID_SHIFT)
            | ((block_id & BLOCK_ID_MASK) << BLOCK_ID_SHIFT)
    }

    pub fn decode(word: u32) -> std::result::Result<Self, DecodeError> {
        if word & !USED_BITS != 0 {
            return Err(DecodeError::ReservedBits(word));
        }

        let opcode = Opcode::try_from((word >> OPCODE_SHIFT) & OPCODE_MASK)
            .map_err(DecodeError::UnknownOpcode)?;
        let disk_id = ((word >> DISK_ID_SHIFT) & DISK_ID_MASK) as u8;
        let block_id = ((word >> BLOCK_ID_SHIFT) & BLOCK_ID_MASK) as u8;

        Ok(match opcode {
            Opcode::Mount => Self::Mount,
            Opcode::Unmount => Self::Unmount,
            Opcode::SeekToDisk => Self::SeekToDisk(disk_id),
            Opcode::SeekToBlock => Self::SeekToBlock(block_id),
            Opcode::ReadBlock => Self::ReadBlock,
        })
    }
}

impl fmt::Display for JbodCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mount => write!(f, "mount"),
            Self::Unmount => write!(f, "unmount"),
            Self::SeekToDisk(disk) => write!(f, "seek-disk({})", disk),
            Self::SeekToBlock(block) => write!(f, "seek-block({})", block),
            Self::ReadBlock => write!(f, "read-block"),
        }
    }
}
