pub mod channel;
pub mod command;

pub use channel::{DeviceChannel, JBOD_ERR, JBOD_OK};
pub use command::{DecodeError, JbodCommand, Opcode};
