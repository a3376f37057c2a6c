//! MiniJBOD：在一组定长磁盘（JBOD）之上提供平坦线性地址空间的只读访问层。

pub mod disk;
pub mod jbod;
pub mod mdadm;
pub mod shell;
pub mod utils;

pub use disk::Geometry;
pub use jbod::{DeviceChannel, JbodCommand};
pub use mdadm::{Mdadm, MdadmError, Session};
