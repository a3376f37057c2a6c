//! 存储访问层：把 JBOD 磁盘阵列呈现为一段平坦的线性字节空间。
//!
//! 挂载状态由类型表达：[`Mdadm`] 是未挂载的句柄，`mount` 成功后得到
//! [`Session`]，只有 `Session` 能 `read`，`unmount` 再把它变回 `Mdadm`。

use log::{debug, trace};

use crate::{
    disk::Geometry,
    jbod::{DeviceChannel, JbodCommand, JBOD_OK},
};

pub mod address;
pub mod error;

pub use address::BlockAddress;
pub use error::{MdadmError, Rejected, Result};

/// 未挂载的阵列句柄
#[derive(Debug)]
pub struct Mdadm<C: DeviceChannel> {
    channel: C,
    geometry: Geometry,
}

/// 已挂载的会话，持有通道直到 unmount
#[derive(Debug)]
pub struct Session<C: DeviceChannel> {
    channel: C,
    geometry: Geometry,
}

/// 发出一条命令，非零状态转成错误
fn issue<C: DeviceChannel>(
    channel: &mut C,
    command: JbodCommand,
    block: Option<&mut [u8]>,
) -> Result<()> {
    let status = channel.operation(command.encode(), block);
    trace!("{} -> {}", command, status);
    if status == JBOD_OK {
        Ok(())
    } else {
        Err(MdadmError::Channel { command, status })
    }
}

impl<C: DeviceChannel> Mdadm<C> {
    pub fn new(channel: C) -> Self {
        Self::with_geometry(channel, Geometry::JBOD)
    }

    pub fn with_geometry(channel: C, geometry: Geometry) -> Self {
        Self { channel, geometry }
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn into_channel(self) -> C {
        self.channel
    }

    /// 挂载阵列。失败时原句柄交还给调用方，状态不变。
    pub fn mount(mut self) -> std::result::Result<Session<C>, Rejected<Self>> {
        match issue(&mut self.channel, JbodCommand::Mount, None) {
            Ok(()) => {
                debug!("array mounted");
                Ok(Session {
                    channel: self.channel,
                    geometry: self.geometry,
                })
            }
            Err(error) => Err(Rejected {
                handle: self,
                error,
            }),
        }
    }
}

impl<C: DeviceChannel> Session<C> {
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn into_channel(self) -> C {
        self.channel
    }

    /// 卸载阵列。失败时会话保持挂载并交还。
    pub fn unmount(mut self) -> std::result::Result<Mdadm<C>, Rejected<Self>> {
        match issue(&mut self.channel, JbodCommand::Unmount, None) {
            Ok(()) => {
                debug!("array unmounted");
                Ok(Mdadm {
                    channel: self.channel,
                    geometry: self.geometry,
                })
            }
            Err(error) => Err(Rejected {
                handle: self,
                error,
            }),
        }
    }

    /// 从线性地址 `addr` 读取 `len` 字节到 `buf`，返回读到的字节数。
    ///
    /// 请求可以跨越块和磁盘边界。任何一次设备操作失败都会让整个读取失败，
    /// 已经拷贝的部分不作为结果返回，`buf` 中的内容此时不保证有意义。
    pub fn read(&mut self, addr: u32, len: u32, buf: Option<&mut [u8]>) -> Result<usize> {
        let geometry = self.geometry;

        if addr as u64 + len as u64 > geometry.total_size() {
            return Err(MdadmError::OutOfBounds {
                addr,
                len,
                limit: geometry.total_size(),
            });
        }
        if len > geometry.max_io_size() {
            return Err(MdadmError::RequestTooLarge {
                len,
                max: geometry.max_io_size(),
            });
        }
        if len == 0 {
            return Ok(0);
        }
        let buf = buf.ok_or(MdadmError::MissingBuffer)?;
        if buf.len() < len as usize {
            return Err(MdadmError::BufferTooSmall {
                len,
                capacity: buf.len(),
            });
        }

        debug!("read addr={} len={}", addr, len);

        let block_size = geometry.block_size() as usize;
        // 用 u64 推进游标：地址空间可以恰好是 4GB，读到末尾时 u32 会溢出
        let mut cursor = addr as u64;
        let mut remaining = len as usize;
        let mut bytes_read = 0usize;

        while remaining > 0 {
            let at = u32::try_from(cursor)
                .ok()
                .and_then(|a| geometry.locate(a))
                .ok_or(MdadmError::OutOfBounds {
                    addr,
                    len,
                    limit: geometry.total_size(),
                })?;

            issue(&mut self.channel, JbodCommand::SeekToDisk(at.disk_id as u8), None)?;
            issue(&mut self.channel, JbodCommand::SeekToBlock(at.block_id as u8), None)?;

            let offset = at.block_offset as usize;
            let to_read = (block_size - offset).min(remaining);

            let mut block = vec![0u8; block_size];
            issue(&mut self.channel, JbodCommand::ReadBlock, Some(block.as_mut_slice()))?;

            buf[bytes_read..bytes_read + to_read].copy_from_slice(&block[offset..offset + to_read]);

            bytes_read += to_read;
            cursor += to_read as u64;
            remaining -= to_read;
        }

        Ok(bytes_read)
    }

    /// 读满整个 `buf`
    pub fn read_into(&mut self, addr: u32, buf: &mut [u8]) -> Result<usize> {
        let len = u32::try_from(buf.len()).map_err(|_| MdadmError::RequestTooLarge {
            len: u32::MAX,
            max: self.geometry.max_io_size(),
        })?;
        self.read(addr, len, Some(buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jbod::JBOD_ERR;

    /// 只会应答 mount/unmount 的通道，其他命令一律失败
    #[derive(Debug)]
    struct Toggle {
        ops: Vec<JbodCommand>,
        accept: bool,
    }

    impl DeviceChannel for Toggle {
        fn operation(&mut self, op: u32, _block: Option<&mut [u8]>) -> i32 {
            let cmd = JbodCommand::decode(op).unwrap();
            self.ops.push(cmd);
            match cmd {
                JbodCommand::Mount | JbodCommand::Unmount if self.accept => JBOD_OK,
                _ => JBOD_ERR,
            }
        }
    }

    #[test]
    fn failed_mount_hands_back_handle() {
        let mdadm = Mdadm::new(Toggle { ops: vec![], accept: false });
        let rejected = mdadm.mount().unwrap_err();
        assert!(matches!(
            rejected.error,
            MdadmError::Channel { command: JbodCommand::Mount, status: JBOD_ERR }
        ));
        let channel = rejected.handle.into_channel();
        assert_eq!(channel.ops, vec![JbodCommand::Mount]);
    }

    #[test]
    fn mount_then_unmount() {
        let mdadm = Mdadm::new(Toggle { ops: vec![], accept: true });
        let session = mdadm.mount().unwrap();
        let mdadm = session.unmount().unwrap();
        assert_eq!(
            mdadm.into_channel().ops,
            vec![JbodCommand::Mount, JbodCommand::Unmount]
        );
    }

    /// 接受所有命令，读块时填 0xAB
    #[derive(Debug)]
    struct Filler {
        reads: usize,
    }

    impl DeviceChannel for Filler {
        fn operation(&mut self, op: u32, block: Option<&mut [u8]>) -> i32 {
            if JbodCommand::decode(op) == Ok(JbodCommand::ReadBlock) {
                self.reads += 1;
                if let Some(block) = block {
                    block.fill(0xAB);
                }
            }
            JBOD_OK
        }
    }

    #[test]
    fn read_up_to_the_last_address_of_a_4gb_array() {
        let g = Geometry::new(16, 1 << 28, 1 << 20, 1024).unwrap();
        let mut session = Mdadm::with_geometry(Filler { reads: 0 }, g).mount().unwrap();

        let mut buf = [0u8; 20];
        assert_eq!(session.read(u32::MAX - 19, 20, Some(&mut buf[..])).unwrap(), 20);
        assert!(buf.iter().all(|&b| b == 0xAB));
        assert!(matches!(
            session.read(u32::MAX - 10, 20, Some(&mut buf[..])),
            Err(MdadmError::OutOfBounds { .. })
        ));
        assert_eq!(session.into_channel().reads, 1);
    }

    #[test]
    fn bounds_are_checked_without_overflow() {
        let mut session = Mdadm::new(Toggle { ops: vec![], accept: true })
            .mount()
            .unwrap();
        let mut buf = [0u8; 16];
        assert!(matches!(
            session.read(u32::MAX, 16, Some(&mut buf)),
            Err(MdadmError::OutOfBounds { .. })
        ));
        assert!(matches!(
            session.read(16, u32::MAX, Some(&mut buf)),
            Err(MdadmError::OutOfBounds { .. })
        ));
        assert_eq!(session.into_channel().ops, vec![JbodCommand::Mount]);
    }

    #[test]
    fn argument_errors_come_after_zero_length() {
        let mut session = Mdadm::new(Toggle { ops: vec![], accept: true })
            .mount()
            .unwrap();
        assert_eq!(session.read(0, 0, None).unwrap(), 0);
        assert!(matches!(
            session.read(0, 8, None),
            Err(MdadmError::MissingBuffer)
        ));
        let mut small = [0u8; 4];
        assert!(matches!(
            session.read(0, 8, Some(&mut small)),
            Err(MdadmError::BufferTooSmall { len: 8, capacity: 4 })
        ));
    }
}
