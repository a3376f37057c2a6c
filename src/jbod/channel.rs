/// 设备操作成功
pub const JBOD_OK: i32 = 0;

/// 设备操作失败
pub const JBOD_ERR: i32 = -1;

/// 设备操作通道：接受一个编码后的命令字和可选的块缓冲区，返回状态码。
///
/// `0` 表示成功，其它值表示失败。`SeekToDisk`/`SeekToBlock` 只看操作数，
/// `ReadBlock` 把一个块的数据写入 `block`，`Mount`/`Unmount` 两者都不用。
pub trait DeviceChannel {
    fn operation(&mut self, op: u32, block: Option<&mut [u8]>) -> i32;
}

impl<T: DeviceChannel + ?Sized> DeviceChannel for &mut T {
    fn operation(&mut self, op: u32, block: Option<&mut [u8]>) -> i32 {
        (**self).operation(op, block)
    }
}

impl<T: DeviceChannel + ?Sized> DeviceChannel for Box<T> {
    fn operation(&mut self, op: u32, block: Option<&mut [u8]>) -> i32 {
        (**self).operation(op, block)
    }
}
