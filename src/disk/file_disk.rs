use std::{
    fs::{File, OpenOptions},
    io::{BufWriter, Error, ErrorKind, Read, Result, Seek, SeekFrom, Write},
    path::Path,
    sync::Mutex,
};

use crate::disk::{
    block_device::BlockDevice,
    types::{pattern_byte, Geometry},
};

/// 以单个镜像文件为后端的磁盘阵列
#[derive(Debug)]
pub struct FileDisk {
    file: Mutex<File>,
    geometry: Geometry,
}

impl FileDisk {
    /// 打开已有镜像，文件大小必须和几何参数一致
    pub fn open(path: impl AsRef<Path>, geometry: Geometry) -> Result<Self> {
        let file = OpenOptions::new().read(true).open(path)?;

        let len = file.metadata()?.len();
        if len != geometry.total_size() {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!(
                    "image is {} bytes, geometry needs {}",
                    len,
                    geometry.total_size()
                ),
            ));
        }

        Ok(Self {
            file: Mutex::new(file),
            geometry,
        })
    }

    /// 新建镜像并写入填充内容，每写完一块磁盘回调一次 `on_disk`
    pub fn create(
        path: impl AsRef<Path>,
        geometry: Geometry,
        mut on_disk: impl FnMut(u32),
    ) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;

        {
            let mut writer = BufWriter::new(&file);
            let disk_size = geometry.disk_size() as u64;
            for disk_id in 0..geometry.num_disks() {
                let start = disk_id as u64 * disk_size;
                let data: Vec<u8> = (start..start + disk_size).map(pattern_byte).collect();
                writer.write_all(&data)?;
                on_disk(disk_id);
            }
            writer.flush()?;
        }
        file.sync_all()?;

        Ok(Self {
            file: Mutex::new(file),
            geometry,
        })
    }
}

impl BlockDevice for FileDisk {
    fn geometry(&self) -> Geometry {
        self.geometry
    }

    fn read_block(&self, disk_id: u32, block_id: u32, buf: &mut [u8]) -> Result<()> {
        let offset = self.block_offset(disk_id, block_id);
        let mut file = self
            .file
            .lock()
            .map_err(|_| Error::new(ErrorKind::Other, "disk image lock poisoned"))?;
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(buf)?;
        Ok(())
    }
}
