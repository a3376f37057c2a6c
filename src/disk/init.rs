use std::{io::Result, path::Path};

use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use crate::disk::{file_disk::FileDisk, types::Geometry};

/// 打开镜像文件；不存在时新建并填充，进度按磁盘显示
pub fn open_or_create_image(path: &Path, geometry: Geometry) -> Result<FileDisk> {
    if path.exists() {
        info!("opening disk image {}", path.display());
        return FileDisk::open(path, geometry);
    }

    info!("creating disk image {}", path.display());

    let pb = ProgressBar::new(geometry.num_disks() as u64);
    if let Ok(style) = ProgressStyle::with_template("[{bar:40.cyan/blue}] disk {pos:>2}/{len} {msg}") {
        pb.set_style(style.progress_chars("=> "));
    }

    let disk = FileDisk::create(path, geometry, |disk_id| {
        pb.set_position(disk_id as u64 + 1);
    })?;

    pb.finish_with_message("✅ Image ready!");
    Ok(disk)
}
