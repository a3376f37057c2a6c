use std::{error::Error, path::PathBuf};

use clap::Parser;
use dialoguer::Confirm;
use env_logger::Env;
use log::LevelFilter;

use mini_jbod::{
    disk::{init::open_or_create_image, Geometry, JbodController},
    mdadm::Mdadm,
    shell::{command::Array, start_shell},
};

/// 交互式 JBOD 只读访问 shell
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// 磁盘镜像路径
    #[arg(short, long, default_value = "jbod.img")]
    image: PathBuf,

    /// 日志级别，覆盖 RUST_LOG
    #[arg(long)]
    log_level: Option<LevelFilter>,

    /// 镜像不存在时直接创建，不再询问
    #[arg(short, long)]
    yes: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let mut logger = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(level) = args.log_level {
        logger.filter_level(level);
    }
    logger.init();

    if !args.image.exists() && !args.yes {
        let create = Confirm::new()
            .with_prompt(format!("{} does not exist. Create it?", args.image.display()))
            .default(true)
            .interact()?;
        if !create {
            return Ok(());
        }
    }

    let disk = open_or_create_image(&args.image, Geometry::JBOD)?;
    let array = Array::Unmounted(Mdadm::new(JbodController::new(disk)));

    start_shell(array, &args.image.display().to_string())
}
