use colored::*;

use crate::{
    disk::Geometry,
    jbod::DeviceChannel,
    mdadm::{Mdadm, MdadmError, Result, Session},
    utils::hex_dump,
};

#[derive(Debug)]
pub enum Command {
    Help,
    Mount,
    Unmount,
    Read(u32, u32),
    Locate(u32),
    Geometry,
    Exit,
}

/// shell 持有的阵列，挂载与否二选一
pub enum Array<C: DeviceChannel> {
    Unmounted(Mdadm<C>),
    Mounted(Session<C>),
}

impl<C: DeviceChannel> Array<C> {
    pub fn geometry(&self) -> Geometry {
        match self {
            Self::Unmounted(m) => m.geometry(),
            Self::Mounted(s) => s.geometry(),
        }
    }

    pub fn is_mounted(&self) -> bool {
        matches!(self, Self::Mounted(_))
    }

    fn mount(self) -> (Self, Result<()>) {
        match self {
            Self::Mounted(s) => (Self::Mounted(s), Err(MdadmError::AlreadyMounted)),
            Self::Unmounted(m) => match m.mount() {
                Ok(s) => (Self::Mounted(s), Ok(())),
                Err(rejected) => {
                    let (m, e) = rejected.into_parts();
                    (Self::Unmounted(m), Err(e))
                }
            },
        }
    }

    fn unmount(self) -> (Self, Result<()>) {
        match self {
            Self::Unmounted(m) => (Self::Unmounted(m), Err(MdadmError::NotMounted)),
            Self::Mounted(s) => match s.unmount() {
                Ok(m) => (Self::Unmounted(m), Ok(())),
                Err(rejected) => {
                    let (s, e) = rejected.into_parts();
                    (Self::Mounted(s), Err(e))
                }
            },
        }
    }

    fn read(&mut self, addr: u32, len: u32) -> Result<Vec<u8>> {
        let Self::Mounted(session) = self else {
            return Err(MdadmError::NotMounted);
        };
        // 过大的请求会被 read 拒绝，这里不必按 len 分配
        let capacity = len.min(session.geometry().max_io_size()) as usize;
        let mut buf = vec![0u8; capacity];
        let n = session.read(addr, len, Some(&mut buf[..]))?;
        buf.truncate(n);
        Ok(buf)
    }
}

/// 执行一条命令，返回执行后的阵列状态和结果
pub fn execute_command<C: DeviceChannel>(
    cmd: &Command,
    array: Array<C>,
) -> (Array<C>, Result<()>) {
    match cmd {
        Command::Help => {
            print_help();
            (array, Ok(()))
        }
        Command::Mount => {
            let (array, result) = array.mount();
            if result.is_ok() {
                println!("{}", "✅ Array mounted".green());
            }
            (array, result)
        }
        Command::Unmount => {
            let (array, result) = array.unmount();
            if result.is_ok() {
                println!("{}", "📤 Array unmounted".yellow());
            }
            (array, result)
        }
        Command::Read(addr, len) => {
            let mut array = array;
            let result = array.read(*addr, *len).map(|data| {
                println!(
                    "📖 {} bytes from {}",
                    data.len().to_string().cyan(),
                    format!("{:#x}", addr).cyan()
                );
                print!("{}", hex_dump(*addr, &data));
            });
            (array, result)
        }
        Command::Locate(addr) => {
            let geometry = array.geometry();
            let result = match geometry.locate(*addr) {
                Some(at) => {
                    println!("📍 {:#x} → {}", addr, at.to_string().blue());
                    Ok(())
                }
                None => Err(MdadmError::OutOfBounds {
                    addr: *addr,
                    len: 0,
                    limit: geometry.total_size(),
                }),
            };
            (array, result)
        }
        Command::Geometry => {
            print_geometry(&array);
            (array, Ok(()))
        }
        Command::Exit => {
            println!("{}", "👋 Exiting MiniJBOD shell...".yellow().bold());
            (array, Ok(()))
        }
    }
}

fn print_geometry<C: DeviceChannel>(array: &Array<C>) {
    let g = array.geometry();
    println!(
        "{}\n{}: {}\n{}: {} bytes\n{}: {} bytes ({} per disk)\n{}: {} bytes\n{}: {} bytes\n{}: {}\n",
        "📊 Array Info".bright_yellow().bold(),
        "Disks".blue(),
        g.num_disks(),
        "Disk size".blue(),
        g.disk_size(),
        "Block size".blue(),
        g.block_size(),
        g.blocks_per_disk(),
        "Capacity".blue(),
        g.total_size(),
        "Max read".blue(),
        g.max_io_size(),
        "Mounted".blue(),
        if array.is_mounted() { "yes".green() } else { "no".red() }
    );
}

fn print_help() {
    println!("{}", "📘 MiniJBOD Commands".bright_cyan().bold());
    println!(
        "{}",
        "
  mount              Mount the disk array
  unmount            Unmount the disk array
  read <addr> <len>  Read bytes from the linear address space
  locate <addr>      Show which disk/block/offset an address maps to
  geometry           Show array geometry
  help               Show this help message
  exit               Quit the shell

  Numbers may be decimal or 0x-prefixed hex.
"
        .bright_black()
    );
}
