pub mod command;
pub mod parse;

use crate::{
    jbod::DeviceChannel,
    shell::{
        command::{execute_command, Array, Command},
        parse::parse_command,
    },
};
use colored::*;
use crossterm::{
    cursor, execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use reedline::{
    DefaultCompleter, DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal,
};
use std::{error::Error, io::stdout, path::PathBuf};

const COMMANDS: [&str; 7] = [
    "help", "mount", "unmount", "read", "locate", "geometry", "exit",
];

pub fn start_shell<C: DeviceChannel>(mut array: Array<C>, image: &str) -> Result<(), Box<dyn Error>> {
    banner(image)?;

    let username = whoami::username();
    let hostname = whoami::hostname();

    println!(
        "{}",
        "Type 'help' for available commands. Use ↑↓ for history, Tab for auto-completion.\n"
            .bright_black()
    );

    let history_path = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".minijbod_history");

    let mut line_editor =
        Reedline::create().with_history(Box::new(FileBackedHistory::with_file(100, history_path)?));

    let completer =
        DefaultCompleter::new_with_wordlen(COMMANDS.iter().map(|c| c.to_string()).collect(), 2);
    line_editor = line_editor.with_completer(Box::new(completer));

    loop {
        let state = if array.is_mounted() {
            "mounted".green()
        } else {
            "unmounted".red()
        };
        let full_prompt = format!("{}:{}", format!("{}@{}", username, hostname).green(), state);

        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic(full_prompt),
            DefaultPromptSegment::Basic("MiniJBOD".bright_blue().bold().to_string()),
        );

        let input = line_editor.read_line(&prompt);

        match input {
            Ok(Signal::Success(buffer)) => {
                let trimmed = buffer.trim();
                if trimmed.is_empty() {
                    continue;
                }

                match parse_command(trimmed) {
                    Some(cmd) => {
                        let (next, result) = execute_command(&cmd, array);
                        array = next;
                        if let Err(e) = result {
                            println!("{} {}", "❌ Error:".red().bold(), e);
                        }
                        if matches!(cmd, Command::Exit) {
                            break;
                        }
                    }
                    None => println!(
                        "{}",
                        "⚠️  Unknown command. Type 'help' for command list.".yellow()
                    ),
                }
            }
            Ok(Signal::CtrlC) => {
                println!();
                continue;
            }
            Ok(Signal::CtrlD) => {
                println!("{}", "Exiting MiniJBOD...".yellow());
                break;
            }
            Err(e) => {
                println!("Error reading line: {}", e);
                break;
            }
        }
    }

    // 退出前尽量卸载
    if array.is_mounted() {
        let (_, result) = execute_command(&Command::Unmount, array);
        if let Err(e) = result {
            println!("{} {}", "❌ Error:".red().bold(), e);
        }
    }

    println!("{}", "GoodBye!".bright_yellow());
    Ok(())
}

fn banner(image: &str) -> std::io::Result<()> {
    let mut stdout = stdout();

    execute!(
        stdout,
        Clear(ClearType::All),
        cursor::MoveTo(0, 0),
        SetForegroundColor(Color::Cyan),
        Print(format!("Welcome to MiniJBOD v{}\n", env!("CARGO_PKG_VERSION"))),
        ResetColor
    )?;
    println!("{} {}", "💽 Image:".bright_black(), image);
    Ok(())
}
