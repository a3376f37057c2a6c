use crate::{shell::command::Command, utils::parse_number};

pub fn parse_command(input: &str) -> Option<Command> {
    let tokens: Vec<&str> = input.trim().split_ascii_whitespace().collect();
    if tokens.is_empty() {
        return None;
    }

    let cmd = tokens[0];
    let args = &tokens[1..];

    match cmd {
        "help" => Some(Command::Help),
        "mount" => Some(Command::Mount),
        "unmount" | "umount" => Some(Command::Unmount),
        "read" => {
            let addr = parse_number(args.first()?)?;
            let len = parse_number(args.get(1)?)?;
            Some(Command::Read(addr, len))
        }
        "locate" => args
            .first()
            .and_then(|&a| parse_number(a))
            .map(Command::Locate),
        "geometry" => Some(Command::Geometry),
        "exit" | "quit" => Some(Command::Exit),
        _ => None,
    }
}
