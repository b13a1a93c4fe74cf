use snake_common::games::snake::{Direction, direction_from_key};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerCommand {
    Turn(Direction),
    TogglePause,
    Start,
    Reset,
    Quit,
}

/// One command per stdin line. Anything unrecognised is `None`.
pub fn parse_command(line: &str) -> Option<PlayerCommand> {
    match line.trim().to_ascii_lowercase().as_str() {
        "p" | "pause" | "space" => Some(PlayerCommand::TogglePause),
        "n" | "start" => Some(PlayerCommand::Start),
        "r" | "reset" | "new" => Some(PlayerCommand::Reset),
        "q" | "quit" | "exit" => Some(PlayerCommand::Quit),
        other => direction_from_key(other).map(PlayerCommand::Turn),
    }
}
