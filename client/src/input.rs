//! Terminal command parsing

use shared::{ClientMessage, Move};

/// What the player typed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCommand {
    Send(ClientMessage),
    Help,
    Quit,
}

pub const HELP: &str = "Commands: <row> <col> | <row>,<col> | reset | help | quit";

/// Parses one line of user input.
///
/// Accepts `7 7`, `7,7` and the raw wire form `move,7,7`. Range checks are
/// left to the server.
pub fn parse_command(line: &str) -> Result<UserCommand, String> {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "q" | "quit" | "exit" => return Ok(UserCommand::Quit),
        "h" | "help" | "?" => return Ok(UserCommand::Help),
        "r" | "reset" => return Ok(UserCommand::Send(ClientMessage::Reset)),
        _ => {}
    }

    if let Ok(message) = line.parse::<ClientMessage>() {
        return Ok(UserCommand::Send(message));
    }

    let fields: Vec<&str> = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|f| !f.is_empty())
        .collect();

    match fields.as_slice() {
        [row, col] => match (row.parse::<i32>(), col.parse::<i32>()) {
            (Ok(row), Ok(col)) => Ok(UserCommand::Send(ClientMessage::Move(Move::new(
                row, col,
            )))),
            _ => Err(format!("Not a coordinate pair: {:?}", line)),
        },
        _ => Err(format!("Unknown command: {:?}", line)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn move_command(row: i32, col: i32) -> UserCommand {
        UserCommand::Send(ClientMessage::Move(Move::new(row, col)))
    }

    #[test]
    fn test_coordinate_forms() {
        assert_eq!(parse_command("7 8"), Ok(move_command(7, 8)));
        assert_eq!(parse_command("7,8"), Ok(move_command(7, 8)));
        assert_eq!(parse_command("  7 ,  8 "), Ok(move_command(7, 8)));
        assert_eq!(parse_command("move,7,8"), Ok(move_command(7, 8)));
    }

    #[test]
    fn test_out_of_range_is_left_to_server() {
        assert_eq!(parse_command("15 0"), Ok(move_command(15, 0)));
    }

    #[test]
    fn test_keywords() {
        assert_eq!(parse_command("quit"), Ok(UserCommand::Quit));
        assert_eq!(parse_command("Q"), Ok(UserCommand::Quit));
        assert_eq!(parse_command("help"), Ok(UserCommand::Help));
        assert_eq!(
            parse_command("reset"),
            Ok(UserCommand::Send(ClientMessage::Reset))
        );
    }

    #[test]
    fn test_garbage() {
        assert!(parse_command("").is_err());
        assert!(parse_command("seven eight").is_err());
        assert!(parse_command("1 2 3").is_err());
    }
}
