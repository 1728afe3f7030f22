//! Line-oriented text protocol spoken between clients and the server
//!
//! Every message is one ASCII line of comma-separated fields. Lines are
//! decoded once at the connection boundary into tagged variants so the rest
//! of the program never touches raw text.

use crate::{GameError, Move, Player};
use std::fmt;
use std::str::FromStr;

/// Messages sent by a client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientMessage {
    Move(Move),
    Reset,
}

/// Messages sent by the server, either broadcast or addressed to one session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    Welcome(Player),
    Move(Move),
    Win(Player),
    Draw,
    Abandoned,
    Reset,
    Error { reason: String },
}

impl From<&GameError> for ServerMessage {
    fn from(error: &GameError) -> Self {
        ServerMessage::Error {
            reason: error.reason().to_string(),
        }
    }
}

fn malformed(line: &str) -> GameError {
    GameError::MalformedMessage(line.to_string())
}

fn parse_coordinate(field: &str, line: &str) -> Result<i32, GameError> {
    field.trim().parse().map_err(|_| malformed(line))
}

fn parse_move(fields: &[&str], line: &str) -> Result<Move, GameError> {
    match fields {
        [row, col] => Ok(Move::new(
            parse_coordinate(row, line)?,
            parse_coordinate(col, line)?,
        )),
        _ => Err(malformed(line)),
    }
}

impl FromStr for ClientMessage {
    type Err = GameError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let trimmed = line.trim();
        let fields: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        match fields.as_slice() {
            ["move", rest @ ..] => parse_move(rest, line).map(ClientMessage::Move),
            ["reset"] => Ok(ClientMessage::Reset),
            _ => Err(malformed(line)),
        }
    }
}

impl fmt::Display for ClientMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientMessage::Move(mv) => write!(f, "move,{},{}", mv.row, mv.col),
            ClientMessage::Reset => write!(f, "reset"),
        }
    }
}

impl FromStr for ServerMessage {
    type Err = GameError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let trimmed = line.trim();
        let fields: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        let player = |symbol: &str| Player::from_symbol(symbol).ok_or_else(|| malformed(line));
        match fields.as_slice() {
            ["welcome", symbol] => Ok(ServerMessage::Welcome(player(*symbol)?)),
            ["move", rest @ ..] => parse_move(rest, line).map(ServerMessage::Move),
            ["win", symbol] => Ok(ServerMessage::Win(player(*symbol)?)),
            ["draw"] => Ok(ServerMessage::Draw),
            ["abandoned"] => Ok(ServerMessage::Abandoned),
            ["reset"] => Ok(ServerMessage::Reset),
            ["error", reason] if !reason.is_empty() => Ok(ServerMessage::Error {
                reason: reason.to_string(),
            }),
            _ => Err(malformed(line)),
        }
    }
}

impl fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerMessage::Welcome(player) => write!(f, "welcome,{}", player),
            ServerMessage::Move(mv) => write!(f, "move,{},{}", mv.row, mv.col),
            ServerMessage::Win(player) => write!(f, "win,{}", player),
            ServerMessage::Draw => write!(f, "draw"),
            ServerMessage::Abandoned => write!(f, "abandoned"),
            ServerMessage::Reset => write!(f, "reset"),
            ServerMessage::Error { reason } => write!(f, "error,{}", reason),
        }
    }
}
