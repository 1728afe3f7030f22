use crate::game::{ClientGameState, ClientStatus};
use shared::{Cell, Move, BOARD_SIZE};
use std::fmt::Write;

/// Draws the board as a text grid with row and column indices.
/// The most recent move is bracketed.
pub fn render_board(state: &ClientGameState) -> String {
    let mut out = String::from("    ");
    for col in 0..BOARD_SIZE {
        let _ = write!(out, "{:>3}", col);
    }
    out.push('\n');

    for (row, cells) in state.board.rows().enumerate() {
        let _ = write!(out, "{:>3} ", row);
        for (col, cell) in cells.iter().enumerate() {
            let mark = match cell {
                Cell::Empty => '.',
                Cell::Occupied(player) => player.symbol(),
            };
            let here = Move::new(row as i32, col as i32);
            if state.last_move == Some(here) {
                let _ = write!(out, " [{}", mark);
            } else if col > 0 && state.last_move == Some(Move::new(row as i32, col as i32 - 1)) {
                let _ = write!(out, "] {}", mark);
            } else {
                let _ = write!(out, "  {}", mark);
            }
        }
        if state.last_move == Some(Move::new(row as i32, BOARD_SIZE as i32 - 1)) {
            out.push(']');
        }
        out.push('\n');
    }
    out
}

/// One-line summary shown under the board
pub fn status_line(state: &ClientGameState) -> String {
    let me = state
        .me
        .map(|p| format!("You are {}", p))
        .unwrap_or_else(|| "Not seated".to_string());

    let status = match state.status {
        ClientStatus::Won(player) if state.me == Some(player) => {
            "You win! Type 'reset' for a new game".to_string()
        }
        ClientStatus::Won(player) => format!("{} wins. Type 'reset' for a new game", player),
        ClientStatus::Draw => "Draw. Type 'reset' for a new game".to_string(),
        ClientStatus::Abandoned => "Opponent left, waiting for a new player".to_string(),
        ClientStatus::Playing if state.is_my_turn() => "Your move".to_string(),
        ClientStatus::Playing => format!("Waiting for {}", state.next),
    };

    match &state.last_error {
        Some(reason) => format!("{} | {} | {}", me, status, describe_reason(reason)),
        None => format!("{} | {}", me, status),
    }
}

/// Human-readable text for a server `error,<reason>` code
pub fn describe_reason(reason: &str) -> String {
    match reason {
        "out_of_range" => format!("That cell is off the {0}x{0} board", BOARD_SIZE),
        "cell_occupied" => "That cell is already taken".to_string(),
        "not_your_turn" => "It is not your turn".to_string(),
        "game_over" => "The game is over".to_string(),
        "table_full" => "Two players are already seated".to_string(),
        "malformed_message" => "The server did not understand that".to_string(),
        "game_in_progress" => "The game is still in progress".to_string(),
        other => format!("Server error: {}", other),
    }
}
