//! Client-side mirror of the board
//!
//! The client never validates moves or detects wins. It replays exactly what
//! the server broadcasts: each `move` line is placed for whichever player is
//! due, because the server only ever echoes moves in strict alternation.

use log::warn;
use shared::{Board, Move, Player, ServerMessage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientStatus {
    Playing,
    Won(Player),
    Draw,
    Abandoned,
}

#[derive(Debug, Clone)]
pub struct ClientGameState {
    pub board: Board,
    pub me: Option<Player>,
    pub next: Player,
    pub status: ClientStatus,
    pub last_move: Option<Move>,
    pub last_error: Option<String>,
}

impl Default for ClientGameState {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientGameState {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            me: None,
            next: Player::FIRST,
            status: ClientStatus::Playing,
            last_move: None,
            last_error: None,
        }
    }

    pub fn is_my_turn(&self) -> bool {
        self.status == ClientStatus::Playing && self.me == Some(self.next)
    }

    /// Applies one server message to the local view
    pub fn apply_server_message(&mut self, message: &ServerMessage) {
        self.last_error = None;

        match message {
            ServerMessage::Welcome(player) => {
                self.me = Some(*player);
            }
            ServerMessage::Move(mv) => {
                if let Err(e) = self.board.place(mv.row, mv.col, self.next) {
                    // Only possible if this mirror missed a broadcast
                    warn!("Local board out of sync with server: {}", e);
                }
                self.next = self.next.other();
                self.last_move = Some(*mv);
            }
            ServerMessage::Win(player) => {
                self.status = ClientStatus::Won(*player);
            }
            ServerMessage::Draw => {
                self.status = ClientStatus::Draw;
            }
            ServerMessage::Abandoned => {
                self.status = ClientStatus::Abandoned;
            }
            ServerMessage::Reset => {
                self.board.clear();
                self.next = Player::FIRST;
                self.status = ClientStatus::Playing;
                self.last_move = None;
            }
            ServerMessage::Error { reason } => {
                self.last_error = Some(reason.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Cell;

    #[test]
    fn test_moves_alternate_players() {
        let mut state = ClientGameState::new();
        state.apply_server_message(&ServerMessage::Welcome(Player::B));
        assert!(!state.is_my_turn());

        state.apply_server_message(&ServerMessage::Move(Move::new(7, 7)));
        assert_eq!(state.board.get(7, 7), Ok(Cell::Occupied(Player::A)));
        assert!(state.is_my_turn());

        state.apply_server_message(&ServerMessage::Move(Move::new(7, 8)));
        assert_eq!(state.board.get(7, 8), Ok(Cell::Occupied(Player::B)));
        assert_eq!(state.next, Player::A);
        assert_eq!(state.last_move, Some(Move::new(7, 8)));
    }

    #[test]
    fn test_win_and_reset() {
        let mut state = ClientGameState::new();
        state.apply_server_message(&ServerMessage::Welcome(Player::A));
        state.apply_server_message(&ServerMessage::Move(Move::new(0, 0)));
        state.apply_server_message(&ServerMessage::Win(Player::A));
        assert_eq!(state.status, ClientStatus::Won(Player::A));
        assert!(!state.is_my_turn());

        state.apply_server_message(&ServerMessage::Reset);
        assert_eq!(state.status, ClientStatus::Playing);
        assert_eq!(state.board, Board::new());
        assert_eq!(state.next, Player::A);
        assert_eq!(state.me, Some(Player::A));
        assert!(state.is_my_turn());
    }

    #[test]
    fn test_error_is_kept_until_next_message() {
        let mut state = ClientGameState::new();
        state.apply_server_message(&ServerMessage::Error {
            reason: "cell_occupied".to_string(),
        });
        assert_eq!(state.last_error.as_deref(), Some("cell_occupied"));

        state.apply_server_message(&ServerMessage::Abandoned);
        assert_eq!(state.last_error, None);
        assert_eq!(state.status, ClientStatus::Abandoned);
    }

    #[test]
    fn test_duplicate_move_does_not_panic() {
        let mut state = ClientGameState::new();
        state.apply_server_message(&ServerMessage::Move(Move::new(1, 1)));
        state.apply_server_message(&ServerMessage::Move(Move::new(1, 1)));
        assert_eq!(state.board.get(1, 1), Ok(Cell::Occupied(Player::A)));
        assert_eq!(state.board.occupied_count(), 1);
    }
}
