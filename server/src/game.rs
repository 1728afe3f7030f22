use log::info;
use shared::{check_win, Board, Direction, GameError, Move, Player};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Active,
    Won(Player),
    Draw,
    Abandoned,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        self != GameStatus::Active
    }
}

/// Result of an accepted move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub mv: Move,
    pub player: Player,
    pub status: GameStatus,
    pub winner: Option<Player>,
    pub line: Option<Direction>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    pub turn: Player,
    pub status: GameStatus,
    /// Accepted moves in the order they were played
    pub history: Vec<Move>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            turn: Player::FIRST,
            status: GameStatus::Active,
            history: Vec::new(),
        }
    }

    /// Validates and applies a move for `player`.
    ///
    /// All checks run before the board is touched, so a rejected move leaves
    /// the state exactly as it was.
    pub fn submit_move(
        &mut self,
        player: Player,
        row: i32,
        col: i32,
    ) -> Result<MoveOutcome, GameError> {
        if self.status.is_terminal() {
            return Err(GameError::GameOver);
        }
        if player != self.turn {
            return Err(GameError::NotYourTurn);
        }

        self.board.place(row, col, player)?;
        self.turn = player.other();
        self.history.push(Move::new(row, col));

        let line = check_win(&self.board, row, col, player);
        self.status = if line.is_some() {
            GameStatus::Won(player)
        } else if self.board.is_full() {
            GameStatus::Draw
        } else {
            GameStatus::Active
        };

        info!("Player {} placed ({}, {})", player, row, col);

        Ok(MoveOutcome {
            mv: Move::new(row, col),
            player,
            status: self.status,
            winner: line.map(|_| player),
            line,
        })
    }

    /// Starts a new game; refused while the current one is still being played.
    pub fn reset(&mut self) -> Result<(), GameError> {
        if !self.status.is_terminal() {
            return Err(GameError::GameInProgress);
        }
        self.board.clear();
        self.history.clear();
        self.turn = Player::FIRST;
        self.status = GameStatus::Active;
        info!("Board reset, player {} to move", self.turn);
        Ok(())
    }

    /// Ends an active game because a player left. Returns true if the status changed.
    pub fn abandon(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = GameStatus::Abandoned;
        info!("Game abandoned");
        true
    }

    pub fn snapshot(&self) -> GameState {
        self.clone()
    }
}
