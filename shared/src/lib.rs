use std::fmt;

pub mod protocol;

pub use protocol::{ClientMessage, ServerMessage};

pub const BOARD_SIZE: usize = 15;
pub const WIN_LENGTH: usize = 5;
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    A,
    B,
}

impl Player {
    /// PlayerA always opens the game.
    pub const FIRST: Player = Player::A;

    pub fn symbol(self) -> char {
        match self {
            Player::A => 'O',
            Player::B => 'X',
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "O" => Some(Player::A),
            "X" => Some(Player::B),
            _ => None,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Player::A => Player::B,
            Player::B => Player::A,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Occupied(Player),
}

impl Cell {
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

/// A single placement request. Coordinates are signed so that negative
/// input surfaces as `OutOfRange` rather than as a parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub row: i32,
    pub col: i32,
}

impl Move {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("cell ({row}, {col}) is outside the board")]
    OutOfRange { row: i32, col: i32 },
    #[error("cell ({row}, {col}) is already occupied")]
    CellOccupied { row: i32, col: i32 },
    #[error("it is not your turn")]
    NotYourTurn,
    #[error("the game is over")]
    GameOver,
    #[error("the table already has two players")]
    TableFull,
    #[error("malformed message: {0:?}")]
    MalformedMessage(String),
    #[error("connection lost")]
    ConnectionLost,
    #[error("a game is still in progress")]
    GameInProgress,
}

impl GameError {
    /// Stable reason code sent in `error,<reason>` lines
    pub fn reason(&self) -> &'static str {
        match self {
            GameError::OutOfRange { .. } => "out_of_range",
            GameError::CellOccupied { .. } => "cell_occupied",
            GameError::NotYourTurn => "not_your_turn",
            GameError::GameOver => "game_over",
            GameError::TableFull => "table_full",
            GameError::MalformedMessage(_) => "malformed_message",
            GameError::ConnectionLost => "connection_lost",
            GameError::GameInProgress => "game_in_progress",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    fn index(row: i32, col: i32) -> Result<(usize, usize), GameError> {
        let in_range = |v: i32| v >= 0 && (v as usize) < BOARD_SIZE;
        if in_range(row) && in_range(col) {
            Ok((row as usize, col as usize))
        } else {
            Err(GameError::OutOfRange { row, col })
        }
    }

    pub fn get(&self, row: i32, col: i32) -> Result<Cell, GameError> {
        let (r, c) = Self::index(row, col)?;
        Ok(self.cells[r][c])
    }

    pub fn place(&mut self, row: i32, col: i32, player: Player) -> Result<(), GameError> {
        let (r, c) = Self::index(row, col)?;
        let cell = &mut self.cells[r][c];
        if !cell.is_empty() {
            return Err(GameError::CellOccupied { row, col });
        }
        *cell = Cell::Occupied(player);
        Ok(())
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(|cell| !cell.is_empty())
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().flatten().filter(|cell| !cell.is_empty()).count()
    }

    pub fn clear(&mut self) {
        self.cells = [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE];
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell; BOARD_SIZE]> {
        self.cells.iter()
    }
}

/// Axis along which five marks were aligned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Horizontal,
    Vertical,
    Diagonal,
    AntiDiagonal,
}

impl Direction {
    /// Scan order; the first axis that reaches the threshold is reported.
    pub const ALL: [Direction; 4] = [
        Direction::Horizontal,
        Direction::Vertical,
        Direction::Diagonal,
        Direction::AntiDiagonal,
    ];

    /// Forward step as (row, col); the backward step is its negation.
    pub fn step(self) -> (i32, i32) {
        match self {
            Direction::Horizontal => (0, 1),
            Direction::Vertical => (1, 0),
            Direction::Diagonal => (1, 1),
            Direction::AntiDiagonal => (1, -1),
        }
    }
}

/// Counts same-player cells after `(row, col)` along one step, up to `WIN_LENGTH - 1`.
fn count_run(
    board: &Board,
    row: i32,
    col: i32,
    (dr, dc): (i32, i32),
    player: Player,
) -> usize {
    let mut count = 0;
    for i in 1..WIN_LENGTH as i32 {
        match board.get(row + dr * i, col + dc * i) {
            Ok(Cell::Occupied(owner)) if owner == player => count += 1,
            _ => break,
        }
    }
    count
}

/// Checks whether the mark `player` just placed at `(row, col)` completes a
/// line of at least `WIN_LENGTH`. Returns the first winning axis in
/// `Direction::ALL` order.
pub fn check_win(board: &Board, row: i32, col: i32, player: Player) -> Option<Direction> {
    Direction::ALL.into_iter().find(|direction| {
        let (dr, dc) = direction.step();
        let forward = count_run(board, row, col, (dr, dc), player);
        let backward = count_run(board, row, col, (-dr, -dc), player);
        1 + forward + backward >= WIN_LENGTH
    })
}
