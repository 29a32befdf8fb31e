//! Board representation for Caro

pub mod bitboard;
pub mod board;


// Re-exports
pub use bitboard::Bitboard;
pub use board::Board;

/// Board size (10x10)
pub const BOARD_SIZE: usize = 10;
pub const TOTAL_CELLS: usize = BOARD_SIZE * BOARD_SIZE; // 100

/// Consecutive stones needed to win
pub const WIN_LENGTH: usize = 5;

/// Direction vectors for line scanning, in scan order: →, ↓, ↘, ↙
pub const DIRECTIONS: [(i32, i32); 4] = [
    (0, 1),  // Horizontal
    (1, 0),  // Vertical
    (1, 1),  // Diagonal SE
    (1, -1), // Diagonal SW
];

/// One of the two sides.
///
/// `X` moves as the human in player-vs-computer games and is the minimizing
/// side of the search; `O` is the computer and the maximizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Get the other side
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Cell state occupied by this player
    #[inline]
    pub fn cell(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::X => f.write_str("X"),
            Player::O => f.write_str("O"),
        }
    }
}

/// State of a single board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    X,
    O,
}

impl Cell {
    /// Owner of the stone in this cell, `None` when empty
    #[inline]
    pub fn owner(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::X => Some(Player::X),
            Cell::O => Some(Player::O),
        }
    }
}

/// Position on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos {
    pub row: u8,
    pub col: u8,
}

impl Pos {
    #[inline]
    pub fn new(row: u8, col: u8) -> Self {
        debug_assert!(row < BOARD_SIZE as u8 && col < BOARD_SIZE as u8);
        Self { row, col }
    }

    /// Build a position from signed coordinates, `None` when off the board
    #[inline]
    pub fn checked(row: i32, col: i32) -> Option<Self> {
        if Self::is_valid(row, col) {
            Some(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// The center cell, played first on an empty board
    #[inline]
    pub const fn center() -> Self {
        Self {
            row: (BOARD_SIZE / 2) as u8,
            col: (BOARD_SIZE / 2) as u8,
        }
    }

    #[inline]
    pub fn in_bounds(self) -> bool {
        (self.row as usize) < BOARD_SIZE && (self.col as usize) < BOARD_SIZE
    }

    #[inline]
    pub fn to_index(self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    #[inline]
    pub fn from_index(idx: usize) -> Self {
        Self {
            row: (idx / BOARD_SIZE) as u8,
            col: (idx % BOARD_SIZE) as u8,
        }
    }

    #[inline]
    pub fn is_valid(row: i32, col: i32) -> bool {
        row >= 0 && row < BOARD_SIZE as i32 && col >= 0 && col < BOARD_SIZE as i32
    }

    /// Step `n` cells along a direction, `None` when it leaves the board
    #[inline]
    pub fn step(self, (dr, dc): (i32, i32), n: i32) -> Option<Pos> {
        Self::checked(i32::from(self.row) + dr * n, i32::from(self.col) + dc * n)
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl PartialOrd for Pos {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pos {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.to_index().cmp(&other.to_index())
    }
}
