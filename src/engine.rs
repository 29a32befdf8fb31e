//! AI engine: strength levels on top of the search
//!
//! Each level maps to a [`LevelProfile`] through a fixed table:
//!
//! | level  | search | look-ahead |
//! |--------|--------|------------|
//! | Easy   | no     | random candidate |
//! | Medium | yes    | 1 ply      |
//! | Hard   | yes    | 2 plies    |
//!
//! # Example
//!
//! ```
//! use caro::{AiEngine, AiLevel, Board, CancelToken, Player, Pos};
//!
//! let mut engine = AiEngine::with_seed(7);
//! let mut board = Board::new();
//! board.place(Pos::new(5, 5), Player::X);
//!
//! let result = engine.choose_move(&mut board, AiLevel::Medium, &CancelToken::new()).unwrap();
//! println!("Best move: {:?}", result.best_move);
//! println!("Nodes: {}", result.nodes);
//! ```

use std::time::Instant;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use tracing::debug;

use crate::board::{Board, Pos};
use crate::error::SearchAborted;
use crate::search::{candidates, BoardLease, CancelToken, Searcher, DEFAULT_RADIUS};

/// Computer strength
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AiLevel {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl AiLevel {
    pub const ALL: [AiLevel; 3] = [AiLevel::Easy, AiLevel::Medium, AiLevel::Hard];

    /// Search settings for this level
    #[inline]
    pub fn profile(self) -> LevelProfile {
        LEVEL_TABLE[self as usize]
    }

    pub fn name(self) -> &'static str {
        match self {
            AiLevel::Easy => "Easy",
            AiLevel::Medium => "Medium",
            AiLevel::Hard => "Hard",
        }
    }
}

/// How a level picks its move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelProfile {
    /// Run minimax; otherwise pick a random candidate
    pub use_search: bool,
    /// Total look-ahead in plies, counting the move being chosen
    pub depth: u8,
}

/// Indexed by `AiLevel as usize`
const LEVEL_TABLE: [LevelProfile; 3] = [
    LevelProfile { use_search: false, depth: 0 },
    LevelProfile { use_search: true, depth: 1 },
    LevelProfile { use_search: true, depth: 2 },
];

/// Result of a move search with statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveResult {
    /// Best move found; `None` means no candidate was left (a draw)
    pub best_move: Option<Pos>,
    /// Minimax value of the chosen move (0 for random picks)
    pub score: i32,
    /// Level that produced the move
    pub level: AiLevel,
    /// Number of nodes searched
    pub nodes: u64,
    /// Time taken in milliseconds
    pub time_ms: u64,
}

/// Computer opponent. Always plays O.
pub struct AiEngine {
    searcher: Searcher,
    rng: StdRng,
}

impl AiEngine {
    /// Create an engine whose random picks are seeded from OS entropy
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    /// Create an engine with reproducible random picks
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            searcher: Searcher::new(),
            rng,
        }
    }

    /// Choose O's move at `level`.
    ///
    /// Easy picks uniformly among the radius-1 candidates; Medium and Hard run
    /// minimax to the table depth. The board is handed back unchanged.
    pub fn choose_move<L: BoardLease>(
        &mut self,
        lease: &mut L,
        level: AiLevel,
        cancel: &CancelToken,
    ) -> Result<MoveResult, SearchAborted> {
        let start = Instant::now();
        let profile = level.profile();

        let (best_move, score, nodes) = if profile.use_search {
            let result = self.searcher.search(lease, profile.depth, cancel)?;
            (result.best_move, result.score, result.nodes)
        } else {
            let moves = lease.with_board(|board| candidates(board, DEFAULT_RADIUS));
            if cancel.is_cancelled() {
                return Err(SearchAborted);
            }
            (moves.choose(&mut self.rng).copied(), 0, 0)
        };

        let result = MoveResult {
            best_move,
            score,
            level,
            nodes,
            time_ms: start.elapsed().as_millis() as u64,
        };
        debug!(
            level = level.name(),
            best_move = ?result.best_move,
            score = result.score,
            nodes = result.nodes,
            time_ms = result.time_ms,
            "AI move chosen"
        );
        Ok(result)
    }

    /// Best move for O on `board`, or `None` when no candidate remains.
    pub fn best_move(&mut self, board: &mut Board, level: AiLevel) -> Option<Pos> {
        self.choose_move(board, level, &CancelToken::new())
            .ok()
            .and_then(|r| r.best_move)
    }
}

impl Default for AiEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Player, TOTAL_CELLS};

    #[test]
    fn test_level_table() {
        assert_eq!(AiLevel::Easy.profile(), LevelProfile { use_search: false, depth: 0 });
        assert_eq!(AiLevel::Medium.profile(), LevelProfile { use_search: true, depth: 1 });
        assert_eq!(AiLevel::Hard.profile(), LevelProfile { use_search: true, depth: 2 });
        assert!(AiLevel::Easy < AiLevel::Medium && AiLevel::Medium < AiLevel::Hard);
    }

    #[test]
    fn test_engine_empty_board_every_level() {
        let mut engine = AiEngine::with_seed(1);
        for level in AiLevel::ALL {
            let mut board = Board::new();
            assert_eq!(engine.best_move(&mut board, level), Some(Pos::center()));
        }
    }

    #[test]
    fn test_easy_picks_a_neighbour() {
        let mut engine = AiEngine::with_seed(42);
        let mut board = Board::new();
        board.place(Pos::new(5, 5), Player::X);
        let neighbours = candidates(&board, DEFAULT_RADIUS);

        for _ in 0..20 {
            let pos = engine.best_move(&mut board, AiLevel::Easy).unwrap();
            assert!(neighbours.contains(&pos));
        }
    }

    #[test]
    fn test_easy_is_reproducible_with_seed() {
        let mut board = Board::new();
        board.place(Pos::new(3, 3), Player::X);
        board.place(Pos::new(3, 4), Player::O);

        let picks = |seed| {
            let mut engine = AiEngine::with_seed(seed);
            let mut board = board;
            (0..5)
                .map(|_| engine.best_move(&mut board, AiLevel::Easy))
                .collect::<Vec<_>>()
        };
        assert_eq!(picks(9), picks(9));
    }

    #[test]
    fn test_engine_finds_immediate_win() {
        let mut engine = AiEngine::with_seed(0);
        for level in [AiLevel::Medium, AiLevel::Hard] {
            let mut board = Board::new();
            for c in 3..7 {
                board.place(Pos::new(8, c), Player::O);
            }
            board.place(Pos::new(8, 2), Player::X);
            board.place(Pos::new(0, 0), Player::X);
            assert_eq!(engine.best_move(&mut board, level), Some(Pos::new(8, 7)));
        }
    }

    #[test]
    fn test_cancelled_easy_aborts() {
        let mut engine = AiEngine::with_seed(0);
        let cancel = CancelToken::new();
        cancel.cancel();
        let mut board = Board::new();
        assert_eq!(
            engine.choose_move(&mut board, AiLevel::Easy, &cancel),
            Err(SearchAborted)
        );
    }

    #[test]
    fn test_full_board_reports_no_move() {
        let mut board = Board::new();
        for idx in 0..TOTAL_CELLS {
            board.place(Pos::from_index(idx), Player::X);
        }
        let mut engine = AiEngine::with_seed(0);
        for level in AiLevel::ALL {
            let result = engine
                .choose_move(&mut board, level, &CancelToken::new())
                .unwrap();
            assert_eq!(result.best_move, None);
            assert_eq!(result.level, level);
        }
    }

    #[test]
    fn test_hard_counts_more_nodes_than_medium() {
        let mut board = Board::new();
        board.place(Pos::new(4, 4), Player::X);
        board.place(Pos::new(4, 5), Player::O);
        board.place(Pos::new(5, 4), Player::X);

        let mut engine = AiEngine::with_seed(0);
        let medium = engine
            .choose_move(&mut board, AiLevel::Medium, &CancelToken::new())
            .unwrap();
        let hard = engine
            .choose_move(&mut board, AiLevel::Hard, &CancelToken::new())
            .unwrap();
        assert!(hard.nodes > medium.nodes);
    }
}
