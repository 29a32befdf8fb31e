//! Depth-limited minimax with alpha-beta pruning
//!
//! O is always the maximizing side and X the minimizing side, matching the
//! sign convention of [`evaluate`].
//!
//! # Features
//!
//! - Strict apply/undo on a single board: every probed stone is removed
//!   before the probe returns, so no mutation escapes the search
//! - Alpha-beta cutoffs as soon as `beta <= alpha`
//! - Evaluation-based base case: a magnitude above `PatternScore::FORCED`
//!   ends the line immediately
//! - Cooperative cancellation, polled once per root candidate
//!
//! # Example
//!
//! ```
//! use caro::board::{Board, Player, Pos};
//! use caro::search::{CancelToken, Searcher};
//!
//! let mut board = Board::new();
//! for c in 2..6 {
//!     board.place(Pos::new(2, c), Player::O);
//! }
//! board.place(Pos::new(2, 1), Player::X);
//!
//! let mut searcher = Searcher::new();
//! let result = searcher.search(&mut board, 2, &CancelToken::new()).unwrap();
//! assert_eq!(result.best_move, Some(Pos::new(2, 6)));
//! ```

use crate::board::{Board, Player, Pos};
use crate::error::SearchAborted;
use crate::eval::{evaluate, PatternScore};

use super::candidates::{candidates, DEFAULT_RADIUS};
use super::CancelToken;

/// Infinity score for alpha-beta bounds
const INF: i32 = 2_000_000_000;

/// Exclusive access to the board being searched.
///
/// The search asks for the board once to list root candidates and once per
/// root probe, so an implementation backed by a lock holds it for exactly
/// one probe-and-undo step at a time.
pub trait BoardLease {
    fn with_board<R>(&mut self, f: impl FnOnce(&mut Board) -> R) -> R;
}

impl BoardLease for Board {
    #[inline]
    fn with_board<R>(&mut self, f: impl FnOnce(&mut Board) -> R) -> R {
        f(self)
    }
}

/// Search result containing the best move found and associated statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    /// Best move found; `None` when the board has no candidates left
    pub best_move: Option<Pos>,
    /// Minimax value of the best move
    pub score: i32,
    /// Total nodes evaluated
    pub nodes: u64,
}

/// Minimax searcher. Holds only per-search statistics.
#[derive(Debug, Default)]
pub struct Searcher {
    nodes: u64,
}

impl Searcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes evaluated by the last search
    #[inline]
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Pick O's move with `depth` plies of total look-ahead.
    ///
    /// Each root candidate is placed, scored with
    /// `minimax(depth - 1, -INF, INF, false)` and removed again. The highest
    /// value wins; ties keep the candidate generated first.
    ///
    /// Returns `Err(SearchAborted)` as soon as `cancel` is observed, checked
    /// before every root probe while the board is held. An empty candidate
    /// list is not an error: the result simply has no move.
    pub fn search<L: BoardLease>(
        &mut self,
        lease: &mut L,
        depth: u8,
        cancel: &CancelToken,
    ) -> Result<SearchResult, SearchAborted> {
        self.nodes = 0;

        let moves = lease.with_board(|board| candidates(board, DEFAULT_RADIUS));

        let mut best_move = None;
        let mut best_score = -INF;

        for mov in moves {
            let score = lease
                .with_board(|board| {
                    if cancel.is_cancelled() {
                        return None;
                    }
                    board.place(mov, Player::O);
                    let score = self.minimax(board, depth.saturating_sub(1), -INF, INF, false);
                    board.remove(mov);
                    Some(score)
                })
                .ok_or(SearchAborted)?;

            if score > best_score {
                best_score = score;
                best_move = Some(mov);
            }
        }

        Ok(SearchResult {
            best_move,
            score: if best_move.is_some() { best_score } else { 0 },
            nodes: self.nodes,
        })
    }

    /// Minimax value of `board` with `depth` plies left.
    ///
    /// The only base case is the static evaluation: when it exceeds
    /// `PatternScore::FORCED` in magnitude, or depth is exhausted, it is
    /// returned as is. A five made by the last probe is therefore seen by the
    /// evaluation at the next node, not checked directly. No candidates
    /// scores 0.
    pub fn minimax(
        &mut self,
        board: &mut Board,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> i32 {
        self.nodes += 1;

        let score = evaluate(board);
        if score.abs() > PatternScore::FORCED || depth == 0 {
            return score;
        }

        let moves = candidates(board, DEFAULT_RADIUS);
        if moves.is_empty() {
            return 0;
        }

        if maximizing {
            let mut best = -INF;
            for mov in moves {
                board.place(mov, Player::O);
                let eval = self.minimax(board, depth - 1, alpha, beta, false);
                board.remove(mov);

                best = best.max(eval);
                alpha = alpha.max(eval);
                if beta <= alpha {
                    break;
                }
            }
            best
        } else {
            let mut best = INF;
            for mov in moves {
                board.place(mov, Player::X);
                let eval = self.minimax(board, depth - 1, alpha, beta, true);
                board.remove(mov);

                best = best.min(eval);
                beta = beta.min(eval);
                if beta <= alpha {
                    break;
                }
            }
            best
        }
    }
}
