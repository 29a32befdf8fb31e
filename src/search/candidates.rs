//! Candidate move generation
//!
//! Only empty cells close to existing stones are worth searching. A far-away
//! reply is never considered, which keeps minimax tractable on 100 cells.

use crate::board::{Board, Pos, TOTAL_CELLS};

/// Default Chebyshev radius around occupied cells
pub const DEFAULT_RADIUS: i32 = 1;

/// Generate candidate moves near existing stones.
///
/// Returns every empty cell within Chebyshev distance `radius` of an
/// occupied cell, without duplicates. Order is deterministic: occupied cells
/// in row-major order, and for each of them the neighbouring offsets
/// row-major. An empty board yields the center cell; a full board yields
/// nothing.
#[must_use]
pub fn candidates(board: &Board, radius: i32) -> Vec<Pos> {
    if board.is_board_empty() {
        return vec![Pos::center()];
    }

    let mut moves = Vec::with_capacity(32);
    let mut seen = [false; TOTAL_CELLS];

    for pos in board.occupied() {
        for dr in -radius..=radius {
            for dc in -radius..=radius {
                let Some(near) = Pos::checked(i32::from(pos.row) + dr, i32::from(pos.col) + dc) else {
                    continue;
                };

                let idx = near.to_index();
                if seen[idx] || !board.is_empty(near) {
                    continue;
                }
                seen[idx] = true;
                moves.push(near);
            }
        }
    }

    moves
}
