//! Heuristic evaluation function for Caro board positions
//!
//! This module provides the leaf evaluation for the minimax search. Each run
//! of stones is scored by its length and the number of open ends, signed by
//! its owner, and the run scores are summed.

use crate::board::{Board, Cell, Player, Pos, DIRECTIONS};

use super::patterns::run_score;

/// Evaluate the board from O's perspective.
///
/// Returns a score where:
/// - Positive values favour O (the maximizer)
/// - Negative values favour X
/// - a magnitude above `PatternScore::FORCED` means a five is on the board
///
/// Cost is linear in occupied cells times the four directions. Swapping the
/// two players' stones negates the score.
#[must_use]
pub fn evaluate(board: &Board) -> i32 {
    let mut score = 0;

    for pos in board.occupied() {
        let Some(owner) = board.get(pos).owner() else {
            continue;
        };

        for &(dr, dc) in &DIRECTIONS {
            let run = evaluate_line(board, pos, dr, dc, owner);
            score += match owner {
                Player::O => run,
                Player::X => -run,
            };
        }
    }

    score
}

/// Evaluate the run starting at `pos` in one direction, unsigned.
///
/// Only counts the run if this position is its start (no same-player stone
/// in the negative direction). This ensures each run is counted exactly once.
fn evaluate_line(board: &Board, pos: Pos, dr: i32, dc: i32, owner: Player) -> i32 {
    let prev_r = i32::from(pos.row) - dr;
    let prev_c = i32::from(pos.col) - dc;
    if board.owner_at(prev_r, prev_c) == Some(owner) {
        return 0;
    }

    let mut blocked = 0;
    if !is_open(board, prev_r, prev_c) {
        blocked += 1;
    }

    // Count consecutive stones, starting with the one at pos
    let mut count = 1;
    let mut r = i32::from(pos.row) + dr;
    let mut c = i32::from(pos.col) + dc;
    while board.owner_at(r, c) == Some(owner) {
        count += 1;
        r += dr;
        c += dc;
    }

    if !is_open(board, r, c) {
        blocked += 1;
    }

    run_score(count, 2 - blocked)
}

/// Cell exists and is empty. Off-board counts as blocked.
#[inline]
fn is_open(board: &Board, row: i32, col: i32) -> bool {
    Pos::checked(row, col).is_some_and(|p| board.get(p) == Cell::Empty)
}
