//! Terminal detection for connect-five
//!
//! Win condition: five or more stones of one player in a row, horizontally,
//! vertically or on either diagonal. Overlines count.
//!
//! When several winning runs exist at once the reported one is the first met
//! scanning stones in row-major order and directions in the order →, ↓, ↘, ↙.

use crate::board::{Board, Player, Pos, DIRECTIONS, WIN_LENGTH};

/// Result of examining a board, or of a whole game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No five and at least one empty cell
    InProgress,
    /// `winner` owns a run of at least five; `line` holds its first five cells
    Won {
        winner: Player,
        line: [Pos; WIN_LENGTH],
    },
    /// Every cell filled and no five anywhere
    Draw,
    /// Game cancelled before it finished. Never produced by [`detect`].
    Abandoned,
}

impl Outcome {
    /// Won or drawn
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Outcome::Won { .. } | Outcome::Draw)
    }

    /// Winning player, if any
    #[inline]
    pub fn winner(&self) -> Option<Player> {
        match self {
            Outcome::Won { winner, .. } => Some(*winner),
            _ => None,
        }
    }

    /// Winning line, if any
    #[inline]
    pub fn winning_line(&self) -> Option<[Pos; WIN_LENGTH]> {
        match self {
            Outcome::Won { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// Scan the whole board for a terminal condition.
///
/// Every occupied cell is visited once. A run is only counted from its first
/// stone (the cell before it in that direction is not the same player), so
/// sub-runs of a longer line are never re-counted.
pub fn detect(board: &Board) -> Outcome {
    for pos in board.occupied() {
        let Some(player) = board.get(pos).owner() else {
            continue;
        };

        for dir in DIRECTIONS {
            if let Some(line) = run_from(board, pos, dir, player) {
                return Outcome::Won {
                    winner: player,
                    line,
                };
            }
        }
    }

    if board.is_full() {
        Outcome::Draw
    } else {
        Outcome::InProgress
    }
}

/// Winning line of `player` from the start of a run at `pos` in `dir`
fn run_from(board: &Board, pos: Pos, dir: (i32, i32), player: Player) -> Option<[Pos; WIN_LENGTH]> {
    // Not the start of this run
    if let Some(prev) = pos.step(dir, -1) {
        if board.get(prev).owner() == Some(player) {
            return None;
        }
    }

    let mut line = [pos; WIN_LENGTH];
    let mut len = 1;
    while len < WIN_LENGTH {
        match pos.step(dir, len as i32) {
            Some(next) if board.get(next).owner() == Some(player) => {
                line[len] = next;
                len += 1;
            }
            _ => return None,
        }
    }

    Some(line)
}

/// Winning line of `player` passing through `pos`, if one exists.
///
/// Returns the first five cells of the run, measured from its start.
pub fn find_five_at(board: &Board, pos: Pos, player: Player) -> Option<[Pos; WIN_LENGTH]> {
    if board.get(pos).owner() != Some(player) {
        return None;
    }

    for dir in DIRECTIONS {
        // Walk back to the start of the run
        let mut start = pos;
        while let Some(prev) = start.step(dir, -1) {
            if board.get(prev).owner() == Some(player) {
                start = prev;
            } else {
                break;
            }
        }

        if let Some(line) = run_from(board, start, dir, player) {
            return Some(line);
        }
    }

    None
}
