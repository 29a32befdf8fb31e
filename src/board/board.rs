//! Board structure with apply/undo discipline

use super::bitboard::{Bitboard, BitboardIter};
use super::{Cell, Player, Pos, TOTAL_CELLS};

/// Game board: one bitboard per side.
///
/// Mutated only through [`Board::place`] and [`Board::remove`]; placing a
/// stone and removing it again restores the board bit for bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Board {
    /// X stones bitboard
    pub x: Bitboard,
    /// O stones bitboard
    pub o: Bitboard,
}

impl Board {
    pub const fn new() -> Self {
        Self {
            x: Bitboard::new(),
            o: Bitboard::new(),
        }
    }

    /// Get cell state at position
    #[inline]
    pub fn get(&self, pos: Pos) -> Cell {
        if self.x.get(pos) {
            Cell::X
        } else if self.o.get(pos) {
            Cell::O
        } else {
            Cell::Empty
        }
    }

    /// Owner of the stone at `(row, col)`, `None` when empty or off the board
    #[inline]
    pub fn owner_at(&self, row: i32, col: i32) -> Option<Player> {
        Pos::checked(row, col).and_then(|p| self.get(p).owner())
    }

    /// Check if position is empty
    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        !self.x.get(pos) && !self.o.get(pos)
    }

    /// Place a stone on an empty cell.
    ///
    /// Callers validate emptiness first; placing over an occupied cell is a
    /// logic error.
    #[inline]
    pub fn place(&mut self, pos: Pos, player: Player) {
        debug_assert!(self.is_empty(pos), "cell {pos} is occupied");
        match player {
            Player::X => self.x.set(pos),
            Player::O => self.o.set(pos),
        }
    }

    /// Remove whatever stone sits at `pos` (undo of [`Board::place`])
    #[inline]
    pub fn remove(&mut self, pos: Pos) {
        self.x.clear(pos);
        self.o.clear(pos);
    }

    /// Get bitboard for a player
    #[inline]
    pub fn stones(&self, player: Player) -> &Bitboard {
        match player {
            Player::X => &self.x,
            Player::O => &self.o,
        }
    }

    /// Iterate over occupied cells in row-major order
    #[inline]
    pub fn occupied(&self) -> BitboardIter {
        self.x.union(self.o).iter_ones()
    }

    /// Total stones on board
    #[inline]
    pub fn stone_count(&self) -> u32 {
        self.x.count() + self.o.count()
    }

    /// Check if board is empty
    #[inline]
    pub fn is_board_empty(&self) -> bool {
        self.x.is_empty() && self.o.is_empty()
    }

    /// Check if every cell is occupied
    #[inline]
    pub fn is_full(&self) -> bool {
        self.stone_count() as usize == TOTAL_CELLS
    }

    /// Remove every stone
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Copy of the board with X and O swapped
    pub fn swapped(&self) -> Self {
        Self {
            x: self.o,
            o: self.x,
        }
    }
}
