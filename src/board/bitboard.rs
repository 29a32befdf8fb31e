//! Bitboard implementation for stone sets

use super::{Pos, TOTAL_CELLS};

/// Set of board cells packed into a single `u128` (128 >= 100 cells).
///
/// Bit `i` is the cell with `Pos::to_index() == i`, so iterating set bits
/// from least significant upward visits cells in row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Bitboard {
    bits: u128,
}

impl Bitboard {
    /// Create empty bitboard
    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    /// Set a bit at position
    #[inline]
    pub fn set(&mut self, pos: Pos) {
        self.bits |= 1u128 << pos.to_index();
    }

    /// Clear a bit at position
    #[inline]
    pub fn clear(&mut self, pos: Pos) {
        self.bits &= !(1u128 << pos.to_index());
    }

    /// Check if bit is set at position
    #[inline]
    pub fn get(&self, pos: Pos) -> bool {
        (self.bits >> pos.to_index()) & 1 == 1
    }

    /// Count total set bits (popcount)
    #[inline]
    pub fn count(&self) -> u32 {
        self.bits.count_ones()
    }

    /// Check if empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Cells set in either bitboard
    #[inline]
    pub fn union(self, other: Bitboard) -> Bitboard {
        Bitboard {
            bits: self.bits | other.bits,
        }
    }

    /// Iterate over set bit positions in row-major order
    pub fn iter_ones(&self) -> BitboardIter {
        BitboardIter { bits: self.bits }
    }
}

/// Iterator over set bits in a Bitboard
pub struct BitboardIter {
    bits: u128,
}

impl Iterator for BitboardIter {
    type Item = Pos;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            return None;
        }

        let idx = self.bits.trailing_zeros() as usize;

        // Clear the bit we just found
        self.bits &= self.bits - 1;

        // Bits past the last cell are never set by `Bitboard::set`
        if idx < TOTAL_CELLS {
            Some(Pos::from_index(idx))
        } else {
            None
        }
    }
}
