//! Evaluation module for Caro positions
//!
//! Scores a whole board from O's point of view (O is the maximizer) by
//! summing per-run pattern scores:
//! - Run length (twos, threes, fours, fives)
//! - Open ends of each run

pub mod heuristic;
pub mod patterns;

pub use heuristic::evaluate;
pub use patterns::{run_score, PatternScore};
