//! Search module for the Caro AI
//!
//! Contains:
//! - Candidate generation around existing stones
//! - Minimax with alpha-beta pruning
//! - Cancellation token for searches running on a worker thread

pub mod alphabeta;
pub mod cancel;
pub mod candidates;

pub use alphabeta::{BoardLease, SearchResult, Searcher};
pub use cancel::CancelToken;
pub use candidates::{candidates, DEFAULT_RADIUS};
