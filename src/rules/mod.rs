//! Game rules for Caro
//!
//! Plain connect-five: five or more consecutive stones in any of the four
//! directions win, a full board with no five is a draw.

pub mod win;

pub use win::{detect, find_five_at, Outcome};
