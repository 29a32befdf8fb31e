//! Pattern scores for Caro evaluation
//!
//! These constants define the scoring weights for runs of stones by length
//! and number of open ends.

/// Pattern scores for evaluation
pub struct PatternScore;

impl PatternScore {
    /// Five or more in a row - game over
    pub const WIN: i32 = 1_000_000;

    /// Open four: _OOOO_
    pub const OPEN_FOUR: i32 = 50_000;
    /// Blocked four: XOOOO_ or _OOOOX (edge counts as a block)
    pub const BLOCKED_FOUR: i32 = 10_000;

    /// Open three: _OOO_
    pub const OPEN_THREE: i32 = 5_000;
    /// Blocked three: XOOO_ or _OOOX
    pub const BLOCKED_THREE: i32 = 1_000;

    /// Open two: _OO_
    pub const OPEN_TWO: i32 = 500;

    /// Scores above this magnitude mean the game is already decided
    pub const FORCED: i32 = Self::WIN / 2;
}

/// Score of a single run, before applying the owner's sign.
///
/// # Arguments
/// * `length` - Number of consecutive stones in the run
/// * `open_ends` - How many of the two cells bounding the run are empty (0-2)
///
/// Blocked twos, and any run with both ends blocked, score nothing. Fives
/// score [`PatternScore::WIN`] no matter how they are bounded.
pub fn run_score(length: u32, open_ends: u32) -> i32 {
    match (length, open_ends) {
        (5.., _) => PatternScore::WIN,
        (4, 2) => PatternScore::OPEN_FOUR,
        (4, 1) => PatternScore::BLOCKED_FOUR,
        (3, 2) => PatternScore::OPEN_THREE,
        (3, 1) => PatternScore::BLOCKED_THREE,
        (2, 2) => PatternScore::OPEN_TWO,
        _ => 0,
    }
}
