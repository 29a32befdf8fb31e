//! Session state types

use crate::board::{Board, Player};
use crate::engine::{AiLevel, MoveResult};
use crate::rules::Outcome;

/// Who plays the two sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Two humans take turns on one device
    #[default]
    PlayerVsPlayer,
    /// Human plays X, computer plays O
    PlayerVsComputer,
}

impl GameMode {
    /// Side played by the computer in this mode
    #[inline]
    pub fn computer(self) -> Option<Player> {
        match self {
            GameMode::PlayerVsPlayer => None,
            GameMode::PlayerVsComputer => Some(COMPUTER),
        }
    }
}

/// The computer always plays O, the maximizing side of the search
pub const COMPUTER: Player = Player::O;

/// Coarse lifecycle of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No game yet, or the last one was abandoned
    Idle,
    InProgress,
    /// Won or drawn
    Terminal,
}

/// Games won by each side. Draws are not counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Scores {
    pub x: u32,
    pub o: u32,
}

impl Scores {
    #[inline]
    pub fn get(&self, player: Player) -> u32 {
        match player {
            Player::X => self.x,
            Player::O => self.o,
        }
    }

    pub fn record_win(&mut self, player: Player) {
        match player {
            Player::X => self.x += 1,
            Player::O => self.o += 1,
        }
    }
}

/// State of the current game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    pub mode: GameMode,
    pub level: AiLevel,
    /// Who moved first in this game
    pub starting_player: Player,
    /// Side to move. Frozen once the game is terminal.
    pub current_player: Player,
    /// Stones placed so far; always equals the board's stone count
    pub move_count: u32,
    pub outcome: Outcome,
}

impl SessionState {
    pub fn new(mode: GameMode, level: AiLevel, starting_player: Player) -> Self {
        Self {
            mode,
            level,
            starting_player,
            current_player: starting_player,
            move_count: 0,
            outcome: Outcome::InProgress,
        }
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        match self.outcome {
            Outcome::InProgress => Phase::InProgress,
            Outcome::Won { .. } | Outcome::Draw => Phase::Terminal,
            Outcome::Abandoned => Phase::Idle,
        }
    }

    /// The computer is the side to move in an unfinished game
    #[inline]
    pub fn is_computer_turn(&self) -> bool {
        self.outcome == Outcome::InProgress && self.mode.computer() == Some(self.current_player)
    }
}

/// Consistent copy of everything a presentation layer draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub board: Board,
    /// `None` until the first game starts
    pub game: Option<SessionState>,
    pub scores: Scores,
    /// A computer search is outstanding
    pub searching: bool,
    /// Statistics of the last applied computer move
    pub last_search: Option<MoveResult>,
}

impl Snapshot {
    #[inline]
    pub fn phase(&self) -> Phase {
        self.game.map_or(Phase::Idle, |g| g.phase())
    }
}
