//! Presentation-side state for the Caro GUI
//!
//! The session owns the game; this only tracks what the screen needs on top
//! of a [`Snapshot`]: which screen is up, the last move, and the blinking
//! winning line.

use std::time::{Duration, Instant};

use crate::board::{Pos, WIN_LENGTH};
use crate::engine::AiLevel;
use crate::rules::Outcome;
use crate::session::{GameMode, SessionEvent, Snapshot};

/// Which screen is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Playing,
}

/// Entries of the mode selection screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    PlayerVsPlayer,
    Computer(AiLevel),
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 4] = [
        MenuChoice::PlayerVsPlayer,
        MenuChoice::Computer(AiLevel::Easy),
        MenuChoice::Computer(AiLevel::Medium),
        MenuChoice::Computer(AiLevel::Hard),
    ];

    pub fn label(self) -> String {
        match self {
            MenuChoice::PlayerVsPlayer => "Player vs Player".to_string(),
            MenuChoice::Computer(level) => format!("Player vs Computer ({})", level.name()),
        }
    }

    /// Session arguments for this entry. PvP keeps `level` for a later switch.
    pub fn mode_level(self, level: AiLevel) -> (GameMode, AiLevel) {
        match self {
            MenuChoice::PlayerVsPlayer => (GameMode::PlayerVsPlayer, level),
            MenuChoice::Computer(level) => (GameMode::PlayerVsComputer, level),
        }
    }

    pub fn from_mode(mode: GameMode, level: AiLevel) -> Self {
        match mode {
            GameMode::PlayerVsPlayer => MenuChoice::PlayerVsPlayer,
            GameMode::PlayerVsComputer => MenuChoice::Computer(level),
        }
    }
}

/// On/off toggle with a fixed period, started when a game is won.
#[derive(Debug, Clone, Copy)]
pub struct Blink {
    interval: Duration,
    started: Instant,
}

impl Blink {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            started: now,
        }
    }

    /// Visible during even periods, starting with the first
    pub fn visible(&self, now: Instant) -> bool {
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_millis() / self.interval.as_millis()) % 2 == 0
    }

    /// Time left until the next toggle
    pub fn next_toggle(&self, now: Instant) -> Duration {
        let elapsed = now.saturating_duration_since(self.started).as_millis();
        let period = self.interval.as_millis();
        Duration::from_millis((period - elapsed % period) as u64)
    }
}

/// State mirrored from session events
pub struct ViewState {
    pub screen: Screen,
    pub last_move: Option<Pos>,
    pub winning_line: Option<[Pos; WIN_LENGTH]>,
    pub blink: Option<Blink>,
    /// Last rejected move, shown until the next accepted one
    pub message: Option<String>,
    pub thinking_since: Option<Instant>,
    blink_interval: Duration,
}

impl ViewState {
    pub fn new(blink_interval: Duration) -> Self {
        Self {
            screen: Screen::Menu,
            last_move: None,
            winning_line: None,
            blink: None,
            message: None,
            thinking_since: None,
            blink_interval,
        }
    }

    /// Forget everything about the previous game
    pub fn reset_game(&mut self) {
        self.last_move = None;
        self.winning_line = None;
        self.blink = None;
        self.message = None;
        self.thinking_since = None;
    }

    pub fn apply(&mut self, event: &SessionEvent, now: Instant) {
        match *event {
            SessionEvent::CellChanged { pos, .. } => {
                self.last_move = Some(pos);
                self.message = None;
            }
            SessionEvent::GameEnded { line, .. } => {
                self.winning_line = line;
                self.blink = line.map(|_| Blink::new(self.blink_interval, now));
            }
            SessionEvent::SearchStarted => self.thinking_since = Some(now),
            SessionEvent::SearchFinished => self.thinking_since = None,
            SessionEvent::TurnChanged(_) | SessionEvent::ScoresChanged(_) => {}
        }
    }

    /// Whether the winning line is drawn this frame
    pub fn line_visible(&self, now: Instant) -> bool {
        self.blink.map_or(true, |b| b.visible(now))
    }
}

/// Status line text for a snapshot
pub fn status_text(snapshot: &Snapshot) -> String {
    let Some(game) = snapshot.game else {
        return "Choose a mode".to_string();
    };
    match game.outcome {
        Outcome::Won { winner, .. } => format!("{winner} WIN!"),
        Outcome::Draw => "Draw!".to_string(),
        Outcome::Abandoned => "Game abandoned".to_string(),
        Outcome::InProgress if snapshot.searching => "AI Thinking...".to_string(),
        Outcome::InProgress => format!("{} Turn", game.current_player),
    }
}
