//! Caro (connect-five) engine
//!
//! Two players alternately place X and O on a 10x10 board; the first to line
//! up five in a row, column or diagonal wins, and a full board without one is
//! a draw. The computer always plays O at one of three strengths.
//!
//! # Architecture
//!
//! The engine is organized into several modules:
//! - [`board`]: Board representation with bitboards
//! - [`rules`]: Win and draw detection
//! - [`eval`]: Pattern-based position evaluation
//! - [`search`]: Candidate generation, minimax with alpha-beta, cancellation
//! - [`engine`]: Strength levels on top of the search
//! - [`session`]: Game state machine running the computer on a worker thread
//! - [`config`], [`error`]: TOML configuration and error types
//! - [`ui`]: egui front-end used by the `caro` binary
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use caro::{AiLevel, GameMode, GameSession, NullObserver, Player, Pos};
//!
//! let session = GameSession::new(Arc::new(NullObserver));
//! session.start_game(GameMode::PlayerVsComputer, AiLevel::Medium);
//! session.submit_move(Player::X, Pos::new(5, 5)).unwrap();
//!
//! // O answers on a worker thread
//! session.wait_idle();
//! let snapshot = session.snapshot();
//! assert_eq!(snapshot.board.stone_count(), 2);
//! ```

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod eval;
pub mod rules;
pub mod search;
pub mod session;
pub mod ui;

// Re-export commonly used types for convenience
pub use board::{Board, Cell, Player, Pos, BOARD_SIZE, WIN_LENGTH};
pub use config::CaroConfig;
pub use engine::{AiEngine, AiLevel, MoveResult};
pub use error::{ConfigError, InvalidMove, SearchAborted};
pub use rules::{detect, Outcome};
pub use search::CancelToken;
pub use session::{ChannelObserver, GameMode, GameSession, NullObserver, SessionEvent, SessionObserver, Snapshot};
