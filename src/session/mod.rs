//! Game session state machine
//!
//! `Idle -> InProgress -> Terminal`, with `start_game` allowed from any state
//! and `cancel_game` returning an unfinished game to idle. The session owns
//! the board; presentation layers talk to it through [`GameSession`] and
//! listen through [`SessionObserver`].

pub mod events;
pub mod game;
pub mod state;

pub use events::{ChannelObserver, NullObserver, SessionEvent, SessionObserver};
pub use game::GameSession;
pub use state::{GameMode, Phase, Scores, SessionState, Snapshot, COMPUTER};
