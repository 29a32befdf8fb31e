use std::path::PathBuf;

use crate::board::{Player, Pos};

/// Reasons a submitted move is refused. The game state is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidMove {
    #[error("position {0} is off the board")]
    OutOfBounds(Pos),

    #[error("no game in progress")]
    NotInProgress,

    #[error("computer is still thinking")]
    SearchInFlight,

    #[error("{0} is played by the computer")]
    ComputerTurn(Player),

    #[error("not {attempted}'s turn ({expected} to move)")]
    WrongTurn { attempted: Player, expected: Player },

    #[error("cell {0} is already occupied")]
    Occupied(Pos),
}

/// The search noticed its cancellation token and stopped without a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("search aborted")]
pub struct SearchAborted;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
