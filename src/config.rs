use std::path::Path;

use crate::board::Player;
use crate::engine::AiLevel;
use crate::error::ConfigError;
use crate::session::GameMode;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_PATH: &str = "caro.toml";

/// Application configuration, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CaroConfig {
    /// Mode preselected in the menu
    pub mode: GameMode,
    /// Computer strength preselected in the menu
    pub level: AiLevel,
    /// Starting player of the first game
    pub first_player: Player,
    /// `tracing` filter used when `RUST_LOG` is unset
    pub log_filter: String,
    /// Blink period of the winning line
    pub blink_interval_ms: u64,
}

impl Default for CaroConfig {
    fn default() -> Self {
        CaroConfig {
            mode: GameMode::PlayerVsComputer,
            level: AiLevel::Medium,
            first_player: Player::X,
            log_filter: "info,caro=debug".to_string(),
            blink_interval_ms: 300,
        }
    }
}

impl CaroConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: CaroConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, or `None` if it does not exist.
    pub fn load_if_present(path: &Path) -> Result<Option<Self>, ConfigError> {
        if path.exists() {
            Self::load(path).map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.blink_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "blink_interval_ms must be > 0".into(),
            ));
        }
        if self.log_filter.trim().is_empty() {
            return Err(ConfigError::Validation(
                "log_filter must not be empty".into(),
            ));
        }
        Ok(())
    }
}
