//! Table configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Configuration for one table: the board, the seats, and the pacing.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct GameConfig {
    /// Length of one side of the square board.
    #[serde(default = "default_board_side")]
    board_side: usize,

    /// Number of participant seats.
    #[serde(default = "default_participants")]
    participants: usize,

    /// Shuffle seed. When absent, a seed is drawn from OS entropy and
    /// logged so the layout can be replayed.
    #[serde(default)]
    seed: Option<u64>,

    /// Pause between rounds, in milliseconds. Zero means no pause.
    #[serde(default)]
    round_delay_ms: u64,
}

#[instrument]
fn default_board_side() -> usize {
    4
}

#[instrument]
fn default_participants() -> usize {
    1
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_side: default_board_side(),
            participants: default_participants(),
            seed: None,
            round_delay_ms: 0,
        }
    }
}

impl GameConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(
            board_side = config.board_side,
            participants = config.participants,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Replaces the board side.
    pub fn with_board_side(mut self, board_side: usize) -> Self {
        self.board_side = board_side;
        self
    }

    /// Replaces the seat count.
    pub fn with_participants(mut self, participants: usize) -> Self {
        self.participants = participants;
        self
    }

    /// Pins the shuffle seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replaces the between-round pause.
    pub fn with_round_delay_ms(mut self, round_delay_ms: u64) -> Self {
        self.round_delay_ms = round_delay_ms;
        self
    }

    /// Total number of cells on the configured board.
    pub fn num_cells(&self) -> usize {
        self.board_side * self.board_side
    }

    /// Number of pairs hidden on the configured board.
    pub fn num_pairs(&self) -> usize {
        self.num_cells() / 2
    }

    /// Checks the configuration describes a playable table.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_side < 2 {
            return Err(ConfigError::new(format!(
                "board side {} is too small; the minimum is 2",
                self.board_side
            )));
        }
        if self.num_cells() % 2 != 0 {
            return Err(ConfigError::new(format!(
                "board side {} gives an odd cell count; use an even side",
                self.board_side
            )));
        }
        if self.num_pairs() > crate::game::PairValue::MAX as usize {
            return Err(ConfigError::new(format!(
                "board side {} holds more pairs than a face value can number",
                self.board_side
            )));
        }
        if self.participants == 0 {
            return Err(ConfigError::new(
                "a table needs at least one participant".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where the error occurred.
    pub line: u32,
    /// Source file where the error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_the_defaults() {
        let config: GameConfig = toml::from_str("").unwrap();
        assert_eq!(*config.board_side(), 4);
        assert_eq!(*config.participants(), 1);
        assert_eq!(*config.seed(), None);
        assert_eq!(*config.round_delay_ms(), 0);
        config.validate().unwrap();
    }

    #[test]
    fn file_round_trip_with_overrides() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "board_side = 6\nparticipants = 3\nseed = 7\nround_delay_ms = 250\n"
        )
        .unwrap();

        let config = GameConfig::from_file(file.path()).unwrap();

        assert_eq!(*config.board_side(), 6);
        assert_eq!(*config.participants(), 3);
        assert_eq!(*config.seed(), Some(7));
        assert_eq!(*config.round_delay_ms(), 250);
        assert_eq!(config.num_cells(), 36);
        assert_eq!(config.num_pairs(), 18);
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = GameConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(err.message.contains("read config file"));
    }

    #[test]
    fn unplayable_tables_fail_validation() {
        assert!(GameConfig::default()
            .with_board_side(1)
            .validate()
            .is_err());
        assert!(GameConfig::default()
            .with_board_side(5)
            .validate()
            .is_err());
        assert!(GameConfig::default()
            .with_board_side(364)
            .validate()
            .is_err());
        assert!(GameConfig::default()
            .with_participants(0)
            .validate()
            .is_err());
    }

    #[test]
    fn builder_overrides_stack() {
        let config = GameConfig::default()
            .with_board_side(6)
            .with_participants(2)
            .with_seed(99)
            .with_round_delay_ms(10);
        assert_eq!(*config.board_side(), 6);
        assert_eq!(*config.participants(), 2);
        assert_eq!(*config.seed(), Some(99));
        assert_eq!(*config.round_delay_ms(), 10);
    }
}
