//! Host configuration, read from TOML.
//!
//! Every section is optional; missing values take the defaults below.
//!
//! ```toml
//! log_level = "debug"
//!
//! [board]
//! name = "Team board"
//! implicit_year = 2026
//!
//! [[board.columns]]
//! id = "todo"
//! title = "To Do"
//! default_sort = "priority"
//!
//! [compose]
//! labels = ["infra", "design"]
//!
//! [timing]
//! search_debounce_ms = 200
//! ```

use crate::compose::{LabelVocabulary, TriggerSet};
use crate::domain::BoardConfig;
use crate::error::{PinboardError, Result};
use crate::feed::ChatSettings;
use crate::session::GenerateSettings;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Mention triggers and label vocabulary of the comment composer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposeConfig {
    pub triggers: TriggerSet,
    pub labels: LabelVocabulary,
}

/// Delays and polling periods, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub search_debounce_ms: u64,
    pub listing_ttl_ms: u64,
    pub board_poll_ms: u64,
    pub chat_poll_ms: u64,
    pub generate_poll_ms: u64,
    pub generate_attempts: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            search_debounce_ms: 150,
            listing_ttl_ms: 10_000,
            board_poll_ms: 5_000,
            chat_poll_ms: 3_000,
            generate_poll_ms: 1_000,
            generate_attempts: 30,
        }
    }
}

impl TimingConfig {
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn listing_ttl(&self) -> Duration {
        Duration::from_millis(self.listing_ttl_ms)
    }

    pub fn board_poll(&self) -> Duration {
        Duration::from_millis(self.board_poll_ms)
    }

    pub fn chat_poll(&self) -> Duration {
        Duration::from_millis(self.chat_poll_ms)
    }

    pub fn generate(&self) -> GenerateSettings {
        GenerateSettings {
            attempts: self.generate_attempts,
            interval: Duration::from_millis(self.generate_poll_ms),
        }
    }
}

/// Resource directory settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Path prefix of files the backend serves under `/files/`
    pub workspace_root: String,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            workspace_root: "~/clawd/".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinboardConfig {
    /// Tracing filter used when `RUST_LOG` is unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
    pub board: BoardConfig,
    pub compose: ComposeConfig,
    pub timing: TimingConfig,
    pub chat: ChatSettings,
    pub directory: DirectoryConfig,
}

impl PinboardConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the configuration file at `path`
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = tokio::fs::read_to_string(path).await?;
        tracing::debug!(path = %path.display(), "loading configuration");
        Self::from_toml_str(&source)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| PinboardError::ConfigError(e.to_string()))
    }

    pub fn log_level(&self) -> &str {
        self.log_level
            .as_deref()
            .unwrap_or(crate::logging::default_log_level())
    }

    fn validate(&self) -> Result<()> {
        if self.board.columns.is_empty() {
            return Err(PinboardError::ConfigError("board has no columns".to_string()));
        }
        for (idx, column) in self.board.columns.iter().enumerate() {
            if self.board.columns[..idx].iter().any(|c| c.id == column.id) {
                return Err(PinboardError::ConfigError(format!(
                    "duplicate column `{}`",
                    column.id
                )));
            }
        }
        let periods = [
            ("search_debounce_ms", self.timing.search_debounce_ms),
            ("board_poll_ms", self.timing.board_poll_ms),
            ("chat_poll_ms", self.timing.chat_poll_ms),
            ("generate_poll_ms", self.timing.generate_poll_ms),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, ms)| *ms == 0) {
            return Err(PinboardError::ConfigError(format!(
                "{} must be greater than zero",
                name
            )));
        }
        if self.timing.generate_attempts == 0 {
            return Err(PinboardError::ConfigError(
                "generate_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
