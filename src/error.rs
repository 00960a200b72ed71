use thiserror::Error;

pub type Result<T> = std::result::Result<T, PinboardError>;

#[derive(Debug, Error)]
pub enum PinboardError {
    #[error("Card not found: {0}")]
    CardNotFound(String),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Invalid card ID format: {0}")]
    InvalidCardId(String),

    #[error("Invalid priority '{0}'. Valid priorities: high, med, low")]
    InvalidPriority(String),

    #[error("Invalid sort mode '{0}'. Valid modes: default, priority, newest, oldest, alpha")]
    InvalidSortMode(String),

    #[error("Lookup failed: {0}")]
    LookupFailed(String),

    #[error("Backend error: {0}")]
    BackendError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("{0}")]
    Other(String),
}

impl From<toml::de::Error> for PinboardError {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigError(err.to_string())
    }
}
