//! Store error types

use thiserror::Error;

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Store-specific error types
#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Core(#[from] pathfinder_core::Error),

    #[error("Lock error: {0}")]
    Lock(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlDecode(#[from] toml::de::Error),

    #[error("TOML encode error: {0}")]
    TomlEncode(#[from] toml::ser::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),
}

impl StoreError {
    /// True when the caller sent a malformed request or topology
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::Core(_))
    }
}
