//! Engine and subscriber error types.

use thiserror::Error;

/// Errors returned by the engine's public API.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A decision index outside the catalog was submitted.
    #[error("decision index {index} is out of range (catalog has {len} decisions)")]
    InvalidInput { index: usize, len: usize },

    /// A saved session record failed validation.
    #[error("invalid session record: {0}")]
    InvalidRecord(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors a subscriber may report while handling an event.
///
/// These never reach the caller of `submit`; the bus logs and counts them.
#[derive(Debug, Error)]
pub enum SubscriberError {
    #[error("subscriber rejected event: {0}")]
    Rejected(String),

    #[error("analytics transport failed: {0}")]
    Transport(String),

    #[error("failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),
}
