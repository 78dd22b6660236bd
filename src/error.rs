//! Error types for mailsift.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors raised by a message source when fetching a single item.
///
/// The orchestrator maps `Timeout` and `Connection` to the timeout error
/// counter and everything else to the fetch counter.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Fetch timed out for {uid}: {reason}")]
    Timeout { uid: String, reason: String },

    #[error("Connection failure fetching {uid}: {reason}")]
    Connection { uid: String, reason: String },

    #[error("Message {uid} not found in source")]
    NotFound { uid: String },

    #[error("Failed to parse message {uid}: {reason}")]
    Parse { uid: String, reason: String },

    #[error("Source error fetching {uid}: {reason}")]
    Source { uid: String, reason: String },
}

impl FetchError {
    /// Whether this failure is a timeout/connection condition rather than a
    /// protocol or data problem.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Connection { .. })
    }
}

/// Dedup store read/write errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Output sink errors.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output sink not open")]
    NotOpen,
}

/// Result type alias for mailsift.
pub type Result<T> = std::result::Result<T, Error>;
