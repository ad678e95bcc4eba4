//! Error types for Vigil

/// Result type alias using [`Error`]
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Main error type for Vigil
///
/// Everything here is either startup-fatal (configuration, binding, opening
/// the event log) or reported and swallowed by the caller. Probe failures are
/// never errors: they become `unreachable`/`invalid_response` records.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Probe event log error
    #[error("Event log error: {0}")]
    EventLog(String),

    /// Runtime error
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    /// Whether this error may only occur before the serving loop starts
    pub fn is_startup_fatal(&self) -> bool {
        matches!(self, Error::Config(_) | Error::Runtime(_))
    }
}
