//! Error handling for the iGate telemetry crate.

/// A specialized `Result` type for telemetry operations.
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// The main error type for telemetry operations.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A proc or sysfs file had unexpected contents
    #[error("Failed to parse system information: {0}")]
    ParseError(String),

    /// The persisted status record could not be encoded or decoded
    #[error("Status record error: {0}")]
    Status(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TelemetryError {
    /// Create a new parse error
    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a new configuration error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
