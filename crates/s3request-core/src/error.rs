//! Error types for the s3request core.

/// Core error type for configuration and credential handling.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An environment variable held a value that could not be interpreted.
    #[error("invalid value for {name}: {value}")]
    InvalidEnvValue {
        /// The environment variable name.
        name: &'static str,
        /// The rejected value.
        value: String,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
