//! Error types for CloudPoof Omega.
//!
//! Every fallible operation in the library returns [`OmegaError`]. The
//! binaries wrap it in `anyhow` at the top level.

use thiserror::Error;

/// Errors raised by the CloudPoof core, session layer and configuration.
#[derive(Debug, Error)]
pub enum OmegaError {
    /// The uniqueness retry loop hit its safety bound without finding an
    /// unused fingerprint.
    #[error("Unique insight generation exhausted after {attempts} attempts for context '{context}'")]
    GenerationExhausted { context: String, attempts: usize },

    /// A consciousness level name did not match any known level.
    #[error("Unknown consciousness level: '{0}'")]
    UnknownConsciousnessLevel(String),

    /// No session is registered under the given id.
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// The server already holds its configured maximum of sessions.
    #[error("Session limit reached ({limit} sessions open)")]
    SessionLimitReached { limit: usize },

    /// Invalid configuration value.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Filesystem error while reading configuration.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Malformed YAML configuration.
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl OmegaError {
    /// Build a configuration error from any message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type OmegaResult<T> = Result<T, OmegaError>;
