//! Error types for configuration store operations.

use std::io;

use thiserror::Error;

/// Primary error type for configuration store operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Filesystem access failed.
    #[error("filesystem operation failed")]
    Io {
        /// Operation identifier.
        operation: &'static str,
        /// Source IO error.
        source: io::Error,
    },
    /// Serializing or parsing the stored document failed.
    #[error("configuration serialization failed")]
    Persist {
        /// Operation identifier.
        operation: &'static str,
        /// Source serialization error.
        source: serde_json::Error,
    },
    /// The stored document was valid JSON but not an object.
    #[error("stored configuration is not a JSON object")]
    Malformed,
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
