//! # Design
//!
//! - Centralize application-level errors for the bootstrap path.
//! - Keep error messages constant while carrying context fields for debugging.
//! - Preserve source errors without re-logging at call sites.

use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Environment configuration was missing.
    #[error("missing environment configuration")]
    MissingEnv {
        /// Name of the missing environment variable.
        name: &'static str,
    },
    /// Environment configuration carried an unusable value.
    #[error("invalid configuration value")]
    InvalidConfig {
        /// Field that failed validation.
        field: &'static str,
        /// Short machine-friendly reason.
        reason: &'static str,
        /// Offending value, when printable.
        value: Option<String>,
    },
    /// Settings store operations failed.
    #[error("configuration operation failed")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Source configuration error.
        source: mediabay_config::ConfigError,
    },
    /// API server operations failed.
    #[error("api server operation failed")]
    ApiServer {
        /// Operation identifier.
        operation: &'static str,
        /// Source API server error.
        source: mediabay_api::ApiServerError,
    },
}

impl AppError {
    pub(crate) const fn config(
        operation: &'static str,
        source: mediabay_config::ConfigError,
    ) -> Self {
        Self::Config { operation, source }
    }

    pub(crate) const fn api_server(
        operation: &'static str,
        source: mediabay_api::ApiServerError,
    ) -> Self {
        Self::ApiServer { operation, source }
    }
}
