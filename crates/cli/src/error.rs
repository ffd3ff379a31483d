//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Malformed `-p` argument
    #[error("invalid parameter '{raw}': expected key=value")]
    InvalidParam { raw: String },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Envelope came back with `success = false`
    #[error("Invocation of '{api_id}' failed: {message}")]
    InvocationFailed { api_id: String, message: String },
}

impl CliError {
    pub fn invalid_param(raw: impl Into<String>) -> Self {
        Self::InvalidParam { raw: raw.into() }
    }

    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn invocation_failed(api_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvocationFailed {
            api_id: api_id.into(),
            message: message.into(),
        }
    }
}
