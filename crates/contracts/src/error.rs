//! Layered error definitions
//!
//! Categorized by source: config / io
//!
//! Unknown API identifiers are a dispatcher concern and live in
//! `dispatcher::DispatchError`.

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ContractError::config_validation("dispatcher.simulated_delay_ms", "invalid value");
        assert_eq!(
            err.to_string(),
            "config validation error at 'dispatcher.simulated_delay_ms': invalid value"
        );

        let err = ContractError::config_parse("unexpected token");
        assert_eq!(err.to_string(), "config parse error: unexpected token");
        assert!(std::error::Error::source(&err).is_none());

        let err: ContractError = std::io::Error::other("denied").into();
        assert!(matches!(err, ContractError::Io(_)));
    }
}
