//! Transport error types

use thiserror::Error;

/// Transport specific error
///
/// The `Display` text is what ends up in a failed envelope's `error` field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Could not reach the remote host
    #[error("failed to connect: {message}")]
    Connect { message: String },

    /// Request exceeded the configured timeout
    #[error("request timed out: {message}")]
    Timeout { message: String },

    /// Request could not be built or sent
    #[error("{message}")]
    Request { message: String },

    /// Response body could not be read or decoded
    #[error("{message}")]
    Body { message: String },

    /// Client construction failure
    #[error("failed to build http client: {message}")]
    Client { message: String },
}

impl TransportError {
    /// Create connect error
    pub fn connect(message: impl Into<String>) -> Self {
        Self::Connect {
            message: message.into(),
        }
    }

    /// Create request error
    pub fn request(message: impl Into<String>) -> Self {
        Self::Request {
            message: message.into(),
        }
    }
}

/// Result alias
pub type Result<T> = std::result::Result<T, TransportError>;
