//! Dispatcher error types

use thiserror::Error;

/// Dispatcher-specific errors
///
/// `invoke` only ever returns `ApiNotFound`; every other failure is folded
/// into a failed envelope. The remaining variants surface while building a
/// dispatcher.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Identifier is not in the catalog
    #[error("api '{api_id}' not found in catalog")]
    ApiNotFound { api_id: String },

    /// Transport construction error
    #[error("transport error: {0}")]
    Transport(#[from] transport::TransportError),

    /// Invalid settings or catalog
    #[error("config error: {0}")]
    Contract(#[from] contracts::ContractError),
}

impl DispatchError {
    /// Create a not-found error
    pub fn api_not_found(api_id: impl Into<String>) -> Self {
        Self::ApiNotFound {
            api_id: api_id.into(),
        }
    }

    /// Whether the id was unknown, as opposed to a construction failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ApiNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_not_found() {
        let err = DispatchError::api_not_found("nope");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "api 'nope' not found in catalog");

        let err: DispatchError = contracts::ContractError::config_parse("bad").into();
        assert!(!err.is_not_found());
    }
}
