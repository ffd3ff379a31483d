//! HTTP transport abstraction
//!
//! Defines the seam between the dispatcher and the network, supporting the
//! real reqwest implementation and a scriptable mock for testing.

use bytes::Bytes;
use contracts::HttpMethod;
use serde_json::Value;

use crate::error::{Result, TransportError};

/// Fully prepared outbound request
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: HttpMethod,
    pub url: String,
    /// Header pairs in insertion order
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl TransportRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Serialize `value` as the JSON body
    pub fn json_body(mut self, value: &Value) -> Result<Self> {
        let body = serde_json::to_vec(value).map_err(|e| TransportError::Request {
            message: format!("failed to serialize body: {e}"),
        })?;
        self.body = Bytes::from(body);
        Ok(self)
    }

    /// First header value matching `name` (case-insensitive)
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Body parsed as JSON (for inspection in tests and logs)
    pub fn body_json(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }
}

/// Raw transport-level response
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Bytes,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// JSON response helper
    pub fn json(status: u16, value: &Value) -> Self {
        Self::new(status, value.to_string())
    }

    /// 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON
    pub fn parse_json(&self) -> Result<Value> {
        serde_json::from_slice(&self.body).map_err(|e| TransportError::Body {
            message: format!("invalid JSON in response body: {e}"),
        })
    }
}

/// HTTP transport trait
///
/// Exactly one round-trip per call; implementations never retry.
#[trait_variant::make(HttpTransport: Send)]
pub trait LocalHttpTransport {
    /// Transport name (used for logging)
    fn name(&self) -> &str;

    /// Send the request and return the raw response
    ///
    /// # Errors
    /// Network, timeout, or body read failures
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse>;
}
