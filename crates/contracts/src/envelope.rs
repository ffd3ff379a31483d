//! ResponseEnvelope - uniform result of every invocation

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Placeholder PIN printed when the payload carries a name but no PIN
pub const PLACEHOLDER_PIN: &str = "A000000000Z";

/// Which execution path produced an envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseSource {
    Simulated,
    Live,
}

impl ResponseSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseSource::Simulated => "SIMULATED",
            ResponseSource::Live => "LIVE",
        }
    }
}

impl fmt::Display for ResponseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized invocation result
///
/// `data` is set on success, and on live failures whose body still parsed.
/// `error` is set whenever `success` is false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub source: ResponseSource,

    /// Elapsed wall-clock milliseconds for the whole invocation
    pub latency: u64,
}

impl ResponseEnvelope {
    /// Successful envelope
    pub fn success(source: ResponseSource, data: Value, latency: u64) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            source,
            latency,
        }
    }

    /// Failed envelope, optionally carrying the parsed body for inspection
    pub fn failure(
        source: ResponseSource,
        error: impl Into<String>,
        data: Option<Value>,
        latency: u64,
    ) -> Self {
        Self {
            success: false,
            data,
            error: Some(error.into()),
            source,
            latency,
        }
    }

    /// String field of `data`, if present
    pub fn data_str(&self, field: &str) -> Option<&str> {
        self.data.as_ref()?.get(field)?.as_str()
    }

    /// Fields a certificate renderer needs, if this envelope can back one
    pub fn certificate_subject(&self) -> Option<CertificateSubject> {
        CertificateSubject::from_envelope(self)
    }
}

/// PIN plus display name read off a successful envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateSubject {
    pub pin: String,
    pub name: String,
}

impl CertificateSubject {
    /// Extract the subject; `None` on failure or when no display name exists
    ///
    /// `taxpayerName` is accepted as a fallback for `name` so the simulated
    /// `pin-checker` payload renders a certificate too.
    pub fn from_envelope(envelope: &ResponseEnvelope) -> Option<Self> {
        if !envelope.success {
            return None;
        }

        let name = envelope
            .data_str("name")
            .or_else(|| envelope.data_str("taxpayerName"))
            .filter(|name| !name.is_empty())?;

        let pin = envelope
            .data_str("pin")
            .filter(|pin| !pin.is_empty())
            .unwrap_or(PLACEHOLDER_PIN);

        Some(Self {
            pin: pin.to_string(),
            name: name.to_string(),
        })
    }
}
