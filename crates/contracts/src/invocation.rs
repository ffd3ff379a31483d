//! InvocationRequest - one user submission against the catalog

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Raw parameter values keyed by parameter name
///
/// Values stay text regardless of the declared `ParamKind`.
pub type Params = BTreeMap<String, String>;

/// Execution mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvocationMode {
    /// Synthesize a canned response locally
    #[default]
    Simulated,
    /// Perform the real HTTP call
    Live,
}

impl InvocationMode {
    /// Map the sandbox toggle onto a mode
    pub fn from_live_flag(live: bool) -> Self {
        if live {
            Self::Live
        } else {
            Self::Simulated
        }
    }
}

impl fmt::Display for InvocationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvocationMode::Simulated => f.write_str("simulated"),
            InvocationMode::Live => f.write_str("live"),
        }
    }
}

/// A single invocation, discarded once the envelope is produced
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct InvocationRequest {
    pub api_id: String,

    #[serde(default)]
    pub params: Params,

    #[serde(default)]
    pub mode: InvocationMode,

    /// Opaque credential placed in the authorization header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

impl InvocationRequest {
    /// Simulated request with no parameters
    pub fn new(api_id: impl Into<String>) -> Self {
        Self {
            api_id: api_id.into(),
            ..Default::default()
        }
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn mode(mut self, mode: InvocationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }
}

// Credential never shows up in logs
impl fmt::Debug for InvocationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvocationRequest")
            .field("api_id", &self.api_id)
            .field("params", &self.params)
            .field("mode", &self.mode)
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
