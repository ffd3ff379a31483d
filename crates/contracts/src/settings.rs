//! Dispatcher settings and the top-level sandbox configuration document

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{ApiCatalog, ApiDefinition};

/// Sandbox origin every endpoint path is appended to
pub const DEFAULT_BASE_URL: &str = "https://sbx.kra.go.ke";

/// Artificial latency of simulated calls
pub const DEFAULT_SIMULATED_DELAY_MS: u64 = 800;

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// How the credential is presented to the live backend
///
/// The bearer scheme is an assumption about the sandbox, not a verified contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthScheme {
    /// `Authorization: Bearer <credential>` (empty credential still sends the header)
    #[default]
    Bearer,
    /// No authorization header
    None,
}

/// Tunables for the dispatcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct DispatcherSettings {
    /// Origin joined with each API's endpoint path
    #[serde(default = "default_base_url")]
    #[validate(url)]
    pub base_url: String,

    /// Simulated-mode pause in milliseconds; must stay visibly non-instant
    #[serde(default = "default_simulated_delay_ms")]
    #[validate(range(min = 1, max = 60_000))]
    pub simulated_delay_ms: u64,

    /// Live-mode request timeout (seconds)
    #[serde(default = "default_request_timeout_secs")]
    #[validate(range(min = 1, max = 600))]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub auth_scheme: AuthScheme,

    #[serde(default = "default_user_agent")]
    #[validate(length(min = 1))]
    pub user_agent: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_simulated_delay_ms() -> u64 {
    DEFAULT_SIMULATED_DELAY_MS
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("api-sandbox/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for DispatcherSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            simulated_delay_ms: default_simulated_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            auth_scheme: AuthScheme::default(),
            user_agent: default_user_agent(),
        }
    }
}

impl DispatcherSettings {
    /// Full URL for an endpoint path
    pub fn url_for(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), endpoint)
    }
}

/// Sandbox configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandboxConfig {
    #[serde(default)]
    pub version: ConfigVersion,

    #[serde(default)]
    pub dispatcher: DispatcherSettings,

    /// Catalog entries in declaration order
    #[serde(default)]
    pub apis: Vec<ApiDefinition>,
}

impl SandboxConfig {
    /// Build the immutable catalog
    pub fn catalog(&self) -> ApiCatalog {
        ApiCatalog::new(self.apis.clone())
    }

    /// Consume into settings + catalog
    pub fn into_parts(self) -> (DispatcherSettings, ApiCatalog) {
        (self.dispatcher, ApiCatalog::new(self.apis))
    }
}
