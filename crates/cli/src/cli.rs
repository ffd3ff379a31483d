//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::error::CliError;

/// API Sandbox - try KRA and M-PESA APIs in simulated or live mode
#[derive(Parser, Debug)]
#[command(
    name = "api-sandbox",
    author,
    version,
    about = "KRA / M-PESA API sandbox dispatcher",
    long_about = "Browse a catalog of KRA and M-PESA APIs and invoke them.\n\n\
                  Simulated mode answers locally with canned payloads after a short delay; \n\
                  live mode performs one real HTTP call against the sandbox base URL."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "SANDBOX_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "compact",
        global = true,
        env = "SANDBOX_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the API catalog grouped by category
    List(ListArgs),

    /// Validate a catalog configuration file
    Validate(ValidateArgs),

    /// Invoke one API and print the response envelope
    Invoke(InvokeArgs),
}

/// Arguments for the `list` command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Catalog configuration (TOML or JSON); built-in catalog when omitted
    #[arg(short, long, env = "SANDBOX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show parameter details
    #[arg(long)]
    pub params: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Configuration file to validate; built-in catalog when omitted
    #[arg(short, long, env = "SANDBOX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `invoke` command
#[derive(Parser, Debug, Clone)]
pub struct InvokeArgs {
    /// API identifier (e.g. pin-checker)
    pub api_id: String,

    /// Request parameter as key=value (repeatable)
    #[arg(short = 'p', long = "param", value_parser = parse_key_val)]
    pub params: Vec<(String, String)>,

    /// Perform the real HTTP call instead of simulating
    #[arg(long)]
    pub live: bool,

    /// Credential sent as the bearer token in live mode
    #[arg(long, env = "SANDBOX_API_KEY", hide_env_values = true)]
    pub credential: Option<String>,

    /// Catalog configuration (TOML or JSON); built-in catalog when omitted
    #[arg(short, long, env = "SANDBOX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the live-mode base URL
    #[arg(long, env = "SANDBOX_BASE_URL")]
    pub base_url: Option<String>,

    /// Override the simulated-mode delay in milliseconds
    #[arg(long, env = "SANDBOX_DELAY_MS")]
    pub delay_ms: Option<u64>,

    /// Print the envelope as compact JSON
    #[arg(long)]
    pub json: bool,

    /// Serve Prometheus metrics on this port while the command runs (0 = disabled)
    #[arg(long, env = "SANDBOX_METRICS_PORT", default_value_t = 0)]
    pub metrics_port: u16,
}

impl InvokeArgs {
    /// Exporter port, `None` when disabled
    pub fn metrics_endpoint(&self) -> Option<u16> {
        (self.metrics_port != 0).then_some(self.metrics_port)
    }
}

/// Parse `key=value`; the value may itself contain '='
pub fn parse_key_val(raw: &str) -> Result<(String, String), CliError> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(CliError::invalid_param(raw)),
    }
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}
