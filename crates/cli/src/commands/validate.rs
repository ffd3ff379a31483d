//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{HttpMethod, SandboxConfig};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    base_url: String,
    simulated_delay_ms: u64,
    api_count: usize,
    category_count: usize,
    parameter_count: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    let config_path = args
        .config
        .as_ref()
        .map_or_else(|| "<built-in>".to_string(), |p| p.display().to_string());
    info!(config = %config_path, "Validating configuration");

    let result = match super::load_config(args.config.as_deref()) {
        Ok(config) => valid_result(config_path, &config),
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("{:#}", e)),
            warnings: None,
            summary: None,
        },
    };

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn valid_result(config_path: String, config: &SandboxConfig) -> ValidationResult {
    let warnings = collect_warnings(config);
    let catalog = config.catalog();

    ValidationResult {
        valid: true,
        config_path,
        error: None,
        warnings: if warnings.is_empty() {
            None
        } else {
            Some(warnings)
        },
        summary: Some(ConfigSummary {
            version: format!("{:?}", config.version),
            base_url: config.dispatcher.base_url.clone(),
            simulated_delay_ms: config.dispatcher.simulated_delay_ms,
            api_count: catalog.len(),
            category_count: catalog.by_category().len(),
            parameter_count: catalog.iter().map(|api| api.parameters.len()).sum(),
        }),
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &SandboxConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.apis.is_empty() {
        warnings.push("Catalog is empty - every invocation will be rejected".to_string());
    }

    for api in &config.apis {
        // GET requests still carry parameters in a JSON body
        if api.method == HttpMethod::Get && !api.parameters.is_empty() {
            warnings.push(format!(
                "API '{}' is GET but declares parameters; they are sent in the request body",
                api.id
            ));
        }

        for param in &api.parameters {
            if param.label.trim().is_empty() {
                warnings.push(format!(
                    "API '{}' parameter '{}' has no label",
                    api.id, param.name
                ));
            }
        }
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Base URL: {}", summary.base_url);
            println!("  Simulated delay: {} ms", summary.simulated_delay_ms);
            println!("  APIs: {}", summary.api_count);
            println!("  Categories: {}", summary.category_count);
            println!("  Parameters: {}", summary.parameter_count);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
