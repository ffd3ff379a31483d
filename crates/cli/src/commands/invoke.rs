//! `invoke` command implementation.

use anyhow::{Context, Result};
use contracts::{ApiDefinition, InvocationMode, Params, ResponseEnvelope};
use dispatcher::DispatcherBuilder;
use tracing::{info, warn};

use crate::cli::InvokeArgs;
use crate::error::CliError;

/// Execute the `invoke` command
pub async fn run_invoke(args: &InvokeArgs) -> Result<()> {
    let config = super::load_config(args.config.as_deref())?;

    if let Some(port) = args.metrics_endpoint() {
        observability::init_metrics_only(port)?;
    }

    // Apply CLI overrides
    let mut builder = DispatcherBuilder::from_config(config);
    if let Some(ref base_url) = args.base_url {
        info!(base_url = %base_url, "Overriding base URL from CLI");
        builder = builder.base_url(base_url.clone());
    }
    if let Some(delay_ms) = args.delay_ms {
        info!(delay_ms, "Overriding simulated delay from CLI");
        builder = builder.simulated_delay_ms(delay_ms);
    }

    let dispatcher = builder
        .build_live()
        .context("Failed to build dispatcher")?;

    let params: Params = args.params.iter().cloned().collect();
    let mode = InvocationMode::from_live_flag(args.live);

    if let Some(api) = dispatcher.catalog().get(&args.api_id) {
        let gaps = ParamGaps::check(api, &params);
        if !gaps.missing.is_empty() {
            warn!(missing = ?gaps.missing, "Required parameters not supplied");
        }
        if !gaps.undeclared.is_empty() {
            warn!(undeclared = ?gaps.undeclared, "Parameters not declared by the API are sent as-is");
        }
    }

    info!(api_id = %args.api_id, mode = %mode, params = params.len(), "Invoking");

    let envelope = match dispatcher
        .invoke(&args.api_id, &params, mode, args.credential.as_deref())
        .await
    {
        Ok(envelope) => envelope,
        Err(e) if e.is_not_found() => {
            return Err(anyhow::Error::new(e)
                .context("Unknown API id; run `api-sandbox list` to see the catalog"));
        }
        Err(e) => {
            return Err(anyhow::Error::new(e).context(format!("Cannot invoke '{}'", args.api_id)));
        }
    };

    print_envelope(&envelope, args.json)?;

    if envelope.success {
        Ok(())
    } else {
        let message = envelope.error.unwrap_or_default();
        Err(CliError::invocation_failed(&args.api_id, message).into())
    }
}

/// Supplied parameters checked against the API's declared list
#[derive(Debug, Default, PartialEq, Eq)]
struct ParamGaps<'a> {
    missing: Vec<&'a str>,
    undeclared: Vec<&'a str>,
}

impl<'a> ParamGaps<'a> {
    fn check(api: &'a ApiDefinition, params: &'a Params) -> Self {
        let missing = api
            .required_parameters()
            .filter(|name| !params.contains_key(*name))
            .collect();
        let undeclared = params
            .keys()
            .map(String::as_str)
            .filter(|name| api.parameter(name).is_none())
            .collect();
        Self {
            missing,
            undeclared,
        }
    }
}

fn print_envelope(envelope: &ResponseEnvelope, compact: bool) -> Result<()> {
    let json = if compact {
        serde_json::to_string(envelope)
    } else {
        serde_json::to_string_pretty(envelope)
    }
    .context("Failed to serialize response envelope")?;
    println!("{}", json);

    if !compact {
        if let Some(subject) = envelope.certificate_subject() {
            println!("\nCertificate subject: {} ({})", subject.name, subject.pin);
        }
    }

    Ok(())
}
