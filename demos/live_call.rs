//! Live Call Example
//!
//! Performs one real HTTP call against the configured sandbox.
//! Requires network access; the credential is read from `SANDBOX_API_KEY`.
//!
//! Run with: SANDBOX_API_KEY=... cargo run --bin live_call -- pin-checker pin=A123456789Z

use config_loader::ConfigLoader;
use contracts::{InvocationMode, Params};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    observability::init()?;

    let mut args = std::env::args().skip(1);
    let api_id = args.next().unwrap_or_else(|| "pin-checker".to_string());
    let params: Params = args
        .filter_map(|arg| {
            arg.split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
        })
        .collect();

    let credential = std::env::var("SANDBOX_API_KEY").ok();
    if credential.is_none() {
        tracing::warn!("SANDBOX_API_KEY not set, sending an empty bearer token");
    }

    let dispatcher = dispatcher::create_dispatcher(ConfigLoader::builtin()?)?;

    tracing::info!(
        api_id = %api_id,
        base_url = %dispatcher.settings().base_url,
        "Calling live sandbox"
    );

    let envelope = dispatcher
        .invoke(&api_id, &params, InvocationMode::Live, credential.as_deref())
        .await?;

    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}
