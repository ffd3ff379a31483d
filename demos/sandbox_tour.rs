//! Sandbox Tour Example
//!
//! Invokes every API of the built-in catalog in simulated mode, then replays a
//! few live-mode outcomes against a scripted mock transport.
//! This example never touches the network.
//!
//! Run with: cargo run --bin sandbox_tour

use config_loader::ConfigLoader;
use contracts::{InvocationMode, Params};
use dispatcher::DispatcherBuilder;
use observability::{InvocationStatsAggregator, LogFormat, ObservabilityConfig};
use serde_json::json;
use transport::{MockTransport, TransportError};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    observability::init_with_config(ObservabilityConfig {
        log_format: LogFormat::Compact,
        metrics_port: None,
        default_log_level: "info".to_string(),
    })?;

    // ==== Stage 1: Load catalog (file argument or built-in) ====
    let config = match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!(path = %path, "Loading catalog config");
            ConfigLoader::load_from_path(std::path::Path::new(&path))?
        }
        None => ConfigLoader::builtin()?,
    };

    // ==== Stage 2: Scripted transport for the live section ====
    let transport = MockTransport::new();
    transport
        .push_json(200, json!({ "pin": "A123456789Z", "status": "Active" }))
        .push_json(401, json!({ "message": "Invalid access token" }))
        .push_failure(TransportError::connect("sandbox unreachable"));

    let dispatcher = DispatcherBuilder::from_config(config)
        .simulated_delay_ms(150)
        .build(transport)?;

    let mut stats = InvocationStatsAggregator::new();

    // ==== Stage 3: Simulated tour ====
    for (category, apis) in dispatcher.catalog().by_category() {
        println!("\n== {category} ==");
        for api in apis {
            let params: Params = api
                .parameters
                .iter()
                .map(|p| {
                    let sample = p.placeholder.clone().unwrap_or_else(|| "sample".to_string());
                    (p.name.clone(), sample)
                })
                .collect();

            let envelope = dispatcher
                .invoke(&api.id, &params, InvocationMode::Simulated, None)
                .await?;
            stats.update(&api.id, &envelope);

            println!(
                "{:<18} {:>5} ms  {}",
                api.id,
                envelope.latency,
                envelope.data.unwrap_or_default()
            );
        }
    }

    // ==== Stage 4: Live outcomes via mock ====
    println!("\n== Live (mock transport) ==");
    let params = Params::from([("pin".to_string(), "A123456789Z".to_string())]);
    for _ in 0..3 {
        let envelope = dispatcher
            .invoke("pin-checker", &params, InvocationMode::Live, Some("demo-key"))
            .await?;
        stats.update("pin-checker", &envelope);
        println!("{}", serde_json::to_string(&envelope)?);
    }

    // ==== Stage 5: Summary ====
    println!("\n{}", stats.summary());
    println!("Dispatcher counters: {:?}", dispatcher.metrics_snapshot());

    Ok(())
}
