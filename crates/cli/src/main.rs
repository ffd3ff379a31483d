//! # API Sandbox CLI
//!
//! 命令行接口入口点。
//!
//! 提供：
//! - 目录浏览与配置校验
//! - 模拟 / 真实模式下的单次 API 调用

mod cli;
mod commands;
mod error;

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::Layer;

use cli::{Cli, Commands};
use commands::{run_invoke, run_list, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (SANDBOX_API_KEY etc.)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_logging(&cli)?;

    debug!(version = env!("CARGO_PKG_VERSION"), "API Sandbox CLI starting");

    let result = match &cli.command {
        Commands::List(args) => run_list(args),
        Commands::Validate(args) => run_validate(args),
        Commands::Invoke(args) => run_invoke(args).await,
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// Initialize logging based on CLI options
///
/// Logs go to stderr so stdout carries only command output.
fn init_logging(cli: &Cli) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if cli.quiet {
        EnvFilter::new("error")
    } else {
        let default_level = match cli.verbose {
            0 => "warn",
            1 => "info,dispatcher=debug",
            _ => "trace",
        };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    let fmt_layer = match cli.log_format {
        cli::LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        cli::LogFormat::Pretty => fmt::layer().pretty().with_writer(std::io::stderr).boxed(),
        cli::LogFormat::Compact => fmt::layer().compact().with_writer(std::io::stderr).boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
