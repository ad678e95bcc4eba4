//! Vigil CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vigil_config::load_config;
use vigil_runtime::{Runtime, SignalHandler};

#[derive(Parser)]
#[command(name = "vigil")]
#[command(about = "Vigil component health monitor", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe components and serve the /health report
    Serve {
        /// Path to configuration file
        #[arg(short, long, default_value = "config.json", env = "VIGIL_CONFIG")]
        config: PathBuf,

        /// Log level (trace, debug, info, warn, error)
        #[arg(short, long, default_value = "info")]
        log_level: String,

        /// Diagnostic log output format
        #[arg(long, value_enum, default_value_t = LogFormat::Text)]
        log_format: LogFormat,
    },

    /// Validate configuration file
    Validate {
        /// Path to configuration file
        #[arg(short, long, default_value = "config.json", env = "VIGIL_CONFIG")]
        config: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            log_level,
            log_format,
        } => {
            init_tracing(&log_level, log_format)?;

            tracing::info!("Starting Vigil");
            tracing::info!("Config file: {}", config.display());

            let config = load_config(&config)
                .with_context(|| format!("Failed to load config from {}", config.display()))?;

            tracing::info!(
                listen = %config.listen_address,
                components = config.components.len(),
                interval_secs = config.check_interval_seconds,
                "Configuration loaded"
            );

            let runtime = Runtime::from_config(config).context("Failed to open probe event log")?;

            let shutdown_signal = runtime.shutdown_signal();
            tokio::spawn(async move {
                let handler = SignalHandler::new(shutdown_signal);
                handler.run().await;
            });

            runtime.run().await?;

            tracing::info!("Vigil stopped");
            Ok(())
        }

        Commands::Validate { config } => {
            tracing_subscriber::fmt().with_target(false).init();

            tracing::info!("Validating configuration: {}", config.display());

            match load_config(&config) {
                Ok(cfg) => {
                    tracing::info!("✓ Configuration is valid");
                    tracing::info!("  Listen: {}", cfg.listen_address);
                    tracing::info!("  Components: {}", cfg.components.len());
                    tracing::info!("  Interval: {}s", cfg.check_interval_seconds);
                    Ok(())
                }
                Err(e) => {
                    tracing::error!("✗ Configuration validation failed: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Version => {
            println!("Vigil health monitor");
            println!("Version: {}", env!("CARGO_PKG_VERSION"));
            println!("Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
            Ok(())
        }
    }
}

fn init_tracing(level: &str, format: LogFormat) -> Result<()> {
    let filter = match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    };

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(filter.into())
        // Per-connection pool chatter from the probe client
        .add_directive("hyper_util=warn".parse()?);

    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_level(true),
            )
            .init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(false))
            .init(),
    }

    Ok(())
}
