//! On-demand image transformation proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────────┐
//!                    │                    IMAGE PROXY                        │
//!                    │                                                       │
//!  ?image=&width=    │  ┌────────┐   ┌──────────┐   ┌────────┐   ┌────────┐  │
//!  ──────────────────┼─▶│  http  │──▶│  params  │──▶│ fetch  │──▶│imaging │  │
//!                    │  │ server │   │validator │   │ (GET)  │   │resize/ │  │
//!                    │  └────────┘   └────┬─────┘   └───┬────┘   │ crop   │  │
//!                    │       ▲          404│        400│         └───┬────┘  │
//!  ◀─────────────────┼───────┴────────────┴────────────┴─────────────┘       │
//!   image/* or text  │                                                       │
//!                    │  config · observability · lifecycle (cross-cutting)   │
//!                    └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use image_proxy::config::loader::load_config;
use image_proxy::config::ProxyConfig;
use image_proxy::lifecycle::{self, signals, Shutdown};
use image_proxy::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "image-proxy")]
#[command(about = "Resize or crop remote images on demand", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address, overriding `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,

    /// Port to listen on, keeping the configured host.
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };
    let config = lifecycle::apply_overrides(config, cli.bind, cli.port);

    logging::init_logging(&config.observability);
    tracing::info!("image-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        max_source_bytes = config.fetch.max_source_bytes,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let started = lifecycle::start(config).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    started.server.run(started.listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
