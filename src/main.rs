//! Gatekeeper proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                 GATEKEEPER                    │
//!                        │                                               │
//!   Client Request       │  ┌──────────┐    ┌──────────┐                 │
//!   ─────────────────────┼─▶│   http   │───▶│   gate   │── missing ──┐   │
//!                        │  │  server  │    │ required │             │   │
//!                        │  └──────────┘    └────┬─────┘             ▼   │
//!                        │                       │ present     ┌────────┐│
//!                        │                       ▼             │  403   ││
//!                        │                ┌────────────┐       │  page  ││
//!                        │                │  upstream  │───────┼────────┼┼──▶ Origin
//!                        │                │   client   │◀──────┼────────┼┼─── (fixed)
//!                        │                └─────┬──────┘       └────────┘│
//!   Client Response      │                      ▼                        │
//!   ◀────────────────────┼──────── relay + provenance headers, or 502    │
//!                        └──────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use gatekeeper_proxy::config::{finalize, read_config, GatekeeperConfig};
use gatekeeper_proxy::http::HttpServer;
use gatekeeper_proxy::lifecycle::{signals, Shutdown};
use gatekeeper_proxy::observability::{logging, metrics};

#[derive(Parser, Debug)]
#[command(name = "gatekeeper-proxy")]
#[command(about = "Rejects requests missing required headers and forwards the rest to a fixed origin", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(long)]
    bind: Option<String>,

    /// Override upstream.origin.
    #[arg(long)]
    upstream: Option<String>,

    /// Override observability.log_level.
    #[arg(long)]
    log_level: Option<String>,

    /// Validate the configuration and exit.
    #[arg(long)]
    check: bool,
}

impl Cli {
    fn apply_overrides(&self, config: &mut GatekeeperConfig) {
        if let Some(bind) = &self.bind {
            config.listener.bind_address = bind.clone();
        }
        if let Some(upstream) = &self.upstream {
            config.upstream.origin = upstream.clone();
        }
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => read_config(path)?,
        None => GatekeeperConfig::default(),
    };
    cli.apply_overrides(&mut config);

    logging::init_logging(&config.observability);
    let config = finalize(config)?;

    if cli.check {
        println!("configuration OK");
        println!("  listen:           {}", config.listener.bind_address);
        println!("  tls:              {}", config.listener.tls.is_some());
        println!("  upstream origin:  {}", config.upstream.origin);
        println!("  required headers: {}", config.gate.required_headers.join(", "));
        return Ok(());
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        origin = %config.upstream.origin,
        required_headers = ?config.gate.required_headers,
        "gatekeeper-proxy starting"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config)?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_listener(shutdown);

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
