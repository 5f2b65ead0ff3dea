//! Customer service (v1)
//!
//! Forwards every request on `/` to the preference service and relays the
//! answer, tagging GET traces with the caller's agent and preference.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────┐
//!                     │                  CUSTOMER                    │
//!   Client Request    │  ┌─────────┐   ┌─────────────┐   ┌────────┐  │
//!   ──────────────────┼─▶│  http   │──▶│  handlers   │──▶│ down-  │──┼──▶ preference
//!                     │  │ server  │   │ GET / POST  │   │ stream │  │
//!   Client Response   │  └─────────┘   └──────┬──────┘   └────────┘  │
//!   ◀─────────────────┼── response.rs ◀───────┘                      │
//!                     │                                              │
//!                     │  config · identity · observability · health  │
//!                     └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use customer::config::load_config;
use customer::observability::logging::init_logging;
use customer::{HttpServer, Identity, Shutdown};

#[derive(Parser)]
#[command(name = "customer")]
#[command(about = "Customer service forwarding to the preference service", long_about = None)]
struct Cli {
    /// Path to a TOML config file. Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    init_logging(&config.observability)?;

    tracing::info!("customer v{} starting", env!("CARGO_PKG_VERSION"));

    let identity = Identity::from_env(&config.identity);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        downstream = %config.downstream.url,
        instance_id = %identity.instance_id(),
        app_version = %identity.app_version(),
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, identity)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
