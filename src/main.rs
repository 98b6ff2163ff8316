//! Request context demo server.
//!
//! Serves `GET /client` (resolved client IP and locality) and
//! `GET /internal/status` (local requests only, others get a 401 challenge).

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use http_context_ext::config::{load_config, ServerConfig};
use http_context_ext::http::HttpServer;
use http_context_ext::observability::init_logging;

#[derive(Parser)]
#[command(name = "http-context-ext")]
#[command(about = "Request context helper demo server", long_about = None)]
struct Cli {
    /// Path to a TOML config file; defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    init_logging(&config.observability)?;

    tracing::info!("http-context-ext v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let server = HttpServer::new(config);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
