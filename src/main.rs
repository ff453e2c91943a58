use anyhow::{Context, Result};
use responses_relay::backend::Backend;
use responses_relay::cli::Args;
use responses_relay::config::Config;
use responses_relay::server::Server;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse_args();
    args.validate_config_path()?;

    let mut config = Config::from_file(&args.config)?;
    args.apply_overrides(&mut config);

    match Backend::select(&config) {
        Some(backend) => info!("Using {} backend", backend.name()),
        None => warn!(
            "No backend configured; every request will fail until compat.base_url or native.api_key is set"
        ),
    }

    let server = Server::new(&config)?;

    let listener = tokio::net::TcpListener::bind(&server.addr)
        .await
        .context(format!("Failed to bind to {}", server.addr))?;

    info!("Starting responses-relay on {}", server.addr);

    axum::serve(listener, server.router)
        .await
        .context("Server failed")?;

    Ok(())
}
