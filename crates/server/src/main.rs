//! mcp-birding server entry point.
//!
//! Boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::{Context, Result};
use fieldmark_client::{EBirdClient, EBirdConfig, INaturalistClient, NominatimClient};
use fieldmark_core::{AppConfig, CacheDb, Orchestrator};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load().context("loading configuration")?;

    let db = CacheDb::open(&config.db_path)
        .await
        .with_context(|| format!("opening cache at {}", config.db_path.display()))?;

    let ebird = EBirdClient::new(EBirdConfig::from_app_config(&config)?)?;
    let geocoder = NominatimClient::from_app_config(&config)?;
    let photos = INaturalistClient::from_app_config(&config)?;

    let orchestrator = Orchestrator::new(db, Arc::new(ebird), Arc::new(geocoder), Arc::new(photos))
        .with_pacing(config.pacing());

    tracing::info!(
        db_path = %config.db_path.display(),
        pacing_ms = config.pacing_ms,
        "Starting mcp-birding server on stdio transport"
    );

    let handler = handler::BirdingServer::new(Arc::new(orchestrator));
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
