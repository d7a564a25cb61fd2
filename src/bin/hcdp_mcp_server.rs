//! hcdp-mcp-server: serves the HCDP tools to an MCP host over stdio.
//!
//! stdout carries the protocol, so logs go to stderr (`RUST_LOG`, default
//! `info`).

use anyhow::Context;
use hcdp_mcp::{Config, HcdpClient, McpServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .try_init();

    let config = Config::from_env().context("reading HCDP_* configuration")?;
    if config.api_token.is_none() {
        tracing::warn!("HCDP_API_TOKEN is not set; tool calls will fail until it is configured");
    }
    tracing::info!(base_url = %config.base_url, "starting {} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let client = HcdpClient::builder()
        .config(config)
        .build()
        .context("building HCDP client")?;

    McpServer::new(client)
        .serve_stdio()
        .await
        .context("serving MCP over stdio")?;

    tracing::info!("stdin closed, shutting down");
    Ok(())
}
