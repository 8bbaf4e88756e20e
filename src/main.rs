//! MCP server binary entry point.

use anyhow::Result;
use cab_booking_mcp::{
    config::ServerConfig,
    protocol::McpServerBuilder,
    server::{McpHandler, ServerStateBuilder},
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    info!(
        "Starting {} v{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let config = ServerConfig::from_env()?;
    info!(
        "Issuing booking ids from {}{} at a base fare of {}{}",
        config.booking.id_prefix,
        config.booking.first_id,
        config.booking.currency_symbol,
        config.booking.base_fare
    );

    let name = config.name.to_string();
    let version = config.version.to_string();

    let state = Arc::new(
        ServerStateBuilder::new()
            .config(config)
            .build()
            .map_err(|e| anyhow::anyhow!(e))?,
    );

    let handler = McpHandler::new(state);
    let server = McpServerBuilder::new()
        .handler(handler)
        .name(name)
        .version(version)
        .with_tools()
        .with_resources()
        .with_prompts()
        .build()?;

    info!("Server running on stdio transport");

    server.run().await?;

    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("cab_booking_mcp=info,warn"));

    // JSON logs go to stderr; stdout carries the protocol
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .json()
        .init();
}
