//! Standalone mock WhatToDo backend.
//!
//! Runs the in-memory server on `WHATTODO_ADDR` (default `127.0.0.1:8000`)
//! so clients can be pointed at it during development.

use std::io;

use anyhow::Result;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();
    init_tracing();

    let addr = std::env::var("WHATTODO_ADDR").unwrap_or_else(|_| "127.0.0.1:8000".to_string());
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "Mock WhatToDo backend listening");

    whattodo_mock_server::run(listener).await?;
    Ok(())
}
