//! # Tweetrelay
//!
//! HTTP service relaying tweet posting, tweet reading and OAuth 2.0 token
//! exchange to the Twitter/X API.
//!
//! ## Environment Variables
//!
//! - `LOCAL_API_KEY`: shared secret expected as `Authorization: Bearer <key>`
//! - `xapi_access_token`: OAuth 2.0 User Context token for tweet operations
//! - `CLIENT_ID`, `CLIENT_SECRET`, `REDIRECT_URI`: OAuth 2.0 client
//! - `PORT`: Server port (defaults to 5000)
//! - `RUST_LOG`: log level filter

use log::{error, info};
use std::net::SocketAddr;

use tweetrelay::{build_router, get_server_port, AppConfig, AppState};

/// Main entry point for the tweetrelay web service.
///
/// Initializes logging, loads the configuration, and serves HTTP until Ctrl-C.
///
/// # Example Usage
///
/// ```bash
/// # Run on the default port 5000
/// LOCAL_API_KEY=secret cargo run
///
/// # Run with debug logging on a custom port
/// LOCAL_API_KEY=secret PORT=8080 RUST_LOG=debug cargo run
/// ```
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize the logging system
    env_logger::init();

    let config = AppConfig::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;
    let port = get_server_port()?;
    let app = build_router(AppState::from_config(config));

    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    info!("Starting tweetrelay server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        // Keep serving without graceful shutdown
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
