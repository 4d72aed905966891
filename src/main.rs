//! EmberKV - An In-Memory Key-Value Cache
//!
//! This is the main entry point for the EmberKV server.
//! It reads the configuration, builds the cache store and serves clients
//! until Ctrl+C.

use clap::Parser;
use emberkv::config::Config;
use emberkv::connection::ConnectionStats;
use emberkv::server::serve;
use emberkv::storage::CacheStore;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn print_banner(config: &Config) {
    println!(
        r#"
EmberKV v{} - In-Memory Key-Value Cache
──────────────────────────────────────────────────────────────
Server started on {}
Capacity: {} keys, eviction policy: {}
Ready to accept connections.

Use Ctrl+C to shutdown gracefully.
"#,
        emberkv::VERSION,
        config.bind_address(),
        config.capacity,
        config.policy,
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments (an unknown policy exits here)
    let config = Config::parse();

    // Set up logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    // Create the cache store (shared across all connections)
    let storage = Arc::new(CacheStore::new(config.capacity, config.policy));
    info!(
        capacity = config.capacity,
        policy = %config.policy,
        "Cache store initialized"
    );

    // Create connection statistics
    let stats = Arc::new(ConnectionStats::new());

    // Bind the TCP listener
    let listener = TcpListener::bind(config.bind_address()).await?;
    info!("Listening on {}", config.bind_address());

    print_banner(&config);

    // Set up graceful shutdown
    let shutdown = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    serve(listener, storage, stats, shutdown).await;

    info!("Server shutdown complete");
    Ok(())
}
