//! TCP accept loop.
//!
//! One task per client, all sharing a single [`CacheStore`]. The loop runs
//! until the `shutdown` future resolves; in-flight connection tasks are left
//! to finish on their own.

use crate::commands::CommandHandler;
use crate::connection::{handle_connection, ConnectionStats};
use crate::storage::CacheStore;
use std::future::Future;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

/// Accepts connections on `listener` until `shutdown` completes.
pub async fn serve<F>(
    listener: TcpListener,
    storage: Arc<CacheStore>,
    stats: Arc<ConnectionStats>,
    shutdown: F,
) where
    F: Future<Output = ()>,
{
    tokio::select! {
        _ = accept_loop(listener, Arc::clone(&storage), Arc::clone(&stats)) => {}
        _ = shutdown => {
            info!("Shutdown signal received, stopping server...");
        }
    }

    log_summary(&storage, &stats);
}

async fn accept_loop(
    listener: TcpListener,
    storage: Arc<CacheStore>,
    stats: Arc<ConnectionStats>,
) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                if let Err(e) = stream.set_nodelay(true) {
                    debug!(client = %addr, error = %e, "Failed to set TCP_NODELAY");
                }

                let handler = CommandHandler::new(Arc::clone(&storage));
                let stats = Arc::clone(&stats);

                tokio::spawn(async move {
                    handle_connection(stream, addr, handler, stats).await;
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }
}

fn log_summary(storage: &CacheStore, stats: &ConnectionStats) {
    let s = storage.stats();
    info!(
        capacity = storage.capacity(),
        policy = %storage.policy_kind(),
        keys = s.keys,
        hits = s.hits,
        misses = s.misses,
        sets = s.sets,
        deletes = s.deletes,
        evictions = s.evictions,
        expired = s.expired,
        "Store statistics"
    );
    info!(
        accepted = stats.connections_accepted.load(Ordering::Relaxed),
        active = stats.active_connections.load(Ordering::Relaxed),
        commands = stats.commands_processed.load(Ordering::Relaxed),
        bytes_read = stats.bytes_read.load(Ordering::Relaxed),
        bytes_written = stats.bytes_written.load(Ordering::Relaxed),
        "Connection statistics"
    );
}
