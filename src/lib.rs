//! # EmberKV - An In-Memory Key-Value Cache
//!
//! EmberKV is a bounded, in-memory key-value cache served over a plain-text
//! TCP protocol. When the cache is full, a pluggable eviction policy (LRU or
//! LFU) picks the key to drop. Keys may carry a time-to-live that is checked
//! lazily when the key is next looked at.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              EmberKV                                    │
//! │                                                                         │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐                  │
//! │  │ TCP Server  │───>│ Connection  │───>│  Command    │                  │
//! │  │ (Listener)  │    │  Handler    │    │  Handler    │                  │
//! │  └─────────────┘    └─────────────┘    └──────┬──────┘                  │
//! │                                               │                         │
//! │                                               ▼                         │
//! │  ┌─────────────┐    ┌──────────────────────────────────────────────┐    │
//! │  │   Line      │    │                CacheStore                    │    │
//! │  │   Parser    │    │  ┌──────────────┐      ┌──────────────────┐  │    │
//! │  │             │    │  │ key → Entry  │<────>│ EvictionPolicy   │  │    │
//! │  └─────────────┘    │  │ (value, TTL) │      │  (LRU | LFU)     │  │    │
//! │                     │  └──────────────┘      └──────────────────┘  │    │
//! │                     │              one Mutex over both             │    │
//! │                     └──────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use emberkv::server::serve;
//! use emberkv::connection::ConnectionStats;
//! use emberkv::storage::{CacheStore, PolicyKind};
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let storage = Arc::new(CacheStore::new(1000, PolicyKind::Lfu));
//!     let stats = Arc::new(ConnectionStats::new());
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!
//!     serve(listener, storage, stats, async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await;
//!     Ok(())
//! }
//! ```
//!
//! ## Supported Commands
//!
//! - `SET key value [EX seconds | PX milliseconds]` → `OK`
//! - `GET key` → `VALUE: <value>` or `NOT FOUND`
//! - `DEL key` → `OK`
//! - `EXISTS key` → `1` or `0`
//!
//! Malformed lines get `ERR <message>` and the connection stays open.
//!
//! ## Module Overview
//!
//! - [`storage`]: Cache store, eviction policies and TTL entries
//! - [`protocol`]: Line framing, command parsing and reply rendering
//! - [`commands`]: Executes commands against the store
//! - [`connection`]: Per-client connection handling
//! - [`server`]: Accept loop and shutdown
//! - [`config`]: Command-line and environment configuration

pub mod commands;
pub mod config;
pub mod connection;
pub mod protocol;
pub mod server;
pub mod storage;

// Re-export commonly used types for convenience
pub use commands::CommandHandler;
pub use config::Config;
pub use connection::{handle_connection, ConnectionStats};
pub use protocol::{Command, ParseError, Reply};
pub use storage::{CacheStore, EvictionPolicy, PolicyKind};

/// The default port EmberKV listens on
pub const DEFAULT_PORT: u16 = 8080;

/// The default host EmberKV binds to
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// The default number of keys held before eviction
pub const DEFAULT_CAPACITY: usize = 1000;

/// Version of EmberKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
