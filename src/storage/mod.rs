//! Storage Engine Module
//!
//! This module provides the core storage functionality for EmberKV:
//! a capacity-bounded key-value store with lazy TTL expiry and a pluggable
//! eviction policy.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       CacheStore                            │
//! │        table + policy behind one exclusive lock             │
//! └──────────────────────────┬──────────────────────────────────┘
//!                            │ on_access / on_insert_or_update
//!                            │ evict / remove
//!                            ▼
//!              ┌───────────────────────────┐
//!              │   dyn EvictionPolicy      │
//!              │  ┌─────────┐ ┌─────────┐  │
//!              │  │   LRU   │ │   LFU   │  │
//!              │  └─────────┘ └─────────┘  │
//!              └───────────────────────────┘
//! ```
//!
//! ## Features
//!
//! - **Bounded**: never holds more than `capacity` keys
//! - **LRU / LFU**: O(1) victim selection, chosen once at construction
//! - **Lazy Expiry**: Expired keys are cleaned on access
//!
//! ## Example
//!
//! ```
//! use emberkv::storage::{CacheStore, PolicyKind};
//! use bytes::Bytes;
//! use std::time::Duration;
//!
//! let store = CacheStore::new(1000, PolicyKind::Lfu);
//!
//! // Basic operations
//! store.set(Bytes::from("name"), Bytes::from("Ariz"));
//! let value = store.get(&Bytes::from("name"));
//! assert_eq!(value, Some(Bytes::from("Ariz")));
//!
//! // Set with TTL
//! store.set_with_ttl(
//!     Bytes::from("session"),
//!     Bytes::from("token123"),
//!     Duration::from_secs(3600)
//! );
//! ```

pub mod engine;
pub mod lfu;
mod list;
pub mod lru;
pub mod policy;

// Re-export commonly used types
pub use engine::{CacheStore, Entry, StorageStats};
pub use lfu::LfuPolicy;
pub use lru::LruPolicy;
pub use policy::{EvictionPolicy, PolicyKind, UnknownPolicy};
