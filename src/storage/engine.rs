//! Capacity-Bounded Cache Store
//!
//! This module implements the core storage engine for EmberKV.
//! It owns the key→entry table, enforces a fixed capacity by asking an
//! [`EvictionPolicy`] for victims, and expires keys lazily on access.
//!
//! ## Design Decisions
//!
//! 1. **One Lock**: The table and the policy state are updated together under
//!    a single exclusive mutex. Reads take it too, since a `GET` reorders the
//!    policy and may purge an expired key.
//! 2. **Evict After Insert**: A new key is inserted first; only then, if the
//!    policy tracks more keys than the capacity allows, a victim is evicted.
//! 3. **Lazy Expiry**: Expired keys are purged when `get`/`exists` observes
//!    them. There is no background sweeper, so an expired key that is never
//!    read keeps its slot until it is evicted or overwritten.
//!
//! ## Concurrency Model
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        CacheStore                           │
//! │  ┌───────────────────────────────────────────────────────┐  │
//! │  │                    Mutex<Inner>                       │  │
//! │  │   ┌──────────────────┐      ┌──────────────────────┐  │  │
//! │  │   │ HashMap<K,Entry> │ ◄──► │ Box<dyn EvictionPol> │  │  │
//! │  │   └──────────────────┘      └──────────────────────┘  │  │
//! │  └───────────────────────────────────────────────────────┘  │
//! │   AtomicU64 counters (hits, misses, evictions, ...)         │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use super::policy::{EvictionPolicy, PolicyKind};
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Represents a stored value with optional expiry time.
#[derive(Debug, Clone)]
pub struct Entry {
    /// The actual value stored
    pub value: Bytes,
    /// When this entry expires (None = never expires)
    pub expires_at: Option<Instant>,
}

impl Entry {
    /// Creates a new entry without expiry.
    pub fn new(value: Bytes) -> Self {
        Self {
            value,
            expires_at: None,
        }
    }

    /// Creates a new entry with TTL.
    ///
    /// A TTL too large to represent as an `Instant` never expires.
    pub fn with_ttl(value: Bytes, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now().checked_add(ttl),
        }
    }

    /// Checks if this entry has expired.
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Instant::now() >= exp)
    }
}

/// State guarded by the store lock.
struct Inner {
    table: HashMap<Bytes, Entry>,
    policy: Box<dyn EvictionPolicy>,
}

/// The main storage engine for EmberKV.
///
/// Wrap it in an `Arc` and share it across all client handler tasks.
///
/// # Example
///
/// ```
/// use emberkv::storage::{CacheStore, PolicyKind};
/// use bytes::Bytes;
///
/// let store = CacheStore::new(2, PolicyKind::Lru);
///
/// store.set(Bytes::from("a"), Bytes::from("1"));
/// store.set(Bytes::from("b"), Bytes::from("2"));
/// store.get(&Bytes::from("a"));                   // "a" is now most recent
/// store.set(Bytes::from("c"), Bytes::from("3"));  // evicts "b"
///
/// assert!(store.exists(&Bytes::from("a")));
/// assert!(!store.exists(&Bytes::from("b")));
/// ```
pub struct CacheStore {
    capacity: usize,
    kind: PolicyKind,
    inner: Mutex<Inner>,

    /// Statistics: successful GET operations
    hits: AtomicU64,

    /// Statistics: GET operations on absent or expired keys
    misses: AtomicU64,

    /// Statistics: total SET operations
    sets: AtomicU64,

    /// Statistics: keys removed by DEL
    deletes: AtomicU64,

    /// Statistics: keys removed to make room
    evictions: AtomicU64,

    /// Statistics: expired keys purged on access
    expired: AtomicU64,
}

impl std::fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore")
            .field("capacity", &self.capacity)
            .field("policy", &self.kind)
            .field("keys", &self.len())
            .finish()
    }
}

impl CacheStore {
    /// Creates an empty store holding at most `capacity` keys.
    ///
    /// A capacity of 0 is allowed: every insertion is evicted right away.
    pub fn new(capacity: usize, kind: PolicyKind) -> Self {
        Self::with_policy(capacity, kind.build())
    }

    /// Creates an empty store driven by an already-built policy.
    pub fn with_policy(capacity: usize, policy: Box<dyn EvictionPolicy>) -> Self {
        Self {
            capacity,
            kind: policy.kind(),
            inner: Mutex::new(Inner {
                table: HashMap::with_capacity(capacity.min(1 << 16)),
                policy,
            }),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            sets: AtomicU64::new(0),
            deletes: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            expired: AtomicU64::new(0),
        }
    }

    /// Sets a key-value pair without expiry.
    ///
    /// An existing key keeps its slot; its value is replaced and any TTL
    /// cleared.
    pub fn set(&self, key: Bytes, value: Bytes) {
        self.insert(key, Entry::new(value));
    }

    /// Sets a key-value pair that expires after `ttl`.
    ///
    /// Always replaces both the value and any previous TTL. A zero TTL is
    /// accepted and makes the key unavailable to the next read.
    pub fn set_with_ttl(&self, key: Bytes, value: Bytes, ttl: Duration) {
        self.insert(key, Entry::with_ttl(value, ttl));
    }

    /// Gets the value for a key.
    ///
    /// Returns `None` if the key doesn't exist or has expired; an expired key
    /// is removed on the way out. A hit counts as a use for the policy.
    pub fn get(&self, key: &Bytes) -> Option<Bytes> {
        let mut inner = self.inner.lock();

        if !self.purge_if_expired(&mut inner, key) {
            if let Some(value) = inner.table.get(key).map(|e| e.value.clone()) {
                inner.policy.on_access(key);
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(value);
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Checks if a key exists (and is not expired).
    ///
    /// Purges an expired key like [`get`](Self::get) but does not count as a
    /// use for the policy.
    pub fn exists(&self, key: &Bytes) -> bool {
        let mut inner = self.inner.lock();

        if self.purge_if_expired(&mut inner, key) {
            return false;
        }
        inner.table.contains_key(key)
    }

    /// Deletes a key from the store.
    ///
    /// # Returns
    ///
    /// Returns `true` if the key was deleted, `false` if it didn't exist.
    pub fn del(&self, key: &Bytes) -> bool {
        let mut inner = self.inner.lock();

        if inner.table.remove(key).is_some() {
            inner.policy.remove(key);
            self.deletes.fetch_add(1, Ordering::Relaxed);
            true
        } else {
            false
        }
    }

    /// Returns the number of keys currently stored, including expired keys
    /// nobody has looked at yet.
    pub fn len(&self) -> usize {
        self.inner.lock().table.len()
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of keys tracked by the eviction policy.
    ///
    /// Always equal to [`len`](Self::len) between operations.
    pub fn tracked_keys(&self) -> usize {
        self.inner.lock().policy.len()
    }

    /// Maximum number of keys held at once.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The eviction policy chosen at construction.
    pub fn policy_kind(&self) -> PolicyKind {
        self.kind
    }

    /// Returns store statistics.
    pub fn stats(&self) -> StorageStats {
        StorageStats {
            keys: self.len() as u64,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            sets: self.sets.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            expired: self.expired.load(Ordering::Relaxed),
        }
    }

    /// Shared insert/update path for `set` and `set_with_ttl`.
    fn insert(&self, key: Bytes, entry: Entry) {
        self.sets.fetch_add(1, Ordering::Relaxed);

        let mut inner = self.inner.lock();

        // An expired entry is gone as soon as it is observed; the write then
        // starts a fresh key rather than reviving the old policy state.
        self.purge_if_expired(&mut inner, &key);

        if let Some(existing) = inner.table.get_mut(&key) {
            *existing = entry;
            inner.policy.on_insert_or_update(&key);
            return;
        }

        inner.table.insert(key.clone(), entry);
        inner.policy.on_insert_or_update(&key);

        while inner.policy.len() > self.capacity {
            let Some(victim) = inner.policy.evict() else {
                break;
            };
            inner.table.remove(&victim);
            self.evictions.fetch_add(1, Ordering::Relaxed);
            debug!(key = ?victim, policy = %self.kind, "Evicted key");
        }

        debug_assert_eq!(inner.table.len(), inner.policy.len());
    }

    /// Removes `key` from table and policy if its entry has expired.
    ///
    /// Returns `true` if an expired entry was purged.
    fn purge_if_expired(&self, inner: &mut Inner, key: &Bytes) -> bool {
        let expired = inner
            .table
            .get(key)
            .is_some_and(Entry::is_expired);

        if expired {
            inner.table.remove(key);
            inner.policy.remove(key);
            self.expired.fetch_add(1, Ordering::Relaxed);
            trace!(key = ?key, "Purged expired key");
        }
        expired
    }
}

/// Store statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StorageStats {
    /// Number of keys currently stored
    pub keys: u64,
    /// GET operations that returned a value
    pub hits: u64,
    /// GET operations on absent or expired keys
    pub misses: u64,
    /// Total SET operations
    pub sets: u64,
    /// Keys removed by DEL
    pub deletes: u64,
    /// Keys evicted to stay within capacity
    pub evictions: u64,
    /// Expired keys purged on access
    pub expired: u64,
}
