//! Eviction Policy Abstraction
//!
//! The store keeps the key→entry table; a policy keeps just enough
//! bookkeeping about the same keys to pick a victim when the table
//! overflows. The store drives the policy through the notifications below
//! and always calls them while holding its own lock, so implementations
//! carry no internal synchronization.

use super::lfu::LfuPolicy;
use super::lru::LruPolicy;
use bytes::Bytes;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Strategy deciding which tracked key to discard when the cache is full.
///
/// All methods take `&mut self`; a policy used outside a [`CacheStore`]
/// needs its own mutual exclusion.
///
/// [`CacheStore`]: super::CacheStore
pub trait EvictionPolicy: Send {
    /// Records a read of `key`. Untracked keys are ignored.
    fn on_access(&mut self, key: &Bytes);

    /// Records a write of `key`: starts tracking a new key, or counts as an
    /// access for an existing one.
    fn on_insert_or_update(&mut self, key: &Bytes);

    /// Selects a victim and stops tracking it.
    ///
    /// Returns `None` only when no keys are tracked.
    fn evict(&mut self) -> Option<Bytes>;

    /// Stops tracking `key`. No-op if it is not tracked.
    fn remove(&mut self, key: &Bytes);

    /// Number of tracked keys.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The variant implemented by this policy.
    fn kind(&self) -> PolicyKind;
}

/// The available eviction strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolicyKind {
    /// Least Recently Used
    #[default]
    Lru,
    /// Least Frequently Used, recency as tie-break
    Lfu,
}

impl PolicyKind {
    /// Builds an empty policy of this kind.
    pub fn build(self) -> Box<dyn EvictionPolicy> {
        match self {
            PolicyKind::Lru => Box::new(LruPolicy::new()),
            PolicyKind::Lfu => Box::new(LfuPolicy::new()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyKind::Lru => "LRU",
            PolicyKind::Lfu => "LFU",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a policy name is neither `LRU` nor `LFU`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown eviction policy '{0}' (expected LRU or LFU)")]
pub struct UnknownPolicy(pub String);

impl FromStr for PolicyKind {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("lru") {
            Ok(PolicyKind::Lru)
        } else if s.eq_ignore_ascii_case("lfu") {
            Ok(PolicyKind::Lfu)
        } else {
            Err(UnknownPolicy(s.to_string()))
        }
    }
}
