//! Least Frequently Used Policy
//!
//! Every tracked key has a use count. Keys sharing a count live in one
//! frequency bucket, a recency list whose head is the key touched most
//! recently at that count. Eviction takes the tail of the lowest non-empty
//! bucket, so among equally frequent keys the least recently touched goes
//! first.
//!
//! ```text
//!   min_freq = 1
//!        │
//!        ▼
//!   freq 1: [e] ⇄ [d]          ← evict "d" next
//!   freq 2: [c]
//!   freq 5: [b] ⇄ [a]
//! ```
//!
//! All buckets share one [`KeyArena`], so a key keeps its slot while it
//! climbs from bucket to bucket. Empty buckets are dropped immediately,
//! which keeps `min_freq` equal to the first key of the bucket map whenever
//! anything is tracked.

use super::list::{KeyArena, Links, SlotId};
use super::policy::{EvictionPolicy, PolicyKind};
use bytes::Bytes;
use std::collections::{BTreeMap, HashMap};

/// Where a tracked key currently lives.
#[derive(Debug, Clone, Copy)]
struct Tracked {
    slot: SlotId,
    freq: u64,
}

/// Evicts the least frequently used key, least recently touched first on ties.
#[derive(Debug, Default)]
pub struct LfuPolicy {
    arena: KeyArena,
    /// Frequency → keys at that frequency, most recent at the head
    buckets: BTreeMap<u64, Links>,
    tracked: HashMap<Bytes, Tracked>,
    /// Smallest frequency with a non-empty bucket; 0 when nothing is tracked
    min_freq: u64,
}

impl LfuPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current use count of `key`, if tracked.
    pub fn frequency(&self, key: &Bytes) -> Option<u64> {
        self.tracked.get(key).map(|t| t.freq)
    }

    /// Smallest use count among tracked keys (0 when empty).
    pub fn min_freq(&self) -> u64 {
        self.min_freq
    }

    /// Returns the next eviction candidate without removing it.
    pub fn peek_lfu(&self) -> Option<&Bytes> {
        self.buckets
            .get(&self.min_freq)
            .and_then(Links::back)
            .map(|slot| self.arena.key(slot))
    }

    /// Moves a tracked key from its bucket to the head of the next one.
    fn promote(&mut self, key: &Bytes) {
        let Some(tracked) = self.tracked.get_mut(key) else {
            return;
        };
        let old_freq = tracked.freq;
        let new_freq = old_freq + 1;
        tracked.freq = new_freq;
        let slot = tracked.slot;

        let emptied = self.unlink(slot, old_freq);

        let bucket = self.buckets.entry(new_freq).or_default();
        self.arena.push_front(bucket, slot);

        // The promoted key itself now sits at new_freq
        if emptied && old_freq == self.min_freq {
            self.min_freq = new_freq;
        }
    }

    /// Unlinks `slot` from bucket `freq`, dropping the bucket if it empties.
    ///
    /// Returns `true` if the bucket became empty.
    fn unlink(&mut self, slot: SlotId, freq: u64) -> bool {
        let emptied = match self.buckets.get_mut(&freq) {
            Some(bucket) => {
                self.arena.unlink(bucket, slot);
                bucket.is_empty()
            }
            None => false,
        };

        if emptied {
            self.buckets.remove(&freq);
        }
        emptied
    }

    /// Restores `min_freq` after bucket `emptied` lost its last key through
    /// a removal (not a promotion).
    fn repair_min_freq(&mut self, emptied: u64) {
        if self.tracked.is_empty() {
            self.min_freq = 0;
        } else if emptied == self.min_freq {
            self.min_freq = self
                .buckets
                .range(emptied + 1..)
                .next()
                .map(|(&freq, _)| freq)
                .unwrap_or(0);
        }
    }

    /// Drops `key` from tracking given its current location.
    fn detach(&mut self, key: &Bytes, tracked: Tracked) {
        self.tracked.remove(key);
        let emptied = self.unlink(tracked.slot, tracked.freq);
        self.arena.release(tracked.slot);

        if emptied || self.tracked.is_empty() {
            self.repair_min_freq(tracked.freq);
        }
    }
}

impl EvictionPolicy for LfuPolicy {
    fn on_access(&mut self, key: &Bytes) {
        self.promote(key);
    }

    fn on_insert_or_update(&mut self, key: &Bytes) {
        if self.tracked.contains_key(key) {
            self.promote(key);
            return;
        }

        let slot = self.arena.alloc(key.clone());
        let bucket = self.buckets.entry(1).or_default();
        self.arena.push_front(bucket, slot);
        self.tracked.insert(key.clone(), Tracked { slot, freq: 1 });
        self.min_freq = 1;
    }

    fn evict(&mut self) -> Option<Bytes> {
        let slot = self.buckets.get(&self.min_freq)?.back()?;
        let key = self.arena.key(slot).clone();
        let tracked = self.tracked.get(&key).copied()?;

        self.detach(&key, tracked);
        Some(key)
    }

    fn remove(&mut self, key: &Bytes) {
        if let Some(tracked) = self.tracked.get(key).copied() {
            self.detach(key, tracked);
        }
    }

    fn len(&self) -> usize {
        self.tracked.len()
    }

    fn kind(&self) -> PolicyKind {
        PolicyKind::Lfu
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> Bytes {
        Bytes::from(s.to_string())
    }

    /// Checks the bucket/min_freq invariants against a full scan.
    fn assert_consistent(lfu: &LfuPolicy) {
        let mut seen = 0;
        for (&freq, bucket) in &lfu.buckets {
            assert!(!bucket.is_empty(), "empty bucket {} left behind", freq);
            for k in lfu.arena.iter(bucket) {
                assert_eq!(lfu.frequency(k), Some(freq));
                seen += 1;
            }
        }
        assert_eq!(seen, lfu.len());

        let expected_min = lfu.buckets.keys().next().copied().unwrap_or(0);
        assert_eq!(lfu.min_freq(), expected_min);
    }

    #[test]
    fn test_new_key_starts_at_one() {
        let mut lfu = LfuPolicy::new();
        assert_eq!(lfu.min_freq(), 0);

        lfu.on_insert_or_update(&key("a"));

        assert_eq!(lfu.frequency(&key("a")), Some(1));
        assert_eq!(lfu.min_freq(), 1);
        assert_consistent(&lfu);
    }

    #[test]
    fn test_access_and_update_increment_frequency() {
        let mut lfu = LfuPolicy::new();

        lfu.on_insert_or_update(&key("a"));
        lfu.on_access(&key("a"));
        lfu.on_insert_or_update(&key("a"));

        assert_eq!(lfu.frequency(&key("a")), Some(3));
        assert_eq!(lfu.min_freq(), 3);
        assert_consistent(&lfu);
    }

    #[test]
    fn test_new_key_resets_min_freq() {
        let mut lfu = LfuPolicy::new();

        lfu.on_insert_or_update(&key("a"));
        lfu.on_access(&key("a"));
        lfu.on_access(&key("a"));
        assert_eq!(lfu.min_freq(), 3);

        lfu.on_insert_or_update(&key("b"));
        assert_eq!(lfu.min_freq(), 1);
        assert_consistent(&lfu);
    }

    #[test]
    fn test_evicts_least_frequent() {
        let mut lfu = LfuPolicy::new();

        lfu.on_insert_or_update(&key("hot"));
        lfu.on_insert_or_update(&key("cold"));
        lfu.on_access(&key("hot"));
        lfu.on_access(&key("hot"));

        assert_eq!(lfu.peek_lfu(), Some(&key("cold")));
        assert_eq!(lfu.evict(), Some(key("cold")));
        assert_eq!(lfu.evict(), Some(key("hot")));
        assert_eq!(lfu.evict(), None);
        assert_eq!(lfu.min_freq(), 0);
    }

    #[test]
    fn test_ties_broken_by_recency() {
        let mut lfu = LfuPolicy::new();

        lfu.on_insert_or_update(&key("a"));
        lfu.on_insert_or_update(&key("b"));
        lfu.on_insert_or_update(&key("c"));

        // All at frequency 2, touched in order b, a, c
        lfu.on_access(&key("b"));
        lfu.on_access(&key("a"));
        lfu.on_access(&key("c"));

        assert_eq!(lfu.evict(), Some(key("b")));
        assert_eq!(lfu.evict(), Some(key("a")));
        assert_eq!(lfu.evict(), Some(key("c")));
    }

    #[test]
    fn test_eviction_advances_min_freq() {
        let mut lfu = LfuPolicy::new();

        lfu.on_insert_or_update(&key("a"));
        lfu.on_insert_or_update(&key("b"));
        for _ in 0..4 {
            lfu.on_access(&key("b"));
        }

        assert_eq!(lfu.evict(), Some(key("a")));
        assert_eq!(lfu.min_freq(), 5);
        assert_consistent(&lfu);
    }

    #[test]
    fn test_remove_min_key_skips_gaps() {
        let mut lfu = LfuPolicy::new();

        lfu.on_insert_or_update(&key("low"));
        lfu.on_insert_or_update(&key("high"));
        for _ in 0..9 {
            lfu.on_access(&key("high"));
        }

        lfu.remove(&key("low"));

        assert_eq!(lfu.len(), 1);
        assert_eq!(lfu.min_freq(), 10);
        assert_eq!(lfu.peek_lfu(), Some(&key("high")));
        assert_consistent(&lfu);
    }

    #[test]
    fn test_remove_non_candidate_keeps_min_freq() {
        let mut lfu = LfuPolicy::new();

        lfu.on_insert_or_update(&key("a"));
        lfu.on_insert_or_update(&key("b"));
        lfu.on_access(&key("b"));

        lfu.remove(&key("b"));

        assert_eq!(lfu.min_freq(), 1);
        assert_eq!(lfu.peek_lfu(), Some(&key("a")));
        assert_consistent(&lfu);
    }

    #[test]
    fn test_remove_last_key_resets() {
        let mut lfu = LfuPolicy::new();

        lfu.on_insert_or_update(&key("a"));
        lfu.remove(&key("a"));
        lfu.remove(&key("a"));

        assert!(lfu.is_empty());
        assert_eq!(lfu.min_freq(), 0);
        assert_eq!(lfu.evict(), None);
    }

    #[test]
    fn test_access_untracked_is_noop() {
        let mut lfu = LfuPolicy::new();

        lfu.on_access(&key("ghost"));

        assert!(lfu.is_empty());
        assert_eq!(lfu.frequency(&key("ghost")), None);
        assert_consistent(&lfu);
    }

    #[test]
    fn test_mixed_workload_stays_consistent() {
        let mut lfu = LfuPolicy::new();

        for i in 0..200u64 {
            let k = key(&format!("k{}", i % 17));
            match i % 5 {
                0 | 1 => lfu.on_insert_or_update(&k),
                2 | 3 => lfu.on_access(&k),
                _ => {
                    if i % 3 == 0 {
                        lfu.remove(&k);
                    } else {
                        lfu.evict();
                    }
                }
            }
            assert_consistent(&lfu);
        }
    }
}
