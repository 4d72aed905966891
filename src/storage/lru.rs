//! Least Recently Used Policy
//!
//! Keys sit in one recency list (head = most recent, tail = least recent)
//! inside a [`KeyArena`], and a map from key to arena slot gives O(1)
//! promotion and removal without scanning the list.

use super::list::{KeyArena, Links, SlotId};
use super::policy::{EvictionPolicy, PolicyKind};
use bytes::Bytes;
use std::collections::HashMap;

/// Evicts the key that has gone the longest without a read or write.
#[derive(Debug, Default)]
pub struct LruPolicy {
    arena: KeyArena,
    order: Links,
    slots: HashMap<Bytes, SlotId>,
}

impl LruPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next eviction candidate without removing it.
    pub fn peek_lru(&self) -> Option<&Bytes> {
        self.order.back().map(|slot| self.arena.key(slot))
    }

    /// Tracked keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &Bytes> + '_ {
        self.arena.iter(&self.order)
    }
}

impl EvictionPolicy for LruPolicy {
    fn on_access(&mut self, key: &Bytes) {
        if let Some(&slot) = self.slots.get(key) {
            self.arena.move_to_front(&mut self.order, slot);
        }
    }

    fn on_insert_or_update(&mut self, key: &Bytes) {
        match self.slots.get(key) {
            Some(&slot) => self.arena.move_to_front(&mut self.order, slot),
            None => {
                let slot = self.arena.alloc(key.clone());
                self.arena.push_front(&mut self.order, slot);
                self.slots.insert(key.clone(), slot);
            }
        }
    }

    fn evict(&mut self) -> Option<Bytes> {
        let slot = self.order.back()?;
        self.arena.unlink(&mut self.order, slot);
        let key = self.arena.release(slot);
        self.slots.remove(&key);
        Some(key)
    }

    fn remove(&mut self, key: &Bytes) {
        if let Some(slot) = self.slots.remove(key) {
            self.arena.unlink(&mut self.order, slot);
            self.arena.release(slot);
        }
    }

    fn len(&self) -> usize {
        self.slots.len()
    }

    fn kind(&self) -> PolicyKind {
        PolicyKind::Lru
    }
}
