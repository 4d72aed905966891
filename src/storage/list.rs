//! Arena-Backed Key Lists
//!
//! Both eviction policies need ordered sequences of keys with O(1) unlink
//! from the middle. Instead of allocating a node per key, all nodes live in
//! one `Vec` arena and link to each other by index. Freed slots are recycled
//! through a free list.
//!
//! A single arena can host many independent lists: each list is just a
//! [`Links`] value holding its head, tail and length. LRU uses one list,
//! LFU uses one list per frequency bucket, all sharing the same arena so a
//! key keeps its slot when it moves between buckets.
//!
//! ```text
//!   Links { head ──┐                        ┌── tail }
//!                  ▼                        ▼
//!               [slot 3] ⇄ [slot 0] ⇄ [slot 7]
//!              most recent            least recent
//! ```

use bytes::Bytes;

/// Index of a node inside the [`KeyArena`].
pub type SlotId = usize;

/// Sentinel value for null links.
const NIL: SlotId = usize::MAX;

#[derive(Debug)]
struct Node {
    key: Bytes,
    prev: SlotId,
    next: SlotId,
}

/// Head/tail anchor of one list stored in a [`KeyArena`].
#[derive(Debug, Clone, Copy)]
pub struct Links {
    head: SlotId,
    tail: SlotId,
    len: usize,
}

impl Default for Links {
    fn default() -> Self {
        Self {
            head: NIL,
            tail: NIL,
            len: 0,
        }
    }
}

impl Links {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Slot at the least recent end, if any.
    #[inline]
    pub fn back(&self) -> Option<SlotId> {
        (self.tail != NIL).then_some(self.tail)
    }
}

/// Node storage shared by one or more [`Links`] lists.
#[derive(Debug, Default)]
pub struct KeyArena {
    nodes: Vec<Node>,
    free: Vec<SlotId>,
}

impl KeyArena {
    /// Allocates a detached node for `key`, reusing a freed slot if possible.
    pub fn alloc(&mut self, key: Bytes) -> SlotId {
        let node = Node {
            key,
            prev: NIL,
            next: NIL,
        };

        if let Some(slot) = self.free.pop() {
            self.nodes[slot] = node;
            slot
        } else {
            self.nodes.push(node);
            self.nodes.len() - 1
        }
    }

    /// Releases a detached node and hands its key back to the caller.
    pub fn release(&mut self, slot: SlotId) -> Bytes {
        self.free.push(slot);
        std::mem::take(&mut self.nodes[slot].key)
    }

    /// Returns the key stored in `slot`.
    #[inline]
    pub fn key(&self, slot: SlotId) -> &Bytes {
        &self.nodes[slot].key
    }

    /// Links a detached node at the head (most recent end) of `list`.
    pub fn push_front(&mut self, list: &mut Links, slot: SlotId) {
        self.nodes[slot].prev = NIL;
        self.nodes[slot].next = list.head;

        if list.head != NIL {
            self.nodes[list.head].prev = slot;
        } else {
            list.tail = slot;
        }
        list.head = slot;
        list.len += 1;
    }

    /// Unlinks `slot` from `list`. The node must currently belong to `list`.
    pub fn unlink(&mut self, list: &mut Links, slot: SlotId) {
        let prev = self.nodes[slot].prev;
        let next = self.nodes[slot].next;

        if prev != NIL {
            self.nodes[prev].next = next;
        } else {
            list.head = next;
        }

        if next != NIL {
            self.nodes[next].prev = prev;
        } else {
            list.tail = prev;
        }

        self.nodes[slot].prev = NIL;
        self.nodes[slot].next = NIL;
        list.len -= 1;
    }

    /// Moves `slot` to the head of `list`.
    pub fn move_to_front(&mut self, list: &mut Links, slot: SlotId) {
        if list.head == slot {
            return;
        }
        self.unlink(list, slot);
        self.push_front(list, slot);
    }

    /// Iterates the keys of `list` from most to least recent.
    pub fn iter<'a>(&'a self, list: &Links) -> impl Iterator<Item = &'a Bytes> + 'a {
        let mut cursor = list.head;
        std::iter::from_fn(move || {
            if cursor == NIL {
                return None;
            }
            let node = &self.nodes[cursor];
            cursor = node.next;
            Some(&node.key)
        })
    }
}
