//! Indexed binary min-heap with decrease-key.
//!
//! Every entry carries an `f64` key and a sequence number assigned at
//! insertion.  Entries compare by `(key, seq)`, so equal keys come out in
//! insertion order.  An `FxHashMap` tracks the heap slot of each item, which
//! makes `contains`, `key_of`, `remove` and decrease-key O(log n) or better.

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::{GraphError, GraphResult};

#[derive(Debug, Clone, Copy)]
struct Entry<T> {
    item: T,
    key:  f64,
    seq:  u64,
}

impl<T> Entry<T> {
    #[inline]
    fn before(&self, other: &Entry<T>) -> bool {
        self.key < other.key || (self.key == other.key && self.seq < other.seq)
    }
}

/// Min-priority queue keyed by `f64`.
///
/// Keys must not be NaN; searches only ever enqueue sums of non-negative
/// finite weights and Euclidean distances.
#[derive(Debug, Clone)]
pub struct PriorityQueue<T> {
    heap:     Vec<Entry<T>>,
    slots:    FxHashMap<T, usize>,
    next_seq: u64,
}

impl<T> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self {
            heap:     Vec::new(),
            slots:    FxHashMap::default(),
            next_seq: 0,
        }
    }
}

impl<T: Copy + Eq + Hash> PriorityQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap:     Vec::with_capacity(capacity),
            slots:    FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            next_seq: 0,
        }
    }

    /// Insert `item` with `key`.
    ///
    /// If `item` is already queued, a strictly smaller key replaces the old
    /// entry (decrease-key) and a non-improving key is ignored.  Returns
    /// `true` when the queue changed.
    pub fn enqueue(&mut self, item: T, key: f64) -> bool {
        if let Some(&slot) = self.slots.get(&item) {
            if key >= self.heap[slot].key {
                return false;
            }
            self.remove_slot(slot);
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        let slot = self.heap.len();
        self.heap.push(Entry { item, key, seq });
        self.slots.insert(item, slot);
        self.sift_up(slot);
        true
    }

    /// Remove and return the item with the smallest key.
    pub fn dequeue(&mut self) -> GraphResult<(T, f64)> {
        if self.heap.is_empty() {
            return Err(GraphError::EmptyQueue);
        }
        let entry = self.remove_slot(0);
        Ok((entry.item, entry.key))
    }

    /// The item that `dequeue` would return, without removing it.
    pub fn peek(&self) -> Option<(T, f64)> {
        self.heap.first().map(|e| (e.item, e.key))
    }

    pub fn contains(&self, item: &T) -> bool {
        self.slots.contains_key(item)
    }

    /// Current key of a queued item.
    pub fn key_of(&self, item: &T) -> Option<f64> {
        self.slots.get(item).map(|&slot| self.heap[slot].key)
    }

    /// Remove `item` if present and return its key.
    pub fn remove(&mut self, item: &T) -> Option<f64> {
        let slot = *self.slots.get(item)?;
        Some(self.remove_slot(slot).key)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drop every entry.  Sequence numbering continues, so ordering stays
    /// stable across reuse.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.slots.clear();
    }

    // ── Heap internals ────────────────────────────────────────────────────

    fn remove_slot(&mut self, slot: usize) -> Entry<T> {
        let entry = self.heap.swap_remove(slot);
        self.slots.remove(&entry.item);
        if slot < self.heap.len() {
            self.slots.insert(self.heap[slot].item, slot);
            // The moved-in entry may belong above or below its new slot.
            let settled = self.sift_up(slot);
            if settled == slot {
                self.sift_down(slot);
            }
        }
        entry
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.heap.swap(a, b);
        self.slots.insert(self.heap[a].item, a);
        self.slots.insert(self.heap[b].item, b);
    }

    fn sift_up(&mut self, mut slot: usize) -> usize {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if !self.heap[slot].before(&self.heap[parent]) {
                break;
            }
            self.swap(slot, parent);
            slot = parent;
        }
        slot
    }

    fn sift_down(&mut self, mut slot: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * slot + 1;
            let right = left + 1;
            let mut best = slot;
            if left < len && self.heap[left].before(&self.heap[best]) {
                best = left;
            }
            if right < len && self.heap[right].before(&self.heap[best]) {
                best = right;
            }
            if best == slot {
                break;
            }
            self.swap(slot, best);
            slot = best;
        }
    }
}
