//! Memory order queue.
//!
//! A FIFO of MEM-pool station indices, one per outstanding load or store, appended at
//! issue in program order. Only the head may start address computation. A load leaves the
//! queue when it starts executing; a store leaves only when it writes memory. There is no
//! address comparison: ordering is purely by program order.

use std::collections::VecDeque;

/// FIFO of MEM station indices in program order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryQueue {
    entries: VecDeque<usize>,
}

impl MemoryQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a newly issued memory op.
    pub fn push(&mut self, station: usize) {
        self.entries.push_back(station);
    }

    /// Station index at the head, if any.
    #[inline]
    pub fn head(&self) -> Option<usize> {
        self.entries.front().copied()
    }

    /// Returns `true` if `station` may start.
    #[inline]
    pub fn is_head(&self, station: usize) -> bool {
        self.head() == Some(station)
    }

    /// Releases the head slot.
    pub fn pop(&mut self) -> Option<usize> {
        self.entries.pop_front()
    }

    /// Returns the number of queued ops.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the queue is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Queued station indices, head first.
    pub fn snapshot(&self) -> Vec<usize> {
        self.entries.iter().copied().collect()
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
