//! Fixed-capacity ring buffer
//!
//! Backs the log trail and the load history. Pushing past capacity
//! evicts the oldest element, so memory stays bounded for the whole
//! lifetime of a session.

use serde::{Serialize, Serializer};
use std::collections::VecDeque;

/// Bounded FIFO: oldest at the front, newest at the back.
#[derive(Debug, Clone, PartialEq)]
pub struct RingBuffer<T> {
    items: VecDeque<T>,
    capacity: usize,
    evicted: u64,
}

impl<T> RingBuffer<T> {
    /// Create an empty buffer. A capacity of 0 is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
            evicted: 0,
        }
    }

    /// Append an element, evicting the oldest one on overflow.
    ///
    /// Returns the evicted element, if any.
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.items.len() >= self.capacity {
            self.evicted += 1;
            self.items.pop_front()
        } else {
            None
        };
        self.items.push_back(item);
        evicted
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total elements evicted since creation.
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    /// Most recently pushed element.
    pub fn newest(&self) -> Option<&T> {
        self.items.back()
    }

    /// Iterate oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.items.iter()
    }

    /// Iterate newest first.
    pub fn newest_first(&self) -> impl Iterator<Item = &T> {
        self.items.iter().rev()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T: Clone> RingBuffer<T> {
    /// Copy out oldest first.
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }

    /// Copy out newest first.
    pub fn to_vec_newest_first(&self) -> Vec<T> {
        self.items.iter().rev().cloned().collect()
    }
}

impl<T: Serialize> Serialize for RingBuffer<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.items.iter())
    }
}
