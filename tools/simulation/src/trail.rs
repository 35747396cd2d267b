//! Bounded, auditable log trail
//!
//! Holds at most `capacity` entries; the oldest line falls off when a
//! new one arrives. Entries are stamped with the tick and simulated
//! wall-clock time that the engine advanced the trail to.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use tracing::debug;
use types::log::{LogCategory, LogEntry};

use crate::ring::RingBuffer;

#[derive(Debug, Clone, PartialEq)]
pub struct LogTrail {
    entries: RingBuffer<LogEntry>,
    tick: u64,
    now: DateTime<Utc>,
}

impl LogTrail {
    pub fn new(capacity: usize, epoch: DateTime<Utc>) -> Self {
        Self {
            entries: RingBuffer::new(capacity),
            tick: 0,
            now: epoch,
        }
    }

    /// Move the stamp used for subsequent entries.
    pub fn advance(&mut self, tick: u64, now: DateTime<Utc>) {
        self.tick = tick;
        self.now = now;
    }

    /// Append one entry stamped with the current tick and time.
    pub fn record(&mut self, category: LogCategory, message: impl Into<String>) {
        let entry = LogEntry::new(self.tick, self.now, category, message);
        debug!(
            tick = self.tick,
            category = category.as_str(),
            message = entry.message(),
            "log trail entry"
        );
        self.entries.push(entry);
    }

    /// Entries newest first, as renderers display them.
    pub fn newest_first(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.newest_first()
    }

    pub fn to_vec_newest_first(&self) -> Vec<LogEntry> {
        self.entries.to_vec_newest_first()
    }

    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.newest()
    }

    /// Entries recorded during the given tick, oldest first.
    pub fn entries_for_tick(&self, tick: u64) -> Vec<&LogEntry> {
        self.entries.iter().filter(|e| e.tick() == tick).collect()
    }

    /// Count of entries currently held in the given category.
    pub fn count(&self, category: LogCategory) -> usize {
        self.entries.iter().filter(|e| e.category() == category).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Serialize for LogTrail {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.newest_first())
    }
}
