//! Auditable log trail entries
//!
//! Every engine decision worth showing an operator produces one
//! immutable `LogEntry`. The category lets renderers color-code lines.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Log entry category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogCategory {
    Info,
    Attack,
    User,
    Server,
    Defense,
}

impl LogCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogCategory::Info => "info",
            LogCategory::Attack => "attack",
            LogCategory::User => "user",
            LogCategory::Server => "server",
            LogCategory::Defense => "defense",
        }
    }
}

impl fmt::Display for LogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the log trail. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    tick: u64,
    timestamp: DateTime<Utc>,
    message: String,
    category: LogCategory,
}

impl LogEntry {
    pub fn new(
        tick: u64,
        timestamp: DateTime<Utc>,
        category: LogCategory,
        message: impl Into<String>,
    ) -> Self {
        Self {
            tick,
            timestamp,
            message: message.into(),
            category,
        }
    }

    /// Tick during which the entry was recorded.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn category(&self) -> LogCategory {
        self.category
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {:<7} {}",
            self.timestamp.format("%H:%M:%S"),
            self.category,
            self.message
        )
    }
}
