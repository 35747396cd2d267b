//! Load history points for trend visualization

use serde::{Deserialize, Serialize};

/// One sample of the load/capacity trend, recorded at the end of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub tick: u64,
    pub load: u32,
    pub capacity: u32,
}

impl HistoryPoint {
    pub fn new(tick: u64, load: u32, capacity: u32) -> Self {
        Self { tick, load, capacity }
    }

    /// Load as a fraction of capacity.
    pub fn ratio(&self) -> f64 {
        if self.capacity == 0 {
            return 0.0;
        }
        self.load as f64 / self.capacity as f64
    }
}
