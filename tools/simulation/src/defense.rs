//! Defense filter
//!
//! Per-tick rate limiting of attacker traffic. Total over all inputs:
//! the accepted volume never exceeds the raw volume.

use serde::{Deserialize, Serialize};
use tracing::warn;
use types::log::LogCategory;

use crate::trail::LogTrail;

/// Result of filtering one tick of attacker traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterOutcome {
    pub accepted: u32,
    pub blocked: u32,
}

/// Accepted volume under the given limit: `min(raw, limit)` when enabled.
pub fn accepted_volume(raw_volume: u32, rate_limiting_enabled: bool, limit_per_tick: u32) -> u32 {
    if rate_limiting_enabled {
        raw_volume.min(limit_per_tick)
    } else {
        raw_volume
    }
}

/// Filter raw attacker volume, logging the blocked count when non-zero.
pub fn filter(
    raw_volume: u32,
    rate_limiting_enabled: bool,
    limit_per_tick: u32,
    trail: &mut LogTrail,
) -> FilterOutcome {
    let accepted = accepted_volume(raw_volume, rate_limiting_enabled, limit_per_tick);
    let blocked = raw_volume - accepted;

    if blocked > 0 {
        warn!(raw_volume, accepted, blocked, "rate limiter dropped attacker requests");
        trail.record(
            LogCategory::Defense,
            format!("Rate limiter blocked {} requests ({} allowed).", blocked, accepted),
        );
    }

    FilterOutcome { accepted, blocked }
}
