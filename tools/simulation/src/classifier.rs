//! Status classifier and auto-scaler
//!
//! `classify` is a pure function of load, capacity and the attack flag,
//! evaluated in strict priority order. `scale` adjusts capacity after
//! classification, so a scaling decision only affects the next tick.

use serde::{Deserialize, Serialize};
use tracing::info;
use types::log::LogCategory;
use types::status::ServerStatus;

use crate::config::SimConfig;
use crate::trail::LogTrail;

/// Load as a fraction of capacity. Zero capacity reads as zero load.
pub fn load_ratio(load: u32, capacity: u32) -> f64 {
    if capacity == 0 {
        return 0.0;
    }
    load as f64 / capacity as f64
}

/// Derive the server status. First match wins.
pub fn classify(load: u32, capacity: u32, attack_running: bool, config: &SimConfig) -> ServerStatus {
    let ratio = load_ratio(load, capacity);
    if attack_running {
        ServerStatus::UnderAttack
    } else if ratio > config.overload_ratio {
        ServerStatus::Overloaded
    } else if ratio > config.high_load_ratio {
        ServerStatus::HighLoad
    } else if load > 0 {
        ServerStatus::Stable
    } else {
        ServerStatus::Idle
    }
}

/// Capacity change decided by the auto-scaler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScaleAction {
    Hold,
    Up { from: u32, to: u32 },
    Down { from: u32, to: u32 },
}

impl ScaleAction {
    /// Capacity after applying this action to `current`.
    pub fn apply(&self, current: u32) -> u32 {
        match self {
            ScaleAction::Hold => current,
            ScaleAction::Up { to, .. } | ScaleAction::Down { to, .. } => *to,
        }
    }
}

/// Decide and log a capacity change. Capacity never drops below base.
pub fn scale(load: u32, capacity: u32, config: &SimConfig, trail: &mut LogTrail) -> ScaleAction {
    let base = config.base_capacity;
    let ratio = load_ratio(load, capacity);

    if ratio > config.scale_up_ratio {
        let to = capacity.saturating_add(base);
        info!(from = capacity, to, ratio, "auto-scaling up");
        trail.record(
            LogCategory::Server,
            format!("Auto-scaling: scaling up capacity {} -> {}.", capacity, to),
        );
        ScaleAction::Up { from: capacity, to }
    } else if ratio < config.scale_down_ratio && capacity > base {
        let to = capacity.saturating_sub(base).max(base);
        info!(from = capacity, to, ratio, "auto-scaling down");
        trail.record(
            LogCategory::Server,
            format!("Auto-scaling: scaling down capacity {} -> {}.", capacity, to),
        );
        ScaleAction::Down { from: capacity, to }
    } else {
        ScaleAction::Hold
    }
}
