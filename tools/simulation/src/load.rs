//! Load accumulator
//!
//! Per tick: drain a fraction of outstanding work, admit new volume,
//! then enforce the over-capacity ceiling. The result always satisfies
//! `0 <= load <= floor(capacity * ceiling_factor)`.

use serde::{Deserialize, Serialize};
use tracing::warn;
use types::log::LogCategory;

use crate::config::SimConfig;
use crate::trail::LogTrail;

/// Result of one accumulation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccumulateOutcome {
    /// Load after the step
    pub load: u32,
    /// Units drained by decay
    pub drained: u32,
    /// Units dropped at the ceiling
    pub dropped: u32,
}

/// Drain `max(1, floor(load * fraction))` from a positive load, floored at 0.
pub fn decay(load: u32, fraction: f64) -> u32 {
    if load == 0 {
        return 0;
    }
    let drain = ((load as f64 * fraction).floor() as u32).max(1);
    load.saturating_sub(drain)
}

/// Run one accumulation step.
pub fn accumulate(
    load: u32,
    capacity: u32,
    accepted_attack_volume: u32,
    user_volume: u32,
    attack_running: bool,
    config: &SimConfig,
    trail: &mut LogTrail,
) -> AccumulateOutcome {
    let decayed = decay(load, config.decay_fraction);
    let candidate = decayed
        .saturating_add(accepted_attack_volume)
        .saturating_add(user_volume);

    let ceiling = config.ceiling(capacity);
    let (new_load, dropped) = if candidate > ceiling {
        let dropped = candidate - ceiling;
        warn!(candidate, ceiling, dropped, "load ceiling reached, dropping packets");
        trail.record(
            LogCategory::Server,
            format!("Server max capacity reached. Dropping {} packets.", dropped),
        );
        (ceiling, dropped)
    } else {
        (candidate, 0)
    };

    if load > 0 && new_load == 0 && !attack_running {
        trail.record(LogCategory::Server, "Server load cleared. Back to Idle.");
    }

    AccumulateOutcome {
        load: new_load,
        drained: load - decayed,
        dropped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn trail() -> LogTrail {
        LogTrail::new(20, Utc::now())
    }

    #[test]
    fn test_decay_minimum_drain() {
        assert_eq!(decay(0, 0.1), 0);
        assert_eq!(decay(1, 0.1), 0);
        assert_eq!(decay(9, 0.1), 8);
        assert_eq!(decay(10, 0.1), 9);
        assert_eq!(decay(30, 0.1), 27);
        assert_eq!(decay(55, 0.1), 50);
    }

    #[test]
    fn test_admits_under_ceiling() {
        let mut log = trail();
        let out = accumulate(10, 20, 5, 1, true, &SimConfig::default(), &mut log);
        assert_eq!(out, AccumulateOutcome { load: 15, drained: 1, dropped: 0 });
        assert!(log.is_empty());
    }

    #[test]
    fn test_ceiling_drops_excess() {
        let mut log = trail();
        let out = accumulate(28, 20, 100, 0, true, &SimConfig::default(), &mut log);
        assert_eq!(out.load, 30);
        assert_eq!(out.dropped, 26 + 100 - 30);
        assert_eq!(log.count(LogCategory::Server), 1);
        assert!(log.latest().unwrap().message().contains("max capacity"));
    }

    #[test]
    fn test_cleared_log_only_without_attack() {
        let mut log = trail();
        let out = accumulate(1, 20, 0, 0, false, &SimConfig::default(), &mut log);
        assert_eq!(out.load, 0);
        assert_eq!(log.latest().unwrap().message(), "Server load cleared. Back to Idle.");

        let mut log = trail();
        accumulate(1, 20, 0, 0, true, &SimConfig::default(), &mut log);
        assert!(log.is_empty());
    }

    #[test]
    fn test_idle_stays_quiet() {
        let mut log = trail();
        let out = accumulate(0, 20, 0, 0, false, &SimConfig::default(), &mut log);
        assert_eq!(out.load, 0);
        assert!(log.is_empty());
    }
}
