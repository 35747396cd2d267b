//! Auto-scaling scenario
//!
//! Floods with auto-scaling on, stops the attack, and verifies capacity
//! grew under load and shrank back to base once the load drained.

use rand::Rng;
use types::status::AttackType;

use crate::engine::{AttackerInputs, SimulationEngine};
use crate::scenarios::ScenarioResult;

#[derive(Debug, Clone)]
pub struct AutoScalingConfig {
    pub num_bots: i64,
    pub attack_ticks: u64,
    pub drain_ticks: u64,
}

impl Default for AutoScalingConfig {
    fn default() -> Self {
        Self {
            num_bots: 20,
            attack_ticks: 15,
            drain_ticks: 150,
        }
    }
}

/// Run the auto-scaling scenario.
pub fn run<R: Rng>(engine: &mut SimulationEngine<R>, config: &AutoScalingConfig) -> ScenarioResult {
    engine.set_auto_scaling(true);
    let base = engine.config().base_capacity;
    let mut inputs = AttackerInputs {
        running: true,
        attack_type: AttackType::VolumeFlood,
        num_bots: config.num_bots,
    };

    let mut never_below_base = true;
    let mut peak_capacity = base;
    for _ in 0..config.attack_ticks {
        let snap = engine.tick(&inputs, false);
        never_below_base &= snap.capacity >= base;
        peak_capacity = peak_capacity.max(snap.capacity);
    }

    inputs.running = false;
    for _ in 0..config.drain_ticks {
        let snap = engine.tick(&inputs, false);
        never_below_base &= snap.capacity >= base;
    }

    let snapshot = engine.snapshot();
    let metrics = engine.metrics();
    ScenarioResult {
        name: "auto_scaling".to_string(),
        ticks_run: config.attack_ticks + config.drain_ticks,
        passed: never_below_base
            && metrics.scale_ups > 0
            && metrics.scale_downs > 0
            && snapshot.capacity == base,
        details: format!(
            "Capacity peaked at {} ({} scale-ups, {} scale-downs), settled at {}.",
            peak_capacity, metrics.scale_ups, metrics.scale_downs, snapshot.capacity,
        ),
        final_snapshot: snapshot,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;

    #[test]
    fn test_capacity_grows_and_returns() {
        let mut engine = SimulationEngine::seeded(SimConfig::default(), 21).unwrap();
        let result = run(&mut engine, &AutoScalingConfig::default());
        assert!(result.passed, "{}", result.details);
        assert!(engine.metrics().peak_capacity > 20);
    }
}
