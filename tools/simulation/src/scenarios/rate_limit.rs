//! Rate-limited flood scenario
//!
//! Enables rate limiting before a large flood and verifies no tick
//! admits more attacker traffic than the per-tick limit.

use rand::Rng;
use types::status::AttackType;

use crate::engine::{AttackerInputs, SimulationEngine};
use crate::scenarios::ScenarioResult;

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub num_bots: i64,
    pub ticks: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            num_bots: 50,
            ticks: 30,
        }
    }
}

/// Run the rate-limited flood scenario.
pub fn run<R: Rng>(engine: &mut SimulationEngine<R>, config: &RateLimitConfig) -> ScenarioResult {
    engine.set_rate_limiting(true);
    let limit = engine.config().rate_limit_per_tick;
    let inputs = AttackerInputs {
        running: true,
        attack_type: AttackType::VolumeFlood,
        num_bots: config.num_bots,
    };

    let mut within_limit = true;
    let mut blocked_total: u64 = 0;

    for _ in 0..config.ticks {
        engine.tick(&inputs, false);
        if let Some(report) = engine.last_report() {
            within_limit &= report.accepted_volume <= limit;
            blocked_total += report.rate_limited as u64;
        }
    }

    let snapshot = engine.snapshot();
    ScenarioResult {
        name: "rate_limited_flood".to_string(),
        ticks_run: config.ticks,
        passed: within_limit && blocked_total > 0,
        details: format!(
            "Rate limit {} req/tick blocked {} requests over {} ticks. Final load {}/{}.",
            limit, blocked_total, config.ticks, snapshot.load, snapshot.capacity,
        ),
        final_snapshot: snapshot,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;

    #[test]
    fn test_rate_limit_holds_load_below_capacity() {
        let mut engine = SimulationEngine::seeded(SimConfig::default(), 3).unwrap();
        let result = run(&mut engine, &RateLimitConfig::default());
        assert!(result.passed, "{}", result.details);
        assert!(result.final_snapshot.load <= 30);
        assert!(engine.metrics().mitigation_rate() > 0.5);
    }
}
