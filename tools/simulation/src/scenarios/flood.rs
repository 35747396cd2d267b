//! Unmitigated flood scenario
//!
//! Runs an attack with no defenses and verifies the server stays under
//! attack and the load never escapes the over-capacity ceiling.

use rand::Rng;
use types::status::{AttackType, ServerStatus};

use crate::engine::{AttackerInputs, SimulationEngine};
use crate::scenarios::ScenarioResult;

/// Configuration for the flood scenario.
#[derive(Debug, Clone)]
pub struct FloodConfig {
    pub attack_type: AttackType,
    pub num_bots: i64,
    /// Ticks the attack runs
    pub ticks: u64,
}

impl FloodConfig {
    pub fn volume() -> Self {
        Self {
            attack_type: AttackType::VolumeFlood,
            num_bots: 50,
            ticks: 20,
        }
    }

    pub fn slow_connection() -> Self {
        Self {
            attack_type: AttackType::SlowConnection,
            num_bots: 5,
            ticks: 20,
        }
    }
}

impl Default for FloodConfig {
    fn default() -> Self {
        Self::volume()
    }
}

/// Run the flood scenario.
pub fn run<R: Rng>(engine: &mut SimulationEngine<R>, config: &FloodConfig) -> ScenarioResult {
    let inputs = AttackerInputs {
        running: true,
        attack_type: config.attack_type,
        num_bots: config.num_bots,
    };

    let mut within_ceiling = true;
    let mut always_under_attack = true;
    let mut peak = 0;

    for _ in 0..config.ticks {
        let snap = engine.tick(&inputs, false);
        let ceiling = engine.config().ceiling(snap.capacity);
        within_ceiling &= snap.load <= ceiling;
        always_under_attack &= snap.status == ServerStatus::UnderAttack;
        peak = peak.max(snap.load);
    }

    let snapshot = engine.snapshot();
    let name = match config.attack_type {
        AttackType::VolumeFlood => "volume_flood",
        AttackType::SlowConnection => "slow_connection",
    };

    ScenarioResult {
        name: name.to_string(),
        ticks_run: config.ticks,
        passed: within_ceiling && always_under_attack && peak > 0,
        details: format!(
            "{} with {} bots for {} ticks. Peak load {}, final {}/{}.",
            config.attack_type, config.num_bots, config.ticks, peak, snapshot.load, snapshot.capacity,
        ),
        final_snapshot: snapshot,
    }
}
