//! IP block scenario
//!
//! Attacks for a while, blocks the attacker while the attack toggle is
//! still on, then lets the server drain back to idle.

use rand::Rng;
use types::status::{AttackType, ServerStatus};

use crate::engine::{AttackerInputs, SimulationEngine};
use crate::scenarios::ScenarioResult;

#[derive(Debug, Clone)]
pub struct IpBlockConfig {
    pub num_bots: i64,
    pub attack_ticks: u64,
    pub drain_ticks: u64,
}

impl Default for IpBlockConfig {
    fn default() -> Self {
        Self {
            num_bots: 30,
            attack_ticks: 10,
            drain_ticks: 60,
        }
    }
}

/// Run the IP block scenario.
pub fn run<R: Rng>(engine: &mut SimulationEngine<R>, config: &IpBlockConfig) -> ScenarioResult {
    let inputs = AttackerInputs {
        running: true,
        attack_type: AttackType::VolumeFlood,
        num_bots: config.num_bots,
    };
    for _ in 0..config.attack_ticks {
        engine.tick(&inputs, false);
    }
    let load_at_block = engine.state().load;

    engine.block_attacker();
    let mut suppressed = true;
    for _ in 0..config.drain_ticks {
        // Keep the attack step running; the block must override it.
        engine.step();
        if let Some(report) = engine.last_report() {
            suppressed &= report.raw_volume == 0;
        }
        suppressed &= !engine.state().attacker.running;
    }

    let snapshot = engine.snapshot();
    ScenarioResult {
        name: "ip_block".to_string(),
        ticks_run: config.attack_ticks + config.drain_ticks,
        passed: suppressed && snapshot.load == 0 && snapshot.status == ServerStatus::Idle,
        details: format!(
            "Blocked at load {}. After {} drain ticks load is {} ({}).",
            load_at_block, config.drain_ticks, snapshot.load, snapshot.status,
        ),
        final_snapshot: snapshot,
    }
}
