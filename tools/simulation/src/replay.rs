//! Recorded input scripts and deterministic replay validation
//!
//! Same config, same seed, same inputs → same final state. A script is
//! the ordered list of per-tick inputs the collaborator supplied.

use serde::{Deserialize, Serialize};
use types::errors::{ConfigError, ReplayError};
use types::status::ServerStatus;

use crate::config::SimConfig;
use crate::engine::{AttackerInputs, SimulationEngine, SimulationSnapshot};

/// Operator toggles that can change between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DefenseInputs {
    pub rate_limiting: bool,
    pub auto_scaling: bool,
    pub attacker_blocked: bool,
}

/// Everything the collaborator supplied for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TickInput {
    pub attacker: AttackerInputs,
    #[serde(default)]
    pub defenses: DefenseInputs,
    #[serde(default)]
    pub user_login: bool,
}

/// Ordered per-tick inputs.
pub type InputScript = Vec<TickInput>;

/// Comparable fingerprint of engine state. Excludes the session id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateDigest {
    pub tick: u64,
    pub load: u32,
    pub capacity: u32,
    pub status: ServerStatus,
    pub log_messages: Vec<String>,
    pub history: Vec<(u64, u32, u32)>,
}

/// Capture a digest of a snapshot.
pub fn capture_digest(snapshot: &SimulationSnapshot) -> StateDigest {
    StateDigest {
        tick: snapshot.tick,
        load: snapshot.load,
        capacity: snapshot.capacity,
        status: snapshot.status,
        log_messages: snapshot.logs.iter().map(|e| e.message().to_string()).collect(),
        history: snapshot
            .history
            .iter()
            .map(|p| (p.tick, p.load, p.capacity))
            .collect(),
    }
}

/// Apply one recorded tick to an engine.
pub fn apply_tick<R: rand::Rng>(engine: &mut SimulationEngine<R>, input: &TickInput) -> SimulationSnapshot {
    engine.set_rate_limiting(input.defenses.rate_limiting);
    engine.set_auto_scaling(input.defenses.auto_scaling);
    if input.defenses.attacker_blocked {
        engine.block_attacker();
    } else {
        engine.unblock_attacker();
    }
    engine.tick(&input.attacker, input.user_login)
}

/// Run a script on a fresh engine seeded with `seed`.
pub fn run_script(
    config: SimConfig,
    seed: u64,
    script: &[TickInput],
) -> Result<SimulationSnapshot, ConfigError> {
    let mut engine = SimulationEngine::seeded(config, seed)?;
    for input in script {
        apply_tick(&mut engine, input);
    }
    Ok(engine.snapshot())
}

/// Result of replay validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayValidation {
    pub matches: bool,
    pub original: StateDigest,
    pub replayed: StateDigest,
}

/// Replay `script` on a fresh engine and compare against `expected`.
pub fn validate_replay(
    config: SimConfig,
    seed: u64,
    script: &[TickInput],
    expected: &StateDigest,
) -> Result<ReplayValidation, ConfigError> {
    let replayed = capture_digest(&run_script(config, seed, script)?);
    Ok(ReplayValidation {
        matches: replayed == *expected,
        original: expected.clone(),
        replayed,
    })
}

/// Export an input script as JSON.
pub fn export_script(script: &[TickInput]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(script)
}

/// Import an input script from JSON.
pub fn import_script(json: &str) -> Result<InputScript, ReplayError> {
    let script: InputScript = serde_json::from_str(json)?;
    if script.is_empty() {
        return Err(ReplayError::Empty);
    }
    Ok(script)
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::status::AttackType;

    fn script() -> InputScript {
        let flood = AttackerInputs {
            running: true,
            attack_type: AttackType::VolumeFlood,
            num_bots: 40,
        };
        let mut script = Vec::new();
        for i in 0..30u64 {
            script.push(TickInput {
                attacker: flood,
                defenses: DefenseInputs {
                    rate_limiting: i >= 10,
                    auto_scaling: i >= 15,
                    attacker_blocked: i >= 25,
                },
                user_login: i % 6 == 0,
            });
        }
        script
    }

    #[test]
    fn test_replay_determinism() {
        let original = run_script(SimConfig::default(), 99, &script()).unwrap();
        let digest = capture_digest(&original);
        let validation = validate_replay(SimConfig::default(), 99, &script(), &digest).unwrap();
        assert!(validation.matches, "Replay produced different state");
    }

    #[test]
    fn test_state_independent_of_session() {
        let a = run_script(SimConfig::default(), 5, &script()).unwrap();
        let b = run_script(SimConfig::default(), 5, &script()).unwrap();
        assert_ne!(a.session_id, b.session_id);
        assert_eq!(capture_digest(&a), capture_digest(&b));
    }

    #[test]
    fn test_script_roundtrip() {
        let json = export_script(&script()).unwrap();
        let imported = import_script(&json).unwrap();
        assert_eq!(imported, script());
    }

    #[test]
    fn test_minimal_json_script() {
        let json = r#"[{"attacker":{"running":true,"attack_type":"slow_connection","num_bots":3}}]"#;
        let script = import_script(json).unwrap();
        assert!(!script[0].user_login);
        let snap = run_script(SimConfig::default(), 1, &script).unwrap();
        assert_eq!(snap.load, 30);
    }

    #[test]
    fn test_empty_script_rejected() {
        assert_eq!(import_script("[]"), Err(ReplayError::Empty));
        assert!(matches!(import_script("{"), Err(ReplayError::Parse(_))));
    }
}
