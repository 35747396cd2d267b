//! Scenario simulation modules
//!
//! Each scenario scripts operator and attacker actions over a number of
//! ticks and checks the behavior it is named after.

pub mod flood;
pub mod rate_limit;
pub mod ip_block;
pub mod auto_scaling;
pub mod login_under_attack;

use crate::engine::SimulationSnapshot;
use serde::{Deserialize, Serialize};

/// Result of a scenario run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,
    pub ticks_run: u64,
    pub passed: bool,
    pub details: String,
    pub final_snapshot: SimulationSnapshot,
}

/// Names accepted by [`run_named`].
pub const SCENARIO_NAMES: [&str; 6] = [
    "volume_flood",
    "slow_connection",
    "rate_limited_flood",
    "ip_block",
    "auto_scaling",
    "login_under_attack",
];

/// Run a scenario by name on a fresh engine built from `config`.
///
/// Returns `None` for an unknown name.
pub fn run_named(
    name: &str,
    config: crate::config::SimConfig,
) -> Option<Result<ScenarioResult, types::errors::ConfigError>> {
    let mut engine = match crate::engine::SimulationEngine::new(config) {
        Ok(engine) => engine,
        Err(e) => return Some(Err(e)),
    };
    let result = match name {
        "volume_flood" => flood::run(&mut engine, &flood::FloodConfig::volume()),
        "slow_connection" => flood::run(&mut engine, &flood::FloodConfig::slow_connection()),
        "rate_limited_flood" => rate_limit::run(&mut engine, &rate_limit::RateLimitConfig::default()),
        "ip_block" => ip_block::run(&mut engine, &ip_block::IpBlockConfig::default()),
        "auto_scaling" => auto_scaling::run(&mut engine, &auto_scaling::AutoScalingConfig::default()),
        "login_under_attack" => {
            login_under_attack::run(&mut engine, &login_under_attack::LoginUnderAttackConfig::default())
        }
        _ => return None,
    };
    Some(Ok(result))
}
