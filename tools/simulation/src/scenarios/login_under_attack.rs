//! Login under attack scenario
//!
//! A legitimate user logs in on a quiet server, then keeps trying while
//! a flood saturates it. The quiet login must succeed and the attempts
//! during the flood must fail with a 503.

use rand::Rng;
use types::status::{AttackType, LoginOutcome};

use crate::engine::{AttackerInputs, SimulationEngine};
use crate::scenarios::ScenarioResult;

#[derive(Debug, Clone)]
pub struct LoginUnderAttackConfig {
    pub num_bots: i64,
    pub attack_ticks: u64,
    /// A login is attempted every `login_every` ticks during the attack
    pub login_every: u64,
}

impl Default for LoginUnderAttackConfig {
    fn default() -> Self {
        Self {
            num_bots: 50,
            attack_ticks: 20,
            login_every: 4,
        }
    }
}

/// Run the login-under-attack scenario.
pub fn run<R: Rng>(
    engine: &mut SimulationEngine<R>,
    config: &LoginUnderAttackConfig,
) -> ScenarioResult {
    let quiet = engine.tick(&AttackerInputs::default(), true);
    let quiet_ok = quiet.last_login == Some(LoginOutcome::Successful);

    let inputs = AttackerInputs {
        running: true,
        attack_type: AttackType::VolumeFlood,
        num_bots: config.num_bots,
    };
    let every = config.login_every.max(1);
    let mut attempts = 0;
    let mut failures = 0;
    for i in 1..=config.attack_ticks {
        let login = i % every == 0;
        let snap = engine.tick(&inputs, login);
        if login {
            attempts += 1;
            if matches!(snap.last_login, Some(LoginOutcome::Busy | LoginOutcome::TimedOut)) {
                failures += 1;
            }
        }
    }

    let snapshot = engine.snapshot();
    ScenarioResult {
        name: "login_under_attack".to_string(),
        ticks_run: config.attack_ticks + 1,
        passed: quiet_ok && attempts > 0 && failures == attempts,
        details: format!(
            "Quiet login {}. {} of {} logins during the flood failed with 503.",
            if quiet_ok { "succeeded" } else { "failed" },
            failures,
            attempts,
        ),
        final_snapshot: snapshot,
    }
}
