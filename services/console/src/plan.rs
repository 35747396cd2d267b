//! Operator plans
//!
//! A plan is a timeline of control changes the driver applies before
//! the tick they are scheduled for, standing in for the buttons and
//! sliders of an interactive front end.

use rand::Rng;
use serde::{Deserialize, Serialize};
use simulation::engine::SimulationEngine;
use types::status::AttackType;

use crate::error::CliError;

/// One operator or actor action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    StartAttack { attack_type: AttackType, num_bots: i64 },
    StopAttack,
    RateLimiting { enabled: bool },
    AutoScaling { enabled: bool },
    BlockAttacker,
    UnblockAttacker,
    Login,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledAction {
    pub tick: u64,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Plan {
    pub name: String,
    #[serde(default)]
    pub actions: Vec<ScheduledAction>,
    /// Attempt a login every n ticks; 0 disables
    #[serde(default)]
    pub login_every: u64,
}

impl Plan {
    /// Resolve a built-in plan name or a path to a JSON plan.
    pub fn resolve(name_or_path: &str) -> Result<Self, CliError> {
        if name_or_path.ends_with(".json") {
            return Self::load(name_or_path);
        }
        match name_or_path {
            "flood" => Ok(Self::flood()),
            "slow" => Ok(Self::slow()),
            "idle" => Ok(Self::idle()),
            other => Err(CliError::UnknownPlan(other.to_string())),
        }
    }

    fn load(path: &str) -> Result<Self, CliError> {
        let to_err = |reason: String| CliError::PlanFile {
            path: path.to_string(),
            reason,
        };
        let json = std::fs::read_to_string(path).map_err(|e| to_err(e.to_string()))?;
        serde_json::from_str(&json).map_err(|e| to_err(e.to_string()))
    }

    /// Volume flood met by each defense in turn.
    pub fn flood() -> Self {
        Self {
            name: "flood".to_string(),
            actions: vec![
                at(3, Action::StartAttack { attack_type: AttackType::VolumeFlood, num_bots: 50 }),
                at(10, Action::RateLimiting { enabled: true }),
                at(15, Action::AutoScaling { enabled: true }),
                at(25, Action::BlockAttacker),
            ],
            login_every: 5,
        }
    }

    /// Slow-connection attack with rate limiting arriving late.
    pub fn slow() -> Self {
        Self {
            name: "slow".to_string(),
            actions: vec![
                at(2, Action::StartAttack { attack_type: AttackType::SlowConnection, num_bots: 3 }),
                at(12, Action::RateLimiting { enabled: true }),
                at(30, Action::StopAttack),
            ],
            login_every: 4,
        }
    }

    /// No attacker; a user logs in now and then.
    pub fn idle() -> Self {
        Self {
            name: "idle".to_string(),
            actions: Vec::new(),
            login_every: 6,
        }
    }

    /// Actions scheduled for `tick`, including the periodic login.
    pub fn actions_for(&self, tick: u64) -> Vec<Action> {
        let mut due: Vec<Action> = self
            .actions
            .iter()
            .filter(|a| a.tick == tick)
            .map(|a| a.action)
            .collect();
        if self.login_every > 0 && tick % self.login_every == 0 {
            due.push(Action::Login);
        }
        due
    }

    /// Apply the actions due at `tick`. Returns whether a login was queued.
    pub fn apply<R: Rng>(&self, tick: u64, engine: &mut SimulationEngine<R>) -> bool {
        let mut login = false;
        for action in self.actions_for(tick) {
            match action {
                Action::StartAttack { attack_type, num_bots } => {
                    engine.set_attack_type(attack_type);
                    engine.set_num_bots(num_bots);
                    engine.set_attack_running(true);
                }
                Action::StopAttack => engine.set_attack_running(false),
                Action::RateLimiting { enabled } => engine.set_rate_limiting(enabled),
                Action::AutoScaling { enabled } => engine.set_auto_scaling(enabled),
                Action::BlockAttacker => engine.block_attacker(),
                Action::UnblockAttacker => engine.unblock_attacker(),
                Action::Login => {
                    engine.request_user_login();
                    login = true;
                }
            }
        }
        login
    }
}

fn at(tick: u64, action: Action) -> ScheduledAction {
    ScheduledAction { tick, action }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simulation::config::SimConfig;

    #[test]
    fn test_builtin_plans_resolve() {
        for name in ["flood", "slow", "idle"] {
            assert_eq!(Plan::resolve(name).unwrap().name, name);
        }
        assert!(matches!(Plan::resolve("smurf"), Err(CliError::UnknownPlan(_))));
    }

    #[test]
    fn test_periodic_login() {
        let plan = Plan::flood();
        assert!(plan.actions_for(5).contains(&Action::Login));
        assert!(!plan.actions_for(6).contains(&Action::Login));
    }

    #[test]
    fn test_apply_drives_engine() {
        let plan = Plan::flood();
        let mut engine = SimulationEngine::seeded(SimConfig::default(), 1).unwrap();
        for tick in 1..=25 {
            plan.apply(tick, &mut engine);
            engine.step();
        }
        let state = engine.state();
        assert!(state.rate_limiting_enabled);
        assert!(state.auto_scaling_enabled);
        assert!(state.attacker.blocked);
        assert!(!state.attacker.running);
        assert!(engine.metrics().login_attempts() >= 5);
    }

    #[test]
    fn test_json_plan_shape() {
        let json = r#"{
            "name": "custom",
            "actions": [
                {"tick": 1, "action": "start_attack", "attack_type": "volume_flood", "num_bots": 10},
                {"tick": 4, "action": "block_attacker"}
            ]
        }"#;
        let plan: Plan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.login_every, 0);
        assert_eq!(plan.actions[1].action, Action::BlockAttacker);
    }
}
