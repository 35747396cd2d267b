//! Simulation engine
//!
//! Owns the single `SimulationState` of a session and advances it one
//! tick at a time. A tick is one synchronous pass, in fixed order:
//!
//! 1. login admission (only when a login was requested); the slot is
//!    held beside the server load, not inside it
//! 2. attack generator
//! 3. defense filter
//! 4. load accumulator
//! 5. login completion (timeout check, slot release)
//! 6. status classifier, on pre-scaling capacity
//! 7. auto-scaler
//!
//! The attacker path runs inside the login's processing window, which
//! is how attacker load can time out a request that was admitted.
//! The engine holds no timer: a collaborator calls `tick()` at its own
//! cadence and renders the returned snapshot.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use types::errors::ConfigError;
use types::history::HistoryPoint;
use types::ids::SessionId;
use types::log::{LogCategory, LogEntry};
use types::status::{AttackType, LoginOutcome, ServerStatus};

use crate::admission::InFlightLogin;
use crate::attack::{clamp_bots, Attacker};
use crate::classifier::{self, ScaleAction};
use crate::config::SimConfig;
use crate::defense;
use crate::load;
use crate::metrics::SimMetrics;
use crate::ring::RingBuffer;
use crate::trail::LogTrail;

/// Attacker slider values supplied by the collaborator each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackerInputs {
    pub running: bool,
    pub attack_type: AttackType,
    /// Clamped into the valid bot range on application
    pub num_bots: i64,
}

impl Default for AttackerInputs {
    fn default() -> Self {
        let attacker = Attacker::default();
        Self {
            running: attacker.running,
            attack_type: attacker.attack_type,
            num_bots: attacker.num_bots as i64,
        }
    }
}

/// Mutable state of one simulation session.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    pub load: u32,
    pub capacity: u32,
    pub attacker: Attacker,
    pub rate_limiting_enabled: bool,
    pub auto_scaling_enabled: bool,
    pub status: ServerStatus,
    pub log_trail: LogTrail,
    pub load_history: RingBuffer<HistoryPoint>,
    pub tick: u64,
    pub last_login: Option<LoginOutcome>,
    pending_login: bool,
}

impl SimulationState {
    fn new(config: &SimConfig, epoch: DateTime<Utc>) -> Self {
        Self {
            load: 0,
            capacity: config.base_capacity,
            attacker: Attacker::default(),
            rate_limiting_enabled: false,
            auto_scaling_enabled: false,
            status: ServerStatus::Idle,
            log_trail: LogTrail::new(config.log_capacity, epoch),
            load_history: RingBuffer::new(config.history_capacity),
            tick: 0,
            last_login: None,
            pending_login: false,
        }
    }

    /// Whether a login has been requested and not yet processed.
    pub fn login_pending(&self) -> bool {
        self.pending_login
    }

    pub fn load_ratio(&self) -> f64 {
        classifier::load_ratio(self.load, self.capacity)
    }
}

/// Read-only projection of the state handed to renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSnapshot {
    pub session_id: SessionId,
    pub tick: u64,
    pub load: u32,
    pub capacity: u32,
    pub load_ratio: f64,
    pub status: ServerStatus,
    pub attack_running: bool,
    pub attacker_blocked: bool,
    pub attack_type: AttackType,
    pub num_bots: u32,
    pub rate_limiting_enabled: bool,
    pub auto_scaling_enabled: bool,
    /// Newest first
    pub logs: Vec<LogEntry>,
    /// Oldest first
    pub history: Vec<HistoryPoint>,
    pub last_login: Option<LoginOutcome>,
    pub user_message: Option<String>,
}

/// What happened during one tick, for metrics and scenario checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: u64,
    pub raw_volume: u32,
    pub accepted_volume: u32,
    pub rate_limited: u32,
    pub dropped: u32,
    pub drained: u32,
    pub login: Option<LoginOutcome>,
    pub scale: ScaleAction,
    pub status: ServerStatus,
    pub load: u32,
    pub capacity: u32,
}

/// Deterministic-given-its-inputs server load simulation.
///
/// Generic over the RNG so tests can inject a fixed sequence.
pub struct SimulationEngine<R: Rng = ChaCha8Rng> {
    session_id: SessionId,
    config: SimConfig,
    state: SimulationState,
    metrics: SimMetrics,
    last_report: Option<TickReport>,
    epoch: DateTime<Utc>,
    rng: R,
}

impl SimulationEngine<ChaCha8Rng> {
    /// Create an engine seeded from `config.seed`, or from entropy.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    /// Create an engine with a fixed seed, overriding `config.seed`.
    pub fn seeded(config: SimConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::new(config.with_seed(seed))
    }
}

impl<R: Rng> SimulationEngine<R> {
    /// Create an engine drawing attack volumes from `rng`.
    pub fn with_rng(config: SimConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let epoch = Utc::now();
        let session_id = SessionId::new();
        info!(
            %session_id,
            base_capacity = config.base_capacity,
            overload_ratio = config.overload_ratio,
            "simulation session created"
        );
        Ok(Self {
            session_id,
            state: SimulationState::new(&config, epoch),
            config,
            metrics: SimMetrics::new(),
            last_report: None,
            epoch,
            rng,
        })
    }

    /// Fix the wall-clock origin used to stamp log entries.
    pub fn with_epoch(mut self, epoch: DateTime<Utc>) -> Self {
        self.epoch = epoch;
        let now = self.timestamp_for(self.state.tick);
        self.state.log_trail.advance(self.state.tick, now);
        self
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn metrics(&self) -> &SimMetrics {
        &self.metrics
    }

    pub fn last_report(&self) -> Option<&TickReport> {
        self.last_report.as_ref()
    }

    fn timestamp_for(&self, tick: u64) -> DateTime<Utc> {
        let offset = tick.saturating_mul(self.config.tick_interval_ms);
        self.epoch + Duration::milliseconds(offset.min(i64::MAX as u64) as i64)
    }

    // ── Operator / actor controls ───────────────────────────────────

    pub fn set_attack_running(&mut self, running: bool) {
        if self.state.attacker.running == running {
            return;
        }
        self.state.attacker.running = running;
        info!(running, "attack toggled");
        if running {
            self.state.log_trail.record(LogCategory::Attack, "Attack bot activated.");
        } else {
            self.state.log_trail.record(LogCategory::Info, "Attacker is idle.");
        }
    }

    pub fn set_attack_type(&mut self, attack_type: AttackType) {
        if self.state.attacker.attack_type != attack_type {
            info!(attack_type = attack_type.label(), "attack type changed");
            self.state.attacker.attack_type = attack_type;
        }
    }

    /// Set the bot count, clamped into `[1, 100]`.
    pub fn set_num_bots(&mut self, num_bots: i64) {
        let clamped = clamp_bots(num_bots);
        if clamped as i64 != num_bots {
            debug!(requested = num_bots, clamped, "bot count clamped");
        }
        self.state.attacker.num_bots = clamped;
    }

    pub fn set_rate_limiting(&mut self, enabled: bool) {
        if self.state.rate_limiting_enabled == enabled {
            return;
        }
        self.state.rate_limiting_enabled = enabled;
        info!(enabled, limit = self.config.rate_limit_per_tick, "rate limiting toggled");
        let message = if enabled {
            format!("Rate limiting enabled ({} requests/tick).", self.config.rate_limit_per_tick)
        } else {
            "Rate limiting disabled.".to_string()
        };
        self.state.log_trail.record(LogCategory::Defense, message);
    }

    pub fn set_auto_scaling(&mut self, enabled: bool) {
        if self.state.auto_scaling_enabled == enabled {
            return;
        }
        self.state.auto_scaling_enabled = enabled;
        info!(enabled, "auto-scaling toggled");
        let message = if enabled { "Auto-scaling enabled." } else { "Auto-scaling disabled." };
        self.state.log_trail.record(LogCategory::Server, message);
    }

    pub fn block_attacker(&mut self) {
        if self.state.attacker.blocked {
            return;
        }
        self.state.attacker.blocked = true;
        info!("attacker blocked");
        self.state
            .log_trail
            .record(LogCategory::Defense, "Attacker IP blocked by firewall.");
    }

    pub fn unblock_attacker(&mut self) {
        if !self.state.attacker.blocked {
            return;
        }
        self.state.attacker.blocked = false;
        info!("attacker unblocked");
        self.state
            .log_trail
            .record(LogCategory::Defense, "Attacker IP unblocked.");
    }

    /// Queue a login attempt for the next tick.
    pub fn request_user_login(&mut self) {
        self.state.pending_login = true;
    }

    /// Apply the attacker slider values through the clamping setters.
    pub fn apply_inputs(&mut self, inputs: &AttackerInputs) {
        self.set_attack_type(inputs.attack_type);
        self.set_num_bots(inputs.num_bots);
        self.set_attack_running(inputs.running);
    }

    // ── Ticking ─────────────────────────────────────────────────────

    /// Apply attacker inputs, then run one pass.
    pub fn tick(&mut self, inputs: &AttackerInputs, user_login: bool) -> SimulationSnapshot {
        self.apply_inputs(inputs);
        self.step_with_login(user_login);
        self.snapshot()
    }

    /// Run one pass with the current controls, consuming any queued login.
    pub fn step(&mut self) -> SimulationSnapshot {
        self.step_with_login(false);
        self.snapshot()
    }

    fn step_with_login(&mut self, user_login: bool) -> TickReport {
        let report = self.run_pass(user_login);
        self.metrics.record_tick(&report);
        self.last_report = Some(report);
        report
    }

    fn run_pass(&mut self, user_login: bool) -> TickReport {
        let config = &self.config;
        let state = &mut self.state;

        state.tick += 1;
        let tick = state.tick;
        let offset = tick.saturating_mul(config.tick_interval_ms);
        let now = self.epoch + Duration::milliseconds(offset.min(i64::MAX as u64) as i64);
        state.log_trail.advance(tick, now);

        let wants_login = user_login || std::mem::take(&mut state.pending_login);
        let capacity = state.capacity;

        let mut login_outcome = None;
        let in_flight = if wants_login {
            match InFlightLogin::begin(state.load, capacity, &mut state.log_trail) {
                Ok(login) => Some(login),
                Err(outcome) => {
                    login_outcome = Some(outcome);
                    None
                }
            }
        } else {
            None
        };

        let raw_volume = state
            .attacker
            .generate(config, &mut self.rng, &mut state.log_trail);
        let filtered = defense::filter(
            raw_volume,
            state.rate_limiting_enabled,
            config.rate_limit_per_tick,
            &mut state.log_trail,
        );
        let accumulated = load::accumulate(
            state.load,
            capacity,
            filtered.accepted,
            config.background_user_volume,
            state.attacker.running,
            config,
            &mut state.log_trail,
        );
        let load = accumulated.load;

        if let Some(login) = in_flight {
            login_outcome = Some(login.finish(load, capacity, &mut state.log_trail));
        }

        let status = classifier::classify(load, capacity, state.attacker.running, config);
        let scale = if state.auto_scaling_enabled {
            classifier::scale(load, capacity, config, &mut state.log_trail)
        } else {
            ScaleAction::Hold
        };

        state.load = load;
        state.status = status;
        state.capacity = scale.apply(capacity);
        if login_outcome.is_some() {
            state.last_login = login_outcome;
        }
        state
            .load_history
            .push(HistoryPoint::new(tick, state.load, state.capacity));

        debug!(
            tick,
            raw_volume,
            accepted = filtered.accepted,
            load = state.load,
            capacity = state.capacity,
            status = status.label(),
            "tick complete"
        );

        TickReport {
            tick,
            raw_volume,
            accepted_volume: filtered.accepted,
            rate_limited: filtered.blocked,
            dropped: accumulated.dropped,
            drained: accumulated.drained,
            login: login_outcome,
            scale,
            status,
            load: state.load,
            capacity: state.capacity,
        }
    }

    /// Build the read-only projection of the current state.
    pub fn snapshot(&self) -> SimulationSnapshot {
        let state = &self.state;
        SimulationSnapshot {
            session_id: self.session_id,
            tick: state.tick,
            load: state.load,
            capacity: state.capacity,
            load_ratio: state.load_ratio(),
            status: state.status,
            attack_running: state.attacker.running,
            attacker_blocked: state.attacker.blocked,
            attack_type: state.attacker.attack_type,
            num_bots: state.attacker.num_bots,
            rate_limiting_enabled: state.rate_limiting_enabled,
            auto_scaling_enabled: state.auto_scaling_enabled,
            logs: state.log_trail.to_vec_newest_first(),
            history: state.load_history.to_vec(),
            last_login: state.last_login,
            user_message: state.last_login.map(|o| o.user_message().to_string()),
        }
    }

    /// Restore the initial state. Config, RNG and session id are kept.
    pub fn reset(&mut self) {
        info!(session_id = %self.session_id, "simulation reset");
        self.state = SimulationState::new(&self.config, self.epoch);
        self.metrics = SimMetrics::new();
        self.last_report = None;
    }

    /// Direct access for scenario setup in tests.
    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn engine() -> SimulationEngine {
        SimulationEngine::seeded(SimConfig::default(), 42)
            .unwrap()
            .with_epoch(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    }

    fn flood(num_bots: i64) -> AttackerInputs {
        AttackerInputs {
            running: true,
            attack_type: AttackType::VolumeFlood,
            num_bots,
        }
    }

    #[test]
    fn test_initial_state() {
        let engine = engine();
        let state = engine.state();
        assert_eq!(state.load, 0);
        assert_eq!(state.capacity, 20);
        assert_eq!(state.status, ServerStatus::Idle);
        assert_eq!(state.tick, 0);
        assert!(state.log_trail.is_empty());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = SimConfig { base_capacity: 0, ..Default::default() };
        assert!(SimulationEngine::new(config).is_err());
    }

    #[test]
    fn test_idle_tick() {
        let mut engine = engine();
        let snap = engine.tick(&AttackerInputs::default(), false);
        assert_eq!(snap.tick, 1);
        assert_eq!(snap.load, 0);
        assert_eq!(snap.status, ServerStatus::Idle);
        assert_eq!(snap.history.len(), 1);
    }

    #[test]
    fn test_single_bot_flood_from_idle() {
        let mut engine = engine();
        let snap = engine.tick(&flood(1), false);
        assert!((1..=3).contains(&snap.load), "load {}", snap.load);
        assert_eq!(snap.status, ServerStatus::UnderAttack);

        // Stop the attack: load-derived classification takes over.
        let snap = engine.tick(&AttackerInputs { running: false, ..flood(1) }, false);
        assert!(snap.load <= 2);
        if snap.load > 0 {
            assert_eq!(snap.status, ServerStatus::Stable);
        } else {
            assert_eq!(snap.status, ServerStatus::Idle);
        }
    }

    #[test]
    fn test_classification_uses_pre_scaling_capacity() {
        let mut engine = engine();
        engine.set_auto_scaling(true);
        {
            let state = engine.state_mut();
            state.load = 21;
        }
        // 21 decays to 19; 19/20 = 0.95 -> Overloaded, then scale to 40.
        let snap = engine.step();
        assert_eq!(snap.load, 19);
        assert_eq!(snap.status, ServerStatus::Overloaded);
        assert_eq!(snap.capacity, 40);
        assert_eq!(engine.last_report().unwrap().scale, ScaleAction::Up { from: 20, to: 40 });
    }

    #[test]
    fn test_blocked_attacker_is_forced_idle() {
        let mut engine = engine();
        engine.set_attack_running(true);
        engine.block_attacker();
        let snap = engine.step();

        assert!(!snap.attack_running);
        assert!(snap.attacker_blocked);
        assert_eq!(engine.last_report().unwrap().raw_volume, 0);
        assert!(engine.state().log_trail.entries_for_tick(1).is_empty());
        assert!(snap
            .logs
            .iter()
            .any(|e| e.message() == "Attacker IP blocked by firewall."));
    }

    #[test]
    fn test_rate_limited_slow_connection() {
        let mut engine = engine();
        engine.set_rate_limiting(true);
        let inputs = AttackerInputs {
            running: true,
            attack_type: AttackType::SlowConnection,
            num_bots: 5,
        };
        engine.tick(&inputs, false);
        let report = *engine.last_report().unwrap();
        assert_eq!(report.raw_volume, 50);
        assert_eq!(report.accepted_volume, 10);
        assert_eq!(report.rate_limited, 40);
        assert_eq!(report.load, 10);
        let defense_logs: Vec<_> = engine
            .state()
            .log_trail
            .entries_for_tick(1)
            .into_iter()
            .filter(|e| e.category() == LogCategory::Defense)
            .collect();
        assert_eq!(defense_logs.len(), 1);
        assert!(defense_logs[0].message().contains("40"));
    }

    #[test]
    fn test_login_on_full_server_is_busy() {
        let mut engine = engine();
        engine.state_mut().load = 20;
        let snap = engine.tick(&AttackerInputs::default(), true);
        assert_eq!(snap.last_login, Some(LoginOutcome::Busy));
        // Busy leaves load untouched before decay: 20 -> 18.
        assert_eq!(snap.load, 18);
        assert!(snap.user_message.unwrap().contains("busy"));
    }

    #[test]
    fn test_login_on_quiet_server_succeeds() {
        let mut engine = engine();
        engine.request_user_login();
        assert!(engine.state().login_pending());
        let snap = engine.step();
        assert!(!engine.state().login_pending());
        assert_eq!(snap.last_login, Some(LoginOutcome::Successful));
        assert_eq!(snap.load, 0);
        assert!(snap
            .logs
            .iter()
            .all(|e| e.message() != "Server load cleared. Back to Idle."));
    }

    #[test]
    fn test_successful_login_leaves_tick_load_unchanged() {
        // 19 drains 1 on its own; 20 would drain 2.
        let config = SimConfig { base_capacity: 40, ..Default::default() };
        let mut with_login = SimulationEngine::seeded(config.clone(), 8).unwrap();
        let mut without = SimulationEngine::seeded(config, 8).unwrap();
        with_login.state_mut().load = 19;
        without.state_mut().load = 19;

        let a = with_login.tick(&AttackerInputs::default(), true);
        let b = without.tick(&AttackerInputs::default(), false);
        assert_eq!(a.last_login, Some(LoginOutcome::Successful));
        assert_eq!(a.load, 18);
        assert_eq!(a.load, b.load);
        assert_eq!(a.status, b.status);
    }

    #[test]
    fn test_login_times_out_when_attack_lands_in_window() {
        let mut engine = engine();
        engine.state_mut().load = 15;
        let inputs = AttackerInputs {
            running: true,
            attack_type: AttackType::SlowConnection,
            num_bots: 2,
        };
        // 15 decays to 14, +20 -> 30 (ceiling); 30 plus the slot > 20.
        let snap = engine.tick(&inputs, true);
        assert_eq!(snap.last_login, Some(LoginOutcome::TimedOut));
        assert_eq!(snap.load, 30);
    }

    #[test]
    fn test_bot_count_is_clamped() {
        let mut engine = engine();
        engine.set_num_bots(-3);
        assert_eq!(engine.state().attacker.num_bots, 1);
        engine.set_num_bots(5_000);
        assert_eq!(engine.state().attacker.num_bots, 100);
    }

    #[test]
    fn test_setters_are_quiet_when_unchanged() {
        let mut engine = engine();
        engine.set_rate_limiting(false);
        engine.set_auto_scaling(false);
        engine.unblock_attacker();
        engine.set_attack_running(false);
        assert!(engine.state().log_trail.is_empty());
    }

    #[test]
    fn test_log_timestamps_follow_ticks() {
        let epoch = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut engine = engine();
        for _ in 0..3 {
            engine.tick(&flood(1), false);
        }
        let latest = engine.state().log_trail.latest().unwrap();
        assert_eq!(latest.tick(), 3);
        assert_eq!(latest.timestamp(), epoch + Duration::milliseconds(1500));
    }

    #[test]
    fn test_history_is_bounded() {
        let mut engine = engine();
        for _ in 0..120 {
            engine.step();
        }
        let snap = engine.snapshot();
        assert_eq!(snap.history.len(), 50);
        assert_eq!(snap.history.first().unwrap().tick, 71);
        assert_eq!(snap.history.last().unwrap().tick, 120);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut engine = engine();
        engine.set_rate_limiting(true);
        engine.tick(&flood(50), false);
        engine.reset();
        assert_eq!(engine.state().load, 0);
        assert_eq!(engine.state().tick, 0);
        assert!(!engine.state().rate_limiting_enabled);
        assert_eq!(engine.metrics().ticks, 0);
    }
}
