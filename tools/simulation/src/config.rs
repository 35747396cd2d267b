//! Engine configuration
//!
//! Every tunable the per-tick formulas use lives here, so both observed
//! server layouts (multi-defense and single-server) are reproducible by
//! configuration alone.

use serde::{Deserialize, Serialize};
use std::path::Path;
use types::constants::*;
use types::errors::ConfigError;

/// Simulation tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Starting capacity; also the auto-scaling step and capacity floor
    pub base_capacity: u32,
    /// Upper bound of the per-bot random draw for a volume flood
    pub attack_strength: u32,
    /// Fixed per-bot cost of a slow-connection attack
    pub slow_connection_cost: u32,
    /// Attacker requests admitted per tick with rate limiting on
    pub rate_limit_per_tick: u32,
    /// Admitted load is capped at floor(capacity * ceiling_factor)
    pub ceiling_factor: f64,
    /// Fraction of outstanding load drained per tick
    pub decay_fraction: f64,
    /// Ratio above which auto-scaling adds a capacity step
    pub scale_up_ratio: f64,
    /// Ratio below which auto-scaling removes a capacity step
    pub scale_down_ratio: f64,
    /// Ratio above which the server is Overloaded
    pub overload_ratio: f64,
    /// Ratio above which the server is under HighLoad
    pub high_load_ratio: f64,
    /// Log trail length
    pub log_capacity: usize,
    /// Load history length
    pub history_capacity: usize,
    /// Scheduler period
    pub tick_interval_ms: u64,
    /// Modeled processing window of a login
    pub login_processing_ms: u64,
    /// Legitimate background requests admitted every tick
    pub background_user_volume: u32,
    /// RNG seed; `None` seeds from OS entropy
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::multi_defense()
    }
}

impl SimConfig {
    /// Layout with all defenses available. Overload above 0.9.
    pub fn multi_defense() -> Self {
        Self {
            base_capacity: BASE_CAPACITY,
            attack_strength: ATTACK_STRENGTH,
            slow_connection_cost: SLOW_CONNECTION_COST,
            rate_limit_per_tick: RATE_LIMIT_PER_TICK,
            ceiling_factor: CEILING_FACTOR,
            decay_fraction: DECAY_FRACTION,
            scale_up_ratio: SCALE_UP_RATIO,
            scale_down_ratio: SCALE_DOWN_RATIO,
            overload_ratio: OVERLOAD_RATIO,
            high_load_ratio: HIGH_LOAD_RATIO,
            log_capacity: LOG_CAPACITY,
            history_capacity: HISTORY_CAPACITY,
            tick_interval_ms: TICK_INTERVAL_MS,
            login_processing_ms: LOGIN_PROCESSING_MS,
            background_user_volume: 0,
            seed: None,
        }
    }

    /// Single-server layout: overload above 0.8 and a stronger flood draw.
    pub fn single_server() -> Self {
        Self {
            overload_ratio: SINGLE_SERVER_OVERLOAD_RATIO,
            attack_strength: SINGLE_SERVER_ATTACK_STRENGTH,
            ..Self::multi_defense()
        }
    }

    /// Builder-style seed override.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check that every tunable lies in its documented domain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.attack_strength == 0 {
            return Err(ConfigError::ZeroLimit("attack_strength"));
        }
        if self.log_capacity == 0 {
            return Err(ConfigError::ZeroLimit("log_capacity"));
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::ZeroLimit("history_capacity"));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroLimit("tick_interval_ms"));
        }
        if !(self.ceiling_factor >= 1.0) {
            return Err(ConfigError::CeilingBelowCapacity(self.ceiling_factor));
        }
        for (field, value) in [
            ("decay_fraction", self.decay_fraction),
            ("scale_down_ratio", self.scale_down_ratio),
            ("high_load_ratio", self.high_load_ratio),
        ] {
            if !(value > 0.0 && value < 1.0) {
                return Err(ConfigError::FractionOutOfRange { field, value });
            }
        }
        for (field, value) in [
            ("scale_up_ratio", self.scale_up_ratio),
            ("overload_ratio", self.overload_ratio),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        if self.high_load_ratio >= self.overload_ratio {
            return Err(ConfigError::ThresholdOrder {
                high_load: self.high_load_ratio,
                overload: self.overload_ratio,
            });
        }
        if self.scale_down_ratio >= self.scale_up_ratio {
            return Err(ConfigError::ScalingOrder {
                down: self.scale_down_ratio,
                up: self.scale_up_ratio,
            });
        }
        Ok(())
    }

    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json_str(&json)
    }

    /// Load ceiling for a given capacity: floor(capacity * ceiling_factor).
    pub fn ceiling(&self, capacity: u32) -> u32 {
        (capacity as f64 * self.ceiling_factor).floor() as u32
    }
}
