//! Performance metrics for simulation
//!
//! Tracks attacker volume, defense effectiveness, login outcomes,
//! scaling decisions and time spent in each status.

use serde::{Deserialize, Serialize};
use types::status::{LoginOutcome, ServerStatus};

use crate::classifier::ScaleAction;
use crate::engine::TickReport;

/// Ticks spent in one status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusBucket {
    pub status: ServerStatus,
    pub ticks: u64,
}

/// Aggregated simulation metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimMetrics {
    pub ticks: u64,
    pub raw_attack_volume: u64,
    pub accepted_attack_volume: u64,
    pub rate_limited_volume: u64,
    pub dropped_volume: u64,
    pub drained_volume: u64,
    pub logins_successful: u64,
    pub logins_timed_out: u64,
    pub logins_busy: u64,
    pub scale_ups: u64,
    pub scale_downs: u64,
    pub peak_load: u32,
    pub peak_capacity: u32,
    pub status_buckets: Vec<StatusBucket>,
}

impl SimMetrics {
    /// Create empty metrics with one bucket per status.
    pub fn new() -> Self {
        Self {
            ticks: 0,
            raw_attack_volume: 0,
            accepted_attack_volume: 0,
            rate_limited_volume: 0,
            dropped_volume: 0,
            drained_volume: 0,
            logins_successful: 0,
            logins_timed_out: 0,
            logins_busy: 0,
            scale_ups: 0,
            scale_downs: 0,
            peak_load: 0,
            peak_capacity: 0,
            status_buckets: default_buckets(),
        }
    }

    /// Record a single tick into metrics.
    pub fn record_tick(&mut self, report: &TickReport) {
        self.ticks += 1;
        self.raw_attack_volume += report.raw_volume as u64;
        self.accepted_attack_volume += report.accepted_volume as u64;
        self.rate_limited_volume += report.rate_limited as u64;
        self.dropped_volume += report.dropped as u64;
        self.drained_volume += report.drained as u64;

        match report.login {
            Some(LoginOutcome::Successful) => self.logins_successful += 1,
            Some(LoginOutcome::TimedOut) => self.logins_timed_out += 1,
            Some(LoginOutcome::Busy) => self.logins_busy += 1,
            None => {}
        }

        match report.scale {
            ScaleAction::Up { .. } => self.scale_ups += 1,
            ScaleAction::Down { .. } => self.scale_downs += 1,
            ScaleAction::Hold => {}
        }

        self.peak_load = self.peak_load.max(report.load);
        self.peak_capacity = self.peak_capacity.max(report.capacity);

        if let Some(bucket) = self
            .status_buckets
            .iter_mut()
            .find(|b| b.status == report.status)
        {
            bucket.ticks += 1;
        }
    }

    /// Ticks spent in the given status.
    pub fn ticks_in(&self, status: ServerStatus) -> u64 {
        self.status_buckets
            .iter()
            .find(|b| b.status == status)
            .map(|b| b.ticks)
            .unwrap_or(0)
    }

    pub fn login_attempts(&self) -> u64 {
        self.logins_successful + self.logins_timed_out + self.logins_busy
    }

    /// Fraction of login attempts that succeeded.
    pub fn login_success_rate(&self) -> f64 {
        let attempts = self.login_attempts();
        if attempts == 0 {
            return 0.0;
        }
        self.logins_successful as f64 / attempts as f64
    }

    /// Fraction of raw attack volume stopped by the rate limiter.
    pub fn mitigation_rate(&self) -> f64 {
        if self.raw_attack_volume == 0 {
            return 0.0;
        }
        self.rate_limited_volume as f64 / self.raw_attack_volume as f64
    }

    /// Build a summary string.
    pub fn summary(&self) -> String {
        format!(
            "Ticks: {} | Attack: {} raw / {} accepted / {} rate-limited / {} dropped | Logins: {} ok, {} timed out, {} busy | Scaling: +{} -{} | Peak load: {}/{}",
            self.ticks,
            self.raw_attack_volume,
            self.accepted_attack_volume,
            self.rate_limited_volume,
            self.dropped_volume,
            self.logins_successful,
            self.logins_timed_out,
            self.logins_busy,
            self.scale_ups,
            self.scale_downs,
            self.peak_load,
            self.peak_capacity,
        )
    }
}

impl Default for SimMetrics {
    fn default() -> Self {
        Self::new()
    }
}

fn default_buckets() -> Vec<StatusBucket> {
    ServerStatus::ALL
        .iter()
        .map(|&status| StatusBucket { status, ticks: 0 })
        .collect()
}
