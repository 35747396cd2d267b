//! Server status and attack classification types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete server status, derived once per tick.
///
/// Never set directly by an operator; the classifier recomputes it from
/// load, capacity and the attack flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerStatus {
    /// No outstanding load
    #[default]
    Idle,
    /// Load present, ratio at or below the high-load threshold
    Stable,
    /// Ratio above the high-load threshold
    HighLoad,
    /// Ratio above the overload threshold
    Overloaded,
    /// An attack is currently running
    UnderAttack,
}

impl ServerStatus {
    /// Every status, in escalation order.
    pub const ALL: [ServerStatus; 5] = [
        ServerStatus::Idle,
        ServerStatus::Stable,
        ServerStatus::HighLoad,
        ServerStatus::Overloaded,
        ServerStatus::UnderAttack,
    ];

    /// Human-readable label used by text renderers.
    pub fn label(&self) -> &'static str {
        match self {
            ServerStatus::Idle => "Idle",
            ServerStatus::Stable => "Stable",
            ServerStatus::HighLoad => "High Load",
            ServerStatus::Overloaded => "Overloaded",
            ServerStatus::UnderAttack => "UNDER ATTACK",
        }
    }

    /// Whether the status signals degraded service.
    pub fn is_degraded(&self) -> bool {
        matches!(self, ServerStatus::Overloaded | ServerStatus::UnderAttack)
    }
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Attack flavour chosen by the attacker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackType {
    /// Bursty high-volume traffic, random per bot
    #[default]
    VolumeFlood,
    /// Resource-holding connections with a fixed cost per bot
    SlowConnection,
}

impl AttackType {
    pub fn label(&self) -> &'static str {
        match self {
            AttackType::VolumeFlood => "Volume Flood",
            AttackType::SlowConnection => "Slow Connection",
        }
    }
}

impl fmt::Display for AttackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Terminal outcome of one login attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginOutcome {
    /// Admitted and completed inside capacity
    Successful,
    /// Admitted, but load exceeded capacity during processing (Error 503)
    TimedOut,
    /// Rejected at admission, no free slot (Error 503)
    Busy,
}

impl LoginOutcome {
    /// Message shown to the user who attempted the login.
    pub fn user_message(&self) -> &'static str {
        match self {
            LoginOutcome::Successful => "Login Successful! Welcome.",
            LoginOutcome::TimedOut => "Login Failed! Server timed out (Error 503).",
            LoginOutcome::Busy => "Login Failed! Server is too busy (Error 503).",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, LoginOutcome::Successful)
    }
}
