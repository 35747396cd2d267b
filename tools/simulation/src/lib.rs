//! Server Load Simulation Engine
//!
//! Educational simulation of denial-of-service dynamics against a single
//! abstract server. An attacker and a legitimate user contend for a
//! shared capacity pool while optional defenses (rate limiting, IP
//! blocking, auto-scaling) push back. Deterministic given its inputs
//! and RNG seed.
//!
//! # Modules
//! - `config`: Tunables and the two server layouts
//! - `ring`: Fixed-capacity ring buffer
//! - `trail`: Bounded, auditable log trail
//! - `attack`: Attack generator
//! - `defense`: Rate-limiting filter
//! - `load`: Load decay, admission and ceiling
//! - `classifier`: Status classification and auto-scaling
//! - `admission`: Legitimate user login admission
//! - `engine`: Per-tick state machine and snapshots
//! - `metrics`: Aggregated counters
//! - `scenarios`: Scripted attack/defense runs
//! - `replay`: Input scripts and deterministic replay validation
//! - `export`: JSON export

pub mod config;
pub mod ring;
pub mod trail;
pub mod attack;
pub mod defense;
pub mod load;
pub mod classifier;
pub mod admission;
pub mod engine;
pub mod metrics;
pub mod scenarios;
pub mod replay;
pub mod export;

/// Crate version constant
pub const VERSION: &str = "1.0.0";
