//! Named simulation constants
//!
//! Defaults for the tunables carried by the engine configuration. The
//! engine never reads these directly inside its formulas; they seed
//! `SimConfig::default()` and bound the operator controls.

/// Capacity a fresh server starts with, and the auto-scaling step.
pub const BASE_CAPACITY: u32 = 20;

/// Upper bound of the per-bot random draw for a volume flood.
pub const ATTACK_STRENGTH: u32 = 3;

/// Fixed per-bot cost of a slow-connection attack.
pub const SLOW_CONNECTION_COST: u32 = 10;

/// Attacker requests admitted per tick while rate limiting is on.
pub const RATE_LIMIT_PER_TICK: u32 = 10;

/// Load may exceed capacity by this factor before packets are dropped.
pub const CEILING_FACTOR: f64 = 1.5;

/// Fraction of outstanding load drained per tick.
pub const DECAY_FRACTION: f64 = 0.1;

/// Load ratio above which auto-scaling adds capacity.
pub const SCALE_UP_RATIO: f64 = 0.9;

/// Load ratio below which auto-scaling removes capacity.
pub const SCALE_DOWN_RATIO: f64 = 0.3;

/// Load ratio above which the server counts as overloaded.
pub const OVERLOAD_RATIO: f64 = 0.9;

/// Overload threshold used by the single-server layout.
pub const SINGLE_SERVER_OVERLOAD_RATIO: f64 = 0.8;

/// Per-bot draw bound used by the single-server layout.
pub const SINGLE_SERVER_ATTACK_STRENGTH: u32 = 5;

/// Load ratio above which the server counts as under high load.
pub const HIGH_LOAD_RATIO: f64 = 0.5;

/// Maximum number of entries kept in the log trail.
pub const LOG_CAPACITY: usize = 20;

/// Maximum number of points kept in the load history.
pub const HISTORY_CAPACITY: usize = 50;

/// Smallest allowed bot count.
pub const MIN_BOTS: u32 = 1;

/// Largest allowed bot count.
pub const MAX_BOTS: u32 = 100;

/// Bot count of a freshly created session.
pub const DEFAULT_BOTS: u32 = 10;

/// Scheduler period between ticks, in milliseconds.
pub const TICK_INTERVAL_MS: u64 = 500;

/// Modeled processing window of a login request, in milliseconds.
pub const LOGIN_PROCESSING_MS: u64 = 250;
