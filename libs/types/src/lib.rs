//! Types library for the DoS load simulation
//!
//! Shared type definitions used by the simulation engine and by any
//! collaborator that renders its state.
//!
//! # Modules
//! - `ids`: Session identifiers
//! - `constants`: Default tunables and control bounds
//! - `status`: Server status, attack type, login outcome
//! - `log`: Log trail entries and categories
//! - `history`: Load/capacity trend points
//! - `errors`: Error taxonomy

// Public modules
pub mod ids;
pub mod constants;
pub mod status;
pub mod log;
pub mod history;
pub mod errors;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::constants::*;
    pub use crate::status::*;
    pub use crate::log::*;
    pub use crate::history::*;
    pub use crate::errors::*;
}
