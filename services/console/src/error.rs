use thiserror::Error;

/// Errors loading an operator plan
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Unknown plan: {0}")]
    UnknownPlan(String),

    #[error("Failed to load plan {path}: {reason}")]
    PlanFile { path: String, reason: String },
}
