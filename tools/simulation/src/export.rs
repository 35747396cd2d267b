//! Session export
//!
//! Serializes config, metrics and the final snapshot to JSON for
//! external consumption.

use serde::{Deserialize, Serialize};
use types::errors::SimError;

use crate::config::SimConfig;
use crate::engine::SimulationSnapshot;
use crate::metrics::SimMetrics;

/// Combined export containing all simulation outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationExport {
    pub version: String,
    pub config: SimConfig,
    pub metrics: SimMetrics,
    pub snapshot: SimulationSnapshot,
}

/// Build a complete simulation export.
pub fn build_export(
    config: &SimConfig,
    metrics: &SimMetrics,
    snapshot: &SimulationSnapshot,
) -> SimulationExport {
    SimulationExport {
        version: crate::VERSION.to_string(),
        config: config.clone(),
        metrics: metrics.clone(),
        snapshot: snapshot.clone(),
    }
}

/// Export complete simulation data as JSON.
pub fn export_json(export: &SimulationExport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(export)
}

/// Write export to a file path. Nothing is written if serialization fails.
pub fn write_to_file(export: &SimulationExport, path: impl AsRef<std::path::Path>) -> Result<(), SimError> {
    let json = export_json(export)?;
    std::fs::write(path, json)?;
    Ok(())
}
