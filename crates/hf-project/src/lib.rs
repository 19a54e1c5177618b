//! hf-project: simulation configuration handling.
//!
//! Defines the JSON configuration schema, structural validation, cardiac
//! cycle period resolution, and the steady-state collapse transform used to
//! derive initial conditions.

pub mod error;
pub mod schema;
pub mod steady;
pub mod validate;

pub use error::{ProjectError, ProjectResult};
pub use schema::{
    BcType, BcValues, BoundaryConditionConfig, JunctionConfig, ScalarOrSeries, SimulationConfig,
    SimulationParameters, VesselBoundaryConditions, VesselConfig, VesselValues,
};
pub use steady::collapse_to_steady;
pub use validate::{resolve_cardiac_cycle_period, validate};

use std::path::Path;

/// Load and validate a configuration from a JSON file.
pub fn load_config(path: &Path) -> ProjectResult<SimulationConfig> {
    let text = std::fs::read_to_string(path)?;
    let config: SimulationConfig = serde_json::from_str(&text)?;
    validate(&config)?;
    Ok(config)
}
