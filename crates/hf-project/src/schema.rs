//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

/// Top-level simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationConfig {
    pub simulation_parameters: SimulationParameters,
    #[serde(default)]
    pub vessels: Vec<VesselConfig>,
    #[serde(default)]
    pub junctions: Vec<JunctionConfig>,
    #[serde(default)]
    pub boundary_conditions: Vec<BoundaryConditionConfig>,
}

/// Time stepping, solver, and output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationParameters {
    /// Fundamental period of all periodic waveforms. When absent it is
    /// inferred from the boundary-condition time sequences (default 1.0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardiac_cycle_period: Option<f64>,
    pub number_of_time_pts_per_cardiac_cycle: usize,
    pub number_of_cardiac_cycles: usize,
    #[serde(default = "default_absolute_tolerance")]
    pub absolute_tolerance: f64,
    #[serde(default = "default_maximum_nonlinear_iterations")]
    pub maximum_nonlinear_iterations: usize,
    /// Derive initial conditions from a steady pre-pass.
    #[serde(default = "default_true")]
    pub steady_initial: bool,
    /// Emit the long-format table keyed by solution variable instead of the
    /// per-vessel summary.
    #[serde(default)]
    pub output_variable_based: bool,
    #[serde(default = "default_true")]
    pub output_all_cycles: bool,
    /// Include ydot columns in variable-based output.
    #[serde(default)]
    pub output_derivative: bool,
    /// Collapse each output series to its mean over the kept window.
    #[serde(default)]
    pub output_mean_only: bool,
    /// Treat Newton non-convergence as a fatal error.
    #[serde(default)]
    pub fail_on_nonconvergence: bool,
}

fn default_absolute_tolerance() -> f64 {
    1e-8
}

fn default_maximum_nonlinear_iterations() -> usize {
    30
}

fn default_true() -> bool {
    true
}

impl SimulationParameters {
    /// Constant step size of the simulation.
    pub fn time_step_size(&self, cardiac_cycle_period: f64) -> f64 {
        cardiac_cycle_period / (self.number_of_time_pts_per_cardiac_cycle - 1) as f64
    }

    /// Total number of simulated time points.
    pub fn num_time_steps(&self) -> usize {
        (self.number_of_time_pts_per_cardiac_cycle - 1) * self.number_of_cardiac_cycles + 1
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VesselConfig {
    pub vessel_id: usize,
    pub vessel_name: String,
    pub zero_d_element_type: String,
    pub zero_d_element_values: VesselValues,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundary_conditions: Option<VesselBoundaryConditions>,
}

/// Lumped constants of a vessel segment. C and L default to zero, so pure
/// resistors and RC/RL variants share the same element.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VesselValues {
    #[serde(rename = "R_poiseuille")]
    pub r_poiseuille: f64,
    #[serde(default, rename = "C")]
    pub c: f64,
    #[serde(default, rename = "L")]
    pub l: f64,
    #[serde(default)]
    pub stenosis_coefficient: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VesselBoundaryConditions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inlet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outlet: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JunctionConfig {
    pub junction_name: String,
    pub junction_type: String,
    #[serde(default)]
    pub inlet_vessels: Vec<usize>,
    #[serde(default)]
    pub outlet_vessels: Vec<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoundaryConditionConfig {
    pub bc_name: String,
    pub bc_type: BcType,
    pub bc_values: BcValues,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BcType {
    Flow,
    Pressure,
    Resistance,
    Rcr,
    Coronary,
}

/// Union of the value fields of all boundary-condition types. Validation
/// checks the fields required by each `bc_type`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct BcValues {
    /// Sample times of the waveform values, spanning one cardiac cycle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<Vec<f64>>,
    #[serde(default, rename = "Q", skip_serializing_if = "Option::is_none")]
    pub q: Option<ScalarOrSeries>,
    #[serde(default, rename = "P", skip_serializing_if = "Option::is_none")]
    pub p: Option<ScalarOrSeries>,
    #[serde(default, rename = "R", skip_serializing_if = "Option::is_none")]
    pub r: Option<ScalarOrSeries>,
    #[serde(default, rename = "Pd", skip_serializing_if = "Option::is_none")]
    pub pd: Option<ScalarOrSeries>,
    #[serde(default, rename = "Rp", skip_serializing_if = "Option::is_none")]
    pub rp: Option<ScalarOrSeries>,
    #[serde(default, rename = "C", skip_serializing_if = "Option::is_none")]
    pub c: Option<ScalarOrSeries>,
    #[serde(default, rename = "Rd", skip_serializing_if = "Option::is_none")]
    pub rd: Option<ScalarOrSeries>,
    #[serde(default, rename = "Ra1", skip_serializing_if = "Option::is_none")]
    pub ra1: Option<f64>,
    #[serde(default, rename = "Ra2", skip_serializing_if = "Option::is_none")]
    pub ra2: Option<f64>,
    #[serde(default, rename = "Ca", skip_serializing_if = "Option::is_none")]
    pub ca: Option<f64>,
    #[serde(default, rename = "Cc", skip_serializing_if = "Option::is_none")]
    pub cc: Option<f64>,
    #[serde(default, rename = "Rv1", skip_serializing_if = "Option::is_none")]
    pub rv1: Option<f64>,
    #[serde(default, rename = "Pim", skip_serializing_if = "Option::is_none")]
    pub pim: Option<ScalarOrSeries>,
    #[serde(default, rename = "P_v", skip_serializing_if = "Option::is_none")]
    pub p_v: Option<ScalarOrSeries>,
}

/// A boundary value given either as a constant or as waveform samples.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ScalarOrSeries {
    Scalar(f64),
    Series(Vec<f64>),
}

impl ScalarOrSeries {
    pub fn is_series(&self) -> bool {
        matches!(self, Self::Series(_))
    }

    /// Arithmetic mean of the samples (the value itself for a scalar).
    pub fn mean(&self) -> f64 {
        match self {
            Self::Scalar(v) => *v,
            Self::Series(values) => {
                if values.is_empty() {
                    0.0
                } else {
                    values.iter().sum::<f64>() / values.len() as f64
                }
            }
        }
    }

    /// Samples as a slice, a scalar being a single sample.
    pub fn values(&self) -> &[f64] {
        match self {
            Self::Scalar(v) => std::slice::from_ref(v),
            Self::Series(values) => values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "simulation_parameters": {
            "number_of_cardiac_cycles": 10,
            "number_of_time_pts_per_cardiac_cycle": 101
        },
        "boundary_conditions": [
            {
                "bc_name": "INFLOW",
                "bc_type": "FLOW",
                "bc_values": {"Q": [5.0, 5.0], "t": [0.0, 1.0]}
            },
            {
                "bc_name": "OUT",
                "bc_type": "RESISTANCE",
                "bc_values": {"Pd": 100.0, "R": 100.0}
            }
        ],
        "junctions": [],
        "vessels": [
            {
                "boundary_conditions": {"inlet": "INFLOW", "outlet": "OUT"},
                "vessel_id": 0,
                "vessel_name": "branch0_seg0",
                "zero_d_element_type": "BloodVessel",
                "zero_d_element_values": {"R_poiseuille": 100.0}
            }
        ]
    }"#;

    #[test]
    fn parses_with_defaults() {
        let config: SimulationConfig = serde_json::from_str(MINIMAL).unwrap();
        let params = &config.simulation_parameters;
        assert_eq!(params.cardiac_cycle_period, None);
        assert_eq!(params.absolute_tolerance, 1e-8);
        assert_eq!(params.maximum_nonlinear_iterations, 30);
        assert!(params.steady_initial);
        assert!(!params.output_variable_based);
        assert!(params.output_all_cycles);
        assert!(!params.output_derivative);
        assert!(!params.output_mean_only);

        let vessel = &config.vessels[0];
        assert_eq!(vessel.zero_d_element_values.r_poiseuille, 100.0);
        assert_eq!(vessel.zero_d_element_values.c, 0.0);
        assert_eq!(vessel.zero_d_element_values.l, 0.0);
        assert_eq!(vessel.zero_d_element_values.stenosis_coefficient, 0.0);
    }

    #[test]
    fn scalar_or_series_shapes() {
        let config: SimulationConfig = serde_json::from_str(MINIMAL).unwrap();
        let inflow = &config.boundary_conditions[0];
        assert_eq!(inflow.bc_type, BcType::Flow);
        assert!(inflow.bc_values.q.as_ref().unwrap().is_series());

        let outlet = &config.boundary_conditions[1];
        assert_eq!(outlet.bc_type, BcType::Resistance);
        assert!(!outlet.bc_values.r.as_ref().unwrap().is_series());
        assert_eq!(outlet.bc_values.r.as_ref().unwrap().mean(), 100.0);
    }

    #[test]
    fn solver_stepping_parameters() {
        let config: SimulationConfig = serde_json::from_str(MINIMAL).unwrap();
        let params = &config.simulation_parameters;
        assert!((params.time_step_size(1.0) - 0.01).abs() < 1e-15);
        assert_eq!(params.num_time_steps(), 1001);
    }

    #[test]
    fn round_trips_through_json() {
        let config: SimulationConfig = serde_json::from_str(MINIMAL).unwrap();
        let text = serde_json::to_string(&config).unwrap();
        let reparsed: SimulationConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(config, reparsed);
    }
}
