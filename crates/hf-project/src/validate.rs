//! Structural validation of a parsed configuration.

use std::collections::HashSet;

use crate::error::{ProjectError, ProjectResult};
use crate::schema::{BcType, BcValues, ScalarOrSeries, SimulationConfig};

/// Check the configuration before any model is built.
///
/// Catches the §configuration error class: duplicate names, dangling
/// boundary-condition references, missing per-type values, and malformed
/// waveforms. Element- and junction-type checks stay with the model
/// compiler, which owns the type registry.
pub fn validate(config: &SimulationConfig) -> ProjectResult<()> {
    let params = &config.simulation_parameters;
    if params.number_of_time_pts_per_cardiac_cycle < 2 {
        return Err(ProjectError::InvalidValue {
            entity: "simulation_parameters".into(),
            what: "number_of_time_pts_per_cardiac_cycle must be at least 2".into(),
        });
    }
    if params.number_of_cardiac_cycles == 0 {
        return Err(ProjectError::InvalidValue {
            entity: "simulation_parameters".into(),
            what: "number_of_cardiac_cycles must be positive".into(),
        });
    }

    let mut vessel_ids = HashSet::new();
    for vessel in &config.vessels {
        if !vessel_ids.insert(vessel.vessel_id) {
            return Err(ProjectError::Duplicate {
                kind: "vessel",
                name: format!("V{}", vessel.vessel_id),
            });
        }
    }

    let mut junction_names = HashSet::new();
    for junction in &config.junctions {
        if !junction_names.insert(junction.junction_name.as_str()) {
            return Err(ProjectError::Duplicate {
                kind: "junction",
                name: junction.junction_name.clone(),
            });
        }
        for vid in junction
            .inlet_vessels
            .iter()
            .chain(&junction.outlet_vessels)
        {
            if !vessel_ids.contains(vid) {
                return Err(ProjectError::UnknownReference {
                    entity: junction.junction_name.clone(),
                    kind: "vessel",
                    name: format!("V{vid}"),
                });
            }
        }
    }

    let mut bc_names = HashSet::new();
    for bc in &config.boundary_conditions {
        if !bc_names.insert(bc.bc_name.as_str()) {
            return Err(ProjectError::Duplicate {
                kind: "boundary condition",
                name: bc.bc_name.clone(),
            });
        }
        validate_bc_values(&bc.bc_name, bc.bc_type, &bc.bc_values)?;
    }

    for vessel in &config.vessels {
        let Some(bcs) = &vessel.boundary_conditions else {
            continue;
        };
        for name in [&bcs.inlet, &bcs.outlet].into_iter().flatten() {
            if !bc_names.contains(name.as_str()) {
                return Err(ProjectError::UnknownReference {
                    entity: vessel.vessel_name.clone(),
                    kind: "boundary condition",
                    name: name.clone(),
                });
            }
        }
    }

    Ok(())
}

fn validate_bc_values(name: &str, bc_type: BcType, values: &BcValues) -> ProjectResult<()> {
    let require = |present: bool, parameter: &'static str| -> ProjectResult<()> {
        if present {
            Ok(())
        } else {
            Err(ProjectError::MissingParameter {
                entity: name.to_string(),
                parameter,
            })
        }
    };

    match bc_type {
        BcType::Flow => require(values.q.is_some(), "Q")?,
        BcType::Pressure => require(values.p.is_some(), "P")?,
        BcType::Resistance => {
            require(values.r.is_some(), "R")?;
            require(values.pd.is_some(), "Pd")?;
        }
        BcType::Rcr => {
            require(values.rp.is_some(), "Rp")?;
            require(values.c.is_some(), "C")?;
            require(values.rd.is_some(), "Rd")?;
            require(values.pd.is_some(), "Pd")?;
        }
        BcType::Coronary => {
            require(values.ra1.is_some(), "Ra1")?;
            require(values.ra2.is_some(), "Ra2")?;
            require(values.ca.is_some(), "Ca")?;
            require(values.cc.is_some(), "Cc")?;
            require(values.rv1.is_some(), "Rv1")?;
            require(values.pim.is_some(), "Pim")?;
            require(values.p_v.is_some(), "P_v")?;
        }
    }

    for series in [
        &values.q, &values.p, &values.r, &values.pd, &values.rp, &values.c, &values.rd,
        &values.pim, &values.p_v,
    ]
    .into_iter()
    .flatten()
    {
        let ScalarOrSeries::Series(samples) = series else {
            continue;
        };
        if samples.is_empty() {
            return Err(ProjectError::InvalidValue {
                entity: name.to_string(),
                what: "empty waveform sample list".into(),
            });
        }
        if samples.len() > 1 {
            let times = values.t.as_deref().ok_or_else(|| ProjectError::MissingParameter {
                entity: name.to_string(),
                parameter: "t",
            })?;
            if times.len() != samples.len() {
                return Err(ProjectError::InvalidValue {
                    entity: name.to_string(),
                    what: format!(
                        "waveform has {} samples but {} time points",
                        samples.len(),
                        times.len()
                    ),
                });
            }
        }
    }

    Ok(())
}

/// Determine the cardiac cycle period shared by all boundary conditions.
///
/// Any waveform time sequence implies a period (its span); all of them and
/// an explicitly configured period must agree. Falls back to 1.0 when
/// nothing implies a period. The configuration itself is never mutated.
pub fn resolve_cardiac_cycle_period(config: &SimulationConfig) -> ProjectResult<f64> {
    let mut period = config.simulation_parameters.cardiac_cycle_period;

    for bc in &config.boundary_conditions {
        let Some(times) = &bc.bc_values.t else {
            continue;
        };
        if times.len() < 2 {
            continue;
        }
        let implied = times[times.len() - 1] - times[0];
        match period {
            Some(expected) if (expected - implied).abs() > 1e-12 => {
                return Err(ProjectError::MismatchedPeriods {
                    entity: bc.bc_name.clone(),
                    expected,
                    got: implied,
                });
            }
            Some(_) => {}
            None => period = Some(implied),
        }
    }

    Ok(period.unwrap_or(1.0))
}
