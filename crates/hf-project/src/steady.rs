//! Steady-state collapse of a pulsatile configuration.

use crate::schema::{BcType, ScalarOrSeries, SimulationConfig};

/// Derive the steady companion of a configuration.
///
/// The returned configuration runs a short, coarse simulation whose terminal
/// state seeds the pulsatile run: 11 time points per cycle over 3 cycles,
/// with every pulsatile boundary value replaced by its time average. RCR
/// compliance is zeroed so the windkessel settles instantly. The input
/// configuration is left untouched.
pub fn collapse_to_steady(config: &SimulationConfig) -> SimulationConfig {
    let mut steady = config.clone();
    steady
        .simulation_parameters
        .number_of_time_pts_per_cardiac_cycle = 11;
    steady.simulation_parameters.number_of_cardiac_cycles = 3;

    for bc in &mut steady.boundary_conditions {
        match bc.bc_type {
            BcType::Flow => {
                collapse_value(&mut bc.bc_values.q);
                bc.bc_values.t = None;
            }
            BcType::Pressure => {
                collapse_value(&mut bc.bc_values.p);
                bc.bc_values.t = None;
            }
            BcType::Coronary => {
                collapse_value(&mut bc.bc_values.pim);
                collapse_value(&mut bc.bc_values.p_v);
                bc.bc_values.t = None;
            }
            BcType::Rcr => {
                bc.bc_values.c = Some(ScalarOrSeries::Scalar(0.0));
            }
            BcType::Resistance => {}
        }
    }

    steady
}

fn collapse_value(value: &mut Option<ScalarOrSeries>) {
    if let Some(v) = value {
        *value = Some(ScalarOrSeries::Scalar(v.mean()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::*;

    fn pulsatile_config() -> SimulationConfig {
        SimulationConfig {
            simulation_parameters: SimulationParameters {
                cardiac_cycle_period: None,
                number_of_time_pts_per_cardiac_cycle: 201,
                number_of_cardiac_cycles: 10,
                absolute_tolerance: 1e-8,
                maximum_nonlinear_iterations: 30,
                steady_initial: true,
                output_variable_based: false,
                output_all_cycles: true,
                output_derivative: false,
                output_mean_only: false,
                fail_on_nonconvergence: false,
            },
            vessels: vec![],
            junctions: vec![],
            boundary_conditions: vec![
                BoundaryConditionConfig {
                    bc_name: "INFLOW".into(),
                    bc_type: BcType::Flow,
                    bc_values: BcValues {
                        t: Some(vec![0.0, 0.25, 0.5, 0.75, 1.0]),
                        q: Some(ScalarOrSeries::Series(vec![2.2, 3.3, 2.2, 1.1, 2.2])),
                        ..Default::default()
                    },
                },
                BoundaryConditionConfig {
                    bc_name: "OUT".into(),
                    bc_type: BcType::Rcr,
                    bc_values: BcValues {
                        rp: Some(ScalarOrSeries::Scalar(100.0)),
                        c: Some(ScalarOrSeries::Scalar(1e-5)),
                        rd: Some(ScalarOrSeries::Scalar(1900.0)),
                        pd: Some(ScalarOrSeries::Scalar(0.0)),
                        ..Default::default()
                    },
                },
            ],
        }
    }

    #[test]
    fn collapses_stepping_parameters() {
        let steady = collapse_to_steady(&pulsatile_config());
        let params = &steady.simulation_parameters;
        assert_eq!(params.number_of_time_pts_per_cardiac_cycle, 11);
        assert_eq!(params.number_of_cardiac_cycles, 3);
    }

    #[test]
    fn flow_waveform_becomes_its_mean() {
        let steady = collapse_to_steady(&pulsatile_config());
        let inflow = &steady.boundary_conditions[0].bc_values;
        assert_eq!(inflow.t, None);
        assert_eq!(inflow.q, Some(ScalarOrSeries::Scalar(2.2)));
    }

    #[test]
    fn rcr_compliance_is_zeroed() {
        let steady = collapse_to_steady(&pulsatile_config());
        let out = &steady.boundary_conditions[1].bc_values;
        assert_eq!(out.c, Some(ScalarOrSeries::Scalar(0.0)));
        // resistances survive untouched
        assert_eq!(out.rp, Some(ScalarOrSeries::Scalar(100.0)));
        assert_eq!(out.rd, Some(ScalarOrSeries::Scalar(1900.0)));
    }

    #[test]
    fn original_config_is_untouched() {
        let config = pulsatile_config();
        let _ = collapse_to_steady(&config);
        assert!(config.boundary_conditions[0].bc_values.t.is_some());
        assert_eq!(
            config
                .simulation_parameters
                .number_of_time_pts_per_cardiac_cycle,
            201
        );
    }
}
