//! Output shaping: variable-based tables, cycle reduction, determinism.

use hf_app::{run_from_config, ResultTable};
use hf_project::SimulationConfig;

fn r_r_config() -> SimulationConfig {
    serde_json::from_str(
        r#"{
            "simulation_parameters": {
                "number_of_cardiac_cycles": 3,
                "number_of_time_pts_per_cardiac_cycle": 11
            },
            "boundary_conditions": [
                {"bc_name": "INFLOW", "bc_type": "FLOW",
                 "bc_values": {"Q": [5.0, 5.0], "t": [0.0, 1.0]}},
                {"bc_name": "OUT", "bc_type": "RESISTANCE",
                 "bc_values": {"R": 100.0, "Pd": 100.0}}
            ],
            "junctions": [],
            "vessels": [
                {"boundary_conditions": {"inlet": "INFLOW", "outlet": "OUT"},
                 "vessel_id": 0, "vessel_name": "branch0_seg0",
                 "zero_d_element_type": "BloodVessel",
                 "zero_d_element_values": {"R_poiseuille": 100.0}}
            ]
        }"#,
    )
    .unwrap()
}

#[test]
fn summary_covers_all_cycles_by_default() {
    let config = r_r_config();
    let ResultTable::Summary(records) = run_from_config(&config).unwrap() else {
        panic!("expected summary output");
    };
    // 3 cycles of 10 steps plus the initial sample
    assert_eq!(records.len(), 31);
}

#[test]
fn last_cycle_output_keeps_final_samples() {
    let mut config = r_r_config();
    config.simulation_parameters.output_all_cycles = false;
    let ResultTable::Summary(records) = run_from_config(&config).unwrap() else {
        panic!("expected summary output");
    };
    assert_eq!(records.len(), 11);
    // window ends at the final simulated time
    assert!((records.last().unwrap().time - 3.0).abs() < 1e-12);
}

#[test]
fn mean_only_collapses_to_one_row() {
    let mut config = r_r_config();
    config.simulation_parameters.output_mean_only = true;
    let ResultTable::Summary(records) = run_from_config(&config).unwrap() else {
        panic!("expected summary output");
    };
    assert_eq!(records.len(), 1);
    assert!((records[0].flow_in - 5.0).abs() < 1e-6);
}

#[test]
fn variable_based_output_names_wires_and_internals() {
    let mut config = r_r_config();
    config.simulation_parameters.output_variable_based = true;
    let ResultTable::VariableBased(records) = run_from_config(&config).unwrap() else {
        panic!("expected variable-based output");
    };

    let names: std::collections::BTreeSet<_> =
        records.iter().map(|r| r.name.as_str()).collect();
    assert!(names.contains("flow:BC0_inlet:V0"));
    assert!(names.contains("pressure:BC0_inlet:V0"));
    assert!(names.contains("flow:V0:BC0_outlet"));
    assert!(names.contains("pressure:V0:BC0_outlet"));
    assert!(names.contains("P_c:V0"));
    assert!(records.iter().all(|r| r.ydot.is_none()));
}

#[test]
fn derivative_output_is_opt_in() {
    let mut config = r_r_config();
    config.simulation_parameters.output_variable_based = true;
    config.simulation_parameters.output_derivative = true;
    let ResultTable::VariableBased(records) = run_from_config(&config).unwrap() else {
        panic!("expected variable-based output");
    };
    assert!(records.iter().all(|r| r.ydot.is_some()));
}

#[test]
fn repeated_runs_are_bitwise_identical() {
    let config = r_r_config();
    let ResultTable::Summary(first) = run_from_config(&config).unwrap() else {
        panic!("expected summary output");
    };
    let ResultTable::Summary(second) = run_from_config(&config).unwrap() else {
        panic!("expected summary output");
    };
    assert_eq!(first, second);
}

#[test]
fn mismatched_cardiac_cycle_periods_are_fatal() {
    let mut config = r_r_config();
    config.boundary_conditions.push(hf_project::BoundaryConditionConfig {
        bc_name: "INFLOW2".into(),
        bc_type: hf_project::BcType::Flow,
        bc_values: hf_project::BcValues {
            t: Some(vec![0.0, 0.8]),
            q: Some(hf_project::ScalarOrSeries::Series(vec![1.0, 1.0])),
            ..Default::default()
        },
    });
    assert!(run_from_config(&config).is_err());
}
