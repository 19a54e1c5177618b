//! Result extraction from DOF trajectories.

use std::ops::Range;

use hf_model::{Block, Model};
use hf_solver::Trajectory;

use crate::types::{SummaryRecord, VariableRecord};

/// Output shaping options.
#[derive(Debug, Clone, Copy)]
pub struct FormatOptions {
    /// Keep every cycle; otherwise only the last one.
    pub all_cycles: bool,
    /// Samples per cardiac cycle, defining "last cycle".
    pub pts_per_cycle: usize,
    /// Collapse each series to its mean over the kept window.
    pub mean_only: bool,
    /// Attach ydot to variable-based records.
    pub with_derivative: bool,
}

impl FormatOptions {
    fn window(&self, len: usize) -> Range<usize> {
        if self.all_cycles {
            0..len
        } else {
            len.saturating_sub(self.pts_per_cycle)..len
        }
    }
}

/// Per-vessel summary table: the four signals at the vessel's first inflow
/// and first outflow node, one row per kept time point (or one mean row).
pub fn vessel_summary(
    model: &Model,
    trajectory: &Trajectory,
    opts: &FormatOptions,
) -> Vec<SummaryRecord> {
    let window = opts.window(trajectory.len());
    let mut records = Vec::new();

    for vessel in model.vessels() {
        let inflow = model.node(vessel.core().inflow[0]);
        let outflow = model.node(vessel.core().outflow[0]);
        let name = vessel.name();

        if opts.mean_only {
            let count = window.len().max(1) as f64;
            let mut mean = SummaryRecord {
                name: name.to_string(),
                time: 0.0,
                pressure_in: 0.0,
                pressure_out: 0.0,
                flow_in: 0.0,
                flow_out: 0.0,
            };
            for k in window.clone() {
                let y = &trajectory.y[k];
                mean.time += trajectory.times[k];
                mean.pressure_in += y[inflow.pres_dof];
                mean.pressure_out += y[outflow.pres_dof];
                mean.flow_in += y[inflow.flow_dof];
                mean.flow_out += y[outflow.flow_dof];
            }
            mean.time /= count;
            mean.pressure_in /= count;
            mean.pressure_out /= count;
            mean.flow_in /= count;
            mean.flow_out /= count;
            records.push(mean);
            continue;
        }

        for k in window.clone() {
            let y = &trajectory.y[k];
            records.push(SummaryRecord {
                name: name.to_string(),
                time: trajectory.times[k],
                pressure_in: y[inflow.pres_dof],
                pressure_out: y[outflow.pres_dof],
                flow_in: y[inflow.flow_dof],
                flow_out: y[outflow.flow_dof],
            });
        }
    }

    records
}

/// Long-format table over every solution variable.
///
/// Emits wire flows and pressures first (in node order), then the internal
/// variables of each block (in model order), each series over the kept time
/// window.
pub fn variable_table(
    model: &Model,
    trajectory: &Trajectory,
    opts: &FormatOptions,
) -> Vec<VariableRecord> {
    let mut series: Vec<(String, usize)> = Vec::new();
    for node in model.nodes() {
        series.push((
            format!("flow:{}:{}", node.upstream, node.downstream),
            node.flow_dof,
        ));
        series.push((
            format!("pressure:{}:{}", node.upstream, node.downstream),
            node.pres_dof,
        ));
    }
    for block in model.blocks() {
        let core = block.core();
        for &var in core.internal_vars() {
            let registered = model.dofs().variables()[var].as_str();
            let quantity = registered
                .strip_suffix(&format!("_{}", core.name))
                .unwrap_or(registered);
            series.push((format!("{quantity}:{}", core.name), var));
        }
    }

    let window = opts.window(trajectory.len());
    let mut records = Vec::new();
    for (name, dof) in series {
        if opts.mean_only {
            let count = window.len().max(1) as f64;
            let mut time = 0.0;
            let mut y = 0.0;
            let mut ydot = 0.0;
            for k in window.clone() {
                time += trajectory.times[k];
                y += trajectory.y[k][dof];
                ydot += trajectory.ydot[k][dof];
            }
            records.push(VariableRecord {
                name,
                time: time / count,
                y: y / count,
                ydot: opts.with_derivative.then_some(ydot / count),
            });
            continue;
        }

        for k in window.clone() {
            records.push(VariableRecord {
                name: name.clone(),
                time: trajectory.times[k],
                y: trajectory.y[k][dof],
                ydot: opts.with_derivative.then_some(trajectory.ydot[k][dof]),
            });
        }
    }

    records
}
