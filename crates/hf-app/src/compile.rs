//! Model compiler: configuration → solver-ready model.

use std::collections::HashMap;

use tracing::debug;

use hf_model::{
    Block, BloodVessel, Coefficient, CoronaryParameters, DofHandler, FlowBc, Junction, Model,
    Node, NodeId, OpenLoopCoronaryBc, PressureBc, ResistanceBc, VesselParameters, WindkesselBc,
};
use hf_project::{
    BcType, BcValues, BoundaryConditionConfig, ProjectError, ScalarOrSeries, SimulationConfig,
};

use crate::error::{AppError, AppResult};

// block ordering groups: junctions before vessels before boundary conditions
const RANK_JUNCTION: u8 = 0;
const RANK_VESSEL: u8 = 1;
const RANK_BC: u8 = 2;

/// Build the block network, wire the nodes, and set up all DOFs.
///
/// Connections are emitted in configuration order (junction connections
/// first, then vessel boundary connections) and their nodes claim the low
/// DOF IDs. Blocks set up their DOFs afterwards, grouped as junctions,
/// vessels, boundary conditions, each group sorted by name, so two builds of
/// the same configuration produce identical DOF assignments.
pub fn build_model(config: &SimulationConfig, steady: bool) -> AppResult<Model> {
    let mut blocks: Vec<(u8, Box<dyn Block>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut connections: Vec<(String, String)> = Vec::new();

    for junction_config in &config.junctions {
        if !matches!(
            junction_config.junction_type.as_str(),
            "NORMAL_JUNCTION" | "internal_junction"
        ) {
            return Err(AppError::UnknownType {
                kind: "junction",
                entity: junction_config.junction_name.clone(),
                type_name: junction_config.junction_type.clone(),
            });
        }
        let junction = Junction::new(&junction_config.junction_name)?;
        for vid in &junction_config.inlet_vessels {
            connections.push((format!("V{vid}"), junction_config.junction_name.clone()));
        }
        for vid in &junction_config.outlet_vessels {
            connections.push((junction_config.junction_name.clone(), format!("V{vid}")));
        }
        insert_block(&mut blocks, &mut index, RANK_JUNCTION, Box::new(junction))?;
    }

    for vessel_config in &config.vessels {
        if vessel_config.zero_d_element_type != "BloodVessel" {
            return Err(AppError::UnknownType {
                kind: "vessel element",
                entity: vessel_config.vessel_name.clone(),
                type_name: vessel_config.zero_d_element_type.clone(),
            });
        }
        let name = format!("V{}", vessel_config.vessel_id);
        let values = &vessel_config.zero_d_element_values;
        let vessel = BloodVessel::new(
            &name,
            VesselParameters {
                r: values.r_poiseuille,
                c: values.c,
                l: values.l,
                stenosis_coefficient: values.stenosis_coefficient,
            },
        );
        insert_block(&mut blocks, &mut index, RANK_VESSEL, Box::new(vessel))?;

        let Some(vessel_bcs) = &vessel_config.boundary_conditions else {
            continue;
        };
        for (location, reference, upstream) in [
            ("inlet", &vessel_bcs.inlet, false),
            ("outlet", &vessel_bcs.outlet, true),
        ] {
            let Some(bc_name) = reference else {
                continue;
            };
            let block_name = format!("BC{}_{location}", vessel_config.vessel_id);
            if upstream {
                connections.push((name.clone(), block_name.clone()));
            } else {
                connections.push((block_name.clone(), name.clone()));
            }
            let bc = build_bc_block(config, bc_name, &block_name, steady)?;
            insert_block(&mut blocks, &mut index, RANK_BC, bc)?;
        }
    }

    // wires claim the low DOF IDs, in connection order
    let mut dofs = DofHandler::new();
    let mut nodes: Vec<Node> = Vec::new();
    for (upstream, downstream) in &connections {
        let up = lookup(&index, upstream, downstream)?;
        let down = lookup(&index, downstream, upstream)?;
        let node_id = NodeId::from_index(nodes.len());
        nodes.push(Node::new(upstream.clone(), downstream.clone(), &mut dofs));
        blocks[up].1.core_mut().outflow.push(node_id);
        blocks[down].1.core_mut().inflow.push(node_id);
    }

    blocks.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.name().cmp(b.1.name())));

    let mut ordered: Vec<Box<dyn Block>> = blocks.into_iter().map(|(_, block)| block).collect();
    for block in &mut ordered {
        block.setup_dofs(&mut dofs, &nodes)?;
    }

    debug!(
        blocks = ordered.len(),
        nodes = nodes.len(),
        n = dofs.n(),
        steady,
        "model compiled"
    );

    Ok(Model::new(ordered, nodes, dofs)?)
}

fn insert_block(
    blocks: &mut Vec<(u8, Box<dyn Block>)>,
    index: &mut HashMap<String, usize>,
    rank: u8,
    block: Box<dyn Block>,
) -> AppResult<()> {
    let name = block.name().to_string();
    if index.contains_key(&name) {
        return Err(ProjectError::Duplicate {
            kind: "block",
            name,
        }
        .into());
    }
    index.insert(name, blocks.len());
    blocks.push((rank, block));
    Ok(())
}

fn lookup(index: &HashMap<String, usize>, name: &str, peer: &str) -> AppResult<usize> {
    index.get(name).copied().ok_or_else(|| {
        ProjectError::UnknownReference {
            entity: format!("connection to {peer}"),
            kind: "block",
            name: name.to_string(),
        }
        .into()
    })
}

fn build_bc_block(
    config: &SimulationConfig,
    bc_name: &str,
    block_name: &str,
    steady: bool,
) -> AppResult<Box<dyn Block>> {
    let bc = find_bc(config, bc_name, block_name)?;
    let values = &bc.bc_values;
    let times = values.t.as_deref();

    Ok(match bc.bc_type {
        BcType::Flow => Box::new(FlowBc::new(
            block_name,
            coefficient(bc_name, times, values.q.as_ref(), "Q")?,
        )),
        BcType::Pressure => Box::new(PressureBc::new(
            block_name,
            coefficient(bc_name, times, values.p.as_ref(), "P")?,
        )),
        BcType::Resistance => Box::new(ResistanceBc::new(
            block_name,
            coefficient(bc_name, times, values.r.as_ref(), "R")?,
            coefficient(bc_name, times, values.pd.as_ref(), "Pd")?,
        )),
        BcType::Rcr => Box::new(WindkesselBc::new(
            block_name,
            coefficient(bc_name, times, values.rp.as_ref(), "Rp")?,
            coefficient(bc_name, times, values.c.as_ref(), "C")?,
            coefficient(bc_name, times, values.rd.as_ref(), "Rd")?,
            coefficient(bc_name, times, values.pd.as_ref(), "Pd")?,
        )),
        BcType::Coronary => Box::new(OpenLoopCoronaryBc::new(
            block_name,
            CoronaryParameters {
                ra: scalar(bc_name, values.ra1, "Ra1")?,
                ca: scalar(bc_name, values.ca, "Ca")?,
                ram: scalar(bc_name, values.ra2, "Ra2")?,
                cim: scalar(bc_name, values.cc, "Cc")?,
                rv: scalar(bc_name, values.rv1, "Rv1")?,
            },
            coefficient(bc_name, times, values.pim.as_ref(), "Pim")?,
            coefficient(bc_name, times, values.p_v.as_ref(), "P_v")?,
            steady,
        )),
    })
}

fn find_bc<'a>(
    config: &'a SimulationConfig,
    bc_name: &str,
    block_name: &str,
) -> AppResult<&'a BoundaryConditionConfig> {
    config
        .boundary_conditions
        .iter()
        .find(|bc| bc.bc_name == bc_name)
        .ok_or_else(|| {
            ProjectError::UnknownReference {
                entity: block_name.to_string(),
                kind: "boundary condition",
                name: bc_name.to_string(),
            }
            .into()
        })
}

fn coefficient(
    entity: &str,
    times: Option<&[f64]>,
    value: Option<&ScalarOrSeries>,
    parameter: &'static str,
) -> AppResult<Coefficient> {
    let value = value.ok_or_else(|| missing(entity, parameter))?;
    Ok(match value {
        ScalarOrSeries::Scalar(v) => Coefficient::constant(*v),
        ScalarOrSeries::Series(samples) => Coefficient::series(times, samples)?,
    })
}

fn scalar(entity: &str, value: Option<f64>, parameter: &'static str) -> AppResult<f64> {
    value.ok_or_else(|| missing(entity, parameter))
}

fn missing(entity: &str, parameter: &'static str) -> AppError {
    ProjectError::MissingParameter {
        entity: entity.to_string(),
        parameter,
    }
    .into()
}
