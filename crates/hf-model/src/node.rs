//! Nodes (wires) connecting pairs of blocks.

use crate::dofhandler::DofHandler;

/// A node connects exactly two blocks and carries one flow and one pressure
/// value of the global system.
///
/// A node is the outflow node of its upstream block and the inflow node of
/// its downstream block. Its DOFs are registered at construction, so wires
/// created before block setup occupy the low global IDs.
#[derive(Debug, Clone)]
pub struct Node {
    /// Name of the block feeding this node.
    pub upstream: String,
    /// Name of the block fed by this node.
    pub downstream: String,
    /// Global ID of the flow value associated with the node.
    pub flow_dof: usize,
    /// Global ID of the pressure value associated with the node.
    pub pres_dof: usize,
}

impl Node {
    /// Create a node between `upstream` and `downstream`, registering its
    /// flow and pressure variables (in that order).
    pub fn new(
        upstream: impl Into<String>,
        downstream: impl Into<String>,
        dofs: &mut DofHandler,
    ) -> Self {
        let upstream = upstream.into();
        let downstream = downstream.into();
        let name = format!("{upstream}_{downstream}");
        let flow_dof = dofs.register_variable(format!("Q_{name}"));
        let pres_dof = dofs.register_variable(format!("P_{name}"));
        Self {
            upstream,
            downstream,
            flow_dof,
            pres_dof,
        }
    }

    /// Wire name, composed from the connected block names.
    pub fn name(&self) -> String {
        format!("{}_{}", self.upstream, self.downstream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_registers_flow_then_pressure() {
        let mut dofs = DofHandler::new();
        let node = Node::new("V0", "BC0_outlet", &mut dofs);
        assert_eq!(node.flow_dof, 0);
        assert_eq!(node.pres_dof, 1);
        assert_eq!(node.name(), "V0_BC0_outlet");
        assert_eq!(dofs.variables()[node.flow_dof], "Q_V0_BC0_outlet");
        assert_eq!(dofs.variables()[node.pres_dof], "P_V0_BC0_outlet");
    }

    #[test]
    fn dof_name_prefixes() {
        let mut dofs = DofHandler::new();
        for (a, b) in [("V0", "J1"), ("J1", "V2"), ("BC2_inlet", "V2")] {
            let node = Node::new(a, b, &mut dofs);
            assert!(dofs.variables()[node.flow_dof].starts_with("Q_"));
            assert!(dofs.variables()[node.pres_dof].starts_with("P_"));
        }
    }
}
