//! The assembled network model.

use hf_core::Real;
use nalgebra::DVector;

use crate::block::Block;
use crate::dofhandler::DofHandler;
use crate::error::{ModelError, ModelResult};
use crate::ids::{BlockId, NodeId};
use crate::node::Node;
use crate::system::SystemMatrices;

/// An ordered sequence of blocks, the node arena wiring them together, and
/// the DOF handler that assigned the global IDs.
///
/// Block order is fixed at construction and determines assembly order, so
/// repeated builds of the same configuration reproduce identical systems.
pub struct Model {
    blocks: Vec<Box<dyn Block>>,
    nodes: Vec<Node>,
    dofs: DofHandler,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("blocks", &self.blocks.len())
            .field("nodes", &self.nodes)
            .field("dofs", &self.dofs)
            .finish()
    }
}

impl Model {
    /// Freeze a fully set up model.
    ///
    /// At this point every variable must be matched by an equation.
    pub fn new(
        blocks: Vec<Box<dyn Block>>,
        nodes: Vec<Node>,
        dofs: DofHandler,
    ) -> ModelResult<Self> {
        if dofs.n() != dofs.num_variables() {
            return Err(ModelError::Invariant {
                what: format!(
                    "system is not square: {} equations vs {} variables",
                    dofs.n(),
                    dofs.num_variables()
                ),
            });
        }
        Ok(Self {
            blocks,
            nodes,
            dofs,
        })
    }

    /// System size.
    pub fn n(&self) -> usize {
        self.dofs.n()
    }

    pub fn dofs(&self) -> &DofHandler {
        &self.dofs
    }

    pub fn blocks(&self) -> &[Box<dyn Block>] {
        &self.blocks
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Refresh time-dependent contributions on every block.
    pub fn update_time(&mut self, time: Real) {
        for block in &mut self.blocks {
            block.update_time(time);
        }
    }

    /// Refresh solution-dependent contributions on every block.
    pub fn update_solution(&mut self, y: &DVector<Real>) {
        for block in &mut self.blocks {
            block.update_solution(y);
        }
    }

    /// Scatter every block into the global system, in model order.
    pub fn assemble(&self, sys: &mut SystemMatrices) {
        for block in &self.blocks {
            block.assemble(sys);
        }
    }

    pub fn block(&self, id: BlockId) -> &dyn Block {
        self.blocks[id.index()].as_ref()
    }

    /// Blood-vessel blocks in model order.
    pub fn vessels(&self) -> impl Iterator<Item = &crate::blood_vessel::BloodVessel> + '_ {
        self.blocks.iter().filter_map(|b| b.as_vessel())
    }
}
