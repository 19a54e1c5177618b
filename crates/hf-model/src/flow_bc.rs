//! Prescribed flow boundary condition.

use hf_core::Real;
use nalgebra::{DMatrix, DVector};

use crate::block::{Block, BlockCore};
use crate::dofhandler::DofHandler;
use crate::error::ModelResult;
use crate::node::Node;
use crate::param::Coefficient;

/// Flow reference: `Q_in − Q(t) = 0`.
pub struct FlowBc {
    core: BlockCore,
    q: Coefficient,
    timed: bool,
}

impl FlowBc {
    pub fn new(name: impl Into<String>, q: Coefficient) -> Self {
        let mut core = BlockCore::new(name);
        core.local.f = Some(DMatrix::from_row_slice(1, 2, &[0.0, 1.0]));
        core.local.c = Some(DVector::from_row_slice(&[-q.at(0.0)]));
        let timed = !q.is_constant();
        Self { core, q, timed }
    }
}

impl Block for FlowBc {
    fn core(&self) -> &BlockCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut BlockCore {
        &mut self.core
    }

    fn setup_dofs(&mut self, dofs: &mut DofHandler, nodes: &[Node]) -> ModelResult<()> {
        self.core.require_connectivity(1, 0)?;
        self.core.setup_dofs(dofs, nodes, 1, &[]);
        Ok(())
    }

    fn update_time(&mut self, time: Real) {
        if !self.timed {
            return;
        }
        let c = self.core.local.c.as_mut().expect("flow C is set");
        c[0] = -self.q.at(time);
    }
}
