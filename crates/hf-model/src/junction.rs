//! Junction block: mass conservation and pressure continuity.

use nalgebra::DMatrix;

use crate::block::{Block, BlockCore};
use crate::dofhandler::DofHandler;
use crate::error::{ModelError, ModelResult};
use crate::node::Node;

/// Junction without special mechanical behavior.
///
/// Contributes `n_in + n_out` equations: one mass-conservation row summing
/// inflow flows against outflow flows, and `n_in + n_out − 1` rows equating
/// the first inflow pressure with every other node pressure. The equation
/// count is only known once the junction is wired, so the F pattern is built
/// at DOF setup rather than at construction.
pub struct Junction {
    core: BlockCore,
}

impl Junction {
    /// Create a junction. Names must be `J` followed by a number.
    pub fn new(name: impl Into<String>) -> ModelResult<Self> {
        let name = name.into();
        let digits = name.strip_prefix('J');
        if !digits.is_some_and(|d| !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit())) {
            return Err(ModelError::InvalidName {
                kind: "junction",
                name,
            });
        }
        Ok(Self {
            core: BlockCore::new(name),
        })
    }
}

impl Block for Junction {
    fn core(&self) -> &BlockCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut BlockCore {
        &mut self.core
    }

    fn setup_dofs(&mut self, dofs: &mut DofHandler, nodes: &[Node]) -> ModelResult<()> {
        let num_inlets = self.core.inflow.len();
        let num_outlets = self.core.outflow.len();
        if num_inlets == 0 || num_outlets == 0 {
            return Err(ModelError::Connectivity {
                block: self.core.name.clone(),
                what: format!(
                    "junction needs at least one inlet and one outlet, got {num_inlets} and {num_outlets}"
                ),
            });
        }

        let num_equations = num_inlets + num_outlets;
        self.core.setup_dofs(dofs, nodes, num_equations, &[]);

        // columns are (P, Q) pairs per node, no internal variables
        let mut f = DMatrix::zeros(num_equations, 2 * num_equations);
        for i in 0..num_equations - 1 {
            f[(i, 0)] = 1.0;
            f[(i, 2 * i + 2)] = -1.0;
        }
        for i in 0..num_equations {
            let sign = if i < num_inlets { 1.0 } else { -1.0 };
            f[(num_equations - 1, 2 * i + 1)] = sign;
        }
        self.core.local.f = Some(f);
        Ok(())
    }
}
