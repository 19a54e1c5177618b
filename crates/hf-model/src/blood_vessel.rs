//! Blood vessel element: resistor-capacitor-inductor with optional stenosis.

use hf_core::Real;
use nalgebra::{DMatrix, DVector};

use crate::block::{Block, BlockCore};
use crate::dofhandler::DofHandler;
use crate::error::ModelResult;
use crate::node::Node;

/// Constants of a vessel segment.
#[derive(Debug, Clone, Copy)]
pub struct VesselParameters {
    /// Poiseuille resistance.
    pub r: Real,
    /// Capacitance.
    pub c: Real,
    /// Inductance.
    pub l: Real,
    /// Quadratic stenosis coefficient K in `ΔP = K·Q·|Q| + R·Q`.
    pub stenosis_coefficient: Real,
}

/// RCL vessel segment with optional quadratic stenosis.
///
/// Local unknowns are `(P_in, Q_in, P_out, Q_out, P_c)` where `P_c` is the
/// pressure over the internal capacitor. Governing equations:
///
/// 1. `P_in − R·Q_in − P_out − L·dQ_out/dt = 0`
/// 2. `Q_in − Q_out − C·dP_c/dt = 0`
/// 3. `P_in − R·Q_in − P_c = 0`
///
/// A non-zero stenosis coefficient makes the resistance flow-dependent
/// through `R → R + K·|Q_in|` in rows 1 and 3; a zero coefficient keeps the
/// element fully linear and `update_solution` never touches it.
pub struct BloodVessel {
    core: BlockCore,
    params: VesselParameters,
    nonlinear: bool,
    /// Global flow DOF of the first inflow node, cached at DOF setup.
    q_in_dof: usize,
}

const NUM_EQUATIONS: usize = 3;
const INTERNAL_LABELS: [&str; 1] = ["P_c"];

impl BloodVessel {
    pub fn new(name: impl Into<String>, params: VesselParameters) -> Self {
        let mut core = BlockCore::new(name);

        let mut e = DMatrix::zeros(3, 5);
        e[(0, 3)] = -params.l;
        e[(1, 4)] = -params.c;
        core.local.e = Some(e);

        core.local.f = Some(DMatrix::from_row_slice(
            3,
            5,
            &[
                1.0, -params.r, -1.0, 0.0, 0.0, //
                0.0, 1.0, 0.0, -1.0, 0.0, //
                1.0, -params.r, 0.0, 0.0, -1.0,
            ],
        ));

        let nonlinear = params.stenosis_coefficient != 0.0;
        if nonlinear {
            core.local.df = Some(DMatrix::zeros(3, 5));
        }

        Self {
            core,
            params,
            nonlinear,
            q_in_dof: 0,
        }
    }

    pub fn params(&self) -> &VesselParameters {
        &self.params
    }
}

impl Block for BloodVessel {
    fn core(&self) -> &BlockCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut BlockCore {
        &mut self.core
    }

    fn setup_dofs(&mut self, dofs: &mut DofHandler, nodes: &[Node]) -> ModelResult<()> {
        self.core.require_connectivity(1, 1)?;
        self.core
            .setup_dofs(dofs, nodes, NUM_EQUATIONS, &INTERNAL_LABELS);
        self.q_in_dof = nodes[self.core.inflow[0].index()].flow_dof;
        Ok(())
    }

    fn update_solution(&mut self, y: &DVector<Real>) {
        if !self.nonlinear {
            return;
        }
        let q_in = y[self.q_in_dof].abs();
        let fac1 = -self.params.stenosis_coefficient * q_in;
        let fac2 = fac1 - self.params.r;
        let f = self.core.local.f.as_mut().expect("vessel F is set");
        f[(0, 1)] = fac2;
        f[(2, 1)] = fac2;
        let df = self.core.local.df.as_mut().expect("stenosis dF is set");
        df[(0, 1)] = fac1;
        df[(2, 1)] = fac1;
    }

    fn as_vessel(&self) -> Option<&BloodVessel> {
        Some(self)
    }
}
