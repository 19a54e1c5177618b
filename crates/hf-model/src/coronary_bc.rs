//! Open-loop coronary (RCRCR) boundary condition.

use hf_core::Real;
use nalgebra::{DMatrix, DVector};

use crate::block::{Block, BlockCore};
use crate::dofhandler::DofHandler;
use crate::error::ModelResult;
use crate::node::Node;
use crate::param::Coefficient;

/// Resistances and compliances of the coronary bed.
#[derive(Debug, Clone, Copy)]
pub struct CoronaryParameters {
    /// Proximal arterial resistance.
    pub ra: Real,
    /// Arterial compliance.
    pub ca: Real,
    /// Microvascular resistance.
    pub ram: Real,
    /// Intramyocardial compliance.
    pub cim: Real,
    /// Venous resistance.
    pub rv: Real,
}

/// Open-loop coronary boundary with intramyocardial pressure Pim(t) and
/// venous pressure Pv(t).
///
/// Local unknowns are `(P_in, Q_in, V_im)` where `V_im` is the volume of the
/// intramyocardial capacitor. Pim and Pv drive the constant vector; both
/// interpolants are periodic over the cardiac cycle. With the `steady` flag
/// the capacitor dynamics collapse: E is dropped and F becomes the
/// steady-state pattern, which is how the steady-initialization pre-pass
/// builds the block.
pub struct OpenLoopCoronaryBc {
    core: BlockCore,
    params: CoronaryParameters,
    pim: Coefficient,
    pv: Coefficient,
    timed: bool,
}

const INTERNAL_LABELS: [&str; 1] = ["V_im"];

impl OpenLoopCoronaryBc {
    pub fn new(
        name: impl Into<String>,
        params: CoronaryParameters,
        pim: Coefficient,
        pv: Coefficient,
        steady: bool,
    ) -> Self {
        let mut core = BlockCore::new(name);

        if steady {
            // capacitor dynamics collapsed, arterial pressure reference 0
            core.local.f = Some(DMatrix::from_row_slice(
                2,
                3,
                &[
                    -params.cim,
                    params.cim * (params.ra + params.ram),
                    1.0, //
                    -1.0,
                    params.ra + params.ram + params.rv,
                    0.0,
                ],
            ));
            core.local.c = Some(DVector::from_row_slice(&[
                -params.cim * pim.at(0.0),
                pv.at(0.0),
            ]));
            return Self {
                core,
                params,
                pim,
                pv,
                timed: false,
            };
        }

        let cim_rv = params.cim * params.rv;

        let mut e = DMatrix::zeros(2, 3);
        e[(0, 0)] = -params.ca * cim_rv;
        e[(0, 1)] = params.ra * params.ca * cim_rv;
        e[(0, 2)] = -cim_rv;
        e[(1, 2)] = -cim_rv * params.ram;
        core.local.e = Some(e);

        let mut f = DMatrix::zeros(2, 3);
        f[(0, 1)] = cim_rv;
        f[(0, 2)] = -1.0;
        f[(1, 0)] = cim_rv;
        f[(1, 1)] = -cim_rv * params.ra;
        f[(1, 2)] = -(params.rv + params.ram);
        core.local.f = Some(f);

        core.local.c = Some(Self::constant_vector(&params, pim.at(0.0), pv.at(0.0)));

        let timed = !(pim.is_constant() && pv.is_constant());
        Self {
            core,
            params,
            pim,
            pv,
            timed,
        }
    }

    fn constant_vector(params: &CoronaryParameters, pim: Real, pv: Real) -> DVector<Real> {
        DVector::from_row_slice(&[
            -params.cim * pim + params.cim * pv,
            -params.cim * (params.rv + params.ram) * pim + params.ram * params.cim * pv,
        ])
    }
}

impl Block for OpenLoopCoronaryBc {
    fn core(&self) -> &BlockCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut BlockCore {
        &mut self.core
    }

    fn setup_dofs(&mut self, dofs: &mut DofHandler, nodes: &[Node]) -> ModelResult<()> {
        self.core.require_connectivity(1, 0)?;
        self.core.setup_dofs(dofs, nodes, 2, &INTERNAL_LABELS);
        Ok(())
    }

    fn update_time(&mut self, time: Real) {
        if !self.timed {
            return;
        }
        let vec = Self::constant_vector(&self.params, self.pim.at(time), self.pv.at(time));
        self.core.local.c = Some(vec);
    }
}
