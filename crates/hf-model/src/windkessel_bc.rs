//! Windkessel (RCR) boundary condition.

use hf_core::Real;
use nalgebra::{DMatrix, DVector};

use crate::block::{Block, BlockCore};
use crate::dofhandler::DofHandler;
use crate::error::ModelResult;
use crate::node::Node;
use crate::param::Coefficient;

/// Three-element windkessel with proximal resistance Rp, compliance C,
/// distal resistance Rd, and distal pressure Pd.
///
/// The internal variable is the pressure proximal to the capacitor. Local
/// unknowns are `(P_in, Q_in, P_c)` and the equations are
///
/// 1. `P_in − Rp·Q_in − P_c = 0`
/// 2. `−Rd·C·dP_c/dt + Rd·Q_in − P_c + Pd = 0`
///
/// Any waveform coefficient turns on per-step `update_time`; an all-constant
/// windkessel is baked at construction and never revisited.
pub struct WindkesselBc {
    core: BlockCore,
    rp: Coefficient,
    c: Coefficient,
    rd: Coefficient,
    pd: Coefficient,
    timed: bool,
}

const INTERNAL_LABELS: [&str; 1] = ["P_c"];

impl WindkesselBc {
    pub fn new(
        name: impl Into<String>,
        rp: Coefficient,
        c: Coefficient,
        rd: Coefficient,
        pd: Coefficient,
    ) -> Self {
        let mut core = BlockCore::new(name);

        let mut e = DMatrix::zeros(2, 3);
        e[(1, 2)] = -rd.at(0.0) * c.at(0.0);
        core.local.e = Some(e);

        core.local.f = Some(DMatrix::from_row_slice(
            2,
            3,
            &[
                1.0,
                -rp.at(0.0),
                -1.0, //
                0.0,
                rd.at(0.0),
                -1.0,
            ],
        ));
        core.local.c = Some(DVector::from_row_slice(&[0.0, pd.at(0.0)]));

        let timed =
            !(rp.is_constant() && c.is_constant() && rd.is_constant() && pd.is_constant());
        Self {
            core,
            rp,
            c,
            rd,
            pd,
            timed,
        }
    }
}

impl Block for WindkesselBc {
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
        let rd = self.rd.at(time);
        let e = self.core.local.e.as_mut().expect("windkessel E is set");
        e[(1, 2)] = -rd * self.c.at(time);
        let f = self.core.local.f.as_mut().expect("windkessel F is set");
        f[(0, 1)] = -self.rp.at(time);
        f[(1, 1)] = rd;
        let c = self.core.local.c.as_mut().expect("windkessel C is set");
        c[1] = self.pd.at(time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant_bc() -> WindkesselBc {
        WindkesselBc::new(
            "BC0_outlet",
            Coefficient::constant(100.0),
            Coefficient::constant(1e-5),
            Coefficient::constant(1900.0),
            Coefficient::constant(0.0),
        )
    }

    #[test]
    fn static_windkessel_is_baked() {
        let bc = constant_bc();
        assert!(!bc.timed);

        let e = bc.core().local.e.as_ref().unwrap();
        assert!((e[(1, 2)] + 1900.0 * 1e-5).abs() < 1e-15);
        let f = bc.core().local.f.as_ref().unwrap();
        assert_eq!(f[(0, 0)], 1.0);
        assert_eq!(f[(0, 1)], -100.0);
        assert_eq!(f[(0, 2)], -1.0);
        assert_eq!(f[(1, 1)], 1900.0);
        assert_eq!(f[(1, 2)], -1.0);
        assert_eq!(bc.core().local.c.as_ref().unwrap()[1], 0.0);
    }

    #[test]
    fn static_windkessel_ignores_time_updates() {
        let mut bc = constant_bc();
        bc.update_time(0.42);
        let f = bc.core().local.f.as_ref().unwrap();
        assert_eq!(f[(0, 1)], -100.0);
    }

    #[test]
    fn waveform_distal_pressure_tracks_time() {
        let times = [0.0, 0.5, 1.0];
        let pd = Coefficient::series(Some(&times), &[10.0, 20.0, 10.0]).unwrap();
        let mut bc = WindkesselBc::new(
            "BC0_outlet",
            Coefficient::constant(100.0),
            Coefficient::constant(1e-5),
            Coefficient::constant(1900.0),
            pd,
        );
        assert!(bc.timed);

        bc.update_time(0.5);
        assert!((bc.core().local.c.as_ref().unwrap()[1] - 20.0).abs() < 1e-10);
        // constant entries are refreshed to the same values
        let f = bc.core().local.f.as_ref().unwrap();
        assert_eq!(f[(1, 1)], 1900.0);
    }

    #[test]
    fn internal_variable_is_labelled() {
        let mut dofs = DofHandler::new();
        let mut bc = constant_bc();
        let nodes = vec![Node::new("V0", "BC0_outlet", &mut dofs)];
        bc.core_mut().inflow.push(crate::ids::NodeId::from_index(0));
        bc.setup_dofs(&mut dofs, &nodes).unwrap();
        let var = bc.core().internal_vars()[0];
        assert_eq!(dofs.variables()[var], "P_c_BC0_outlet");
    }
}
