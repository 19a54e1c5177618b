//! Resistance boundary condition with distal pressure.

use hf_core::Real;
use nalgebra::{DMatrix, DVector};

use crate::block::{Block, BlockCore};
use crate::dofhandler::DofHandler;
use crate::error::ModelResult;
use crate::node::Node;
use crate::param::Coefficient;

/// Single-equation outlet resistance: `P_in − R(t)·Q_in − Pd(t) = 0`.
///
/// With the residual convention `−E·ẏ − F·y − C = 0` this puts `[1, −R]`
/// into F and `−Pd` into the constant vector. Constant coefficients make the
/// element fully static.
pub struct ResistanceBc {
    core: BlockCore,
    r: Coefficient,
    pd: Coefficient,
    timed: bool,
}

impl ResistanceBc {
    pub fn new(name: impl Into<String>, r: Coefficient, pd: Coefficient) -> Self {
        let mut core = BlockCore::new(name);
        core.local.f = Some(DMatrix::from_row_slice(1, 2, &[1.0, -r.at(0.0)]));
        core.local.c = Some(DVector::from_row_slice(&[-pd.at(0.0)]));
        let timed = !(r.is_constant() && pd.is_constant());
        Self { core, r, pd, timed }
    }
}

impl Block for ResistanceBc {
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
        let f = self.core.local.f.as_mut().expect("resistance F is set");
        f[(0, 1)] = -self.r.at(time);
        let c = self.core.local.c.as_mut().expect("resistance C is set");
        c[0] = -self.pd.at(time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_coefficients_are_baked() {
        let bc = ResistanceBc::new(
            "BC0_outlet",
            Coefficient::constant(100.0),
            Coefficient::constant(600.0),
        );
        assert!(!bc.timed);
        let f = bc.core().local.f.as_ref().unwrap();
        assert_eq!(f[(0, 0)], 1.0);
        assert_eq!(f[(0, 1)], -100.0);
        assert_eq!(bc.core().local.c.as_ref().unwrap()[0], -600.0);
    }

    #[test]
    fn waveform_resistance_tracks_time() {
        let times = [0.0, 0.5, 1.0];
        let r = Coefficient::series(Some(&times), &[100.0, 200.0, 100.0]).unwrap();
        let mut bc = ResistanceBc::new("BC0_outlet", r, Coefficient::constant(0.0));
        assert!(bc.timed);

        bc.update_time(0.5);
        let f = bc.core().local.f.as_ref().unwrap();
        assert!((f[(0, 1)] + 200.0).abs() < 1e-10);
    }
}
