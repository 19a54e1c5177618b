//! Global system storage for the DAE `E·ẏ + F·y + C = 0`.

use hf_core::Real;
use nalgebra::{DMatrix, DVector};

/// Dense global matrices and the constant vector of the assembled system,
/// plus the solution-gradient matrices feeding the Newton Jacobian.
///
/// Allocated once for the system size and reused across all time steps;
/// every block overwrites its own entries at each assembly, which is
/// sufficient because block row footprints are disjoint by construction.
#[derive(Debug, Clone)]
pub struct SystemMatrices {
    pub e: DMatrix<Real>,
    pub f: DMatrix<Real>,
    pub de: DMatrix<Real>,
    pub df: DMatrix<Real>,
    pub dc: DMatrix<Real>,
    pub c: DVector<Real>,
}

impl SystemMatrices {
    pub fn zeros(n: usize) -> Self {
        Self {
            e: DMatrix::zeros(n, n),
            f: DMatrix::zeros(n, n),
            de: DMatrix::zeros(n, n),
            df: DMatrix::zeros(n, n),
            dc: DMatrix::zeros(n, n),
            c: DVector::zeros(n),
        }
    }

    /// System dimension.
    pub fn n(&self) -> usize {
        self.c.len()
    }
}
