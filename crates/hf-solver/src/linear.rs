//! Linear-solve backends for the Newton increment.

use hf_core::Real;
use nalgebra::{DMatrix, DVector};
use rsparse::data::Trpl;

use crate::error::{SolverError, SolverResult};

/// Largest system solved with dense LU; bigger Jacobians go through the
/// sparse direct solver.
pub const DENSE_SYSTEM_LIMIT: usize = 800;

/// Backend for solving `J·Δy = r`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinearSolver {
    Dense,
    Sparse,
}

impl LinearSolver {
    /// Pick the backend for a system of dimension `n`.
    pub fn for_dim(n: usize) -> Self {
        if n > DENSE_SYSTEM_LIMIT {
            Self::Sparse
        } else {
            Self::Dense
        }
    }

    pub fn solve(&self, a: &DMatrix<Real>, b: &DVector<Real>) -> SolverResult<DVector<Real>> {
        match self {
            Self::Dense => a
                .clone()
                .lu()
                .solve(b)
                .ok_or(SolverError::SingularSystem),
            Self::Sparse => solve_sparse(a, b),
        }
    }
}

/// Sparse LU via rsparse on the nonzero pattern of the assembled Jacobian.
fn solve_sparse(a: &DMatrix<Real>, b: &DVector<Real>) -> SolverResult<DVector<Real>> {
    let mut triplets = Trpl::new();
    for j in 0..a.ncols() {
        for i in 0..a.nrows() {
            let value = a[(i, j)];
            if value != 0.0 {
                triplets.append(i, j, value);
            }
        }
    }
    let sparse = triplets.to_sprs();

    let mut x: Vec<Real> = b.iter().copied().collect();
    rsparse::lusol(&sparse, &mut x, 1, 1e-12);

    if x.iter().all(|v| v.is_finite()) {
        Ok(DVector::from_vec(x))
    } else {
        Err(SolverError::SingularSystem)
    }
}
