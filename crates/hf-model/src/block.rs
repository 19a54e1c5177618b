//! The block contract shared by every 0D element.

use hf_core::Real;
use nalgebra::{DMatrix, DVector};

use crate::dofhandler::DofHandler;
use crate::error::{ModelError, ModelResult};
use crate::ids::NodeId;
use crate::node::Node;
use crate::system::SystemMatrices;

/// Local element contributions of a block.
///
/// Each present matrix is sized (num_equations × local_cols) with
/// `local_cols = 2·(inflow + outflow) + internal variables`; the constant
/// vector is sized num_equations. Absent slots simply contribute nothing at
/// assembly.
#[derive(Debug, Clone, Default)]
pub struct LocalEquations {
    pub e: Option<DMatrix<Real>>,
    pub f: Option<DMatrix<Real>>,
    pub de: Option<DMatrix<Real>>,
    pub df: Option<DMatrix<Real>>,
    pub dc: Option<DMatrix<Real>>,
    pub c: Option<DVector<Real>>,
}

/// Shared state of every block: identity, wiring, local contributions, and
/// the cached global scatter indices.
///
/// The row IDs and flat index arrays are computed exactly once during DOF
/// setup and never change afterwards.
#[derive(Debug)]
pub struct BlockCore {
    pub name: String,
    /// Nodes feeding this block, in connection order.
    pub inflow: Vec<NodeId>,
    /// Nodes fed by this block, in connection order.
    pub outflow: Vec<NodeId>,
    pub local: LocalEquations,
    row_ids: Vec<usize>,
    internal_vars: Vec<usize>,
    flat_row_ids: Vec<usize>,
    flat_col_ids: Vec<usize>,
}

impl BlockCore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inflow: Vec::new(),
            outflow: Vec::new(),
            local: LocalEquations::default(),
            row_ids: Vec::new(),
            internal_vars: Vec::new(),
            flat_row_ids: Vec::new(),
            flat_col_ids: Vec::new(),
        }
    }

    /// Register the block's DOFs and precompute its scatter indices.
    ///
    /// Ordering contract: internal variables are registered first; the
    /// global column list is inflow node (pressure, flow) pairs, then
    /// outflow pairs, then the internal variables; equations are registered
    /// last. The flat index arrays are the row-major outer product of the
    /// equation rows with the column list.
    pub fn setup_dofs(
        &mut self,
        dofs: &mut DofHandler,
        nodes: &[Node],
        num_equations: usize,
        internal_labels: &[&str],
    ) {
        self.internal_vars = internal_labels
            .iter()
            .map(|label| dofs.register_variable(format!("{label}_{}", self.name)))
            .collect();

        let mut cols = Vec::with_capacity(2 * (self.inflow.len() + self.outflow.len()));
        for id in self.inflow.iter().chain(self.outflow.iter()) {
            let node = &nodes[id.index()];
            cols.push(node.pres_dof);
            cols.push(node.flow_dof);
        }
        cols.extend_from_slice(&self.internal_vars);

        self.row_ids = (0..num_equations)
            .map(|_| dofs.register_equation())
            .collect();

        self.flat_row_ids = Vec::with_capacity(num_equations * cols.len());
        self.flat_col_ids = Vec::with_capacity(num_equations * cols.len());
        for &row in &self.row_ids {
            for &col in &cols {
                self.flat_row_ids.push(row);
                self.flat_col_ids.push(col);
            }
        }
    }

    /// Scatter the local contributions into the global system.
    pub fn assemble(&self, sys: &mut SystemMatrices) {
        if let Some(c) = &self.local.c {
            for (k, &row) in self.row_ids.iter().enumerate() {
                sys.c[row] = c[k];
            }
        }
        for (local, global) in [
            (&self.local.e, &mut sys.e),
            (&self.local.f, &mut sys.f),
            (&self.local.de, &mut sys.de),
            (&self.local.df, &mut sys.df),
            (&self.local.dc, &mut sys.dc),
        ] {
            if let Some(local) = local {
                self.scatter(local, global);
            }
        }
    }

    fn scatter(&self, local: &DMatrix<Real>, global: &mut DMatrix<Real>) {
        let ncols = local.ncols();
        for i in 0..local.nrows() {
            for j in 0..ncols {
                let k = i * ncols + j;
                global[(self.flat_row_ids[k], self.flat_col_ids[k])] = local[(i, j)];
            }
        }
    }

    /// Global equation IDs of this block, in registration order.
    pub fn row_ids(&self) -> &[usize] {
        &self.row_ids
    }

    /// Global IDs of the block's internal variables.
    pub fn internal_vars(&self) -> &[usize] {
        &self.internal_vars
    }

    /// Cached flat scatter indices (rows, cols).
    pub fn flat_ids(&self) -> (&[usize], &[usize]) {
        (&self.flat_row_ids, &self.flat_col_ids)
    }

    /// Check the fixed inlet/outlet arity of an element before DOF setup.
    pub fn require_connectivity(&self, n_in: usize, n_out: usize) -> ModelResult<()> {
        if self.inflow.len() != n_in || self.outflow.len() != n_out {
            return Err(ModelError::Connectivity {
                block: self.name.clone(),
                what: format!(
                    "expected {n_in} inlet(s) and {n_out} outlet(s), got {} and {}",
                    self.inflow.len(),
                    self.outflow.len()
                ),
            });
        }
        Ok(())
    }
}

/// Contract of every 0D element.
///
/// A block owns its local contributions, registers its DOFs, scatters into
/// the global system, and optionally refreshes time- or solution-dependent
/// entries. The default `update_time`/`update_solution` are no-ops; purely
/// linear, constant elements never override them.
pub trait Block: Send {
    fn core(&self) -> &BlockCore;

    fn core_mut(&mut self) -> &mut BlockCore;

    fn name(&self) -> &str {
        &self.core().name
    }

    /// Register equations and internal variables and finalize local shapes.
    fn setup_dofs(&mut self, dofs: &mut DofHandler, nodes: &[Node]) -> ModelResult<()>;

    fn assemble(&self, sys: &mut SystemMatrices) {
        self.core().assemble(sys);
    }

    /// Refresh time-dependent contributions.
    fn update_time(&mut self, _time: Real) {}

    /// Refresh solution-dependent contributions.
    fn update_solution(&mut self, _y: &DVector<Real>) {}

    /// Downcast hook for result extraction.
    fn as_vessel(&self) -> Option<&crate::blood_vessel::BloodVessel> {
        None
    }
}
