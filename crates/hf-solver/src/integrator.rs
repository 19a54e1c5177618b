//! Generalized-α time integration with Newton–Raphson inner loop.

use hf_core::Real;
use nalgebra::DVector;
use tracing::warn;

use hf_model::{Model, SystemMatrices};

use crate::error::{SolverError, SolverResult};
use crate::linear::LinearSolver;

/// Tuning knobs of the nonlinear solve.
#[derive(Clone, Copy, Debug)]
pub struct IntegratorOptions {
    /// Generalized-α spectral radius ρ∞.
    pub rho: Real,
    /// Absolute tolerance on the ∞-norm of the residual.
    pub abs_tol: Real,
    /// Maximum Newton iterations per time step.
    pub max_iter: usize,
    /// Escalate Newton non-convergence to a hard error instead of a warning.
    pub fail_on_nonconvergence: bool,
}

impl Default for IntegratorOptions {
    fn default() -> Self {
        Self {
            rho: 0.1,
            abs_tol: hf_core::DEFAULT_ABS_TOL,
            max_iter: hf_core::DEFAULT_MAX_NONLINEAR_ITER,
            fail_on_nonconvergence: false,
        }
    }
}

/// Generalized-α integrator for `E·ẏ + F·y + C = 0`.
///
/// The method constants follow from the spectral radius:
/// `α_m = (3 − ρ) / (2(1 + ρ))`, `α_f = 1 / (1 + ρ)`,
/// `γ = 1/2 + α_m − α_f`. Global matrices are allocated once for the system
/// size and reassembled in place each Newton iteration.
pub struct GeneralizedAlpha {
    alpha_m: Real,
    alpha_f: Real,
    gamma: Real,
    fac: Real,
    time_step_size: Real,
    inv_dt: Real,
    opts: IntegratorOptions,
    sys: SystemMatrices,
    solver: LinearSolver,
}

impl GeneralizedAlpha {
    pub fn new(n: usize, time_step_size: Real, opts: IntegratorOptions) -> Self {
        let rho = opts.rho;
        let alpha_m = 0.5 * (3.0 - rho) / (1.0 + rho);
        let alpha_f = 1.0 / (1.0 + rho);
        let gamma = 0.5 + alpha_m - alpha_f;

        Self {
            alpha_m,
            alpha_f,
            gamma,
            fac: alpha_m / (alpha_f * gamma),
            time_step_size,
            inv_dt: 1.0 / time_step_size,
            opts,
            sys: SystemMatrices::zeros(n),
            solver: LinearSolver::for_dim(n),
        }
    }

    pub fn alpha_m(&self) -> Real {
        self.alpha_m
    }

    pub fn alpha_f(&self) -> Real {
        self.alpha_f
    }

    pub fn gamma(&self) -> Real {
        self.gamma
    }

    /// Advance `(y, ẏ)` from `time` to `time + Δt`.
    ///
    /// Newton non-convergence is reported but does not abort unless
    /// configured to; a non-finite residual always does.
    pub fn step(
        &mut self,
        model: &mut Model,
        y: &DVector<Real>,
        ydot: &DVector<Real>,
        time: Real,
    ) -> SolverResult<(DVector<Real>, DVector<Real>)> {
        // predictor
        let curr_y = y + ydot * (0.5 * self.time_step_size);
        let curr_ydot = ydot * ((self.gamma - 0.5) / self.gamma);

        // intermediate state
        let mut yaf = y + (curr_y - y) * self.alpha_f;
        let mut ydotam = ydot + (curr_ydot - ydot) * self.alpha_m;
        let t_af = time + self.alpha_f * self.time_step_size;

        model.update_time(t_af);

        let fac_ydotam = self.fac * self.inv_dt;
        let mut converged = false;
        let mut res_max = Real::INFINITY;
        for _ in 0..self.opts.max_iter {
            model.update_solution(&yaf);
            model.assemble(&mut self.sys);

            let res = -(&self.sys.e * &ydotam) - &self.sys.f * &yaf - &self.sys.c;
            res_max = res.amax();
            if !res_max.is_finite() {
                return Err(SolverError::NonFiniteResidual { time: t_af });
            }
            if res_max <= self.opts.abs_tol {
                converged = true;
                break;
            }

            let lhs = &self.sys.f
                + &self.sys.de
                + &self.sys.df
                + &self.sys.dc
                + &self.sys.e * (self.fac * self.inv_dt);
            let dy = self.solver.solve(&lhs, &res)?;

            yaf += &dy;
            ydotam += dy * fac_ydotam;
        }

        if !converged {
            if self.opts.fail_on_nonconvergence {
                return Err(SolverError::ConvergenceFailed {
                    time,
                    residual: res_max,
                });
            }
            warn!(
                time,
                residual = res_max,
                "max Newton iterations reached, continuing with best iterate"
            );
        }

        // corrector
        let y_new = y + (yaf - y) / self.alpha_f;
        let ydot_new = ydot + (ydotam - ydot) / self.alpha_m;
        Ok((y_new, ydot_new))
    }
}

/// Recorded solution of a run: one state per time point, first entry the
/// initial condition.
#[derive(Debug, Clone)]
pub struct Trajectory {
    pub times: Vec<Real>,
    pub y: Vec<DVector<Real>>,
    pub ydot: Vec<DVector<Real>>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Terminal state of the run.
    pub fn terminal(&self) -> Option<(&DVector<Real>, &DVector<Real>)> {
        Some((self.y.last()?, self.ydot.last()?))
    }
}

/// Integrate the model over `num_steps` equidistant time points.
///
/// Missing initial conditions start from zero. The returned time axis has
/// exactly `num_steps` entries; the state vectors include the initial
/// condition followed by one entry per step.
pub fn run_integrator(
    model: &mut Model,
    num_steps: usize,
    time_step_size: Real,
    y_initial: Option<DVector<Real>>,
    ydot_initial: Option<DVector<Real>>,
    opts: IntegratorOptions,
) -> SolverResult<Trajectory> {
    if num_steps == 0 {
        return Err(SolverError::InvalidArg {
            what: "num_steps must be positive",
        });
    }
    if !(time_step_size > 0.0) {
        return Err(SolverError::InvalidArg {
            what: "time_step_size must be positive",
        });
    }

    let n = model.n();
    let mut y = y_initial.unwrap_or_else(|| DVector::zeros(n));
    let mut ydot = ydot_initial.unwrap_or_else(|| DVector::zeros(n));
    for state in [&y, &ydot] {
        if state.len() != n {
            return Err(SolverError::Dimension {
                expected: n,
                got: state.len(),
            });
        }
    }

    let times: Vec<Real> = (0..num_steps).map(|i| i as Real * time_step_size).collect();

    let mut integrator = GeneralizedAlpha::new(n, time_step_size, opts);
    let mut trajectory = Trajectory {
        times: times.clone(),
        y: Vec::with_capacity(num_steps),
        ydot: Vec::with_capacity(num_steps),
    };
    trajectory.y.push(y.clone());
    trajectory.ydot.push(ydot.clone());

    for &time in times.iter().take(num_steps - 1) {
        let (y_new, ydot_new) = integrator.step(model, &y, &ydot, time)?;
        y = y_new;
        ydot = ydot_new;
        trajectory.y.push(y.clone());
        trajectory.ydot.push(ydot.clone());
    }

    Ok(trajectory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hf_model::{
        Block, BloodVessel, Coefficient, DofHandler, FlowBc, Model, Node, NodeId, ResistanceBc,
        VesselParameters,
    };

    fn series_r_model(stenosis_coefficient: Real) -> Model {
        let mut dofs = DofHandler::new();
        let mut inflow = FlowBc::new("BC0_inlet", Coefficient::constant(5.0));
        let mut vessel = BloodVessel::new(
            "V0",
            VesselParameters {
                r: 100.0,
                c: 0.0,
                l: 0.0,
                stenosis_coefficient,
            },
        );
        let mut outlet = ResistanceBc::new(
            "BC0_outlet",
            Coefficient::constant(100.0),
            Coefficient::constant(100.0),
        );

        let mut nodes = Vec::new();
        nodes.push(Node::new("BC0_inlet", "V0", &mut dofs));
        inflow.core_mut().outflow.push(NodeId::from_index(0));
        vessel.core_mut().inflow.push(NodeId::from_index(0));
        nodes.push(Node::new("V0", "BC0_outlet", &mut dofs));
        vessel.core_mut().outflow.push(NodeId::from_index(1));
        outlet.core_mut().inflow.push(NodeId::from_index(1));

        let mut blocks: Vec<Box<dyn Block>> =
            vec![Box::new(vessel), Box::new(inflow), Box::new(outlet)];
        for block in &mut blocks {
            block.setup_dofs(&mut dofs, &nodes).unwrap();
        }
        Model::new(blocks, nodes, dofs).unwrap()
    }

    #[test]
    fn method_constants_for_default_rho() {
        let integrator = GeneralizedAlpha::new(3, 0.1, IntegratorOptions::default());
        assert!((integrator.alpha_m() - 0.5 * 2.9 / 1.1).abs() < 1e-14);
        assert!((integrator.alpha_f() - 1.0 / 1.1).abs() < 1e-14);
        assert!(
            (integrator.gamma() - (0.5 + integrator.alpha_m() - integrator.alpha_f())).abs()
                < 1e-14
        );
    }

    #[test]
    fn steady_series_network_settles() {
        let mut model = series_r_model(0.0);
        let traj =
            run_integrator(&mut model, 31, 0.1, None, None, IntegratorOptions::default())
                .unwrap();

        assert_eq!(traj.times.len(), 31);
        assert_eq!(traj.y.len(), 31);

        let nodes = model.nodes().to_vec();
        let (y, _) = traj.terminal().unwrap();
        assert!((y[nodes[0].pres_dof] - 1100.0).abs() < 1e-6);
        assert!((y[nodes[1].pres_dof] - 600.0).abs() < 1e-6);
        assert!((y[nodes[0].flow_dof] - 5.0).abs() < 1e-7);
        assert!((y[nodes[1].flow_dof] - 5.0).abs() < 1e-7);
    }

    #[test]
    fn stenosis_network_needs_and_survives_newton() {
        let mut model = series_r_model(100.0);
        let traj =
            run_integrator(&mut model, 31, 0.1, None, None, IntegratorOptions::default())
                .unwrap();

        // ΔP over the vessel is R·Q + K·Q·|Q| = 500 + 2500
        let nodes = model.nodes().to_vec();
        let (y, _) = traj.terminal().unwrap();
        assert!((y[nodes[0].pres_dof] - 3600.0).abs() < 1e-5);
        assert!((y[nodes[1].pres_dof] - 600.0).abs() < 1e-6);
        assert!((y[nodes[0].flow_dof] - 5.0).abs() < 1e-7);
    }

    #[test]
    fn exact_initial_state_converges_without_iterating() {
        let mut model = series_r_model(0.0);
        let warm = run_integrator(&mut model, 31, 0.1, None, None, IntegratorOptions::default())
            .unwrap();
        let (y, ydot) = warm.terminal().unwrap();

        let mut model = series_r_model(0.0);
        let traj = run_integrator(
            &mut model,
            3,
            0.1,
            Some(y.clone()),
            Some(ydot.clone()),
            IntegratorOptions::default(),
        )
        .unwrap();

        for step in &traj.y {
            for i in 0..step.len() {
                assert!((step[i] - y[i]).abs() < 1e-6);
            }
        }
    }

    struct NanBlock {
        core: hf_model::BlockCore,
    }

    impl Block for NanBlock {
        fn core(&self) -> &hf_model::BlockCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut hf_model::BlockCore {
            &mut self.core
        }

        fn setup_dofs(
            &mut self,
            dofs: &mut DofHandler,
            nodes: &[Node],
        ) -> hf_model::ModelResult<()> {
            self.core.setup_dofs(dofs, nodes, 2, &[]);
            self.core.local.f = Some(nalgebra::DMatrix::identity(2, 2));
            self.core.local.c = Some(nalgebra::DVector::from_row_slice(&[Real::NAN, 0.0]));
            Ok(())
        }
    }

    #[test]
    fn non_finite_residual_aborts() {
        let mut dofs = DofHandler::new();
        let nodes = vec![Node::new("up", "bad", &mut dofs)];
        let mut block = NanBlock {
            core: hf_model::BlockCore::new("bad"),
        };
        block.core_mut().inflow.push(NodeId::from_index(0));
        let mut blocks: Vec<Box<dyn Block>> = vec![Box::new(block)];
        for block in &mut blocks {
            block.setup_dofs(&mut dofs, &nodes).unwrap();
        }
        let mut model = Model::new(blocks, nodes, dofs).unwrap();

        let err = run_integrator(&mut model, 5, 0.1, None, None, IntegratorOptions::default())
            .unwrap_err();
        assert!(matches!(err, SolverError::NonFiniteResidual { .. }));
    }

    #[test]
    fn zero_steps_is_rejected() {
        let mut model = series_r_model(0.0);
        assert!(
            run_integrator(&mut model, 0, 0.1, None, None, IntegratorOptions::default()).is_err()
        );
    }
}
