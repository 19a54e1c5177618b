//! Error types for time integration.

use hf_core::Real;
use thiserror::Error;

pub type SolverResult<T> = Result<T, SolverError>;

#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Linear system is singular")]
    SingularSystem,

    #[error("Non-finite residual at time {time}")]
    NonFiniteResidual { time: Real },

    #[error("Newton iterations exhausted at time {time} (max residual {residual})")]
    ConvergenceFailed { time: Real, residual: Real },

    #[error("Initial state length {got} does not match system size {expected}")]
    Dimension { expected: usize, got: usize },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}
