//! Aggregated application error.

use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Project(#[from] hf_project::ProjectError),

    #[error("Model error: {0}")]
    Model(#[from] hf_model::ModelError),

    #[error("Solver error: {0}")]
    Solver(#[from] hf_solver::SolverError),

    #[error("Results error: {0}")]
    Results(#[from] hf_results::ResultsError),

    #[error("Unknown {kind} type {type_name} for {entity}")]
    UnknownType {
        kind: &'static str,
        entity: String,
        type_name: String,
    },
}
