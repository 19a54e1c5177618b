//! Error types for configuration handling.

use thiserror::Error;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(Error, Debug)]
pub enum ProjectError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing parameter {parameter} for {entity}")]
    MissingParameter { entity: String, parameter: &'static str },

    #[error("Invalid value for {entity}: {what}")]
    InvalidValue { entity: String, what: String },

    #[error("Duplicate {kind} name: {name}")]
    Duplicate { kind: &'static str, name: String },

    #[error("{entity} references unknown {kind} {name}")]
    UnknownReference {
        entity: String,
        kind: &'static str,
        name: String,
    },

    #[error(
        "Boundary condition {entity} does not share the cardiac cycle period of the other \
         boundary conditions ({expected} vs {got})"
    )]
    MismatchedPeriods {
        entity: String,
        expected: f64,
        got: f64,
    },
}
