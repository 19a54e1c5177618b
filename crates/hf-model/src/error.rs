//! Error types for model construction and DOF setup.

use hf_core::CoreError;
use thiserror::Error;

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid name for {kind} block: {name}")]
    InvalidName { kind: &'static str, name: String },

    #[error("Block {block} has inconsistent connectivity: {what}")]
    Connectivity { block: String, what: String },

    #[error("Invalid parameter for block {block}: {what}")]
    Parameter { block: String, what: String },

    #[error("Model invariant violated: {what}")]
    Invariant { what: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}
