//! hf-app: application services tying configuration, model, solver, and
//! results together.

pub mod compile;
pub mod error;
pub mod run_service;

pub use compile::build_model;
pub use error::{AppError, AppResult};
pub use run_service::{run_from_config, run_from_file, ResultTable};
