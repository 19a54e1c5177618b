//! hf-core: stable foundation for hemoflow.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - interp (periodic cubic-spline interpolation over the cardiac cycle)
//! - error (shared error types)

pub mod error;
pub mod interp;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use interp::PeriodicSpline;
pub use numeric::*;
