//! Element coefficients: constant or periodic in time.

use hf_core::{PeriodicSpline, Real};

use crate::error::{ModelError, ModelResult};

/// A scalar element coefficient that is either constant or a periodic
/// waveform over the cardiac cycle.
///
/// Whether an element needs per-step `update_time` work is decided once at
/// construction by inspecting its coefficients, not re-checked on the hot
/// path.
#[derive(Debug, Clone)]
pub enum Coefficient {
    Constant(Real),
    Periodic(PeriodicSpline),
}

impl Coefficient {
    pub fn constant(value: Real) -> Self {
        Self::Constant(value)
    }

    /// Lift a sampled waveform into a periodic interpolant.
    ///
    /// A single sample degenerates to a constant. Multiple samples require a
    /// time sequence covering the cardiac cycle.
    pub fn series(times: Option<&[Real]>, values: &[Real]) -> ModelResult<Self> {
        match values {
            [] => Err(ModelError::Invariant {
                what: "empty coefficient value sequence".into(),
            }),
            [single] => Ok(Self::Constant(*single)),
            _ => {
                let times = times.ok_or_else(|| ModelError::Invariant {
                    what: "no time sequence provided for interpolation".into(),
                })?;
                Ok(Self::Periodic(PeriodicSpline::new(times, values)?))
            }
        }
    }

    /// Evaluate the coefficient at time `t`.
    pub fn at(&self, t: Real) -> Real {
        match self {
            Self::Constant(v) => *v,
            Self::Periodic(spline) => spline.eval(t),
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Self::Constant(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_ignores_time() {
        let c = Coefficient::constant(3.5);
        assert_eq!(c.at(0.0), 3.5);
        assert_eq!(c.at(17.2), 3.5);
        assert!(c.is_constant());
    }

    #[test]
    fn single_sample_degenerates_to_constant() {
        let c = Coefficient::series(None, &[2.0]).unwrap();
        assert!(c.is_constant());
        assert_eq!(c.at(0.3), 2.0);
    }

    #[test]
    fn series_interpolates_periodically() {
        let times = [0.0, 0.25, 0.5, 0.75, 1.0];
        let values = [0.0, 1.0, 0.0, -1.0, 0.0];
        let c = Coefficient::series(Some(&times), &values).unwrap();
        assert!(!c.is_constant());
        assert!((c.at(0.25) - 1.0).abs() < 1e-12);
        assert!((c.at(1.25) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn series_without_times_is_rejected() {
        assert!(Coefficient::series(None, &[1.0, 2.0, 1.0]).is_err());
    }
}
