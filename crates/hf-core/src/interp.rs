//! Periodic cubic-spline interpolation.
//!
//! Boundary-condition waveforms are sampled over one cardiac cycle and must
//! repeat seamlessly across cycles. The interpolant is a classic C2 cubic
//! spline with periodic end conditions: the first and second derivatives at
//! the first knot match those at the last knot, and queries outside the knot
//! span are wrapped back into it.

use nalgebra::{DMatrix, DVector};

use crate::error::{CoreError, CoreResult};
use crate::numeric::Real;

/// C2 cubic spline through periodic samples of one cardiac cycle.
///
/// Construction requires at least two knots with strictly increasing times
/// and matching first/last values. Evaluation wraps the query time into the
/// knot span, so the interpolant is valid for all `t`.
#[derive(Debug, Clone)]
pub struct PeriodicSpline {
    /// Knot times, including the duplicate period-end knot.
    times: Vec<Real>,
    /// Knot values, `values[n] == values[0]`.
    values: Vec<Real>,
    /// Second derivatives at the unique knots, cyclic.
    moments: Vec<Real>,
    period: Real,
}

impl PeriodicSpline {
    /// Build the spline from samples of one full period.
    ///
    /// The last sample must repeat the first; a mismatch means the waveform
    /// does not actually close over the cycle and is rejected.
    pub fn new(times: &[Real], values: &[Real]) -> CoreResult<Self> {
        if times.len() != values.len() {
            return Err(CoreError::InvalidArg {
                what: format!(
                    "time/value sample count mismatch: {} vs {}",
                    times.len(),
                    values.len()
                ),
            });
        }
        if times.len() < 2 {
            return Err(CoreError::InvalidArg {
                what: "periodic interpolation needs at least two samples".into(),
            });
        }
        for w in times.windows(2) {
            if !(w[1] > w[0]) {
                return Err(CoreError::InvalidArg {
                    what: "sample times must be strictly increasing".into(),
                });
            }
        }
        for &v in times.iter().chain(values.iter()) {
            if !v.is_finite() {
                return Err(CoreError::NonFinite {
                    what: "interpolation sample",
                    value: v,
                });
            }
        }
        let n = times.len() - 1;
        let first = values[0];
        let last = values[n];
        if (last - first).abs() > 1e-12 * first.abs().max(1.0) {
            return Err(CoreError::InvalidArg {
                what: format!(
                    "periodic samples do not close over the cycle: first {first}, last {last}"
                ),
            });
        }

        let moments = solve_cyclic_moments(times, values)?;

        Ok(Self {
            times: times.to_vec(),
            values: values.to_vec(),
            moments,
            period: times[n] - times[0],
        })
    }

    /// Period of the interpolant (span of the knot times).
    pub fn period(&self) -> Real {
        self.period
    }

    /// Evaluate the spline at `t`, wrapping into the knot span.
    pub fn eval(&self, t: Real) -> Real {
        let t0 = self.times[0];
        let n = self.times.len() - 1;
        let mut s = t0 + (t - t0).rem_euclid(self.period);
        // rem_euclid can land exactly on the period end through rounding
        if s >= self.times[n] {
            s = t0;
        }

        // interval i such that times[i] <= s < times[i + 1]
        let i = match self.times[..n].partition_point(|&knot| knot <= s) {
            0 => 0,
            k => k - 1,
        };

        let h = self.times[i + 1] - self.times[i];
        let a = self.times[i + 1] - s;
        let b = s - self.times[i];
        let m0 = self.moments[i];
        let m1 = self.moments[(i + 1) % n];
        let y0 = self.values[i];
        let y1 = self.values[i + 1];

        m0 * a * a * a / (6.0 * h)
            + m1 * b * b * b / (6.0 * h)
            + (y0 - m0 * h * h / 6.0) * a / h
            + (y1 - m1 * h * h / 6.0) * b / h
    }
}

/// Solve the cyclic tridiagonal moment system of the periodic spline.
///
/// The knot counts here are per-cardiac-cycle sample counts, so a dense
/// solve is cheap and avoids a special-cased cyclic Thomas algorithm.
fn solve_cyclic_moments(times: &[Real], values: &[Real]) -> CoreResult<Vec<Real>> {
    let n = times.len() - 1;
    if n == 1 {
        // single unique knot: the closed waveform is constant
        return Ok(vec![0.0]);
    }

    let h = |i: usize| times[i + 1] - times[i];
    let slope = |i: usize| (values[i + 1] - values[i]) / h(i);

    let mut a = DMatrix::<Real>::zeros(n, n);
    let mut rhs = DVector::<Real>::zeros(n);
    for i in 0..n {
        let prev = (i + n - 1) % n;
        let next = (i + 1) % n;
        // accumulate so coincident indices (n == 2) fold together
        a[(i, prev)] += h(prev);
        a[(i, i)] += 2.0 * (h(prev) + h(i));
        a[(i, next)] += h(i);
        rhs[i] = 6.0 * (slope(i) - slope(prev));
    }

    let solved = a.lu().solve(&rhs).ok_or(CoreError::Invariant {
        what: "periodic spline moment system is singular",
    })?;
    Ok(solved.iter().copied().collect())
}
