//! Interpolation of sampled data.
//!
//! Curve arithmetic resamples one curve at another curve's abscissae. All of
//! that goes through piecewise-linear interpolation with an explicit
//! [`BoundaryPolicy`] deciding what happens outside the sampled domain.
//!
//! - [`LinearInterpolator`]: reusable interpolator over one sample table
//! - [`interp`]: batch evaluation at many query points
//! - [`sort_pairs`]: stable sort of paired samples by abscissa

mod linear;

pub use linear::LinearInterpolator;

use crate::error::{MathError, MathResult};
use crate::extrapolation::BoundaryPolicy;

/// Trait for interpolation methods.
pub trait Interpolator: Send + Sync {
    /// Returns the interpolated value at x.
    fn interpolate(&self, x: f64) -> MathResult<f64>;

    /// Returns the minimum x value in the data.
    fn min_x(&self) -> f64;

    /// Returns the maximum x value in the data.
    fn max_x(&self) -> f64;

    /// Checks if x is within the interpolation range.
    fn in_range(&self, x: f64) -> bool {
        x >= self.min_x() && x <= self.max_x()
    }
}

/// Evaluates the piecewise-linear interpolant of `(xs, ys)` at every query point.
///
/// `xs` must be non-decreasing. Queries outside `[xs[0], xs[n-1]]` follow
/// `policy`.
pub fn interp(
    query: &[f64],
    xs: &[f64],
    ys: &[f64],
    policy: &BoundaryPolicy,
) -> MathResult<Vec<f64>> {
    let interpolator =
        LinearInterpolator::new(xs.to_vec(), ys.to_vec())?.with_extrapolation(*policy)?;
    query.iter().map(|&x| interpolator.interpolate(x)).collect()
}

/// Sorts paired samples by abscissa, keeping the original order of ties.
pub fn sort_pairs(xs: &[f64], ys: &[f64]) -> MathResult<(Vec<f64>, Vec<f64>)> {
    MathError::check_lengths(xs, ys)?;
    let mut order: Vec<usize> = (0..xs.len()).collect();
    order.sort_by(|&i, &j| xs[i].total_cmp(&xs[j]));
    Ok((
        order.iter().map(|&i| xs[i]).collect(),
        order.iter().map(|&i| ys[i]).collect(),
    ))
}
