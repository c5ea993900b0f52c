//! Domain matching.
//!
//! Two curves rarely share sample points. Before any elementwise operation
//! they are resampled onto one shared x array:
//!
//! - [`MatchMode::Union`]: the sorted union of both domains, each curve
//!   linearly interpolated with its own boundary policy
//! - [`MatchMode::Stride`]: a coarse, shape-only pairing that subsamples both
//!   curves positionally
//!
//! [`overlap`] is the comparison variant: it keeps only the intersection of
//! the two domains and can densify it with extra evenly spaced points.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::curve::Curve;
use crate::error::{CurveError, CurveResult};

/// Minimum number of shared points any matched pair must have.
pub const MIN_SHARED_POINTS: usize = 2;

/// How two curves are brought onto a shared domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchMode {
    /// Sorted union of both sets of sample points.
    #[default]
    Union,
    /// Every k-th sample of each curve, paired by position.
    Stride {
        /// Target number of samples taken from the first curve.
        samples: usize,
    },
}

/// Resamples `a` and `b` onto an identical x array.
///
/// Neither input is modified. The matched copies keep their names and
/// boundary policies.
///
/// # Errors
///
/// Returns [`CurveError::InsufficientOverlap`] if either curve is empty or
/// fewer than two shared points result.
pub fn match_domains(a: &Curve, b: &Curve, mode: MatchMode) -> CurveResult<(Curve, Curve)> {
    if a.is_empty() || b.is_empty() {
        return Err(CurveError::insufficient_overlap(MIN_SHARED_POINTS, 0));
    }
    let (x, ya, yb) = match mode {
        MatchMode::Union => {
            let x = union_sorted(&[a.x(), b.x()]);
            check_shared(x.len())?;
            let ya = a.resample(&x)?;
            let yb = b.resample(&x)?;
            (x, ya, yb)
        }
        MatchMode::Stride { samples } => stride_pair(a, b, samples)?,
    };

    debug!(?mode, points = x.len(), a = a.name(), b = b.name(), "matched curve domains");

    let ma = a.derive(a.name(), x.clone(), ya).with_policy(*a.policy());
    let mb = b.derive(b.name(), x, yb).with_policy(*b.policy());
    Ok((ma, mb))
}

/// Resamples `a` and `b` onto the intersection of their domains.
///
/// The grid holds every native sample of either curve inside the
/// intersection plus `extra_points` evenly spaced points spanning it.
///
/// # Errors
///
/// Returns [`CurveError::InsufficientOverlap`] if the domains do not overlap
/// or the grid has fewer than two points.
pub fn overlap(a: &Curve, b: &Curve, extra_points: usize) -> CurveResult<(Curve, Curve)> {
    let empty = || CurveError::insufficient_overlap(MIN_SHARED_POINTS, 0);
    let (amin, amax) = a.domain().ok_or_else(empty)?;
    let (bmin, bmax) = b.domain().ok_or_else(empty)?;

    let lo = amin.max(bmin);
    let hi = amax.min(bmax);
    if !(hi > lo) {
        let got = usize::from(hi == lo);
        return Err(CurveError::insufficient_overlap(MIN_SHARED_POINTS, got));
    }

    let inside = |xs: &[f64]| -> Vec<f64> {
        xs.iter().copied().filter(|&x| x >= lo && x <= hi).collect()
    };
    let x = union_sorted(&[
        inside(a.x()).as_slice(),
        inside(b.x()).as_slice(),
        linspace(lo, hi, extra_points).as_slice(),
    ]);
    check_shared(x.len())?;

    let ya = a.resample(&x)?;
    let yb = b.resample(&x)?;
    debug!(lo, hi, points = x.len(), "built overlap grid");

    let ma = a.derive(a.name(), x.clone(), ya).with_policy(*a.policy());
    let mb = b.derive(b.name(), x, yb).with_policy(*b.policy());
    Ok((ma, mb))
}

/// `n` evenly spaced points from `lo` to `hi` inclusive.
pub(crate) fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { hi } else { lo + i as f64 * step })
                .collect()
        }
    }
}

/// Sorted, de-duplicated union of several abscissa sets. NaN is dropped.
pub(crate) fn union_sorted(sets: &[&[f64]]) -> Vec<f64> {
    let mut x: Vec<f64> = sets
        .iter()
        .flat_map(|s| s.iter().copied())
        .filter(|v| !v.is_nan())
        .collect();
    x.sort_by(f64::total_cmp);
    x.dedup();
    x
}

fn check_shared(got: usize) -> CurveResult<()> {
    if got < MIN_SHARED_POINTS {
        Err(CurveError::insufficient_overlap(MIN_SHARED_POINTS, got))
    } else {
        Ok(())
    }
}

fn stride_pair(a: &Curve, b: &Curve, samples: usize) -> CurveResult<(Vec<f64>, Vec<f64>, Vec<f64>)> {
    let samples = samples.max(1);
    let a = a.sorted();
    let b = b.sorted();

    let stride_a = (a.len() / samples).max(1);
    let mut x: Vec<f64> = a.x().iter().step_by(stride_a).copied().collect();
    let mut ya: Vec<f64> = a.y().iter().step_by(stride_a).copied().collect();

    let stride_b = (b.len() / x.len().max(1)).max(1);
    let mut yb: Vec<f64> = b.y().iter().step_by(stride_b).copied().collect();

    let n = x.len().min(yb.len());
    x.truncate(n);
    ya.truncate(n);
    yb.truncate(n);
    check_shared(n)?;

    Ok((x, ya, yb))
}
