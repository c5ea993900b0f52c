//! Comparison of two curves over their shared domain.
//!
//! Both curves are first resampled onto the intersection of their domains
//! (see [`overlap`]), densified with `density` evenly spaced points. The
//! pointwise difference is then summarised into a [`DiffReport`]: the
//! difference curve itself, the subset of it that exceeds the tolerance, and
//! a few scalar statistics.
//!
//! # Example
//!
//! ```rust
//! use loupe_curves::compare::abs_diff;
//! use loupe_curves::Curve;
//!
//! let a = Curve::new("a", vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 2.0]).unwrap();
//! let b = Curve::new("b", vec![0.0, 2.0], vec![0.0, 2.5]).unwrap();
//! let report = abs_diff(&a, &b, 10, 0.1).unwrap();
//! assert!(report.is_failed);
//! assert!((report.max - 0.5).abs() < 1e-12);
//! ```

use loupe_math::interpolation::Interpolator;
use loupe_math::quadrature::trapezoid;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::curve::Curve;
use crate::error::{CurveError, CurveResult};
use crate::matching::{match_domains, overlap, union_sorted, MatchMode, MIN_SHARED_POINTS};

/// Added to the relative-difference denominator so it is never zero.
pub const RELATIVE_EPSILON: f64 = 1e-80;

/// Outcome of one comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffReport {
    /// Pointwise difference on the overlap grid.
    pub diff: Curve,
    /// The samples of `diff` above `tolerance`.
    pub failed: Curve,
    /// Arithmetic mean of the difference samples.
    pub mean: f64,
    /// Largest difference sample.
    pub max: f64,
    /// Trapezoidal integral of the difference divided by the overlap width.
    pub integrated: f64,
    /// Threshold the samples were tested against.
    pub tolerance: f64,
    /// True if any sample exceeded the tolerance.
    pub is_failed: bool,
}

impl DiffReport {
    fn new(diff: Curve, tolerance: f64) -> Self {
        let ys = diff.y();
        let n = ys.len();
        let mean = ys.iter().sum::<f64>() / n as f64;
        let max = ys.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let width = diff.domain().map_or(0.0, |(lo, hi)| hi - lo);
        let integrated = if width > 0.0 {
            trapezoid(diff.x(), ys) / width
        } else {
            0.0
        };

        let (fx, fy): (Vec<f64>, Vec<f64>) = diff.points().filter(|&(_, d)| d > tolerance).unzip();
        let failed = diff.derive(format!("failed({})", diff.name()), fx, fy);
        let is_failed = !failed.is_empty();

        Self {
            diff,
            failed,
            mean,
            max,
            integrated,
            tolerance,
            is_failed,
        }
    }
}

/// Pointwise `|a - b|` over the overlap of the two domains.
///
/// # Errors
///
/// Returns [`CurveError::InsufficientOverlap`] if the domains share fewer
/// than two points.
pub fn abs_diff(a: &Curve, b: &Curve, density: usize, tolerance: f64) -> CurveResult<DiffReport> {
    let (ma, mb) = overlap(a, b, density)?;
    let y = ma
        .y()
        .iter()
        .zip(mb.y())
        .map(|(p, q)| (p - q).abs())
        .collect();
    let diff = ma.derive(format!("absdiff({}, {})", a.name(), b.name()), ma.x().to_vec(), y);

    let report = DiffReport::new(diff, tolerance);
    debug!(
        a = a.name(),
        b = b.name(),
        mean = report.mean,
        max = report.max,
        failed = report.failed.len(),
        "absolute comparison"
    );
    Ok(report)
}

/// Pointwise relative difference over the overlap of the two domains.
///
/// Each sample is `|a - b| / (|a| + tol·range(a) + |b| + tol·range(b) + ε)`
/// where `range` spans each curve's full y, not just the overlap. The
/// range terms keep the ratio meaningful where both curves cross zero.
///
/// # Errors
///
/// Returns [`CurveError::InsufficientOverlap`] if the domains share fewer
/// than two points.
pub fn rel_diff(a: &Curve, b: &Curve, density: usize, tolerance: f64) -> CurveResult<DiffReport> {
    let (ma, mb) = overlap(a, b, density)?;
    let span = |c: &Curve| c.range().map_or(0.0, |(lo, hi)| hi - lo);
    let floor = tolerance * span(a) + tolerance * span(b) + RELATIVE_EPSILON;

    let y = ma
        .y()
        .iter()
        .zip(mb.y())
        .map(|(p, q)| (p - q).abs() / (p.abs() + q.abs() + floor))
        .collect();
    let diff = ma.derive(format!("reldiff({}, {})", a.name(), b.name()), ma.x().to_vec(), y);

    let report = DiffReport::new(diff, tolerance);
    debug!(
        a = a.name(),
        b = b.name(),
        mean = report.mean,
        max = report.max,
        failed = report.failed.len(),
        "relative comparison"
    );
    Ok(report)
}

/// How the absolute and relative verdicts are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Combine {
    /// Failed only if both comparisons fail.
    And,
    /// Failed if either comparison fails.
    #[default]
    Or,
}

impl Combine {
    /// Applies the combinator to two verdicts.
    pub fn apply(self, absolute: bool, relative: bool) -> bool {
        match self {
            Self::And => absolute && relative,
            Self::Or => absolute || relative,
        }
    }
}

/// Parameters for [`compare`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompareOptions {
    /// Extra evenly spaced points added to the overlap grid.
    #[serde(default = "default_density")]
    pub density: usize,

    /// Threshold for the absolute difference.
    #[serde(default = "default_absolute_tolerance")]
    pub absolute_tolerance: f64,

    /// Threshold for the relative difference.
    #[serde(default = "default_relative_tolerance")]
    pub relative_tolerance: f64,

    /// How the two verdicts are combined.
    #[serde(default)]
    pub combine: Combine,
}

fn default_density() -> usize {
    100
}

fn default_absolute_tolerance() -> f64 {
    1e-6
}

fn default_relative_tolerance() -> f64 {
    1e-3
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            density: default_density(),
            absolute_tolerance: default_absolute_tolerance(),
            relative_tolerance: default_relative_tolerance(),
            combine: Combine::default(),
        }
    }
}

/// Both comparison reports and their combined verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedReport {
    /// Absolute-difference report.
    pub absolute: DiffReport,
    /// Relative-difference report.
    pub relative: DiffReport,
    /// Combinator that produced `is_failed`.
    pub combine: Combine,
    /// Combined verdict.
    pub is_failed: bool,
}

/// Runs both comparisons, each with its own tolerance, and combines the verdicts.
pub fn compare(a: &Curve, b: &Curve, options: &CompareOptions) -> CurveResult<CombinedReport> {
    let absolute = abs_diff(a, b, options.density, options.absolute_tolerance)?;
    let relative = rel_diff(a, b, options.density, options.relative_tolerance)?;
    let is_failed = options.combine.apply(absolute.is_failed, relative.is_failed);
    Ok(CombinedReport {
        absolute,
        relative,
        combine: options.combine,
        is_failed,
    })
}

/// Order of the distance computed by [`norm`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormOrder {
    /// `(∫ |a - b|^p dx)^(1/p)`.
    P(f64),
    /// `max |a - b|`.
    Infinity,
}

/// Distance between two curves over `[xmin, xmax]`.
///
/// The curves are union-matched, so each keeps its own boundary policy where
/// the other extends further. A missing bound defaults to the matched
/// domain's edge; bounds inside the domain are interpolated onto the grid.
///
/// # Errors
///
/// Returns [`CurveError::InvalidParameter`] for `p <= 0`, a non-finite `p` or
/// an inverted window, and [`CurveError::InsufficientOverlap`] if fewer than
/// two points fall inside the window.
pub fn norm(
    a: &Curve,
    b: &Curve,
    order: NormOrder,
    xmin: Option<f64>,
    xmax: Option<f64>,
) -> CurveResult<f64> {
    if let NormOrder::P(p) = order {
        if !(p > 0.0 && p.is_finite()) {
            return Err(CurveError::invalid_parameter(format!(
                "norm order must be positive and finite, got {p}"
            )));
        }
    }
    if let (Some(lo), Some(hi)) = (xmin, xmax) {
        if lo > hi {
            return Err(CurveError::invalid_parameter(format!(
                "empty norm window [{lo}, {hi}]"
            )));
        }
    }

    let (ma, mb) = match_domains(a, b, MatchMode::Union)?;
    let (dmin, dmax) = ma
        .domain()
        .ok_or_else(|| CurveError::insufficient_overlap(MIN_SHARED_POINTS, 0))?;
    let lo = xmin.map_or(dmin, |v| v.max(dmin));
    let hi = xmax.map_or(dmax, |v| v.min(dmax));
    if !(hi > lo) {
        let got = usize::from(hi == lo);
        return Err(CurveError::insufficient_overlap(MIN_SHARED_POINTS, got));
    }

    let diff: Vec<f64> = ma.y().iter().zip(mb.y()).map(|(p, q)| (p - q).abs()).collect();
    let diff = ma.derive("diff", ma.x().to_vec(), diff);
    let inside: Vec<f64> = diff.x().iter().copied().filter(|&x| x >= lo && x <= hi).collect();
    let grid = union_sorted(&[inside.as_slice(), &[lo, hi]]);
    if grid.len() < MIN_SHARED_POINTS {
        return Err(CurveError::insufficient_overlap(MIN_SHARED_POINTS, grid.len()));
    }

    let interpolator = diff.interpolator()?;
    let values = grid
        .iter()
        .map(|&x| interpolator.interpolate(x))
        .collect::<Result<Vec<_>, _>>()?;

    let value = match order {
        NormOrder::Infinity => values.iter().copied().fold(0.0, f64::max),
        NormOrder::P(p) => {
            let powered: Vec<f64> = values.iter().map(|d| d.powf(p)).collect();
            trapezoid(&grid, &powered).powf(p.recip())
        }
    };
    debug!(?order, lo, hi, value, "curve norm");
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn curve(name: &str, x: &[f64], y: &[f64]) -> Curve {
        Curve::new(name, x.to_vec(), y.to_vec()).unwrap()
    }

    #[test]
    fn test_abs_diff_statistics() {
        let a = curve("a", &[0.0, 1.0, 2.0], &[0.0, 1.0, 2.0]);
        let b = curve("b", &[0.0, 1.0, 2.0], &[0.0, 1.0, 3.0]);
        let report = abs_diff(&a, &b, 0, 0.5).unwrap();

        assert_eq!(report.diff.name(), "absdiff(a, b)");
        assert_eq!(report.diff.y(), &[0.0, 0.0, 1.0]);
        assert_relative_eq!(report.mean, 1.0 / 3.0, epsilon = 1e-12);
        assert_eq!(report.max, 1.0);
        // ∫ over [1, 2] of a ramp 0 -> 1 is 0.5, over a width of 2
        assert_relative_eq!(report.integrated, 0.25, epsilon = 1e-12);
        assert_eq!(report.failed.x(), &[2.0]);
        assert!(report.is_failed);
    }

    #[test]
    fn test_abs_diff_passes_within_tolerance() {
        let a = curve("a", &[0.0, 1.0], &[1.0, 1.0]);
        let b = curve("b", &[0.0, 1.0], &[1.05, 1.05]);
        let report = abs_diff(&a, &b, 5, 0.1).unwrap();
        assert!(!report.is_failed);
        assert!(report.failed.is_empty());
        assert_eq!(report.tolerance, 0.1);
    }

    #[test]
    fn test_abs_diff_uses_overlap_only() {
        let a = curve("a", &[0.0, 10.0], &[0.0, 0.0]);
        let b = curve("b", &[4.0, 6.0], &[1.0, 1.0]);
        let report = abs_diff(&a, &b, 3, 0.5).unwrap();
        assert_eq!(report.diff.x(), &[4.0, 5.0, 6.0]);
        assert_eq!(report.diff.y(), &[1.0; 3]);
    }

    #[test]
    fn test_rel_diff_denominator_uses_full_range() {
        let a = curve("a", &[0.0, 1.0, 2.0], &[0.0, 0.0, 10.0]);
        let b = curve("b", &[0.0, 1.0], &[0.0, 1.0]);
        let report = rel_diff(&a, &b, 0, 0.1).unwrap();

        // range(a) = 10, range(b) = 1, so the floor is 1.1
        assert_eq!(report.diff.x(), &[0.0, 1.0]);
        assert_relative_eq!(report.diff.y()[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(report.diff.y()[1], 1.0 / 2.1, epsilon = 1e-12);
    }

    #[test]
    fn test_rel_diff_of_zero_curves_is_zero() {
        let a = curve("a", &[0.0, 1.0], &[0.0, 0.0]);
        let report = rel_diff(&a, &a, 2, 0.0).unwrap();
        assert!(report.diff.y().iter().all(|&v| v == 0.0));
        assert!(!report.is_failed);
    }

    #[test]
    fn test_no_overlap_is_an_error() {
        let a = curve("a", &[0.0, 1.0], &[0.0, 1.0]);
        let b = curve("b", &[2.0, 3.0], &[0.0, 1.0]);
        assert!(matches!(
            abs_diff(&a, &b, 10, 0.1),
            Err(CurveError::InsufficientOverlap { .. })
        ));
    }

    #[test]
    fn test_combine() {
        assert!(Combine::Or.apply(true, false));
        assert!(!Combine::And.apply(true, false));
        assert!(Combine::And.apply(true, true));

        let a = curve("a", &[0.0, 1.0], &[100.0, 100.0]);
        let b = curve("b", &[0.0, 1.0], &[100.01, 100.01]);
        let options = CompareOptions {
            density: 0,
            absolute_tolerance: 1e-3,
            relative_tolerance: 1e-3,
            combine: Combine::And,
        };
        let report = compare(&a, &b, &options).unwrap();
        assert!(report.absolute.is_failed);
        assert!(!report.relative.is_failed);
        assert!(!report.is_failed);

        let report = compare(&a, &b, &CompareOptions { combine: Combine::Or, ..options }).unwrap();
        assert!(report.is_failed);
    }

    #[test]
    fn test_l2_norm_of_sawtooth() {
        let a = curve("a", &[0.0, 1.0, 2.0, 3.0], &[0.0, 1.0, 0.0, 1.0]);
        let b = curve("b", &[0.0, 1.0, 2.0, 3.0], &[0.0; 4]);
        let l2 = norm(&a, &b, NormOrder::P(2.0), Some(0.0), Some(3.0)).unwrap();
        assert_relative_eq!(l2 * l2, 1.5, epsilon = 1e-12);

        let l1 = norm(&a, &b, NormOrder::P(1.0), None, None).unwrap();
        assert_relative_eq!(l1, 1.5, epsilon = 1e-12);
        assert_eq!(norm(&a, &b, NormOrder::Infinity, None, None).unwrap(), 1.0);
    }

    #[test]
    fn test_norm_window_interpolates_bounds() {
        let a = curve("a", &[0.0, 2.0], &[0.0, 2.0]);
        let b = curve("b", &[0.0, 2.0], &[0.0, 0.0]);
        // ∫ x dx over [0.5, 1.5] = 1.0
        let l1 = norm(&a, &b, NormOrder::P(1.0), Some(0.5), Some(1.5)).unwrap();
        assert_relative_eq!(l1, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_norm_rejects_bad_parameters() {
        let a = curve("a", &[0.0, 1.0], &[0.0, 1.0]);
        assert!(norm(&a, &a, NormOrder::P(0.0), None, None).is_err());
        assert!(norm(&a, &a, NormOrder::P(f64::NAN), None, None).is_err());
        assert!(norm(&a, &a, NormOrder::P(2.0), Some(1.0), Some(0.0)).is_err());
        assert!(matches!(
            norm(&a, &a, NormOrder::P(2.0), Some(5.0), Some(6.0)),
            Err(CurveError::InsufficientOverlap { .. })
        ));
    }
}
