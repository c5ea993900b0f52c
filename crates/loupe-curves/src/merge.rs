//! Exact-match merging of curves.
//!
//! Appending does not resample. The result's domain is the sorted union of
//! every input abscissa, and wherever several samples share an abscissa
//! (within one curve or across curves) their values are averaged.
//!
//! A merged point remembers how many original samples it averages (see
//! [`Curve::sample_counts`]), so merging a merge weights it correctly and
//! pairwise chaining gives the same averages under any grouping.

use tracing::debug;

use crate::curve::Curve;
use crate::error::{CurveError, CurveResult};

/// Merges two curves, averaging samples at coincident x.
///
/// # Example
///
/// ```rust
/// use loupe_curves::{merge::append, Curve};
///
/// let a = Curve::new("a", vec![1.0, 2.0, 3.0], vec![10.0, 20.0, 30.0]).unwrap();
/// let b = Curve::new("b", vec![2.0, 3.0, 4.0], vec![22.0, 28.0, 40.0]).unwrap();
/// let c = append(&a, &b);
/// assert_eq!(c.x(), &[1.0, 2.0, 3.0, 4.0]);
/// assert_eq!(c.y(), &[10.0, 21.0, 29.0, 40.0]);
/// ```
pub fn append(a: &Curve, b: &Curve) -> Curve {
    merge_samples(a, &[a, b])
}

/// Merges any number of curves at once, averaging every sample that shares
/// an abscissa. Equivalent to a left fold of [`append`].
///
/// # Errors
///
/// Returns [`CurveError::InvalidParameter`] for an empty slice.
pub fn append_all(curves: &[Curve]) -> CurveResult<Curve> {
    let first = curves
        .first()
        .ok_or_else(|| CurveError::invalid_parameter("no curves to append"))?;
    let refs: Vec<&Curve> = curves.iter().collect();
    Ok(merge_samples(first, &refs))
}

fn merge_samples(template: &Curve, curves: &[&Curve]) -> Curve {
    let mut samples: Vec<(f64, f64, usize)> =
        curves.iter().flat_map(|c| c.weighted_points()).collect();
    samples.sort_by(|p, q| p.0.total_cmp(&q.0));

    let mut x: Vec<f64> = Vec::with_capacity(samples.len());
    let mut y: Vec<f64> = Vec::with_capacity(samples.len());
    let mut counts: Vec<usize> = Vec::with_capacity(samples.len());
    let mut group_sum = 0.0;

    for (sx, sy, weight) in samples {
        let weighted = sy * weight as f64;
        if x.last() == Some(&sx) {
            if let (Some(mean), Some(count)) = (y.last_mut(), counts.last_mut()) {
                group_sum += weighted;
                *count += weight;
                *mean = group_sum / *count as f64;
            }
        } else {
            x.push(sx);
            y.push(sy);
            counts.push(weight);
            group_sum = weighted;
        }
    }

    let name = curves
        .iter()
        .map(|c| c.name())
        .collect::<Vec<_>>()
        .join(" & ");
    debug!(inputs = curves.len(), points = x.len(), "appended curves");
    template.derive(name, x, y).with_counts(counts)
}
