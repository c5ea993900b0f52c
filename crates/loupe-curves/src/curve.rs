//! The sampled curve entity.
//!
//! A [`Curve`] is a named pair of equal-length `x`/`y` sample arrays plus the
//! [`BoundaryPolicy`] consulted whenever the curve is the source of an
//! interpolation. Every engine operation returns a new `Curve`; the only
//! mutators are the explicit shift/scale/rename helpers on this type.

use std::fmt;

use loupe_math::extrapolation::BoundaryPolicy;
use loupe_math::interpolation::{interp, sort_pairs, Interpolator, LinearInterpolator};
use serde::{Deserialize, Serialize};

use crate::error::{Axis, CurveError, CurveResult};

/// Descriptive metadata carried alongside the samples.
///
/// None of it affects the arithmetic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveMeta {
    /// Label of the x axis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xlabel: Option<String>,
    /// Label of the y axis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ylabel: Option<String>,
    /// Where the curve was loaded from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Wire form of a curve; converted through [`Curve::new`] so the length
/// invariant holds for deserialized curves too.
#[derive(Serialize, Deserialize)]
struct CurveRecord {
    name: String,
    x: Vec<f64>,
    y: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    counts: Option<Vec<usize>>,
    #[serde(default)]
    policy: BoundaryPolicy,
    #[serde(default)]
    meta: CurveMeta,
}

/// A named, sampled 1-D function.
///
/// # Example
///
/// ```rust
/// use loupe_curves::Curve;
///
/// let curve = Curve::new("ramp", vec![0.0, 1.0, 2.0], vec![0.0, 2.0, 4.0]).unwrap();
/// assert_eq!(curve.len(), 3);
/// assert_eq!(curve.y_at(1.5).unwrap(), 3.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CurveRecord", into = "CurveRecord")]
pub struct Curve {
    name: String,
    x: Vec<f64>,
    y: Vec<f64>,
    /// Original samples averaged into each point; `None` means one each.
    counts: Option<Vec<usize>>,
    policy: BoundaryPolicy,
    meta: CurveMeta,
}

impl TryFrom<CurveRecord> for Curve {
    type Error = CurveError;

    fn try_from(record: CurveRecord) -> CurveResult<Self> {
        let mut curve = Curve::new(record.name, record.x, record.y)?
            .with_policy(record.policy)
            .with_meta(record.meta);
        if let Some(counts) = record.counts {
            if counts.len() != curve.len() || counts.contains(&0) {
                return Err(CurveError::invalid_parameter(format!(
                    "sample counts must be {} positive integers",
                    curve.len()
                )));
            }
            curve = curve.with_counts(counts);
        }
        Ok(curve)
    }
}

impl From<Curve> for CurveRecord {
    fn from(curve: Curve) -> Self {
        Self {
            name: curve.name,
            x: curve.x,
            y: curve.y,
            counts: curve.counts,
            policy: curve.policy,
            meta: curve.meta,
        }
    }
}

impl Curve {
    /// Creates a curve from paired samples.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::ShapeMismatch`] if `x` and `y` differ in length.
    /// The data is never truncated to make them fit.
    pub fn new(name: impl Into<String>, x: Vec<f64>, y: Vec<f64>) -> CurveResult<Self> {
        let name = name.into();
        if x.len() != y.len() {
            return Err(CurveError::ShapeMismatch {
                name,
                x_len: x.len(),
                y_len: y.len(),
            });
        }
        Ok(Self {
            name,
            x,
            y,
            counts: None,
            policy: BoundaryPolicy::default(),
            meta: CurveMeta::default(),
        })
    }

    /// Creates a curve from `(x, y)` pairs.
    pub fn from_points(name: impl Into<String>, points: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let (x, y) = points.into_iter().unzip();
        Self {
            name: name.into(),
            x,
            y,
            counts: None,
            policy: BoundaryPolicy::default(),
            meta: CurveMeta::default(),
        }
    }

    /// Builds an operation result that inherits this curve's labels.
    ///
    /// Callers guarantee `x.len() == y.len()`.
    pub(crate) fn derive(&self, name: impl Into<String>, x: Vec<f64>, y: Vec<f64>) -> Self {
        debug_assert_eq!(x.len(), y.len());
        Self {
            name: name.into(),
            x,
            y,
            counts: None,
            policy: BoundaryPolicy::default(),
            meta: CurveMeta {
                source: None,
                ..self.meta.clone()
            },
        }
    }

    /// Records how many original samples each point averages.
    ///
    /// Callers guarantee one positive count per sample. All-ones is stored as
    /// `None` so merged and unmerged curves compare equal.
    pub(crate) fn with_counts(mut self, counts: Vec<usize>) -> Self {
        debug_assert_eq!(counts.len(), self.len());
        self.counts = counts.iter().any(|&c| c > 1).then_some(counts);
        self
    }

    /// Sets the interpolation boundary policy.
    #[must_use]
    pub fn with_policy(mut self, policy: BoundaryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the axis labels.
    #[must_use]
    pub fn with_labels(mut self, xlabel: impl Into<String>, ylabel: impl Into<String>) -> Self {
        self.meta.xlabel = Some(xlabel.into());
        self.meta.ylabel = Some(ylabel.into());
        self
    }

    /// Records where the curve came from.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.meta.source = Some(source.into());
        self
    }

    /// Replaces all descriptive metadata.
    #[must_use]
    pub fn with_meta(mut self, meta: CurveMeta) -> Self {
        self.meta = meta;
        self
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Domain samples.
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Value samples.
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Interpolation boundary policy.
    pub fn policy(&self) -> &BoundaryPolicy {
        &self.policy
    }

    /// Descriptive metadata.
    pub fn meta(&self) -> &CurveMeta {
        &self.meta
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Returns true if the curve has no samples.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Number of original samples averaged into each point, if any point
    /// stands for more than one.
    ///
    /// Only [`append`](crate::merge::append) produces counts; every other
    /// operation returns a curve without them.
    pub fn sample_counts(&self) -> Option<&[usize]> {
        self.counts.as_deref()
    }

    /// Iterates over `(x, y, count)` in storage order.
    pub(crate) fn weighted_points(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        let counts = self.counts.as_deref();
        self.points()
            .enumerate()
            .map(move |(i, (x, y))| (x, y, counts.map_or(1, |c| c[i])))
    }

    /// Iterates over `(x, y)` pairs in storage order.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }

    /// Smallest and largest x, or `None` for an empty curve.
    pub fn domain(&self) -> Option<(f64, f64)> {
        min_max(&self.x)
    }

    /// Smallest and largest y, or `None` for an empty curve.
    pub fn range(&self) -> Option<(f64, f64)> {
        min_max(&self.y)
    }

    /// Returns true if x is non-decreasing.
    pub fn is_sorted(&self) -> bool {
        self.x.windows(2).all(|w| w[0] <= w[1])
    }

    /// Returns a copy with samples ordered by x. Ties keep their order.
    #[must_use]
    pub fn sorted(&self) -> Self {
        if self.is_sorted() {
            return self.clone();
        }
        let mut out = self.clone();
        let order = {
            let mut order: Vec<usize> = (0..self.len()).collect();
            order.sort_by(|&i, &j| self.x[i].total_cmp(&self.x[j]));
            order
        };
        out.x = order.iter().map(|&i| self.x[i]).collect();
        out.y = order.iter().map(|&i| self.y[i]).collect();
        out.counts = self
            .counts
            .as_ref()
            .map(|c| order.iter().map(|&i| c[i]).collect());
        out
    }

    /// Linear interpolator over the sorted samples using this curve's policy.
    pub fn interpolator(&self) -> CurveResult<LinearInterpolator> {
        let (xs, ys) = sort_pairs(&self.x, &self.y)?;
        Ok(LinearInterpolator::new(xs, ys)?.with_extrapolation(self.policy)?)
    }

    /// Evaluates the curve at every query point, applying its boundary policy.
    pub fn resample(&self, query: &[f64]) -> CurveResult<Vec<f64>> {
        if self.is_empty() {
            return Err(CurveError::insufficient_points(1, 0));
        }
        let (xs, ys) = sort_pairs(&self.x, &self.y)?;
        Ok(interp(query, &xs, &ys, &self.policy)?)
    }

    /// Value of the curve at `x`.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::ValueOutOfRange`] if `x` lies outside the domain;
    /// the boundary policy is deliberately not consulted.
    pub fn y_at(&self, x: f64) -> CurveResult<f64> {
        if self.is_empty() {
            return Err(CurveError::insufficient_points(1, 0));
        }
        let (xs, ys) = sort_pairs(&self.x, &self.y)?;
        let interpolator = LinearInterpolator::new(xs, ys)?;
        if !interpolator.in_range(x) {
            return Err(CurveError::ValueOutOfRange {
                axis: Axis::X,
                value: x,
                min: interpolator.min_x(),
                max: interpolator.max_x(),
            });
        }
        Ok(interpolator.interpolate(x)?)
    }

    /// Every x at which the piecewise-linear curve takes the value `y`.
    ///
    /// Flat segments at exactly `y` report their endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::ValueOutOfRange`] if `y` lies outside the curve's
    /// y range.
    pub fn x_at(&self, y: f64) -> CurveResult<Vec<f64>> {
        let (min, max) = self
            .range()
            .ok_or_else(|| CurveError::insufficient_points(1, 0))?;
        if !(y >= min && y <= max) {
            return Err(CurveError::ValueOutOfRange {
                axis: Axis::Y,
                value: y,
                min,
                max,
            });
        }

        let sorted = self.sorted();
        let (xs, ys) = (&sorted.x, &sorted.y);
        let mut hits: Vec<f64> = Vec::new();
        let mut push = |x: f64| {
            if hits.last() != Some(&x) {
                hits.push(x);
            }
        };

        for i in 0..xs.len().saturating_sub(1) {
            let (x0, x1, y0, y1) = (xs[i], xs[i + 1], ys[i], ys[i + 1]);
            if y0 == y {
                push(x0);
            } else if (y0 < y && y < y1) || (y1 < y && y < y0) {
                push(x0 + (y - y0) * (x1 - x0) / (y1 - y0));
            }
        }
        if let (Some(&x), Some(&last)) = (xs.last(), ys.last()) {
            if last == y {
                push(x);
            }
        }
        Ok(hits)
    }

    /// Keeps only the samples with `xmin <= x <= xmax`.
    #[must_use]
    pub fn restrict(&self, xmin: f64, xmax: f64) -> Self {
        let keep: Vec<usize> = (0..self.len())
            .filter(|&i| self.x[i] >= xmin && self.x[i] <= xmax)
            .collect();
        Self {
            x: keep.iter().map(|&i| self.x[i]).collect(),
            y: keep.iter().map(|&i| self.y[i]).collect(),
            counts: self
                .counts
                .as_ref()
                .map(|c| keep.iter().map(|&i| c[i]).collect()),
            ..self.clone()
        }
    }

    /// Renames the curve in place.
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Adds `dx` to every x in place.
    pub fn shift_x(&mut self, dx: f64) {
        self.x.iter_mut().for_each(|x| *x += dx);
    }

    /// Multiplies every x by `factor` in place.
    pub fn scale_x(&mut self, factor: f64) {
        self.x.iter_mut().for_each(|x| *x *= factor);
    }

    /// Adds `dy` to every y in place.
    pub fn shift_y(&mut self, dy: f64) {
        self.y.iter_mut().for_each(|y| *y += dy);
    }

    /// Multiplies every y by `factor` in place.
    pub fn scale_y(&mut self, factor: f64) {
        self.y.iter_mut().for_each(|y| *y *= factor);
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.domain() {
            Some((lo, hi)) => write!(f, "{} ({} points on [{lo}, {hi}])", self.name, self.len()),
            None => write!(f, "{} (empty)", self.name),
        }
    }
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ramp() -> Curve {
        Curve::new("ramp", vec![0.0, 1.0, 2.0], vec![0.0, 2.0, 4.0]).unwrap()
    }

    #[test]
    fn test_shape_mismatch_is_raised() {
        let err = Curve::new("bad", vec![0.0, 1.0], vec![1.0]).unwrap_err();
        assert_eq!(
            err,
            CurveError::ShapeMismatch {
                name: "bad".into(),
                x_len: 2,
                y_len: 1
            }
        );
    }

    #[test]
    fn test_domain_and_range() {
        let c = Curve::new("c", vec![3.0, -1.0, 2.0], vec![5.0, 7.0, -2.0]).unwrap();
        assert_eq!(c.domain(), Some((-1.0, 3.0)));
        assert_eq!(c.range(), Some((-2.0, 7.0)));
        assert_eq!(Curve::new("e", vec![], vec![]).unwrap().domain(), None);
    }

    #[test]
    fn test_sorted_keeps_pairs() {
        let c = Curve::new("c", vec![2.0, 0.0, 1.0], vec![20.0, 0.0, 10.0]).unwrap();
        assert!(!c.is_sorted());
        let s = c.sorted();
        assert_eq!(s.x(), &[0.0, 1.0, 2.0]);
        assert_eq!(s.y(), &[0.0, 10.0, 20.0]);
        assert_eq!(s.name(), "c");
    }

    #[test]
    fn test_y_at() {
        let c = ramp();
        assert_relative_eq!(c.y_at(0.25).unwrap(), 0.5, epsilon = 1e-12);
        assert!(matches!(
            c.y_at(2.5),
            Err(CurveError::ValueOutOfRange { axis: Axis::X, .. })
        ));
    }

    #[test]
    fn test_x_at_multiple_crossings() {
        let c = Curve::new("tri", vec![0.0, 1.0, 2.0], vec![0.0, 2.0, 0.0]).unwrap();
        let xs = c.x_at(1.0).unwrap();
        assert_eq!(xs.len(), 2);
        assert_relative_eq!(xs[0], 0.5, epsilon = 1e-12);
        assert_relative_eq!(xs[1], 1.5, epsilon = 1e-12);

        assert_eq!(c.x_at(2.0).unwrap(), vec![1.0]);
        assert!(matches!(
            c.x_at(3.0),
            Err(CurveError::ValueOutOfRange { axis: Axis::Y, .. })
        ));
    }

    #[test]
    fn test_resample_uses_policy() {
        let c = ramp().with_policy(BoundaryPolicy::fixed(-1.0));
        let values = c.resample(&[-1.0, 0.5, 3.0]).unwrap();
        assert_eq!(values, vec![-1.0, 1.0, -1.0]);
    }

    #[test]
    fn test_in_place_helpers() {
        let mut c = ramp();
        c.shift_x(1.0);
        c.scale_y(0.5);
        c.rename("moved");
        assert_eq!(c.x(), &[1.0, 2.0, 3.0]);
        assert_eq!(c.y(), &[0.0, 1.0, 2.0]);
        assert_eq!(c.name(), "moved");
    }

    #[test]
    fn test_restrict() {
        let c = ramp().restrict(0.5, 2.0);
        assert_eq!(c.x(), &[1.0, 2.0]);
        assert_eq!(c.y(), &[2.0, 4.0]);
    }

    #[test]
    fn test_counts_follow_sort_and_restrict() {
        let c = Curve::new("c", vec![2.0, 0.0, 1.0], vec![20.0, 0.0, 10.0])
            .unwrap()
            .with_counts(vec![3, 1, 2]);
        assert_eq!(c.sorted().sample_counts(), Some(&[1, 2, 3][..]));
        assert_eq!(c.restrict(1.0, 2.0).sample_counts(), Some(&[3, 2][..]));

        let ones = ramp().with_counts(vec![1, 1, 1]);
        assert_eq!(ones.sample_counts(), None);
        assert_eq!(ones, ramp());
    }

    #[test]
    fn test_serde_keeps_counts() {
        let c = ramp().with_counts(vec![1, 4, 1]);
        let json = serde_json::to_string(&c).unwrap();
        let back: Curve = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);

        let json = r#"{"name":"c","x":[0.0,1.0],"y":[1.0,2.0],"counts":[1]}"#;
        assert!(serde_json::from_str::<Curve>(json).is_err());
        let json = r#"{"name":"c","x":[0.0,1.0],"y":[1.0,2.0],"counts":[0,2]}"#;
        assert!(serde_json::from_str::<Curve>(json).is_err());
    }

    #[test]
    fn test_serde_rejects_mismatched_lengths() {
        let json = r#"{"name":"c","x":[0.0,1.0],"y":[1.0]}"#;
        assert!(serde_json::from_str::<Curve>(json).is_err());

        let json = r#"{"name":"c","x":[0.0,1.0],"y":[1.0,2.0]}"#;
        let c: Curve = serde_json::from_str(json).unwrap();
        assert_eq!(c.policy(), &BoundaryPolicy::default());
    }
}
