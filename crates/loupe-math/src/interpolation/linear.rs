//! Linear interpolation.

use crate::error::{MathError, MathResult};
use crate::extrapolation::BoundaryPolicy;
use crate::interpolation::Interpolator;

/// Piecewise-linear interpolation between data points.
///
/// Consecutive samples are connected with straight lines. Abscissae must be
/// non-decreasing; repeated abscissae are allowed and an exact hit on a
/// repeated value returns the last sample with that abscissa.
///
/// By default a query outside the sampled domain is an error. Use
/// [`with_extrapolation`](Self::with_extrapolation) to attach a
/// [`BoundaryPolicy`] instead.
///
/// # Example
///
/// ```rust
/// use loupe_math::interpolation::{LinearInterpolator, Interpolator};
///
/// let xs = vec![0.0, 1.0, 2.0, 3.0];
/// let ys = vec![0.0, 1.0, 4.0, 9.0];
///
/// let interp = LinearInterpolator::new(xs, ys).unwrap();
/// let y = interp.interpolate(1.5).unwrap();
/// // y = 2.5 (linear interpolation between (1, 1) and (2, 4))
/// ```
#[derive(Debug, Clone)]
pub struct LinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
    domain: (f64, f64),
    policy: BoundaryPolicy,
    period: Option<f64>,
    allow_extrapolation: bool,
}

impl LinearInterpolator {
    /// Creates a new linear interpolator.
    ///
    /// # Arguments
    ///
    /// * `xs` - X coordinates (must be sorted in ascending order)
    /// * `ys` - Y coordinates
    ///
    /// # Errors
    ///
    /// Returns an error if there are no points, if lengths differ, or if the
    /// x values decrease anywhere.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        MathError::check_lengths(&xs, &ys)?;
        if xs.is_empty() {
            return Err(MathError::insufficient_data(1, 0));
        }

        // NaN abscissae fail this comparison too
        for i in 1..xs.len() {
            if !(xs[i] >= xs[i - 1]) {
                return Err(MathError::Unsorted { index: i });
            }
        }

        let domain = (xs[0], xs[xs.len() - 1]);
        Ok(Self {
            xs,
            ys,
            domain,
            policy: BoundaryPolicy::clamped(),
            period: None,
            allow_extrapolation: false,
        })
    }

    /// Enables extrapolation beyond the data range using `policy`.
    ///
    /// # Errors
    ///
    /// Returns an error if the policy carries a zero or non-finite period.
    pub fn with_extrapolation(mut self, policy: BoundaryPolicy) -> MathResult<Self> {
        if let Some(period) = policy.checked_period()? {
            let (wx, wy) = BoundaryPolicy::wrap_table(&self.xs, &self.ys, period);
            self.xs = wx;
            self.ys = wy;
            self.period = Some(period);
        }
        self.policy = policy;
        self.allow_extrapolation = true;
        Ok(self)
    }

    /// Returns the boundary policy in effect.
    pub fn policy(&self) -> &BoundaryPolicy {
        &self.policy
    }

    /// Evaluates a query known to lie inside the sample table.
    fn eval_inside(&self, x: f64) -> f64 {
        let n = self.xs.len();
        let j = self.xs.partition_point(|&v| v <= x);
        if j == 0 {
            return self.ys[0];
        }
        let i = j - 1;
        if self.xs[i] == x || i + 1 == n {
            return self.ys[i];
        }

        let x0 = self.xs[i];
        let x1 = self.xs[i + 1];
        let y0 = self.ys[i];
        let y1 = self.ys[i + 1];

        // Linear interpolation formula
        let t = (x - x0) / (x1 - x0);
        y0 + t * (y1 - y0)
    }

    fn out_of_range(&self, x: f64) -> MathError {
        MathError::ExtrapolationNotAllowed {
            x,
            min: self.domain.0,
            max: self.domain.1,
        }
    }
}

impl Interpolator for LinearInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        if x.is_nan() {
            return Ok(f64::NAN);
        }
        if let Some(period) = self.period {
            return Ok(self.eval_inside(x.rem_euclid(period)));
        }

        let (min, max) = self.domain;
        if x < min || x > max {
            if !self.allow_extrapolation {
                return Err(self.out_of_range(x));
            }
            return Ok(if x < min {
                self.policy.below(self.ys[0])
            } else {
                self.policy.above(self.ys[self.ys.len() - 1])
            });
        }

        Ok(self.eval_inside(x))
    }

    fn min_x(&self) -> f64 {
        self.domain.0
    }

    fn max_x(&self) -> f64 {
        self.domain.1
    }
}
