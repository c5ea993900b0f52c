//! Boundary policies for queries outside a sampled domain.
//!
//! Every sampled curve carries a [`BoundaryPolicy`] that decides what an
//! interpolation returns when it is asked for a value outside the curve's
//! domain:
//!
//! | Setting | Behaviour below the domain | Behaviour above the domain |
//! |---------|----------------------------|----------------------------|
//! | default | first sample's y (flat) | last sample's y (flat) |
//! | `left = Some(v)` | `v` | unchanged |
//! | `right = Some(v)` | unchanged | `v` |
//! | `period = Some(p)` | wraps modulo `p` | wraps modulo `p` |
//!
//! A period overrides `left` and `right`.
//!
//! # Example
//!
//! ```rust
//! use loupe_math::extrapolation::BoundaryPolicy;
//!
//! let policy = BoundaryPolicy::clamped().with_left(0.0);
//! assert_eq!(policy.below(5.0), 0.0);
//! assert_eq!(policy.above(7.0), 7.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{MathError, MathResult};

/// Out-of-range behaviour of an interpolation source.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundaryPolicy {
    /// Value returned below the domain. `None` holds the first sample flat.
    #[serde(default)]
    pub left: Option<f64>,
    /// Value returned above the domain. `None` holds the last sample flat.
    #[serde(default)]
    pub right: Option<f64>,
    /// Period of the domain. Queries are reduced modulo `|period|`.
    #[serde(default)]
    pub period: Option<f64>,
}

impl BoundaryPolicy {
    /// Flat extension from both boundary samples.
    #[must_use]
    pub const fn clamped() -> Self {
        Self {
            left: None,
            right: None,
            period: None,
        }
    }

    /// The same fixed value on both sides of the domain.
    #[must_use]
    pub const fn fixed(value: f64) -> Self {
        Self {
            left: Some(value),
            right: Some(value),
            period: None,
        }
    }

    /// Sets the value returned below the domain.
    #[must_use]
    pub const fn with_left(mut self, value: f64) -> Self {
        self.left = Some(value);
        self
    }

    /// Sets the value returned above the domain.
    #[must_use]
    pub const fn with_right(mut self, value: f64) -> Self {
        self.right = Some(value);
        self
    }

    /// Makes the domain periodic.
    #[must_use]
    pub const fn with_period(mut self, period: f64) -> Self {
        self.period = Some(period);
        self
    }

    /// Value for a query below the domain, given the first sample's y.
    pub fn below(&self, first_y: f64) -> f64 {
        self.left.unwrap_or(first_y)
    }

    /// Value for a query above the domain, given the last sample's y.
    pub fn above(&self, last_y: f64) -> f64 {
        self.right.unwrap_or(last_y)
    }

    /// Validated absolute period, if any.
    pub(crate) fn checked_period(&self) -> MathResult<Option<f64>> {
        match self.period {
            None => Ok(None),
            Some(p) if p.is_finite() && p != 0.0 => Ok(Some(p.abs())),
            Some(p) => Err(MathError::invalid_input(format!(
                "period must be finite and non-zero, got {p}"
            ))),
        }
    }

    /// Builds the wrapped sample table for a periodic domain.
    ///
    /// Abscissae are reduced into `[0, period)`, re-sorted, and padded with one
    /// wrapped sample on each side so every reduced query is bracketed.
    pub(crate) fn wrap_table(xs: &[f64], ys: &[f64], period: f64) -> (Vec<f64>, Vec<f64>) {
        let mut pairs: Vec<(f64, f64)> = xs
            .iter()
            .zip(ys)
            .map(|(&x, &y)| (x.rem_euclid(period), y))
            .collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut wx = Vec::with_capacity(pairs.len() + 2);
        let mut wy = Vec::with_capacity(pairs.len() + 2);
        if let (Some(&first), Some(&last)) = (pairs.first(), pairs.last()) {
            wx.push(last.0 - period);
            wy.push(last.1);
            for (x, y) in &pairs {
                wx.push(*x);
                wy.push(*y);
            }
            wx.push(first.0 + period);
            wy.push(first.1);
        }
        (wx, wy)
    }
}
