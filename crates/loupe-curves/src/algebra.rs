//! Curve arithmetic.
//!
//! Binary operators first bring both operands onto their union domain (see
//! [`crate::matching`]) and then combine the matched y arrays elementwise.
//! Operators are a closed enumeration so callers that pick one at runtime get
//! exhaustive matching instead of string dispatch.
//!
//! Two degenerate cases have fixed results rather than errors:
//!
//! - a zero denominator in [`divide`] yields [`DIVIDE_BY_ZERO_SENTINEL`]
//! - a NaN produced by [`power`] or a [`UnaryOp`] drops that sample

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::curve::Curve;
use crate::error::{CurveError, CurveResult};
use crate::matching::{match_domains, MatchMode};

/// Value written where a denominator was exactly zero.
///
/// This is the largest signed 64-bit integer converted to `f64`. Existing
/// scripts test for it, so it is kept in preference to NaN or infinity.
pub const DIVIDE_BY_ZERO_SENTINEL: f64 = i64::MAX as f64;

/// Substitute denominator used while dividing by an exact zero.
pub const ZERO_DENOMINATOR_EPSILON: f64 = 1e-9;

/// What a division writes where the denominator is exactly zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DivideByZero {
    /// Write [`DIVIDE_BY_ZERO_SENTINEL`].
    #[default]
    Sentinel,
    /// Write NaN.
    NotANumber,
}

impl DivideByZero {
    fn divide(self, numerator: f64, denominator: f64) -> f64 {
        let zero = denominator == 0.0;
        let quotient = numerator / if zero { ZERO_DENOMINATOR_EPSILON } else { denominator };
        match (zero, self) {
            (false, _) => quotient,
            (true, Self::Sentinel) => DIVIDE_BY_ZERO_SENTINEL,
            (true, Self::NotANumber) => f64::NAN,
        }
    }
}

/// Elementwise binary operators between two curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    /// `a + b`
    Add,
    /// `a - b`
    Subtract,
    /// `a * b`
    Multiply,
    /// `a / b`
    Divide,
    /// Pointwise maximum.
    Max,
    /// Pointwise minimum.
    Min,
}

impl BinaryOp {
    /// Every operator, in declaration order.
    pub const ALL: [BinaryOp; 6] = [
        Self::Add,
        Self::Subtract,
        Self::Multiply,
        Self::Divide,
        Self::Max,
        Self::Min,
    ];

    /// Symbol used in composed result names.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Max => "max",
            Self::Min => "min",
        }
    }

    /// Applies the operator to two curves on their union domain.
    pub fn apply(self, a: &Curve, b: &Curve) -> CurveResult<Curve> {
        self.apply_with(a, b, DivideByZero::default())
    }

    /// Applies the operator with an explicit divide-by-zero policy.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::InsufficientOverlap`] if the union domain has
    /// fewer than two points.
    pub fn apply_with(self, a: &Curve, b: &Curve, on_zero: DivideByZero) -> CurveResult<Curve> {
        self.apply_matched(a, b, MatchMode::Union, on_zero)
    }

    /// Applies the operator after pairing the operands with `mode`.
    pub fn apply_matched(
        self,
        a: &Curve,
        b: &Curve,
        mode: MatchMode,
        on_zero: DivideByZero,
    ) -> CurveResult<Curve> {
        let (ma, mb) = match_domains(a, b, mode)?;
        let y = ma
            .y()
            .iter()
            .zip(mb.y())
            .map(|(&p, &q)| self.combine_values(p, q, on_zero))
            .collect();
        Ok(a.derive(self.label(a.name(), b.name()), ma.x().to_vec(), y))
    }

    /// Applies the operator between a curve and a constant.
    pub fn apply_scalar(self, curve: &Curve, value: f64, on_zero: DivideByZero) -> Curve {
        let y = curve
            .y()
            .iter()
            .map(|&p| self.combine_values(p, value, on_zero))
            .collect();
        curve.derive(
            self.label(curve.name(), &value.to_string()),
            curve.x().to_vec(),
            y,
        )
    }

    fn combine_values(self, p: f64, q: f64, on_zero: DivideByZero) -> f64 {
        match self {
            Self::Add => p + q,
            Self::Subtract => p - q,
            Self::Multiply => p * q,
            Self::Divide => on_zero.divide(p, q),
            Self::Max => p.max(q),
            Self::Min => p.min(q),
        }
    }

    fn label(self, a: &str, b: &str) -> String {
        match self {
            Self::Max | Self::Min => format!("{}({a}, {b})", self.symbol()),
            _ => format!("{a} {} {b}", self.symbol()),
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// `a + b` on the union domain.
pub fn add(a: &Curve, b: &Curve) -> CurveResult<Curve> {
    BinaryOp::Add.apply(a, b)
}

/// `a - b` on the union domain.
pub fn subtract(a: &Curve, b: &Curve) -> CurveResult<Curve> {
    BinaryOp::Subtract.apply(a, b)
}

/// `a * b` on the union domain.
pub fn multiply(a: &Curve, b: &Curve) -> CurveResult<Curve> {
    BinaryOp::Multiply.apply(a, b)
}

/// `a / b` on the union domain; zero denominators yield the sentinel.
pub fn divide(a: &Curve, b: &Curve) -> CurveResult<Curve> {
    BinaryOp::Divide.apply(a, b)
}

/// `a / b` with an explicit divide-by-zero policy.
pub fn divide_with(a: &Curve, b: &Curve, on_zero: DivideByZero) -> CurveResult<Curve> {
    BinaryOp::Divide.apply_with(a, b, on_zero)
}

/// Left fold of `op` over `curves`.
///
/// # Errors
///
/// Returns [`CurveError::InvalidParameter`] for an empty slice, or whatever
/// the individual operations raise.
pub fn combine(op: BinaryOp, curves: &[Curve]) -> CurveResult<Curve> {
    let (first, rest) = curves
        .split_first()
        .ok_or_else(|| CurveError::invalid_parameter("no curves to combine"))?;
    rest.iter()
        .try_fold(first.clone(), |acc, next| op.apply(&acc, next))
}

/// `-c`.
pub fn negate(curve: &Curve) -> Curve {
    let y = curve.y().iter().map(|v| -v).collect();
    curve.derive(format!("-{}", curve.name()), curve.x().to_vec(), y)
}

/// `c ^ exponent`, dropping samples where the result is NaN.
pub fn power(curve: &Curve, exponent: f64) -> Curve {
    let name = format!("{}^{exponent}", curve.name());
    keep_defined(curve, name, |v| v.powf(exponent))
}

/// Pointwise functions of a single curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    /// Absolute value.
    Abs,
    /// Square root.
    Sqrt,
    /// Natural exponential.
    Exp,
    /// Natural logarithm.
    Ln,
    /// Base-10 logarithm.
    Log10,
    /// Sine.
    Sin,
    /// Cosine.
    Cos,
    /// Tangent.
    Tan,
    /// `1 / y`; a zero sample yields [`DIVIDE_BY_ZERO_SENTINEL`].
    Recip,
}

impl UnaryOp {
    /// Function name used in composed result names.
    pub fn name(self) -> &'static str {
        match self {
            Self::Abs => "abs",
            Self::Sqrt => "sqrt",
            Self::Exp => "exp",
            Self::Ln => "ln",
            Self::Log10 => "log10",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Recip => "recip",
        }
    }

    /// Applies the function to every y, dropping samples where it is NaN.
    pub fn apply(self, curve: &Curve) -> Curve {
        let f: fn(f64) -> f64 = match self {
            Self::Abs => f64::abs,
            Self::Sqrt => f64::sqrt,
            Self::Exp => f64::exp,
            Self::Ln => f64::ln,
            Self::Log10 => f64::log10,
            Self::Sin => f64::sin,
            Self::Cos => f64::cos,
            Self::Tan => f64::tan,
            Self::Recip => |v| DivideByZero::Sentinel.divide(1.0, v),
        };
        keep_defined(curve, format!("{}({})", self.name(), curve.name()), f)
    }
}

fn keep_defined(curve: &Curve, name: String, f: impl Fn(f64) -> f64) -> Curve {
    let (x, y): (Vec<f64>, Vec<f64>) = curve
        .points()
        .map(|(x, y)| (x, f(y)))
        .filter(|(_, y)| !y.is_nan())
        .unzip();
    let dropped = curve.len() - x.len();
    if dropped > 0 {
        debug!(curve = curve.name(), dropped, "dropped undefined samples");
    }
    curve.derive(name, x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn curve(name: &str, x: &[f64], y: &[f64]) -> Curve {
        Curve::new(name, x.to_vec(), y.to_vec()).unwrap()
    }

    #[test]
    fn test_add_names_and_domain() {
        let a = curve("A", &[0.0, 2.0], &[0.0, 2.0]);
        let b = curve("B", &[1.0, 3.0], &[1.0, 1.0]);
        let c = add(&a, &b).unwrap();
        assert_eq!(c.name(), "A + B");
        assert_eq!(c.x(), &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(c.y(), &[1.0, 2.0, 3.0, 3.0]);
    }

    #[test]
    fn test_identity_laws() {
        let a = curve("A", &[0.0, 0.7, 1.3, 4.0], &[2.0, -1.0, 0.5, 3.0]);
        for c in [add(&a, &negate(&a)).unwrap(), subtract(&a, &a).unwrap()] {
            for v in c.y() {
                assert_relative_eq!(*v, 0.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_divide_by_zero_sentinel() {
        let a = curve("A", &[0.0, 1.0, 2.0], &[1.0, 2.0, 3.0]);
        let b = curve("B", &[0.0, 1.0, 2.0], &[2.0, 0.0, 4.0]);
        let c = divide(&a, &b).unwrap();
        assert_eq!(c.name(), "A / B");
        assert_relative_eq!(c.y()[0], 0.5);
        assert_eq!(c.y()[1], DIVIDE_BY_ZERO_SENTINEL);
        assert_eq!(c.y()[1], 9.223372036854776e18);
        assert_relative_eq!(c.y()[2], 0.75);
        assert!(c.y().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_divide_by_zero_nan_policy() {
        let a = curve("A", &[0.0, 1.0], &[1.0, 1.0]);
        let b = curve("B", &[0.0, 1.0], &[0.0, 1.0]);
        let c = divide_with(&a, &b, DivideByZero::NotANumber).unwrap();
        assert!(c.y()[0].is_nan());
        assert_relative_eq!(c.y()[1], 1.0);
    }

    #[test]
    fn test_power_drops_nan_samples() {
        let a = curve("A", &[0.0, 1.0, 2.0, 3.0], &[4.0, -1.0, 9.0, -4.0]);
        let c = power(&a, 0.5);
        assert_eq!(c.name(), "A^0.5");
        assert_eq!(c.x(), &[0.0, 2.0]);
        assert_eq!(c.y(), &[2.0, 3.0]);

        // Integer exponents are defined for negative bases
        assert_eq!(power(&a, 2.0).len(), 4);
    }

    #[test]
    fn test_unary_ops() {
        let a = curve("A", &[0.0, 1.0, 2.0], &[-1.0, 0.0, 4.0]);
        assert_eq!(UnaryOp::Abs.apply(&a).y(), &[1.0, 0.0, 4.0]);
        let s = UnaryOp::Sqrt.apply(&a);
        assert_eq!(s.name(), "sqrt(A)");
        assert_eq!(s.x(), &[1.0, 2.0]);
    }

    #[test]
    fn test_recip_uses_sentinel_at_zero() {
        let a = curve("A", &[0.0, 1.0, 2.0], &[4.0, 0.0, -0.5]);
        let r = UnaryOp::Recip.apply(&a);
        assert_eq!(r.name(), "recip(A)");
        assert_eq!(r.x(), a.x());
        assert_eq!(r.y(), &[0.25, DIVIDE_BY_ZERO_SENTINEL, -2.0]);
    }

    #[test]
    fn test_empty_operand_is_insufficient_overlap() {
        let a = curve("A", &[0.0, 1.0], &[1.0, 2.0]);
        let empty = curve("E", &[], &[]);
        assert_eq!(
            add(&a, &empty).unwrap_err(),
            CurveError::insufficient_overlap(2, 0)
        );
    }

    #[test]
    fn test_max_min_and_scalar() {
        let a = curve("A", &[0.0, 1.0], &[0.0, 2.0]);
        let b = curve("B", &[0.0, 1.0], &[1.0, 1.0]);
        assert_eq!(BinaryOp::Max.apply(&a, &b).unwrap().y(), &[1.0, 2.0]);
        let m = BinaryOp::Min.apply(&a, &b).unwrap();
        assert_eq!(m.name(), "min(A, B)");
        assert_eq!(m.y(), &[0.0, 1.0]);

        let s = BinaryOp::Multiply.apply_scalar(&a, 3.0, DivideByZero::Sentinel);
        assert_eq!(s.name(), "A * 3");
        assert_eq!(s.y(), &[0.0, 6.0]);

        let z = BinaryOp::Divide.apply_scalar(&a, 0.0, DivideByZero::Sentinel);
        assert_eq!(z.y(), &[DIVIDE_BY_ZERO_SENTINEL; 2]);
    }

    #[test]
    fn test_combine_folds_left() {
        let a = curve("A", &[0.0, 1.0], &[1.0, 1.0]);
        let b = curve("B", &[0.0, 1.0], &[2.0, 2.0]);
        let c = curve("C", &[0.0, 1.0], &[3.0, 3.0]);
        let sum = combine(BinaryOp::Add, &[a, b, c]).unwrap();
        assert_eq!(sum.name(), "A + B + C");
        assert_eq!(sum.y(), &[6.0, 6.0]);
        assert!(combine(BinaryOp::Add, &[]).is_err());
    }

    #[test]
    fn test_apply_matched_with_stride() {
        let a = curve("A", &[0.0, 1.0, 2.0, 3.0], &[1.0, 2.0, 3.0, 4.0]);
        let b = curve("B", &[10.0, 20.0], &[10.0, 20.0]);
        let c = BinaryOp::Add
            .apply_matched(&a, &b, MatchMode::Stride { samples: 2 }, DivideByZero::Sentinel)
            .unwrap();
        assert_eq!(c.x(), &[0.0, 2.0]);
        assert_eq!(c.y(), &[11.0, 23.0]);
    }

    #[test]
    fn test_insufficient_overlap() {
        let a = curve("A", &[1.0], &[1.0]);
        assert!(matches!(
            add(&a, &a),
            Err(CurveError::InsufficientOverlap { .. })
        ));
    }
}
