//! Error types for curve operations.
//!
//! Division by zero and NaN-producing powers are not errors: they have
//! defined fallback results (see [`crate::algebra`]).

use std::fmt;

use loupe_math::MathError;
use thiserror::Error;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Axis of a curve, used to report range violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// The domain (x values).
    X,
    /// The range (y values).
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "x"),
            Self::Y => write!(f, "y"),
        }
    }
}

/// Error types for curve operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// Two curves do not share enough of a domain to combine them.
    #[error("Insufficient overlap: need at least {required} shared points, got {got}")]
    InsufficientOverlap {
        /// Minimum required points.
        required: usize,
        /// Points actually shared.
        got: usize,
    },

    /// A single curve has too few samples for the operation.
    #[error("Insufficient points: need at least {required}, got {got}")]
    InsufficientPoints {
        /// Minimum required points.
        required: usize,
        /// Actual number of points provided.
        got: usize,
    },

    /// x and y arrays differ in length at construction.
    #[error("Shape mismatch in curve '{name}': {x_len} x values, {y_len} y values")]
    ShapeMismatch {
        /// Name of the offending curve.
        name: String,
        /// Length of the x array.
        x_len: usize,
        /// Length of the y array.
        y_len: usize,
    },

    /// Query value outside the curve's domain or range.
    #[error("{axis} value {value} out of range [{min}, {max}]")]
    ValueOutOfRange {
        /// Which axis the query was on.
        axis: Axis,
        /// The requested value.
        value: f64,
        /// Minimum valid value.
        min: f64,
        /// Maximum valid value.
        max: f64,
    },

    /// Invalid scalar parameter.
    #[error("Invalid parameter: {reason}")]
    InvalidParameter {
        /// Description of what's wrong.
        reason: String,
    },

    /// Error from the numerical kernels.
    #[error("Math error: {0}")]
    Math(#[from] MathError),

    /// I/O failure while reading or writing curves.
    #[error("I/O error: {0}")]
    Io(String),

    /// Malformed curve text.
    #[error("Parse error at line {line}: {reason}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What could not be parsed.
        reason: String,
    },

    /// Invalid or unreadable engine configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CurveError {
    /// Creates an insufficient overlap error.
    #[must_use]
    pub fn insufficient_overlap(required: usize, got: usize) -> Self {
        Self::InsufficientOverlap { required, got }
    }

    /// Creates an insufficient points error.
    #[must_use]
    pub fn insufficient_points(required: usize, got: usize) -> Self {
        Self::InsufficientPoints { required, got }
    }

    /// Creates an invalid parameter error.
    #[must_use]
    pub fn invalid_parameter(reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            reason: reason.into(),
        }
    }

    /// Creates a parse error.
    #[must_use]
    pub fn parse(line: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            line,
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for CurveError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CurveError::insufficient_overlap(2, 1);
        assert!(err.to_string().contains("at least 2 shared points"));

        let err = CurveError::ValueOutOfRange {
            axis: Axis::Y,
            value: 5.0,
            min: 0.0,
            max: 1.0,
        };
        assert_eq!(err.to_string(), "y value 5 out of range [0, 1]");
    }

    #[test]
    fn test_from_math_error() {
        let err: CurveError = MathError::insufficient_data(2, 0).into();
        assert!(matches!(err, CurveError::Math(_)));
    }
}
