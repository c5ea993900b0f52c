//! Error types for numerical operations.

use thiserror::Error;

/// A specialized Result type for numerical operations.
pub type MathResult<T> = Result<T, MathError>;

/// Errors that can occur during numerical operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// Insufficient data points for operation.
    #[error("Insufficient data: need at least {required}, got {actual}")]
    InsufficientData {
        /// Minimum required points.
        required: usize,
        /// Actual number of points.
        actual: usize,
    },

    /// Abscissa and ordinate arrays differ in length.
    #[error("Length mismatch: {xs} x values and {ys} y values")]
    LengthMismatch {
        /// Number of x values.
        xs: usize,
        /// Number of y values.
        ys: usize,
    },

    /// Abscissae are not sorted in ascending order.
    #[error("x values must be non-decreasing (violated at index {index})")]
    Unsorted {
        /// First index where `xs[index] < xs[index - 1]`.
        index: usize,
    },

    /// Interpolation point is outside the valid range.
    #[error("Extrapolation not allowed: {x} is outside [{min}, {max}]")]
    ExtrapolationNotAllowed {
        /// The query point.
        x: f64,
        /// Minimum valid value.
        min: f64,
        /// Maximum valid value.
        max: f64,
    },

    /// Invalid input parameter.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },
}

impl MathError {
    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates an insufficient data error.
    #[must_use]
    pub fn insufficient_data(required: usize, actual: usize) -> Self {
        Self::InsufficientData { required, actual }
    }

    /// Checks that two paired arrays have the same length.
    pub fn check_lengths(xs: &[f64], ys: &[f64]) -> MathResult<()> {
        if xs.len() == ys.len() {
            Ok(())
        } else {
            Err(Self::LengthMismatch {
                xs: xs.len(),
                ys: ys.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MathError::insufficient_data(2, 1);
        assert!(err.to_string().contains("at least 2"));

        let err = MathError::ExtrapolationNotAllowed {
            x: 5.0,
            min: 0.0,
            max: 1.0,
        };
        assert!(err.to_string().contains("outside [0, 1]"));
    }

    #[test]
    fn test_check_lengths() {
        assert!(MathError::check_lengths(&[1.0, 2.0], &[3.0, 4.0]).is_ok());
        assert_eq!(
            MathError::check_lengths(&[1.0], &[3.0, 4.0]),
            Err(MathError::LengthMismatch { xs: 1, ys: 2 })
        );
    }
}
