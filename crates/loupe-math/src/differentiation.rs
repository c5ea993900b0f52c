//! Finite-difference derivatives on non-uniform grids.

use crate::error::{MathError, MathResult};

/// Accuracy of the one-sided differences at the two ends of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeOrder {
    /// First-order forward/backward differences.
    #[default]
    First,
    /// Second-order one-sided differences (needs three samples).
    Second,
}

impl EdgeOrder {
    /// Minimum number of samples this edge order needs.
    pub fn min_points(self) -> usize {
        match self {
            Self::First => 2,
            Self::Second => 3,
        }
    }
}

/// Gradient of `ys` with respect to `xs`.
///
/// Interior points use second-order central differences weighted for uneven
/// spacing; the ends use one-sided differences of the requested order.
///
/// # Errors
///
/// Returns an error if lengths differ, if there are too few samples for the
/// edge order, or if two consecutive abscissae coincide.
pub fn gradient(xs: &[f64], ys: &[f64], edge_order: EdgeOrder) -> MathResult<Vec<f64>> {
    MathError::check_lengths(xs, ys)?;
    let n = xs.len();
    if n < edge_order.min_points() {
        return Err(MathError::insufficient_data(edge_order.min_points(), n));
    }
    if let Some(i) = (1..n).find(|&i| xs[i] == xs[i - 1]) {
        return Err(MathError::invalid_input(format!(
            "repeated abscissa {} at index {i}",
            xs[i]
        )));
    }

    let mut out = vec![0.0; n];

    for i in 1..n - 1 {
        let hs = xs[i] - xs[i - 1];
        let hd = xs[i + 1] - xs[i];
        out[i] = -(hd / (hs * (hs + hd))) * ys[i - 1]
            + ((hd - hs) / (hs * hd)) * ys[i]
            + (hs / (hd * (hs + hd))) * ys[i + 1];
    }

    match edge_order {
        EdgeOrder::First => {
            out[0] = (ys[1] - ys[0]) / (xs[1] - xs[0]);
            out[n - 1] = (ys[n - 1] - ys[n - 2]) / (xs[n - 1] - xs[n - 2]);
        }
        EdgeOrder::Second => {
            let dx1 = xs[1] - xs[0];
            let dx2 = xs[2] - xs[1];
            let a = -(2.0 * dx1 + dx2) / (dx1 * (dx1 + dx2));
            let b = (dx1 + dx2) / (dx1 * dx2);
            let c = -dx1 / (dx2 * (dx1 + dx2));
            out[0] = a * ys[0] + b * ys[1] + c * ys[2];

            let dx1 = xs[n - 2] - xs[n - 3];
            let dx2 = xs[n - 1] - xs[n - 2];
            let a = dx2 / (dx1 * (dx1 + dx2));
            let b = -(dx2 + dx1) / (dx1 * dx2);
            let c = (2.0 * dx2 + dx1) / (dx2 * (dx1 + dx2));
            out[n - 1] = a * ys[n - 3] + b * ys[n - 2] + c * ys[n - 1];
        }
    }

    Ok(out)
}
