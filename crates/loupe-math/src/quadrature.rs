//! Trapezoidal quadrature on non-uniform grids.
//!
//! Used for direct-quadrature convolution, curve areas, cumulative integrals
//! and the integrated difference metrics.

/// Integrates `ys` over `xs` with the trapezoidal rule.
///
/// Returns 0 when fewer than two samples are given, so an empty overlap
/// integrates to zero.
///
/// # Example
///
/// ```rust
/// use loupe_math::quadrature::trapezoid;
///
/// let area = trapezoid(&[0.0, 1.0, 3.0], &[0.0, 2.0, 2.0]);
/// assert!((area - 5.0).abs() < 1e-12);
/// ```
pub fn trapezoid(xs: &[f64], ys: &[f64]) -> f64 {
    xs.windows(2)
        .zip(ys.windows(2))
        .map(|(x, y)| 0.5 * (x[1] - x[0]) * (y[0] + y[1]))
        .sum()
}

/// Running trapezoidal integral, starting at 0.
///
/// The output has the same length as the input; element `i` is the integral
/// from `xs[0]` to `xs[i]`.
pub fn cumulative_trapezoid(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len().min(ys.len());
    let mut out = Vec::with_capacity(n);
    if n == 0 {
        return out;
    }

    let mut acc = 0.0;
    out.push(acc);
    for i in 1..n {
        acc += 0.5 * (xs[i] - xs[i - 1]) * (ys[i] + ys[i - 1]);
        out.push(acc);
    }
    out
}
