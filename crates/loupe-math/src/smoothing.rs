//! Moving-average smoothing.

/// Centred moving average.
///
/// Each output is the mean of the samples within `window / 2` positions on
/// either side; the window is truncated at the ends of the sequence. A window
/// of 0 is treated as 1 (no smoothing).
///
/// # Example
///
/// ```rust
/// use loupe_math::smoothing::moving_average;
///
/// let smoothed = moving_average(&[0.0, 3.0, 0.0], 3);
/// assert_eq!(smoothed, vec![1.5, 1.0, 1.5]);
/// ```
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    let half = window.max(1) / 2;

    // Prefix sums keep this linear in n regardless of window
    let mut prefix = Vec::with_capacity(n + 1);
    prefix.push(0.0);
    for v in values {
        prefix.push(prefix[prefix.len() - 1] + v);
    }

    (0..n)
        .map(|i| {
            let lo = i.saturating_sub(half);
            let hi = (i + half + 1).min(n);
            (prefix[hi] - prefix[lo]) / (hi - lo) as f64
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_window_one_is_identity() {
        let values = vec![1.0, -2.0, 5.0];
        assert_eq!(moving_average(&values, 1), values);
        assert_eq!(moving_average(&values, 0), values);
    }

    #[test]
    fn test_constant_is_preserved() {
        for v in moving_average(&[4.0; 10], 5) {
            assert_relative_eq!(v, 4.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_edges_truncate() {
        let out = moving_average(&[0.0, 1.0, 2.0, 3.0, 4.0], 5);
        assert_relative_eq!(out[0], 1.0);
        assert_relative_eq!(out[2], 2.0);
        assert_relative_eq!(out[4], 3.0);
    }

    #[test]
    fn test_empty() {
        assert!(moving_average(&[], 3).is_empty());
    }
}
