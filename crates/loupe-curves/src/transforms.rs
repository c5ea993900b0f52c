//! Single-curve transforms: derivative, integrals, spectrum, smoothing and
//! time-shift alignment.
//!
//! Every function sorts its input by x first and returns new curves.

use loupe_math::differentiation::{gradient, EdgeOrder};
use loupe_math::interpolation::Interpolator;
use loupe_math::quadrature::{cumulative_trapezoid, trapezoid};
use loupe_math::smoothing::moving_average;
use loupe_math::spectral;
use tracing::{debug, trace};

use crate::curve::Curve;
use crate::error::{CurveError, CurveResult};
use crate::matching::union_sorted;

/// Numerical derivative `dy/dx` on the curve's own grid.
pub fn derivative(curve: &Curve, edge_order: EdgeOrder) -> CurveResult<Curve> {
    let sorted = curve.sorted();
    let dy = gradient(sorted.x(), sorted.y(), edge_order)?;
    Ok(sorted.derive(format!("d({})/dx", curve.name()), sorted.x().to_vec(), dy))
}

/// Cumulative trapezoidal integral over `[low, high]`.
///
/// Missing bounds default to the ends of the domain and bounds are clamped to
/// it. Bounds falling between samples are interpolated onto the grid. The
/// result starts at 0 at `low`.
///
/// # Errors
///
/// Returns [`CurveError::InsufficientPoints`] for fewer than two samples and
/// [`CurveError::InvalidParameter`] if `low > high`.
pub fn integrate(curve: &Curve, low: Option<f64>, high: Option<f64>) -> CurveResult<Curve> {
    if curve.len() < 2 {
        return Err(CurveError::insufficient_points(2, curve.len()));
    }
    let (dmin, dmax) = curve
        .domain()
        .ok_or_else(|| CurveError::insufficient_points(2, 0))?;
    let lo = low.map_or(dmin, |v| v.max(dmin));
    let hi = high.map_or(dmax, |v| v.min(dmax));
    if lo > hi {
        return Err(CurveError::invalid_parameter(format!(
            "integration bounds [{lo}, {hi}] are inverted or outside the domain"
        )));
    }

    let inside: Vec<f64> = curve.x().iter().copied().filter(|&x| x >= lo && x <= hi).collect();
    let x = union_sorted(&[inside.as_slice(), &[lo, hi]]);
    let interpolator = curve.interpolator()?;
    let y = x
        .iter()
        .map(|&t| interpolator.interpolate(t))
        .collect::<Result<Vec<_>, _>>()?;
    let integral = cumulative_trapezoid(&x, &y);

    Ok(curve.derive(format!("int({})", curve.name()), x, integral))
}

/// Definite trapezoidal integral over the whole domain.
pub fn area(curve: &Curve) -> f64 {
    let sorted = curve.sorted();
    trapezoid(sorted.x(), sorted.y())
}

/// Scales y so the curve integrates to 1.
///
/// # Errors
///
/// Returns [`CurveError::InvalidParameter`] if the area is zero or not finite.
pub fn normalize(curve: &Curve) -> CurveResult<Curve> {
    let total = area(curve);
    if total == 0.0 || !total.is_finite() {
        return Err(CurveError::invalid_parameter(format!(
            "cannot normalise '{}' with area {total}",
            curve.name()
        )));
    }
    let sorted = curve.sorted();
    let y = sorted.y().iter().map(|v| v / total).collect();
    Ok(sorted.derive(format!("normalized({})", curve.name()), sorted.x().to_vec(), y))
}

/// Spectrum of the area-normalised curve.
///
/// The samples are treated as evenly spaced at the curve's mean spacing. The
/// returned pair is `(real, imaginary)` on a shared frequency axis with zero
/// frequency in the middle; the imaginary part has its sign flipped.
///
/// # Errors
///
/// Returns [`CurveError::InsufficientPoints`] for fewer than two samples and
/// the errors of [`normalize`].
pub fn fft(curve: &Curve) -> CurveResult<(Curve, Curve)> {
    let n = curve.len();
    if n < 2 {
        return Err(CurveError::insufficient_points(2, n));
    }
    let normalized = normalize(curve)?;
    let (xmin, xmax) = normalized
        .domain()
        .ok_or_else(|| CurveError::insufficient_points(2, 0))?;
    let spacing = (xmax - xmin) / (n - 1) as f64;

    let freq = spectral::fftshift(&spectral::fftfreq(n, spacing));
    let spectrum = spectral::fftshift(&spectral::fft(normalized.y()));
    let real = spectrum.iter().map(|c| c.re).collect();
    let imag = spectrum.iter().map(|c| -c.im).collect();
    debug!(curve = curve.name(), n, spacing, "computed spectrum");

    Ok((
        normalized.derive(format!("Re(fft({}))", curve.name()), freq.clone(), real),
        normalized.derive(format!("Im(fft({}))", curve.name()), freq, imag),
    ))
}

/// Centred moving average of y over `window` samples.
pub fn smooth(curve: &Curve, window: usize) -> Curve {
    let sorted = curve.sorted();
    let y = moving_average(sorted.y(), window);
    sorted.derive(format!("smooth({})", curve.name()), sorted.x().to_vec(), y)
}

/// Estimates the x offset that best aligns `set` onto `base`.
///
/// Near a point where `base` has slope `m`, a curve displaced along x differs
/// from it by roughly `-m · shift`, so the residual divided by the slope
/// recovers the shift. The estimate is taken where it is best conditioned:
///
/// 1. the slope of `base` is resampled onto the abscissae of `set`
/// 2. both slopes are smoothed with a `window`-sample moving average
/// 3. the base slope is zeroed wherever the two smoothed slopes do not share
///    a strict sign, since the offset model breaks down there
/// 4. the position of the steepest remaining base slope is selected
/// 5. the offset is `(set - base) / slope` at that position, clipped to
///    `[-tolerance, tolerance]`
///
/// If no slope survives step 3 the offset is 0. Returns `set` with its x
/// shifted by the offset, together with the offset.
pub fn time_shift(
    set: &Curve,
    base: &Curve,
    window: usize,
    tolerance: f64,
) -> CurveResult<(Curve, f64)> {
    if tolerance.is_nan() {
        return Err(CurveError::invalid_parameter("time-shift tolerance is NaN"));
    }
    let base = base.sorted();
    let set_sorted = set.sorted();
    for c in [&base, &set_sorted] {
        if c.len() < 2 {
            return Err(CurveError::insufficient_points(2, c.len()));
        }
    }

    let base_slope = gradient(base.x(), base.y(), EdgeOrder::First)?;
    let base_slope = base
        .derive("slope", base.x().to_vec(), base_slope)
        .resample(set_sorted.x())?;
    let set_slope = gradient(set_sorted.x(), set_sorted.y(), EdgeOrder::First)?;

    let mut base_slope = moving_average(&base_slope, window);
    let set_slope = moving_average(&set_slope, window);
    for (b, s) in base_slope.iter_mut().zip(&set_slope) {
        if *b * *s <= 0.0 {
            *b = 0.0;
        }
    }

    let steepest = base_slope
        .iter()
        .enumerate()
        .filter(|(_, m)| **m != 0.0)
        .max_by(|(_, p), (_, q)| p.abs().total_cmp(&q.abs()));

    let limit = tolerance.abs();
    let offset = match steepest {
        None => 0.0,
        Some((idx, &slope)) => {
            let x = set_sorted.x()[idx];
            let reference = base.interpolator()?.interpolate(x)?;
            let raw = (set_sorted.y()[idx] - reference) / slope;
            trace!(x, slope, raw, "time-shift anchor");
            raw.clamp(-limit, limit)
        }
    };
    debug!(set = set.name(), base = base.name(), offset, "estimated time shift");

    let mut shifted = set.clone();
    shifted.shift_x(offset);
    Ok((shifted, offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn curve(name: &str, x: &[f64], y: &[f64]) -> Curve {
        Curve::new(name, x.to_vec(), y.to_vec()).unwrap()
    }

    fn sampled(name: &str, n: usize, f: impl Fn(f64) -> f64) -> Curve {
        Curve::from_points(name, (0..n).map(|i| {
            let x = i as f64 * 0.1;
            (x, f(x))
        }))
    }

    #[test]
    fn test_derivative_of_line_is_constant() {
        let c = curve("c", &[0.0, 0.5, 2.0, 3.0], &[1.0, 2.0, 5.0, 7.0]);
        for order in [EdgeOrder::First, EdgeOrder::Second] {
            let d = derivative(&c, order).unwrap();
            assert_eq!(d.name(), "d(c)/dx");
            for v in d.y() {
                assert_relative_eq!(*v, 2.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_derivative_of_parabola_with_second_order_edges() {
        let c = curve("c", &[0.0, 1.0, 2.0, 3.0], &[0.0, 1.0, 4.0, 9.0]);
        let d = derivative(&c, EdgeOrder::Second).unwrap();
        let expected = [0.0, 2.0, 4.0, 6.0];
        for (v, e) in d.y().iter().zip(expected) {
            assert_relative_eq!(*v, e, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_integral_of_constant_is_linear() {
        let c = curve("c", &[0.0, 1.0, 2.0, 4.0], &[3.0; 4]);
        let i = integrate(&c, None, None).unwrap();
        assert_eq!(i.name(), "int(c)");
        assert_eq!(i.x(), c.x());
        for (x, y) in i.points() {
            assert_relative_eq!(y, 3.0 * x, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_integral_with_interpolated_bounds() {
        let c = curve("c", &[0.0, 2.0, 4.0], &[0.0, 2.0, 4.0]);
        let i = integrate(&c, Some(1.0), Some(3.0)).unwrap();
        assert_eq!(i.x(), &[1.0, 2.0, 3.0]);
        assert_eq!(i.y()[0], 0.0);
        assert_relative_eq!(i.y()[2], 4.0, epsilon = 1e-12);

        // bounds outside the domain are clamped
        let full = integrate(&c, Some(-5.0), Some(50.0)).unwrap();
        assert_eq!(full.x(), c.x());
        assert!(integrate(&c, Some(3.0), Some(1.0)).is_err());
    }

    #[test]
    fn test_area_and_normalize() {
        let c = curve("c", &[2.0, 0.0, 1.0], &[2.0, 2.0, 2.0]);
        assert_relative_eq!(area(&c), 4.0, epsilon = 1e-12);

        let n = normalize(&c).unwrap();
        assert_eq!(n.x(), &[0.0, 1.0, 2.0]);
        assert_relative_eq!(area(&n), 1.0, epsilon = 1e-12);

        let zero = curve("z", &[0.0, 1.0], &[0.0, 0.0]);
        assert!(matches!(normalize(&zero), Err(CurveError::InvalidParameter { .. })));
    }

    #[test]
    fn test_fft_of_delta_is_flat() {
        // A single spike of unit trapezoidal area
        let c = curve("pulse", &[0.0, 1.0, 2.0, 3.0, 4.0], &[0.0, 0.0, 1.0, 0.0, 0.0]);
        let (re, im) = fft(&c).unwrap();

        assert_eq!(re.x(), im.x());
        let freq = re.x();
        assert_relative_eq!(freq[2], 0.0);
        assert_relative_eq!(freq[0], -0.4, epsilon = 1e-12);
        assert_relative_eq!(freq[4], 0.4, epsilon = 1e-12);

        for (r, i) in re.y().iter().zip(im.y()) {
            assert_relative_eq!(r.hypot(*i), 1.0, epsilon = 1e-12);
        }
        assert!(fft(&curve("one", &[0.0], &[1.0])).is_err());
    }

    #[test]
    fn test_smooth() {
        let c = curve("c", &[0.0, 1.0, 2.0], &[0.0, 3.0, 0.0]);
        let s = smooth(&c, 3);
        assert_eq!(s.name(), "smooth(c)");
        assert_eq!(s.y(), &[1.5, 1.0, 1.5]);
        assert_eq!(smooth(&c, 1).y(), c.y());
    }

    #[test]
    fn test_time_shift_recovers_offset() {
        let base = sampled("base", 101, |x| x * x);
        let set = sampled("set", 101, |x| (x - 0.25) * (x - 0.25));

        let (aligned, offset) = time_shift(&set, &base, 5, 1.0).unwrap();
        assert_relative_eq!(offset, -0.25, epsilon = 1e-2);
        assert_relative_eq!(aligned.x()[0], offset, epsilon = 1e-12);
        assert_eq!(aligned.y(), set.y());
    }

    #[test]
    fn test_time_shift_is_clipped() {
        let base = sampled("base", 50, |x| x);
        let set = sampled("set", 50, |x| x - 2.0);
        let (_, offset) = time_shift(&set, &base, 1, 0.5).unwrap();
        assert_eq!(offset, -0.5);
    }

    #[test]
    fn test_time_shift_without_usable_slope() {
        let base = sampled("base", 20, |x| x);
        let set = sampled("set", 20, |x| -x);
        let (aligned, offset) = time_shift(&set, &base, 3, 1.0).unwrap();
        assert_eq!(offset, 0.0);
        assert_eq!(aligned.x(), set.x());
    }
}
