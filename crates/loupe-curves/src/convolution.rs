//! Direct-quadrature convolution.
//!
//! Computes
//!
//! ```text
//! (g * h)(s) = ∫ g(t) h(s - t) dt
//! ```
//!
//! by sliding a time-reversed copy of `h` across `g` and integrating the
//! product over the overlap at each offset with the trapezoidal rule. No
//! transform is involved, so irregular sampling needs no padding or
//! resampling onto a uniform grid.
//!
//! Cost is `steps × (native samples in the overlap + interp_points)`
//! interpolations; bound those two counts to bound latency.

use loupe_math::interpolation::{Interpolator, LinearInterpolator};
use loupe_math::quadrature::trapezoid;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::curve::Curve;
use crate::error::{CurveError, CurveResult};
use crate::matching::{linspace, union_sorted};

/// Scaling applied to the convolution output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    /// Plain `∫ g(t) h(s - t) dt`.
    None,
    /// Divided by `∫ h(t) dt` of the original kernel.
    #[default]
    KernelArea,
}

/// Convolves `g` with the kernel `h`.
///
/// The output has `steps` evenly spaced offsets (at least 2) running from
/// `min(g.x) + min(h.x)` to `max(g.x) + max(h.x)`; this is where the trailing
/// edge of the reversed kernel first touches `g` through to where its leading
/// edge leaves. At each offset the overlap is sampled at the native points of
/// both curves plus `interp_points` evenly spaced extra points, and an empty
/// overlap contributes 0.
///
/// A span written as "from the start of `g` to the end of `g` plus the width
/// of `h`" is the same interval only when `h` starts at `x = 0`. For a kernel
/// sampled on, say, `[-1, 1]` the output here starts one unit earlier.
///
/// # Errors
///
/// Returns [`CurveError::InsufficientPoints`] if either curve has fewer than
/// two samples, and [`CurveError::InvalidParameter`] when normalising by a
/// kernel whose area is zero or not finite.
pub fn convolve(
    g: &Curve,
    h: &Curve,
    steps: usize,
    interp_points: usize,
    normalization: Normalization,
) -> CurveResult<Curve> {
    for c in [g, h] {
        if c.len() < 2 {
            return Err(CurveError::insufficient_points(2, c.len()));
        }
    }

    let g = g.sorted();
    let h = h.sorted();
    let scale = match normalization {
        Normalization::None => 1.0,
        Normalization::KernelArea => {
            let area = trapezoid(h.x(), h.y());
            if area == 0.0 || !area.is_finite() {
                return Err(CurveError::invalid_parameter(format!(
                    "cannot normalise by kernel '{}' with area {area}",
                    h.name()
                )));
            }
            area
        }
    };

    let flipped = time_reverse(&h);
    let kernel = Kernel::new(&g, &flipped)?;

    let steps = steps.max(2);
    let offsets = linspace(kernel.first_offset(), kernel.last_offset(), steps);
    debug!(
        g = g.name(),
        h = h.name(),
        steps,
        interp_points,
        ?normalization,
        "convolving"
    );

    let areas = evaluate_offsets(&kernel, &offsets, interp_points)?;
    let y = areas.into_iter().map(|a| a / scale).collect();

    let name = match normalization {
        Normalization::None => format!("conv({}, {})", g.name(), h.name()),
        Normalization::KernelArea => format!("convn({}, {})", g.name(), h.name()),
    };
    Ok(g.derive(name, offsets, y))
}

/// Unnormalised convolution.
pub fn convolve_unnormalized(
    g: &Curve,
    h: &Curve,
    steps: usize,
    interp_points: usize,
) -> CurveResult<Curve> {
    convolve(g, h, steps, interp_points, Normalization::None)
}

/// Convolution divided by the kernel's area.
pub fn convolve_normalized(
    g: &Curve,
    h: &Curve,
    steps: usize,
    interp_points: usize,
) -> CurveResult<Curve> {
    convolve(g, h, steps, interp_points, Normalization::KernelArea)
}

/// `h(-t)` as a new curve: negated abscissae in reversed order.
fn time_reverse(h: &Curve) -> Curve {
    let x = h.x().iter().rev().map(|x| -x).collect();
    let y = h.y().iter().rev().copied().collect();
    h.derive(format!("rev({})", h.name()), x, y)
}

/// Both operands prepared for repeated evaluation.
struct Kernel<'a> {
    signal: &'a Curve,
    flipped: &'a Curve,
    signal_interp: LinearInterpolator,
    flipped_interp: LinearInterpolator,
    signal_domain: (f64, f64),
    flipped_domain: (f64, f64),
}

impl<'a> Kernel<'a> {
    fn new(signal: &'a Curve, flipped: &'a Curve) -> CurveResult<Self> {
        let signal_domain = signal
            .domain()
            .ok_or_else(|| CurveError::insufficient_points(2, 0))?;
        let flipped_domain = flipped
            .domain()
            .ok_or_else(|| CurveError::insufficient_points(2, 0))?;
        Ok(Self {
            signal,
            flipped,
            signal_interp: signal.interpolator()?,
            flipped_interp: flipped.interpolator()?,
            signal_domain,
            flipped_domain,
        })
    }

    /// Offset where the reversed kernel's trailing edge meets the signal's leading edge.
    fn first_offset(&self) -> f64 {
        self.signal_domain.0 - self.flipped_domain.1
    }

    /// Offset where the reversed kernel's leading edge leaves the signal.
    fn last_offset(&self) -> f64 {
        self.signal_domain.1 - self.flipped_domain.0
    }

    /// Integral of `g(t) * h_flipped(t - offset)` over the overlap.
    fn area_at(&self, offset: f64, interp_points: usize) -> CurveResult<f64> {
        let lo = self.signal_domain.0.max(self.flipped_domain.0 + offset);
        let hi = self.signal_domain.1.min(self.flipped_domain.1 + offset);
        if !(hi > lo) {
            return Ok(0.0);
        }

        let inside = |xs: &[f64], shift: f64| -> Vec<f64> {
            xs.iter()
                .map(|x| x + shift)
                .filter(|&x| x >= lo && x <= hi)
                .collect()
        };
        let grid = union_sorted(&[
            inside(self.signal.x(), 0.0).as_slice(),
            inside(self.flipped.x(), offset).as_slice(),
            linspace(lo, hi, interp_points).as_slice(),
            &[lo, hi],
        ]);

        let mut product = Vec::with_capacity(grid.len());
        for &t in &grid {
            let gv = self.signal_interp.interpolate(t)?;
            let hv = self.flipped_interp.interpolate(t - offset)?;
            product.push(gv * hv);
        }
        Ok(trapezoid(&grid, &product))
    }
}

#[cfg(not(feature = "parallel"))]
fn evaluate_offsets(kernel: &Kernel<'_>, offsets: &[f64], interp_points: usize) -> CurveResult<Vec<f64>> {
    offsets
        .iter()
        .map(|&s| kernel.area_at(s, interp_points))
        .collect()
}

#[cfg(feature = "parallel")]
fn evaluate_offsets(kernel: &Kernel<'_>, offsets: &[f64], interp_points: usize) -> CurveResult<Vec<f64>> {
    use rayon::prelude::*;

    offsets
        .par_iter()
        .map(|&s| kernel.area_at(s, interp_points))
        .collect()
}
