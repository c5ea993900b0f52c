//! Discrete Fourier transform helpers.
//!
//! Thin wrappers over `rustfft` with the frequency-axis conventions used by
//! the curve transforms: sample frequencies in cycles per unit of x and a
//! shift that puts zero frequency in the middle.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Forward DFT of a real sequence.
pub fn fft(values: &[f64]) -> Vec<Complex<f64>> {
    let n = values.len();
    let mut buffer: Vec<Complex<f64>> = values.iter().map(|&v| Complex::new(v, 0.0)).collect();
    if n == 0 {
        return buffer;
    }

    let mut planner = FftPlanner::<f64>::new();
    let plan = planner.plan_fft_forward(n);
    plan.process(&mut buffer);
    buffer
}

/// Sample frequencies of an `n`-point DFT with sample spacing `spacing`.
///
/// Ordered as the DFT output: zero, positive frequencies, then negative ones.
pub fn fftfreq(n: usize, spacing: f64) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    let scale = 1.0 / (n as f64 * spacing);
    let positive = (n - 1) / 2 + 1;
    (0..n)
        .map(|k| {
            if k < positive {
                k as f64 * scale
            } else {
                -((n - k) as f64) * scale
            }
        })
        .collect()
}

/// Rotates DFT-ordered data so the zero-frequency term sits in the middle.
pub fn fftshift<T: Clone>(values: &[T]) -> Vec<T> {
    let n = values.len();
    let split = n - n / 2;
    values[split..]
        .iter()
        .chain(values[..split].iter())
        .cloned()
        .collect()
}
