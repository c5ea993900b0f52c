//! # Loupe Math
//!
//! Numerical kernels for the Loupe curve algebra library.
//!
//! This crate provides:
//!
//! - **Interpolation**: Piecewise-linear interpolation over sampled data
//! - **Extrapolation**: Boundary policies for queries outside the sampled domain
//! - **Quadrature**: Trapezoidal integration on non-uniform grids
//! - **Differentiation**: Finite-difference gradients on non-uniform grids
//! - **Smoothing**: Moving-average filters
//! - **Spectral**: Discrete Fourier transform helpers
//!
//! ## Design Philosophy
//!
//! - **Irregular grids first**: Nothing assumes uniform sample spacing
//! - **Numerical Stability**: Careful handling of edge cases
//! - **Pure functions**: Inputs are borrowed, outputs are freshly allocated

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::float_cmp)]
#![allow(clippy::uninlined_format_args)]

pub mod differentiation;
pub mod error;
pub mod extrapolation;
pub mod interpolation;
pub mod quadrature;
pub mod smoothing;
pub mod spectral;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::differentiation::{gradient, EdgeOrder};
    pub use crate::error::{MathError, MathResult};
    pub use crate::extrapolation::BoundaryPolicy;
    pub use crate::interpolation::{interp, sort_pairs, Interpolator, LinearInterpolator};
    pub use crate::quadrature::{cumulative_trapezoid, trapezoid};
    pub use crate::smoothing::moving_average;
    pub use crate::spectral::{fft, fftfreq, fftshift};
}

pub use error::{MathError, MathResult};
