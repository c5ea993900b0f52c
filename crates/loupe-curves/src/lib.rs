//! # Loupe Curves
//!
//! Algebra, convolution and comparison of sampled 1-D curves.
//!
//! This crate provides:
//!
//! - **Curve**: The named `x`/`y` sample container with its boundary policy
//! - **Matching**: Union, stride and overlap resampling onto a shared domain
//! - **Algebra**: Elementwise binary and unary operators, with a defined
//!   divide-by-zero result
//! - **Merge**: Exact-match appending that averages coincident samples
//! - **Convolution**: Direct-quadrature convolution on irregular grids
//! - **Comparison**: Absolute/relative difference reports and norms
//! - **Transforms**: Derivative, integrals, spectrum, smoothing, time-shift
//! - **I/O**: A plain-text format that round-trips exactly
//! - **Engine**: [`CurveEngine`], the same operations with configured defaults
//!
//! ## Quick Start
//!
//! ```rust
//! use loupe_curves::prelude::*;
//!
//! let a = Curve::new("a", vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 4.0]).unwrap();
//! let b = Curve::new("b", vec![0.5, 1.5], vec![1.0, 1.0]).unwrap();
//!
//! // Operands are resampled onto the union of their domains
//! let sum = add(&a, &b).unwrap();
//! assert_eq!(sum.x(), &[0.0, 0.5, 1.0, 1.5, 2.0]);
//!
//! // Compare over the overlap [0.5, 1.5]
//! let report = abs_diff(&a, &b, 10, 0.1).unwrap();
//! assert!(report.is_failed);
//! ```
//!
//! ## Logging
//!
//! Operations emit `tracing` events at `debug` and `trace` level. The crate
//! never installs a subscriber.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)]
#![allow(clippy::doc_markdown)]

pub mod algebra;
pub mod compare;
pub mod config;
pub mod convolution;
pub mod curve;
pub mod engine;
pub mod error;
pub mod io;
pub mod matching;
pub mod merge;
pub mod transforms;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::algebra::{
        add, combine, divide, divide_with, multiply, negate, power, subtract, BinaryOp,
        DivideByZero, UnaryOp, DIVIDE_BY_ZERO_SENTINEL,
    };
    pub use crate::compare::{
        abs_diff, compare, norm, rel_diff, Combine, CombinedReport, CompareOptions, DiffReport,
        NormOrder,
    };
    pub use crate::config::{EngineConfig, ValidationError};
    pub use crate::convolution::{
        convolve, convolve_normalized, convolve_unnormalized, Normalization,
    };
    pub use crate::curve::{Curve, CurveMeta};
    pub use crate::engine::CurveEngine;
    pub use crate::error::{Axis, CurveError, CurveResult};
    pub use crate::matching::{match_domains, overlap, MatchMode};
    pub use crate::merge::{append, append_all};
    pub use crate::transforms::{area, derivative, integrate, normalize, smooth, time_shift};
    pub use loupe_math::differentiation::EdgeOrder;
    pub use loupe_math::extrapolation::BoundaryPolicy;
}

pub use algebra::{BinaryOp, DivideByZero, UnaryOp};
pub use config::EngineConfig;
pub use curve::{Curve, CurveMeta};
pub use engine::CurveEngine;
pub use error::{CurveError, CurveResult};
pub use loupe_math::extrapolation::BoundaryPolicy;
pub use matching::MatchMode;
