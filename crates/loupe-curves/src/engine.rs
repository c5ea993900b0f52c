//! Configured entry point.
//!
//! [`CurveEngine`] holds a validated [`EngineConfig`] and exposes the
//! operations that take tuning parameters, filling those in from the
//! configuration. The free functions in the other modules remain available
//! for callers that pass every parameter explicitly.

use tracing::debug;

use crate::algebra::BinaryOp;
use crate::compare::{self, CombinedReport};
use crate::config::EngineConfig;
use crate::convolution;
use crate::curve::Curve;
use crate::error::{CurveError, CurveResult};
use crate::transforms;

/// Curve operations with configured defaults.
///
/// # Example
///
/// ```rust
/// use loupe_curves::{BinaryOp, Curve, CurveEngine, EngineConfig};
///
/// let engine = CurveEngine::new(EngineConfig::default()).unwrap();
/// let a = Curve::new("a", vec![0.0, 1.0], vec![1.0, 2.0]).unwrap();
/// let b = Curve::new("b", vec![0.0, 1.0], vec![0.0, 2.0]).unwrap();
/// let q = engine.combine(BinaryOp::Divide, &a, &b).unwrap();
/// assert_eq!(q.y()[1], 1.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CurveEngine {
    config: EngineConfig,
}

impl CurveEngine {
    /// Creates an engine after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::Config`] listing every validation problem.
    pub fn new(config: EngineConfig) -> CurveResult<Self> {
        config.validate_or_error()?;
        debug!(?config, "curve engine configured");
        Ok(Self { config })
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Applies `op` using the configured matching mode and divide-by-zero policy.
    pub fn combine(&self, op: BinaryOp, a: &Curve, b: &Curve) -> CurveResult<Curve> {
        op.apply_matched(a, b, self.config.matching.mode, self.config.divide_by_zero)
    }

    /// Left fold of `op` over `curves`.
    pub fn combine_all(&self, op: BinaryOp, curves: &[Curve]) -> CurveResult<Curve> {
        let (first, rest) = curves
            .split_first()
            .ok_or_else(|| CurveError::invalid_parameter("no curves to combine"))?;
        rest.iter()
            .try_fold(first.clone(), |acc, next| self.combine(op, &acc, next))
    }

    /// `a / b` under the configured divide-by-zero policy.
    pub fn divide(&self, a: &Curve, b: &Curve) -> CurveResult<Curve> {
        self.combine(BinaryOp::Divide, a, b)
    }

    /// Convolution with the configured grid sizes and normalisation.
    pub fn convolve(&self, g: &Curve, h: &Curve) -> CurveResult<Curve> {
        let c = &self.config.convolution;
        convolution::convolve(g, h, c.steps, c.interp_points, c.normalization)
    }

    /// Absolute and relative comparison with the configured tolerances.
    pub fn compare(&self, a: &Curve, b: &Curve) -> CurveResult<CombinedReport> {
        compare::compare(a, b, &self.config.comparison)
    }

    /// Time-shift alignment of `set` onto `base`.
    pub fn align(&self, set: &Curve, base: &Curve) -> CurveResult<(Curve, f64)> {
        let a = &self.config.alignment;
        transforms::time_shift(set, base, a.window, a.tolerance)
    }
}
