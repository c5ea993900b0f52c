//! Engine configuration.
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration:
//!
//! ```toml
//! divide_by_zero = "sentinel"
//!
//! [convolution]
//! steps = 200
//! interp_points = 50
//! normalization = "kernel_area"
//!
//! [comparison]
//! density = 100
//! absolute_tolerance = 1e-6
//! relative_tolerance = 1e-3
//! combine = "or"
//!
//! [alignment]
//! window = 5
//! tolerance = 1.0
//!
//! [matching.mode]
//! kind = "union"
//! ```

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::algebra::DivideByZero;
use crate::compare::CompareOptions;
use crate::convolution::Normalization;
use crate::error::{CurveError, CurveResult};
use crate::matching::MatchMode;

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Result written where a denominator is exactly zero.
    #[serde(default)]
    pub divide_by_zero: DivideByZero,

    /// Convolution grid sizes and scaling.
    #[serde(default)]
    pub convolution: ConvolutionConfig,

    /// Comparison density, tolerances and combinator.
    #[serde(default)]
    pub comparison: CompareOptions,

    /// Time-shift alignment parameters.
    #[serde(default)]
    pub alignment: AlignmentConfig,

    /// Domain matching for binary operations.
    #[serde(default)]
    pub matching: MatchingConfig,
}

/// Convolution settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvolutionConfig {
    /// Number of output offsets
    #[serde(default = "default_steps")]
    pub steps: usize,

    /// Extra quadrature points per offset
    #[serde(default = "default_interp_points")]
    pub interp_points: usize,

    /// Output scaling
    #[serde(default)]
    pub normalization: Normalization,
}

fn default_steps() -> usize {
    200
}

fn default_interp_points() -> usize {
    50
}

impl Default for ConvolutionConfig {
    fn default() -> Self {
        Self {
            steps: default_steps(),
            interp_points: default_interp_points(),
            normalization: Normalization::default(),
        }
    }
}

/// Time-shift alignment settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignmentConfig {
    /// Moving-average window applied to both slopes
    #[serde(default = "default_window")]
    pub window: usize,

    /// Largest offset magnitude returned
    #[serde(default = "default_alignment_tolerance")]
    pub tolerance: f64,
}

fn default_window() -> usize {
    5
}

fn default_alignment_tolerance() -> f64 {
    1.0
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            window: default_window(),
            tolerance: default_alignment_tolerance(),
        }
    }
}

/// Domain matching settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// How binary operations pair their operands
    #[serde(default)]
    pub mode: MatchMode,
}

/// A single problem found by [`EngineConfig::validate`].
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Convolution needs at least two output offsets.
    TooFewSteps {
        /// Configured value.
        steps: usize,
    },

    /// A tolerance is negative or not finite.
    InvalidTolerance {
        /// Dotted path of the field.
        field: &'static str,
        /// Configured value.
        value: f64,
    },

    /// Stride matching needs at least two samples.
    TooFewStrideSamples {
        /// Configured value.
        samples: usize,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewSteps { steps } => {
                write!(f, "convolution.steps must be at least 2, got {steps}")
            }
            Self::InvalidTolerance { field, value } => {
                write!(f, "{field} must be finite and non-negative, got {value}")
            }
            Self::TooFewStrideSamples { samples } => {
                write!(f, "matching.mode.samples must be at least 2, got {samples}")
            }
        }
    }
}

impl EngineConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> CurveResult<Self> {
        toml::from_str(text).map_err(|e| CurveError::Config(e.to_string()))
    }

    /// Loads a configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> CurveResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Serialises the configuration as TOML.
    pub fn to_toml_string(&self) -> CurveResult<String> {
        toml::to_string(self).map_err(|e| CurveError::Config(e.to_string()))
    }

    /// Lists every problem with the configuration. Empty means valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.convolution.steps < 2 {
            errors.push(ValidationError::TooFewSteps {
                steps: self.convolution.steps,
            });
        }

        let tolerances = [
            ("comparison.absolute_tolerance", self.comparison.absolute_tolerance),
            ("comparison.relative_tolerance", self.comparison.relative_tolerance),
            ("alignment.tolerance", self.alignment.tolerance),
        ];
        for (field, value) in tolerances {
            if !(value.is_finite() && value >= 0.0) {
                errors.push(ValidationError::InvalidTolerance { field, value });
            }
        }

        if let MatchMode::Stride { samples } = self.matching.mode {
            if samples < 2 {
                errors.push(ValidationError::TooFewStrideSamples { samples });
            }
        }

        errors
    }

    /// Like [`validate`](Self::validate) but folds the problems into one error.
    pub fn validate_or_error(&self) -> CurveResult<()> {
        let errors = self.validate();
        if errors.is_empty() {
            return Ok(());
        }
        let joined = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Err(CurveError::Config(joined))
    }
}
