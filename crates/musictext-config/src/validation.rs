//! Configuration validation.
//!
//! Every numeric field of a [`RenderConfig`] has an accepted range. All
//! violations are collected so the user sees them at once.
//!
//! ```rust
//! use musictext_config::{RenderConfig, ValidationError, validate_config};
//!
//! let mut config = RenderConfig::default();
//! config.tempo_bpm = 0.0;
//! assert!(matches!(
//!     validate_config(&config),
//!     Err(ValidationError::OutOfRange { .. })
//! ));
//! ```

use crate::RenderConfig;
use thiserror::Error;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Value outside its accepted range.
    #[error("parameter '{param}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Name of the parameter.
        param: String,
        /// The value that was out of range.
        value: f64,
        /// Minimum allowed value.
        min: f64,
        /// Maximum allowed value.
        max: f64,
    },

    /// NaN or infinite value.
    #[error("parameter '{param}' must be a finite number")]
    NotFinite {
        /// Name of the parameter.
        param: String,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Accepted sample rates, Hz.
pub const SAMPLE_RATE_RANGE: (u32, u32) = (1000, 384_000);

/// Accepted tempi, BPM.
pub const TEMPO_RANGE: (f64, f64) = (1.0, 2000.0);

/// Accepted excitation amplitudes.
pub const AMPLITUDE_RANGE: (f64, f64) = (0.0, 1.0);

/// Accepted per-sample decay rates.
pub const DECAY_RANGE: (f64, f64) = (0.0, 1.0);

/// Accepted loudness references, dB SPL.
pub const LOUDNESS_REFERENCE_RANGE: (f64, f64) = (0.0, 120.0);

fn check(param: &str, value: f64, (min, max): (f64, f64)) -> Option<ValidationError> {
    if !value.is_finite() {
        return Some(ValidationError::NotFinite {
            param: param.to_string(),
        });
    }
    if value < min || value > max {
        return Some(ValidationError::OutOfRange {
            param: param.to_string(),
            value,
            min,
            max,
        });
    }
    None
}

/// Validate every field of `config`.
///
/// Returns the single error when one field is bad, or
/// [`ValidationError::Multiple`] when several are.
pub fn validate_config(config: &RenderConfig) -> ValidationResult<()> {
    let (rate_min, rate_max) = SAMPLE_RATE_RANGE;
    let mut errors: Vec<ValidationError> = [
        check(
            "sample_rate",
            f64::from(config.sample_rate),
            (f64::from(rate_min), f64::from(rate_max)),
        ),
        check("tempo_bpm", config.tempo_bpm, TEMPO_RANGE),
        check("amplitude", config.amplitude, AMPLITUDE_RANGE),
        check("note_decay", config.note_decay, DECAY_RANGE),
        check("rest_decay", config.rest_decay, DECAY_RANGE),
        check(
            "loudness_reference",
            config.loudness_reference,
            LOUDNESS_REFERENCE_RANGE,
        ),
    ]
    .into_iter()
    .flatten()
    .collect();

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}
