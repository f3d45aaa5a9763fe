//! Equal-loudness compensation.
//!
//! The resonator excites every note with the same nominal amplitude, but the
//! ear is far less sensitive at low and very high frequencies. The loudness
//! model reports how many dB SPL a tone at a given frequency needs to sound
//! as loud as a 40 dB tone at 1 kHz; the engine turns the difference from
//! the reference level into a gain.

use libm::{log10, pow};

/// Frequency → loudness level in dB.
///
/// Implementations must be total and side-effect free.
pub trait LoudnessModel {
    /// Level in dB SPL required at `frequency_hz`.
    fn loudness(&self, frequency_hz: f64) -> f64;

    /// Linear gain relative to `reference` dB.
    fn gain(&self, frequency_hz: f64, reference: f64) -> f64 {
        pow(10.0, (self.loudness(frequency_hz) - reference) / 20.0)
    }
}

/// Standard frequencies of the ISO 226:2003 contours, Hz.
const CONTOUR_FREQS: [f64; 29] = [
    20.0, 25.0, 31.5, 40.0, 50.0, 63.0, 80.0, 100.0, 125.0, 160.0, 200.0, 250.0, 315.0, 400.0,
    500.0, 630.0, 800.0, 1000.0, 1250.0, 1600.0, 2000.0, 2500.0, 3150.0, 4000.0, 5000.0, 6300.0,
    8000.0, 10000.0, 12500.0,
];

/// 40-phon contour, dB SPL at each of [`CONTOUR_FREQS`].
const CONTOUR_40_PHON: [f64; 29] = [
    99.85, 93.94, 88.17, 82.63, 77.78, 73.08, 68.48, 64.37, 60.59, 56.70, 53.41, 50.40, 47.58,
    44.98, 43.05, 42.07, 41.34, 40.06, 40.01, 41.82, 42.51, 39.23, 36.51, 35.61, 36.65, 40.01,
    45.83, 51.80, 54.28,
];

/// Tabulated 40-phon equal-loudness contour.
///
/// Interpolates linearly over log-frequency and holds the end values
/// outside 20 Hz to 12.5 kHz.
#[derive(Debug, Clone, Copy, Default)]
pub struct EqualLoudness;

impl LoudnessModel for EqualLoudness {
    fn loudness(&self, frequency_hz: f64) -> f64 {
        equal_loudness(frequency_hz)
    }
}

/// No compensation: every frequency sits at the given level.
#[derive(Debug, Clone, Copy)]
pub struct FlatLoudness(pub f64);

impl Default for FlatLoudness {
    fn default() -> Self {
        Self(crate::settings::DEFAULT_LOUDNESS_REFERENCE)
    }
}

impl LoudnessModel for FlatLoudness {
    fn loudness(&self, _frequency_hz: f64) -> f64 {
        self.0
    }
}

/// Look up the 40-phon contour at `frequency_hz`.
///
/// NaN and non-positive inputs fall back to the lowest table entry.
pub fn equal_loudness(frequency_hz: f64) -> f64 {
    let last = CONTOUR_FREQS.len() - 1;
    if frequency_hz.is_nan() || frequency_hz <= CONTOUR_FREQS[0] {
        return CONTOUR_40_PHON[0];
    }
    if frequency_hz >= CONTOUR_FREQS[last] {
        return CONTOUR_40_PHON[last];
    }

    // First table frequency strictly above the input
    let upper = CONTOUR_FREQS.partition_point(|&f| f <= frequency_hz);
    let lower = upper - 1;

    let (f0, f1) = (CONTOUR_FREQS[lower], CONTOUR_FREQS[upper]);
    let (l0, l1) = (CONTOUR_40_PHON[lower], CONTOUR_40_PHON[upper]);
    let t = (log10(frequency_hz) - log10(f0)) / (log10(f1) - log10(f0));
    l0 + (l1 - l0) * t
}
