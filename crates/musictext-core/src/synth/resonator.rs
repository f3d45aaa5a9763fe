//! Two-pole digital resonator.
//!
//! ```text
//! y[n] = b1 * y[n-1] + b2 * y[n-2] + x[n]
//!
//! b1 =  2 e^-α cos ω
//! b2 = -e^-2α
//! a1 =  e^-α sin ω        (impulse scale for the excitation)
//! ```
//!
//! With an impulse of `a1 * A` the output is a sinusoid at `ω` whose
//! envelope decays by `e^-α` per sample.

use core::f64::consts::TAU;
use libm::{cos, exp, pow, sin};

/// Resonator state carried across sub-beat boundaries.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FilterState {
    /// Decay rate per sample.
    pub alpha: f64,
    /// Angular frequency in radians per sample.
    pub omega: f64,
    /// Last emitted sample.
    pub y1: f64,
    /// Sample before the last.
    pub y2: f64,
}

impl FilterState {
    /// Zeroed state: no tone, no history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shift `sample` into the history and return it.
    #[inline]
    pub fn push(&mut self, sample: f64) -> f64 {
        self.y2 = self.y1;
        self.y1 = sample;
        sample
    }

    /// Coefficients for the current `alpha` and `omega`.
    pub fn coefficients(&self) -> Coefficients {
        Coefficients::new(self.alpha, self.omega)
    }
}

/// Difference-equation coefficients of the resonator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    /// Excitation scale, `e^-α sin ω`.
    pub a1: f64,
    /// First feedback coefficient, `2 e^-α cos ω`.
    pub b1: f64,
    /// Second feedback coefficient, `-e^-2α`.
    pub b2: f64,
}

impl Coefficients {
    /// Compute coefficients for decay `alpha` and angular frequency `omega`.
    pub fn new(alpha: f64, omega: f64) -> Self {
        let decay = exp(-alpha);
        Self {
            a1: decay * sin(omega),
            b1: 2.0 * decay * cos(omega),
            b2: -exp(-2.0 * alpha),
        }
    }

    /// Free-running recurrence from the state's history.
    #[inline]
    pub fn next(&self, state: &FilterState) -> f64 {
        self.b1 * state.y1 + self.b2 * state.y2
    }
}

/// Convert a MIDI-style pitch to frequency in Hz (A4 = 69 = 440 Hz).
#[inline]
pub fn midi_to_freq(pitch: i32) -> f64 {
    440.0 * pow(2.0, (f64::from(pitch) - 69.0) / 12.0)
}

/// Angular frequency in radians per sample.
#[inline]
pub fn hz_to_omega(freq_hz: f64, sample_rate: u32) -> f64 {
    TAU * freq_hz / f64::from(sample_rate)
}
