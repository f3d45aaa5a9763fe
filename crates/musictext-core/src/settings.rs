//! Synthesis parameters passed explicitly into the engine.

use libm::round;

/// Default output sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Default tempo in beats per minute.
pub const DEFAULT_TEMPO_BPM: f64 = 120.0;

/// Amplitude reference for the excitation impulse.
pub const DEFAULT_AMPLITUDE: f64 = 0.01;

/// Per-sample decay rate of a sounding note.
pub const DEFAULT_NOTE_DECAY: f64 = 0.00005;

/// Per-sample decay rate during a rest.
pub const DEFAULT_REST_DECAY: f64 = 0.001;

/// Loudness level (dB SPL) treated as unity gain.
pub const DEFAULT_LOUDNESS_REFERENCE: f64 = 40.0;

/// Everything the synthesis engine needs besides the score itself.
///
/// ## Parameters
/// - `sample_rate`: Output rate in Hz (default 44100)
/// - `tempo_bpm`: Top-level beats per minute (default 120.0)
/// - `amplitude`: Excitation amplitude reference (default 0.01)
/// - `note_decay`: Resonator decay rate `alpha` for notes (default 0.00005)
/// - `rest_decay`: Resonator decay rate `alpha` for rests (default 0.001)
/// - `loudness_reference`: Loudness level mapped to unity gain, dB (default 40.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthSettings {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Tempo in top-level beats per minute.
    pub tempo_bpm: f64,
    /// Excitation amplitude reference.
    pub amplitude: f64,
    /// Resonator decay rate for notes.
    pub note_decay: f64,
    /// Resonator decay rate for rests.
    pub rest_decay: f64,
    /// Loudness level treated as unity gain.
    pub loudness_reference: f64,
}

impl Default for SynthSettings {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            tempo_bpm: DEFAULT_TEMPO_BPM,
            amplitude: DEFAULT_AMPLITUDE,
            note_decay: DEFAULT_NOTE_DECAY,
            rest_decay: DEFAULT_REST_DECAY,
            loudness_reference: DEFAULT_LOUDNESS_REFERENCE,
        }
    }
}

impl SynthSettings {
    /// Settings with the given rate and tempo, defaults elsewhere.
    pub fn new(sample_rate: u32, tempo_bpm: f64) -> Self {
        Self {
            sample_rate,
            tempo_bpm,
            ..Self::default()
        }
    }

    /// Samples in one top-level beat: `round(sample_rate * 60 / tempo_bpm)`.
    ///
    /// A non-positive or non-finite tempo yields zero.
    pub fn beat_samples(&self) -> usize {
        let samples = round(f64::from(self.sample_rate) * 60.0 / self.tempo_bpm);
        if samples.is_finite() && samples > 0.0 {
            samples as usize
        } else {
            0
        }
    }
}
