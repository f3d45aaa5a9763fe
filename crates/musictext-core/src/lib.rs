//! musictext core - notation parsing and resonator synthesis
//!
//! This crate turns musictext notation into a lazy stream of `f64` samples.
//! Encoding the samples into a WAV container lives in `musictext-io`.
//!
//! # Pipeline
//!
//! 1. [`parse_score`] - text → [`Score`], resolving pitches through a
//!    [`Semantics`] adapter ([`PitchSemantics`] by default)
//! 2. [`synthesize`] - [`Score`] → [`Samples`], a pull-based iterator
//!    driving a two-pole resonator per beat
//! 3. [`LoudnessModel`] - equal-loudness gain applied to each note's
//!    excitation ([`EqualLoudness`] by default)
//!
//! # Example
//!
//! ```rust
//! use musictext_core::{SynthSettings, parse_score, synthesize};
//!
//! let score = parse_score("c' (e' g') {c' | e' | g'}").unwrap();
//! let settings = SynthSettings::new(44100, 120.0);
//!
//! let peak = synthesize(&score, &settings).fold(0.0f64, |m, x| m.max(x.abs()));
//! assert!(peak > 0.0);
//! ```
//!
//! # Feature Flags
//!
//! - `tracing`: emit `tracing` debug events from the parser and engine.

pub mod notation;
pub mod settings;
pub mod synth;

pub use notation::{
    AccidentalNode, Beat, MAX_NESTING, NoteNode, ParseErrorKind, ParseFailure, PitchSemantics,
    Score, Semantics, parse_score, parse_score_with, rendered_len,
};
pub use settings::SynthSettings;
pub use synth::{
    BeatRender, Coefficients, EqualLoudness, FilterState, FlatLoudness, LoudnessModel, Samples,
    equal_loudness, hz_to_omega, midi_to_freq, render_beat, synthesize, synthesize_with,
};
