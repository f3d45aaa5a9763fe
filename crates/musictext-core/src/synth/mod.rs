//! Resonator synthesis of a beat tree.

pub mod loudness;
pub mod render;
pub mod resonator;

pub use loudness::{EqualLoudness, FlatLoudness, LoudnessModel, equal_loudness};
pub use render::{BeatRender, Samples, render_beat, synthesize, synthesize_with};
pub use resonator::{Coefficients, FilterState, hz_to_omega, midi_to_freq};
