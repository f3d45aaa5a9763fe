//! Audio container layer for musictext.
//!
//! This crate provides:
//!
//! - **PCM quantization**: [`quantize`] maps `f64` samples to clipped 16-bit integers
//! - **WAV encoding**: [`encode_wav`] and [`write_wav`] stream samples into a
//!   mono 16-bit RIFF/WAVE container
//! - **WAV inspection**: [`read_wav_info`], [`read_wav`], [`decode_wav`]
//! - **Rendering**: [`to_container_bytes`] runs the whole text → WAV pipeline
//!
//! ## Quick Start
//!
//! ```rust
//! use musictext_io::{to_container_bytes, wav_info_from_bytes};
//!
//! let bytes = to_container_bytes("c' e' g'", 44100, 120.0)?;
//! let info = wav_info_from_bytes(&bytes)?;
//! assert_eq!(info.num_frames, 3 * 22050);
//! # Ok::<(), musictext_io::Error>(())
//! ```

mod pcm;
mod render;
mod wav;

pub use pcm::{FULL_SCALE, quantize};
pub use render::{
    RenderSummary, encode_score, render_to_file, to_container_bytes, to_container_bytes_with,
};
pub use wav::{
    BITS_PER_SAMPLE, CHANNELS, WavFormat, WavInfo, decode_wav, encode_wav, read_wav,
    read_wav_info, wav_info_from_bytes, write_pcm16, write_wav,
};

/// Error types for rendering and container I/O.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The notation text did not parse; nothing was synthesized.
    #[error("parse error: {0}")]
    Parse(#[from] musictext_core::ParseFailure),

    /// WAV container read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The container holds a sample format this crate cannot decode.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for container operations.
pub type Result<T> = std::result::Result<T, Error>;
