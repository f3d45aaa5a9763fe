//! Text → WAV pipeline.

use crate::Result;
use crate::wav::{encode_wav, write_wav};
use musictext_core::{Score, SynthSettings, parse_score, synthesize};
use std::path::Path;

/// What a render produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSummary {
    /// Top-level beats in the score.
    pub beats: usize,
    /// Samples written to the container.
    pub samples: usize,
    /// Playback length in seconds.
    pub duration_secs: f64,
}

impl RenderSummary {
    fn new(score: &Score, samples: usize, settings: &SynthSettings) -> Self {
        let duration_secs = if settings.sample_rate == 0 {
            0.0
        } else {
            samples as f64 / f64::from(settings.sample_rate)
        };
        Self {
            beats: score.len(),
            samples,
            duration_secs,
        }
    }
}

/// Parse `text` and render it into a complete WAV container.
///
/// A parse failure is returned before any sample is synthesized.
pub fn to_container_bytes(text: &str, sample_rate: u32, tempo_bpm: f64) -> Result<Vec<u8>> {
    to_container_bytes_with(text, &SynthSettings::new(sample_rate, tempo_bpm))
}

/// [`to_container_bytes`] with full control over the synthesis constants.
pub fn to_container_bytes_with(text: &str, settings: &SynthSettings) -> Result<Vec<u8>> {
    let score = parse_score(text)?;
    encode_score(&score, settings)
}

/// Render an already-parsed score into a WAV container.
pub fn encode_score(score: &Score, settings: &SynthSettings) -> Result<Vec<u8>> {
    tracing::debug!(
        beats = score.len(),
        sample_rate = settings.sample_rate,
        tempo = settings.tempo_bpm,
        "encoding score"
    );
    encode_wav(synthesize(score, settings), settings.sample_rate)
}

/// Parse `text` and stream the rendered audio straight to a WAV file.
pub fn render_to_file<P: AsRef<Path>>(
    text: &str,
    path: P,
    settings: &SynthSettings,
) -> Result<RenderSummary> {
    let path = path.as_ref();
    let score = parse_score(text)?;
    let written = write_wav(path, synthesize(&score, settings), settings.sample_rate)?;
    let summary = RenderSummary::new(&score, written as usize, settings);

    tracing::info!(
        path = %path.display(),
        beats = summary.beats,
        samples = summary.samples,
        "rendered {:.2}s",
        summary.duration_secs
    );
    Ok(summary)
}
