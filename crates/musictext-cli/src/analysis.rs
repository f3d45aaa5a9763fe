//! Spectrum and envelope measurements for rendered audio.

use rustfft::{FftPlanner, num_complex::Complex};
use std::f32::consts::PI;

/// Apply a Hann window in place.
pub fn apply_hann(buffer: &mut [f32]) {
    let n = buffer.len();
    for (i, sample) in buffer.iter_mut().enumerate() {
        let w = 0.5 * (1.0 - (2.0 * PI * i as f32 / n as f32).cos());
        *sample *= w;
    }
}

/// Magnitudes of the positive-frequency bins (DC to Nyquist).
pub fn magnitude_spectrum(samples: &[f32]) -> Vec<f32> {
    let n = samples.len();
    if n == 0 {
        return Vec::new();
    }

    let mut windowed = samples.to_vec();
    apply_hann(&mut windowed);

    let mut buffer: Vec<Complex<f32>> = windowed.iter().map(|&x| Complex::new(x, 0.0)).collect();
    FftPlanner::<f32>::new().plan_fft_forward(n).process(&mut buffer);

    buffer.truncate(n / 2 + 1);
    buffer.iter().map(|c| c.norm()).collect()
}

/// Frequency of the strongest non-DC bin, or `None` for silence.
pub fn dominant_frequency(samples: &[f32], sample_rate: u32) -> Option<f32> {
    let magnitudes = magnitude_spectrum(samples);
    let (bin, &level) = magnitudes
        .iter()
        .enumerate()
        .skip(1)
        .max_by(|a, b| a.1.total_cmp(b.1))?;
    if level <= 0.0 {
        return None;
    }
    Some(bin as f32 * sample_rate as f32 / samples.len() as f32)
}

/// Peak absolute level of each consecutive block of `block_len` samples.
pub fn peak_envelope(samples: &[f32], block_len: usize) -> Vec<f32> {
    samples
        .chunks(block_len.max(1))
        .map(|block| block.iter().fold(0.0f32, |peak, s| peak.max(s.abs())))
        .collect()
}

/// Linear level to dBFS, floored at -120.
pub fn to_dbfs(level: f32) -> f32 {
    if level > 0.0 {
        (20.0 * level.log10()).max(-120.0)
    } else {
        -120.0
    }
}
