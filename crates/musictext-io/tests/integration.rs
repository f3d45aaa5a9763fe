//! Integration tests for musictext-io: the full text → WAV pipeline.

use musictext_core::{Beat, Score, SynthSettings};
use musictext_io::{
    Error, decode_wav, encode_score, quantize, read_wav, read_wav_info, render_to_file,
    to_container_bytes, wav_info_from_bytes,
};
use proptest::prelude::*;
use rustfft::FftPlanner;
use rustfft::num_complex::Complex;
use tempfile::TempDir;

fn u16_at(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn u32_at(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
}

fn a440() -> Vec<u8> {
    let score = Score::new(vec![Beat::note(69)]);
    encode_score(&score, &SynthSettings::new(44100, 120.0)).unwrap()
}

/// Frequency of the strongest FFT bin, in Hz.
fn dominant_frequency(samples: &[i16], sample_rate: u32) -> f64 {
    let n = samples.len();
    let mut buffer: Vec<Complex<f64>> = samples
        .iter()
        .map(|&s| Complex::new(f64::from(s), 0.0))
        .collect();
    FftPlanner::<f64>::new()
        .plan_fft_forward(n)
        .process(&mut buffer);

    let peak_bin = (1..n / 2)
        .max_by(|&a, &b| buffer[a].norm().total_cmp(&buffer[b].norm()))
        .unwrap();
    peak_bin as f64 * f64::from(sample_rate) / n as f64
}

// ---------------------------------------------------------------------------
// Single A4 beat
// ---------------------------------------------------------------------------

#[test]
fn a440_container_layout() {
    let bytes = a440();

    assert_eq!(&bytes[0..4], b"RIFF");
    assert_eq!(&bytes[8..12], b"WAVE");
    assert_eq!(u16_at(&bytes, 22), 1);
    assert_eq!(u32_at(&bytes, 24), 44100);
    assert_eq!(u32_at(&bytes, 28), 88200);
    assert_eq!(u16_at(&bytes, 32), 2);
    assert_eq!(u16_at(&bytes, 34), 16);
    assert_eq!(u32_at(&bytes, 40), 44100);
    assert_eq!(bytes.len(), 44144);
}

#[test]
fn a440_spectrum_peaks_at_440() {
    let (samples, info) = decode_wav(&a440()).unwrap();
    assert_eq!(samples.len(), 22050);

    let freq = dominant_frequency(&samples, info.sample_rate);
    assert!((freq - 440.0).abs() <= 2.0, "dominant frequency {freq} Hz");
}

#[test]
fn a440_envelope_decays() {
    let (samples, _) = decode_wav(&a440()).unwrap();
    let peaks: Vec<i32> = samples
        .chunks(5000)
        .map(|chunk| chunk.iter().map(|&s| i32::from(s).abs()).max().unwrap_or(0))
        .collect();

    assert!(peaks[0] > 0);
    assert!(peaks.windows(2).all(|w| w[1] <= w[0]), "{peaks:?}");
    assert!(peaks[peaks.len() - 1] < peaks[0]);
}

// ---------------------------------------------------------------------------
// Text pipeline
// ---------------------------------------------------------------------------

#[test]
fn subdivisions_keep_the_beat_grid() {
    let bytes = to_container_bytes("c (d e) (f g a) {c | e}", 44100, 120.0).unwrap();
    let info = wav_info_from_bytes(&bytes).unwrap();
    assert_eq!(info.num_frames, 4 * 22050);
}

#[test]
fn comments_and_rests_render_silently_where_expected() {
    let (samples, _) =
        decode_wav(&to_container_bytes("% intro\nr r", 8000, 120.0).unwrap()).unwrap();
    assert_eq!(samples.len(), 8000);
    assert!(samples.iter().all(|&s| s == 0));
}

#[test]
fn malformed_text_is_a_parse_error() {
    for text in ["c )", "(c d e f)", "{c}", "x", ""] {
        match to_container_bytes(text, 44100, 120.0) {
            Err(Error::Parse(failure)) => {
                assert!(!failure.message().is_empty(), "empty message for {text:?}");
            }
            other => panic!("{text:?}: expected parse error, got {other:?}"),
        }
    }
}

#[test]
fn render_to_file_streams_to_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("song.wav");
    let settings = SynthSettings::new(22050, 120.0);

    let summary = render_to_file("c' e' g' c''", &path, &settings).unwrap();
    assert_eq!(summary.beats, 4);
    assert_eq!(summary.samples, 4 * 11025);
    assert!((summary.duration_secs - 2.0).abs() < 1e-9);

    let info = read_wav_info(&path).unwrap();
    assert_eq!(info.channels, 1);
    assert_eq!(info.sample_rate, 22050);
    assert_eq!(info.num_frames, 4 * 11025);

    let (samples, _) = read_wav(&path).unwrap();
    assert!(samples.iter().any(|&s| s != 0.0));
}

#[test]
fn render_to_file_leaves_no_file_on_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.wav");
    let result = render_to_file("c (d", &path, &SynthSettings::default());
    assert!(matches!(result, Err(Error::Parse(_))));
    assert!(!path.exists());
}

// ---------------------------------------------------------------------------
// Quantization properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn quantize_is_monotonic(a in -2.0f64..2.0, b in -2.0f64..2.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(quantize(lo) <= quantize(hi));
    }

    #[test]
    fn quantize_matches_floor_inside_range(x in -0.5f64..0.49) {
        let expected = (x * 65536.0).floor() as i32;
        prop_assert_eq!(i32::from(quantize(x)), expected);
    }
}
