//! Float → 16-bit PCM quantization.
//!
//! Samples are scaled by 2^16, so the nominal `[-0.5, 0.5)` range covers
//! the full i16 range. Anything outside saturates silently.

/// Scale factor from float samples to integer PCM.
pub const FULL_SCALE: f64 = 65536.0;

/// Quantize one sample: `floor(sample * 65536)` clipped to the i16 range.
///
/// NaN maps to 0.
///
/// # Example
///
/// ```rust
/// use musictext_io::quantize;
///
/// assert_eq!(quantize(0.25), 16384);
/// assert_eq!(quantize(0.6), i16::MAX);
/// assert_eq!(quantize(-0.9), i16::MIN);
/// ```
#[inline]
pub fn quantize(sample: f64) -> i16 {
    let scaled = (sample * FULL_SCALE).floor();
    scaled.clamp(f64::from(i16::MIN), f64::from(i16::MAX)) as i16
}

/// Reference packer: quantize and lay samples out as little-endian i16 bytes.
#[cfg(test)]
pub(crate) fn pack_le<I: IntoIterator<Item = f64>>(samples: I) -> Vec<u8> {
    let samples = samples.into_iter();
    let mut bytes = Vec::with_capacity(2 * samples.size_hint().0);
    for sample in samples {
        bytes.extend_from_slice(&quantize(sample).to_le_bytes());
    }
    bytes
}
