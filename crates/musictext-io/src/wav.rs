//! WAV container writing and reading.
//!
//! Output is always mono 16-bit PCM at the caller's sample rate, which gives
//! the canonical 44-byte header:
//!
//! | Offset | Field | Value |
//! |--------|-------|-------|
//! | 0 | `RIFF` chunk id | |
//! | 4 | RIFF size | `36 + data` |
//! | 20 | format tag | 1 (PCM) |
//! | 22 | channels | 1 |
//! | 24 | sample rate | |
//! | 28 | byte rate | `2 * rate` |
//! | 32 | block align | 2 |
//! | 34 | bits per sample | 16 |
//! | 40 | data length | `2 * samples` |

use crate::pcm::quantize;
use crate::{Error, Result};
use hound::{SampleFormat, WavReader, WavWriter};
use std::fs::File;
use std::io::{BufWriter, Cursor, Read, Seek, Write};
use std::path::Path;

/// Channel count of every container this crate writes.
pub const CHANNELS: u16 = 1;

/// Bit depth of every container this crate writes.
pub const BITS_PER_SAMPLE: u16 = 16;

/// WAV audio encoding format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavFormat {
    /// Linear PCM (integer samples).
    Pcm,
    /// IEEE 754 floating-point samples.
    IeeeFloat,
}

/// WAV metadata extracted without loading sample data.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Total number of sample frames (samples per channel).
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Audio encoding format.
    pub format: WavFormat,
}

impl WavInfo {
    fn from_reader<R: Read>(reader: &WavReader<R>) -> Self {
        let spec = reader.spec();
        let total_samples = u64::from(reader.len()); // total across all channels
        let num_frames = total_samples / u64::from(spec.channels.max(1));
        let duration_secs = if spec.sample_rate == 0 {
            0.0
        } else {
            num_frames as f64 / f64::from(spec.sample_rate)
        };

        let format = match spec.sample_format {
            SampleFormat::Float => WavFormat::IeeeFloat,
            SampleFormat::Int => WavFormat::Pcm,
        };

        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            num_frames,
            duration_secs,
            format,
        }
    }

    /// Size of the data chunk in bytes.
    pub fn data_len(&self) -> u64 {
        self.num_frames * u64::from(self.channels) * u64::from(self.bits_per_sample / 8)
    }
}

fn pcm16_spec(sample_rate: u32) -> hound::WavSpec {
    hound::WavSpec {
        channels: CHANNELS,
        sample_rate,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    }
}

/// Stream samples into a mono 16-bit container on any seekable writer.
///
/// Samples are quantized with [`quantize`] one at a time as they are pulled
/// from the iterator. Returns the number of samples written.
pub fn write_pcm16<W, I>(writer: W, samples: I, sample_rate: u32) -> Result<u32>
where
    W: Write + Seek,
    I: IntoIterator<Item = f64>,
{
    let mut wav = WavWriter::new(writer, pcm16_spec(sample_rate))?;
    let mut count = 0u32;
    for sample in samples {
        wav.write_sample(quantize(sample))?;
        count += 1;
    }
    wav.finalize()?;

    tracing::debug!(samples = count, sample_rate, "wrote pcm16 container");
    Ok(count)
}

/// Encode samples into an in-memory WAV container.
///
/// # Example
///
/// ```rust
/// use musictext_io::encode_wav;
///
/// let bytes = encode_wav(vec![0.0; 100], 44100).unwrap();
/// assert_eq!(&bytes[0..4], b"RIFF");
/// assert_eq!(bytes.len(), 44 + 200);
/// ```
pub fn encode_wav<I: IntoIterator<Item = f64>>(samples: I, sample_rate: u32) -> Result<Vec<u8>> {
    let samples = samples.into_iter();
    let capacity = 44 + 2 * samples.size_hint().0;
    let mut cursor = Cursor::new(Vec::with_capacity(capacity));
    write_pcm16(&mut cursor, samples, sample_rate)?;
    Ok(cursor.into_inner())
}

/// Stream samples into a WAV file at `path`.
pub fn write_wav<P, I>(path: P, samples: I, sample_rate: u32) -> Result<u32>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = f64>,
{
    let file = BufWriter::new(File::create(path)?);
    write_pcm16(file, samples, sample_rate)
}

/// Read WAV metadata from a file without loading sample data.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    Ok(WavInfo::from_reader(&reader))
}

/// Read WAV metadata from an in-memory container.
pub fn wav_info_from_bytes(bytes: &[u8]) -> Result<WavInfo> {
    let reader = WavReader::new(Cursor::new(bytes))?;
    Ok(WavInfo::from_reader(&reader))
}

/// Decode an in-memory mono 16-bit container into its integer samples.
///
/// Containers with another layout are rejected with
/// [`Error::UnsupportedFormat`].
pub fn decode_wav(bytes: &[u8]) -> Result<(Vec<i16>, WavInfo)> {
    let reader = WavReader::new(Cursor::new(bytes))?;
    let info = WavInfo::from_reader(&reader);
    if info.format != WavFormat::Pcm
        || info.bits_per_sample != BITS_PER_SAMPLE
        || info.channels != CHANNELS
    {
        return Err(Error::UnsupportedFormat(format!(
            "{} channel(s), {}-bit {:?}",
            info.channels, info.bits_per_sample, info.format
        )));
    }
    let samples = reader
        .into_samples::<i16>()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok((samples, info))
}

/// Read a WAV file and return samples as f32 in `[-1.0, 1.0)`.
///
/// Multi-channel files are mixed down to mono by averaging channels.
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(Vec<f32>, WavInfo)> {
    let reader = WavReader::open(path)?;
    let info = WavInfo::from_reader(&reader);
    let channels = info.channels.max(1) as usize;

    let samples: Vec<f32> = match reader.spec().sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = (1i64 << (info.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    let mono = if channels > 1 {
        samples
            .chunks(channels)
            .map(|chunk| chunk.iter().sum::<f32>() / channels as f32)
            .collect()
    } else {
        samples
    };

    Ok((mono, info))
}
