//! Spectral and envelope analysis of a WAV file.

use crate::analysis::{dominant_frequency, peak_envelope, to_dbfs};
use clap::Args;
use musictext_io::read_wav;
use std::path::PathBuf;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Envelope block length in milliseconds
    #[arg(long, default_value = "100")]
    block_ms: u32,

    /// Maximum number of envelope blocks to print
    #[arg(long, default_value = "20")]
    blocks: usize,
}

pub fn run(args: AnalyzeArgs) -> anyhow::Result<()> {
    let (samples, info) = read_wav(&args.input)?;

    println!("Analyzing {}...", args.input.display());
    println!(
        "  {} samples, {} Hz, {:.2}s",
        samples.len(),
        info.sample_rate,
        info.duration_secs
    );

    match dominant_frequency(&samples, info.sample_rate) {
        Some(freq) => println!("Dominant frequency: {freq:.1} Hz"),
        None => println!("Dominant frequency: (silent)"),
    }

    let peak = samples.iter().fold(0.0f32, |p, s| p.max(s.abs()));
    println!("Peak level: {:.1} dBFS", to_dbfs(peak));

    let block_len = (u64::from(info.sample_rate) * u64::from(args.block_ms) / 1000).max(1) as usize;
    let envelope = peak_envelope(&samples, block_len);

    println!("\nPeak envelope ({} ms blocks):", args.block_ms);
    println!("  {:>9}  {:>10}", "Time (s)", "Peak (dB)");
    println!("  {:>9}  {:>10}", "--------", "---------");
    for (i, level) in envelope.iter().take(args.blocks).enumerate() {
        let time = (i * block_len) as f64 / f64::from(info.sample_rate.max(1));
        println!("  {:>9.2}  {:>10.1}", time, to_dbfs(*level));
    }
    if envelope.len() > args.blocks {
        println!("  ... {} more blocks", envelope.len() - args.blocks);
    }

    Ok(())
}
