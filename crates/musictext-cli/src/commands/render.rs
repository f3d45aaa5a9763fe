//! Notation → WAV rendering command.

use super::common::{SettingsArgs, parse_or_report, read_notation, source_name};
use crate::store::SongStore;
use clap::Args;
use musictext_core::synthesize;
use musictext_io::{encode_score, write_wav};
use std::path::PathBuf;

#[derive(Args)]
pub struct RenderArgs {
    /// Notation file, or `-` for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output WAV file
    #[arg(short, long, value_name = "OUTPUT")]
    output: PathBuf,

    #[command(flatten)]
    settings: SettingsArgs,

    /// Also save the song in the store
    #[arg(long)]
    store: bool,

    /// Store directory (overrides config)
    #[arg(long, value_name = "DIR")]
    store_dir: Option<PathBuf>,
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let config = args.settings.resolve()?;
    let settings = config.to_settings();
    let text = read_notation(&args.input)?;
    let source = source_name(&args.input);

    // Parse before touching the output so failures leave nothing behind
    let score = parse_or_report(&text, source)?;

    println!(
        "Rendering {} ({} beats, {} Hz, {} BPM)...",
        source,
        score.len(),
        settings.sample_rate,
        settings.tempo_bpm
    );

    if args.store {
        let bytes = encode_score(&score, &settings)?;
        let store = SongStore::open(args.store_dir.unwrap_or_else(|| config.store_dir()))?;
        let key = SongStore::key_for(&text);
        store.put(&key, &text, &bytes)?;
        std::fs::write(&args.output, &bytes)?;
        println!("Stored as {key}");
    } else {
        write_wav(
            &args.output,
            synthesize(&score, &settings),
            settings.sample_rate,
        )?;
    }

    let samples = score.rendered_len(&settings);
    println!(
        "Wrote {} ({} samples, {:.2}s)",
        args.output.display(),
        samples,
        samples as f64 / f64::from(settings.sample_rate)
    );
    Ok(())
}
