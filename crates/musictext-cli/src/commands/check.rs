//! Parse-only validation of a notation file.

use super::common::{SettingsArgs, parse_or_report, read_notation, source_name};
use clap::Args;

#[derive(Args)]
pub struct CheckArgs {
    /// Notation file, or `-` for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    #[command(flatten)]
    settings: SettingsArgs,
}

pub fn run(args: CheckArgs) -> anyhow::Result<()> {
    let settings = args.settings.resolve()?.to_settings();
    let text = read_notation(&args.input)?;
    let source = source_name(&args.input);
    let score = parse_or_report(&text, source)?;

    let samples = score.rendered_len(&settings);
    println!(
        "{}: ok, {} beats, {} samples ({:.2}s at {} BPM)",
        source,
        score.len(),
        samples,
        samples as f64 / f64::from(settings.sample_rate),
        settings.tempo_bpm
    );
    Ok(())
}
