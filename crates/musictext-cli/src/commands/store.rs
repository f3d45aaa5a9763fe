//! Song store management commands.

use super::common::{SettingsArgs, parse_or_report, read_notation, source_name};
use crate::store::SongStore;
use clap::{Args, Subcommand};
use musictext_io::encode_score;
use std::path::PathBuf;

#[derive(Args)]
pub struct StoreArgs {
    #[command(subcommand)]
    command: StoreCommand,

    /// Store directory (overrides config)
    #[arg(long, value_name = "DIR", global = true)]
    store_dir: Option<PathBuf>,

    /// Configuration file (TOML); defaults to the platform config path
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum StoreCommand {
    /// Render a notation file and save it in the store
    Put {
        /// Notation file, or `-` for stdin
        #[arg(value_name = "INPUT")]
        input: String,

        /// Output sample rate in Hz (overrides config)
        #[arg(long)]
        sample_rate: Option<u32>,

        /// Tempo in beats per minute (overrides config)
        #[arg(long)]
        tempo: Option<f64>,
    },

    /// Copy a stored song's audio to a file
    Get {
        /// Song key
        key: String,

        /// Output WAV file
        #[arg(short, long, value_name = "OUTPUT")]
        output: PathBuf,
    },

    /// List stored songs
    List,
}

pub fn run(args: StoreArgs) -> anyhow::Result<()> {
    let settings_args = SettingsArgs {
        config: args.config,
        ..SettingsArgs::default()
    };

    match args.command {
        StoreCommand::Put {
            input,
            sample_rate,
            tempo,
        } => {
            let config = SettingsArgs {
                sample_rate,
                tempo,
                ..settings_args
            }
            .resolve()?;
            let store = open(args.store_dir, &config)?;

            let text = read_notation(&input)?;
            let score = parse_or_report(&text, source_name(&input))?;
            let bytes = encode_score(&score, &config.to_settings())?;

            let key = SongStore::key_for(&text);
            let path = store.put(&key, &text, &bytes)?;
            tracing::info!(path = %path.display(), "stored song");
            println!("{key}");
        }

        StoreCommand::Get { key, output } => {
            let store = open(args.store_dir, &settings_args.resolve()?)?;
            let Some(bytes) = store.get(&key)? else {
                anyhow::bail!("no song with key '{key}' in {}", store.root().display());
            };
            std::fs::write(&output, bytes)?;
            println!("Wrote {}", output.display());
        }

        StoreCommand::List => {
            let store = open(args.store_dir, &settings_args.resolve()?)?;
            let keys = store.list()?;
            if keys.is_empty() {
                println!("(no songs in {})", store.root().display());
            }
            for key in keys {
                let preview = store
                    .notation(&key)?
                    .unwrap_or_default()
                    .lines()
                    .find(|line| !line.trim().is_empty() && !line.trim_start().starts_with('%'))
                    .unwrap_or("")
                    .chars()
                    .take(40)
                    .collect::<String>();
                println!("{key}  {preview}");
            }
        }
    }

    Ok(())
}

fn open(
    store_dir: Option<PathBuf>,
    config: &musictext_config::RenderConfig,
) -> anyhow::Result<SongStore> {
    Ok(SongStore::open(
        store_dir.unwrap_or_else(|| config.store_dir()),
    )?)
}
