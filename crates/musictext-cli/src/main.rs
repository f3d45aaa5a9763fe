//! musictext CLI - render text notation to WAV audio.

mod analysis;
mod commands;
mod store;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "musictext")]
#[command(author, version, about = "Render text music notation to WAV", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a notation file to a WAV file
    Render(commands::render::RenderArgs),

    /// Parse a notation file and report problems
    Check(commands::check::CheckArgs),

    /// Display WAV file metadata
    Info(commands::info::InfoArgs),

    /// Report dominant frequency and peak envelope of a WAV file
    Analyze(commands::analyze::AnalyzeArgs),

    /// Manage the rendered song store
    Store(commands::store::StoreArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Check(args) => commands::check::run(args),
        Commands::Info(args) => commands::info::run(args),
        Commands::Analyze(args) => commands::analyze::run(args),
        Commands::Store(args) => commands::store::run(args),
    }
}
