//! Shared CLI helpers used across multiple commands.

use anyhow::Context;
use clap::Args;
use musictext_config::{RenderConfig, default_config_path};
use musictext_core::{ParseFailure, Score, parse_score};
use std::io::Read;
use std::path::PathBuf;

/// Synthesis options shared by every command that renders.
#[derive(Args, Debug, Clone, Default)]
pub struct SettingsArgs {
    /// Configuration file (TOML); defaults to the platform config path
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output sample rate in Hz (overrides config)
    #[arg(long)]
    pub sample_rate: Option<u32>,

    /// Tempo in beats per minute (overrides config)
    #[arg(long)]
    pub tempo: Option<f64>,
}

impl SettingsArgs {
    /// Load the config file, apply flag overrides, and validate.
    ///
    /// An explicit `--config` must exist; the default path may be absent.
    pub fn resolve(&self) -> anyhow::Result<RenderConfig> {
        let mut config = match &self.config {
            Some(path) => RenderConfig::load(path)?,
            None => RenderConfig::load_or_default(default_config_path())?,
        };

        if let Some(rate) = self.sample_rate {
            config.sample_rate = rate;
        }
        if let Some(tempo) = self.tempo {
            config.tempo_bpm = tempo;
        }

        config.validate()?;
        tracing::debug!(?config, "resolved render config");
        Ok(config)
    }
}

/// Read notation from a file, or from stdin when `input` is `-`.
pub fn read_notation(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read notation from stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("failed to read '{input}'"))
    }
}

/// Display name for an input argument.
pub fn source_name(input: &str) -> &str {
    if input == "-" { "<stdin>" } else { input }
}

/// Parse `text`, printing a caret diagnostic to stderr on failure.
pub fn parse_or_report(text: &str, source: &str) -> anyhow::Result<Score> {
    parse_score(text).map_err(|failure| {
        eprintln!("{}", diagnostic(text, source, &failure));
        anyhow::anyhow!("{source}: {failure}")
    })
}

/// Multi-line diagnostic pointing at the failing column.
pub fn diagnostic(text: &str, source: &str, failure: &ParseFailure) -> String {
    let line = text.lines().nth(failure.line - 1).unwrap_or("");
    let caret = " ".repeat(failure.column - 1);
    format!(
        "{source}:{}:{}: {}\n  {line}\n  {caret}^",
        failure.line, failure.column, failure.kind
    )
}
