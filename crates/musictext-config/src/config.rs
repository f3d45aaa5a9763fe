//! Render configuration file format and operations.

use musictext_core::SynthSettings;
use musictext_core::settings::{
    DEFAULT_AMPLITUDE, DEFAULT_LOUDNESS_REFERENCE, DEFAULT_NOTE_DECAY, DEFAULT_REST_DECAY,
    DEFAULT_SAMPLE_RATE, DEFAULT_TEMPO_BPM,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::validation::{ValidationResult, validate_config};

/// Settings for turning notation into audio.
///
/// Every field is optional in the file; missing ones take the engine
/// defaults.
///
/// # TOML Format
///
/// ```toml
/// sample_rate = 44100
/// tempo_bpm = 120.0
/// amplitude = 0.01
/// note_decay = 0.00005
/// rest_decay = 0.001
/// loudness_reference = 40.0
/// store_dir = "/home/me/songs"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Output sample rate in Hz.
    pub sample_rate: u32,

    /// Top-level beats per minute.
    pub tempo_bpm: f64,

    /// Excitation amplitude reference.
    pub amplitude: f64,

    /// Resonator decay rate for notes.
    pub note_decay: f64,

    /// Resonator decay rate for rests.
    pub rest_decay: f64,

    /// Loudness level (dB SPL) treated as unity gain.
    pub loudness_reference: f64,

    /// Song store directory; the platform data directory when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_dir: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            tempo_bpm: DEFAULT_TEMPO_BPM,
            amplitude: DEFAULT_AMPLITUDE,
            note_decay: DEFAULT_NOTE_DECAY,
            rest_decay: DEFAULT_REST_DECAY,
            loudness_reference: DEFAULT_LOUDNESS_REFERENCE,
            store_dir: None,
        }
    }
}

impl RenderConfig {
    /// Set the sample rate.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Set the tempo.
    pub fn with_tempo(mut self, tempo_bpm: f64) -> Self {
        self.tempo_bpm = tempo_bpm;
        self
    }

    /// Set the song store directory.
    pub fn with_store_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.store_dir = Some(dir.into());
        self
    }

    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let config: RenderConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load a configuration, or the defaults if `path` does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load a configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the configuration to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every value against its accepted range.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_config(self)
    }

    /// Engine settings described by this configuration.
    pub fn to_settings(&self) -> SynthSettings {
        SynthSettings {
            sample_rate: self.sample_rate,
            tempo_bpm: self.tempo_bpm,
            amplitude: self.amplitude,
            note_decay: self.note_decay,
            rest_decay: self.rest_decay,
            loudness_reference: self.loudness_reference,
        }
    }

    /// Store directory, falling back to [`default_store_dir`](crate::default_store_dir).
    pub fn store_dir(&self) -> PathBuf {
        self.store_dir
            .clone()
            .unwrap_or_else(crate::paths::default_store_dir)
    }
}

impl From<SynthSettings> for RenderConfig {
    fn from(settings: SynthSettings) -> Self {
        Self {
            sample_rate: settings.sample_rate,
            tempo_bpm: settings.tempo_bpm,
            amplitude: settings.amplitude,
            note_decay: settings.note_decay,
            rest_decay: settings.rest_decay,
            loudness_reference: settings.loudness_reference,
            store_dir: None,
        }
    }
}
