//! Configuration for musictext renders.
//!
//! A [`RenderConfig`] holds the synthesis constants and the song store
//! location. It is read from a TOML file in the platform config directory,
//! validated, then turned into the [`SynthSettings`](musictext_core::SynthSettings)
//! the engine consumes. Command-line flags are applied on top by the caller.
//!
//! # Example
//!
//! ```rust
//! use musictext_config::RenderConfig;
//!
//! let config = RenderConfig::from_toml("tempo_bpm = 90.0").unwrap();
//! config.validate().unwrap();
//!
//! let settings = config.to_settings();
//! assert_eq!(settings.sample_rate, 44100);
//! assert_eq!(settings.beat_samples(), 29400);
//! ```

mod config;
mod error;

/// Platform-specific paths for configuration and the song store.
pub mod paths;

/// Range checks for configuration values.
pub mod validation;

pub use config::RenderConfig;
pub use error::ConfigError;
pub use paths::{default_config_path, default_store_dir, user_config_dir, user_data_dir};
pub use validation::{ValidationError, ValidationResult, validate_config};
