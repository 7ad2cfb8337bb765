//! TOML-based configuration for sqlcanvas.
//!
//! Example configuration:
//! ```toml
//! [generator]
//! alias_style = "words"
//! strict_connectivity = true
//! audit_columns = false
//! default_schema = "sales"
//! ```
//!
//! Every key is optional; missing keys take the generator defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::generator::GeneratorOptions;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "SQLCANVAS_CONFIG";

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Root configuration structure. The `[generator]` table deserializes
/// straight into [`GeneratorOptions`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub generator: GeneratorOptions,
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings = Self::parse(&content)?;
        log::debug!("loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Parse settings from TOML text.
    pub fn parse(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `SQLCANVAS_CONFIG`
    /// 2. `./sqlcanvas.toml`
    /// 3. `<config dir>/sqlcanvas/config.toml`
    ///
    /// Falls back to defaults when none exists.
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var(CONFIG_ENV) {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("sqlcanvas.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("sqlcanvas").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// Options for a [`QueryGenerator`](crate::generator::QueryGenerator).
    ///
    /// A blank `default_schema` falls back to `dbo`.
    pub fn generator_options(&self) -> GeneratorOptions {
        let mut options = self.generator.clone();
        options.default_schema = match options.default_schema.trim() {
            "" => GeneratorOptions::default().default_schema,
            schema => schema.to_string(),
        };
        options
    }
}
