//! Configuration module for sqlcanvas.
//!
//! Handles config file discovery and generator settings.

mod settings;

pub use settings::{Settings, SettingsError, CONFIG_ENV};
