//! PdfSign Settings Crate
//!
//! Loads, validates, and saves the application configuration.

pub mod config;
pub mod error;

pub use config::{CaptureSettings, Config, OutputSettings, PlacementSettings, RenderSettings};
pub use error::{ConfigError, SettingsError};
