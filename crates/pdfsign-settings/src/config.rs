//! Configuration for PdfSign
//!
//! Supports JSON and TOML files, chosen by extension. Configuration is
//! organized into sections:
//! - Render settings (base scale, width-fit)
//! - Capture pad size and pixel density
//! - Placement defaults
//! - Output naming
//!
//! Every section has defaults, so a file only needs the keys it changes.

use std::path::{Path, PathBuf};

use pdfsign_core::constants::{DEFAULT_OVERLAY_WIDTH, MIN_OVERLAY_WIDTH, SIGNED_FILENAME_PREFIX};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ConfigError, Result, SettingsError};

const APP_DIR: &str = "pdfsign";
const CONFIG_FILE: &str = "config.toml";

/// Largest accepted render scale or device pixel ratio.
const MAX_SCALE: f64 = 8.0;

/// Page rendering settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Pixels per PDF point when not fitting to width
    pub scale: f64,
    /// Scale pages to the container width instead of `scale`
    pub fit_to_width: bool,
    /// Container width in pixels used for width-fit
    pub container_width: Option<f64>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            scale: 1.5,
            fit_to_width: false,
            container_width: None,
        }
    }
}

/// Signature pad settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    /// Logical pad width in pixels
    pub width: f64,
    /// Logical pad height in pixels
    pub height: f64,
    pub device_pixel_ratio: f64,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 200.0,
            device_pixel_ratio: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementSettings {
    /// Overlay width in canvas pixels when the signature is first placed
    pub default_overlay_width: f64,
}

impl Default for PlacementSettings {
    fn default() -> Self {
        Self {
            default_overlay_width: DEFAULT_OVERLAY_WIDTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Prepended to the source filename of a signed copy
    pub filename_prefix: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            filename_prefix: SIGNED_FILENAME_PREFIX.to_string(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub render: RenderSettings,
    pub capture: CaptureSettings,
    pub placement: PlacementSettings,
    pub output: OutputSettings,
}

enum Format {
    Json,
    Toml,
}

impl Format {
    fn for_path(path: &Path) -> std::result::Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

fn in_range(value: f64, min: f64, max: f64) -> bool {
    value.is_finite() && value >= min && value <= max
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config location: `<platform config dir>/pdfsign/config.toml`.
    pub fn default_path() -> Result<PathBuf> {
        let base = dirs::config_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| SettingsError::ConfigDirectory("no config or home directory".into()))?;
        Ok(base.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let format = Format::for_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::LoadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML), creating parent directories.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;

        let content = match Format::for_path(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content).map_err(|e| SettingsError::SaveError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Loads `path` if it exists, otherwise returns defaults.
    ///
    /// A file that exists but fails to parse or validate is an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            debug!("No config at {}; using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if !in_range(self.render.scale, f64::MIN_POSITIVE, MAX_SCALE) {
            return Err(ConfigError::out_of_range("render.scale", self.render.scale));
        }
        if let Some(width) = self.render.container_width {
            if !(width.is_finite() && width > 0.0) {
                return Err(ConfigError::out_of_range("render.container_width", width));
            }
        }

        if !(self.capture.width.is_finite() && self.capture.width >= 1.0) {
            return Err(ConfigError::out_of_range("capture.width", self.capture.width));
        }
        if !(self.capture.height.is_finite() && self.capture.height >= 1.0) {
            return Err(ConfigError::out_of_range("capture.height", self.capture.height));
        }
        if !in_range(self.capture.device_pixel_ratio, f64::MIN_POSITIVE, MAX_SCALE) {
            return Err(ConfigError::out_of_range(
                "capture.device_pixel_ratio",
                self.capture.device_pixel_ratio,
            ));
        }

        let overlay_width = self.placement.default_overlay_width;
        if !(overlay_width.is_finite() && overlay_width >= MIN_OVERLAY_WIDTH) {
            return Err(ConfigError::out_of_range(
                "placement.default_overlay_width",
                overlay_width,
            ));
        }

        if self
            .output
            .filename_prefix
            .contains(|c| c == '/' || c == '\\')
        {
            return Err(ConfigError::InvalidSetting {
                key: "output.filename_prefix".into(),
                reason: "must not contain path separators".into(),
            });
        }

        Ok(())
    }
}
