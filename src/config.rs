// SPDX-License-Identifier: GPL-3.0-only

//! User configuration
//!
//! Stored as JSON at `$XDG_CONFIG_HOME/photobooth/config.json`. Every field
//! has a default so partial files keep working across versions.

use crate::constants::{QualityPreset, export, timing};
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const CONFIG_DIR: &str = "photobooth";
const CONFIG_FILE: &str = "config.json";

/// Strip export format
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum ExportFormat {
    /// Lossless (default)
    #[default]
    Png,
    /// Lossy, smaller files
    Jpeg,
}

/// Requested camera resolution
///
/// The device may deliver something else; capture always uses the source's
/// actual intrinsic size.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Countdown and flash timing in milliseconds
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct TimingSettings {
    pub countdown_seconds: u32,
    pub tick_ms: u64,
    pub flash_ms: u64,
    pub settle_ms: u64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            countdown_seconds: timing::COUNTDOWN_SECONDS,
            tick_ms: timing::TICK_MS,
            flash_ms: timing::FLASH_MS,
            settle_ms: timing::SETTLE_MS,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoothConfig {
    /// Footer title line
    pub strip_title: String,
    /// Filter selected when the app starts
    pub default_filter: String,
    /// Overlay selected when the app starts
    pub default_overlay: String,
    /// Ideal camera resolution requested from the device
    pub camera_resolution: Resolution,
    /// Mirror the live preview (captures are always mirrored)
    pub mirror_preview: bool,
    /// Countdown timing
    pub timing: TimingSettings,
    /// Export format for saved strips
    pub export_format: ExportFormat,
    /// JPEG quality preset
    pub export_quality: QualityPreset,
    /// Where strips are saved (None = ~/Pictures/Photobooth)
    pub output_dir: Option<PathBuf>,
}

impl Default for BoothConfig {
    fn default() -> Self {
        Self {
            strip_title: export::DEFAULT_TITLE.to_string(),
            default_filter: crate::effects::DEFAULT_FILTER_ID.to_string(),
            default_overlay: crate::effects::DEFAULT_OVERLAY_ID.to_string(),
            camera_resolution: Resolution::default(),
            mirror_preview: true, // Default to mirrored (selfie mode)
            timing: TimingSettings::default(),
            export_format: ExportFormat::default(),
            export_quality: QualityPreset::default(),
            output_dir: None,
        }
    }
}

impl BoothConfig {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load from `path`. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Read(e.to_string())),
        };

        let config: Self =
            serde_json::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Load from the default location, falling back to defaults on any error
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            warn!("No config directory available, using defaults");
            return Self::default();
        };

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Config unusable, using defaults");
                Self::default()
            }
        }
    }

    /// Write as pretty JSON, creating the parent directory if needed
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write(e.to_string()))?;
        }
        let json =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Write(e.to_string()))?;
        std::fs::write(path, json).map_err(|e| ConfigError::Write(e.to_string()))
    }

    /// Directory strips are exported to
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| {
            dirs::picture_dir()
                .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
                .join(export::DEFAULT_SAVE_FOLDER)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: BoothConfig =
            serde_json::from_str(r#"{ "strip_title": "WEDDING", "timing": { "tick_ms": 10 } }"#)
                .unwrap();
        assert_eq!(config.strip_title, "WEDDING");
        assert_eq!(config.timing.tick_ms, 10);
        assert_eq!(config.timing.flash_ms, timing::FLASH_MS);
        assert_eq!(config.default_filter, crate::effects::DEFAULT_FILTER_ID);
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let dir = std::env::temp_dir().join(format!("photobooth-cfg-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            BoothConfig::load_from(&path),
            Err(ConfigError::Parse(_))
        ));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
