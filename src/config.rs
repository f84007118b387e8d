use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    error::{ConfigError, Result},
    timeline::SyncPolicy,
};

/// Main configuration for promo-slate
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Slide rendering settings
    pub render: RenderConfig,

    /// Audio/visual duration reconciliation settings
    pub sync: SyncConfig,

    /// Video export settings
    pub export: ExportConfig,

    /// Output retention settings (used by the sweep utility)
    pub retention: RetentionConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.render.validate()?;
        self.export.validate()?;
        Ok(())
    }
}

/// Slide rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Caption font file; when unset, a list of common system fonts is searched
    pub font_path: Option<PathBuf>,

    /// Caption font size in pixels
    pub font_size: f32,

    /// Slide background color (RGB)
    pub background: [u8; 3],

    /// Caption text color (RGB)
    pub text_color: [u8; 3],

    /// Nominal duration of one product slide in seconds
    pub slide_secs: f64,

    /// Duration of the blank slide substituted for an empty product list.
    /// Deliberately a separate knob from `slide_secs`.
    pub blank_secs: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            font_path: None,
            font_size: 50.0,
            background: [0, 0, 0],
            text_color: [255, 255, 255],
            slide_secs: 5.0,
            blank_secs: 5.0,
        }
    }
}

impl RenderConfig {
    fn validate(&self) -> Result<()> {
        if self.font_size <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "render.font_size".to_string(),
                value: self.font_size.to_string()
            }.into());
        }

        if self.slide_secs <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "render.slide_secs".to_string(),
                value: self.slide_secs.to_string()
            }.into());
        }

        if self.blank_secs <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "render.blank_secs".to_string(),
                value: self.blank_secs.to_string()
            }.into());
        }

        Ok(())
    }
}

/// Audio synchronization configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// How to reconcile narration length against the visual timeline
    pub policy: SyncPolicy,
}

/// Video export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Output frame rate
    pub fps: f64,

    /// Video codec passed to the encoder
    pub codec: String,

    /// Quality setting (0-100, higher is better)
    pub quality: u8,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            fps: 24.0,
            codec: "libx264".to_string(),
            quality: 85,
        }
    }
}

impl ExportConfig {
    fn validate(&self) -> Result<()> {
        if self.fps <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "export.fps".to_string(),
                value: self.fps.to_string()
            }.into());
        }

        if self.quality > 100 {
            return Err(ConfigError::InvalidValue {
                key: "export.quality".to_string(),
                value: self.quality.to_string()
            }.into());
        }

        if self.codec.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "export.codec".to_string(),
                value: "<empty>".to_string()
            }.into());
        }

        Ok(())
    }
}

/// Output retention configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionConfig {
    /// Age in hours after which generated files are eligible for removal
    pub max_age_hours: u64,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self { max_age_hours: 24 }
    }
}
