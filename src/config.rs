use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Main configuration for Snapify
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Capture scheduling settings
    pub capture: CaptureConfig,

    /// Remote filter pipeline settings
    pub pipeline: PipelineConfig,

    /// Photostrip layout settings
    pub strip: StripConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capture: CaptureConfig::default(),
            pipeline: PipelineConfig::default(),
            strip: StripConfig::default(),
        }
    }
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
                value: e.to_string(),
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.capture.validate()?;
        self.pipeline.validate()?;
        self.strip.validate()?;
        Ok(())
    }
}

/// Capture scheduler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Countdown value each capture cycle starts from
    pub countdown_from: u32,

    /// Period of one scheduler tick in milliseconds
    pub tick_interval_ms: u64,

    /// Number of photos a capture run collects before stopping
    pub photos_per_run: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            countdown_from: 5,
            tick_interval_ms: 1000,
            photos_per_run: 3,
        }
    }
}

impl CaptureConfig {
    fn validate(&self) -> Result<()> {
        if self.countdown_from == 0 {
            return Err(ConfigError::InvalidValue {
                key: "capture.countdown_from".to_string(),
                value: self.countdown_from.to_string(),
            }
            .into());
        }

        if self.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "capture.tick_interval_ms".to_string(),
                value: self.tick_interval_ms.to_string(),
            }
            .into());
        }

        if self.photos_per_run == 0 {
            return Err(ConfigError::InvalidValue {
                key: "capture.photos_per_run".to_string(),
                value: self.photos_per_run.to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Remote upload and sepia-transform service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Upload service endpoint (Cloudinary-shaped unsigned upload)
    pub upload_url: String,

    /// Unsigned upload preset name
    pub upload_preset: String,

    /// Remote folder the uploads land in
    pub upload_folder: String,

    /// Sepia transform service endpoint (Pixelixe-shaped)
    pub sepia_url: String,

    /// Output format requested from the transform service
    pub image_type: String,

    /// Bearer token for the transform service; falls back to the
    /// PIXELIXE_API_KEY environment variable when unset
    pub api_key: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            upload_url: "https://api.cloudinary.com/v1_1/demo/image/upload".to_string(),
            upload_preset: "snapify".to_string(),
            upload_folder: "snapify".to_string(),
            sepia_url: "https://studio.pixelixe.com/api/sepia/v1".to_string(),
            image_type: "jpg".to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

impl PipelineConfig {
    fn validate(&self) -> Result<()> {
        if self.upload_url.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "pipeline.upload_url".to_string(),
                value: self.upload_url.clone(),
            }
            .into());
        }

        if self.sepia_url.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "pipeline.sepia_url".to_string(),
                value: self.sepia_url.clone(),
            }
            .into());
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "pipeline.timeout_secs".to_string(),
                value: self.timeout_secs.to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Photostrip layout configuration
///
/// Defaults reproduce the fixed 600x1500 layout: three 560x420 photos at
/// x=20 with 20px vertical padding, and an 80px caption centered in the
/// band below the last photo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripConfig {
    /// Canvas width in pixels
    pub width: u32,

    /// Canvas height in pixels
    pub height: u32,

    /// Left edge of each photo
    pub photo_x: u32,

    /// Drawn photo width
    pub photo_width: u32,

    /// Drawn photo height
    pub photo_height: u32,

    /// Vertical padding above the first photo and between photos
    pub padding: u32,

    /// Caption text drawn below the photos
    pub caption: String,

    /// Caption size in pixels
    pub caption_px: f32,

    /// Downward baseline offset applied to the vertically centered caption
    pub caption_offset: u32,
}

impl Default for StripConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 1500,
            photo_x: 20,
            photo_width: 560,
            photo_height: 420,
            padding: 20,
            caption: "Snapify".to_string(),
            caption_px: 80.0,
            caption_offset: 20,
        }
    }
}

impl StripConfig {
    fn validate(&self) -> Result<()> {
        if self.photo_x + self.photo_width > self.width {
            return Err(ConfigError::InvalidValue {
                key: "strip.photo_width".to_string(),
                value: format!("{}+{} > {}", self.photo_x, self.photo_width, self.width),
            }
            .into());
        }

        let photos = crate::strip::PHOTOS_PER_STRIP as u32;
        let photos_bottom = self.padding + photos * (self.photo_height + self.padding) - self.padding;
        if photos_bottom >= self.height {
            return Err(ConfigError::InvalidValue {
                key: "strip.photo_height".to_string(),
                value: format!("photos end at {} of {}", photos_bottom, self.height),
            }
            .into());
        }

        if self.caption_px <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "strip.caption_px".to_string(),
                value: self.caption_px.to_string(),
            }
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_matches_booth_constants() {
        let config = Config::default();
        assert_eq!(config.capture.countdown_from, 5);
        assert_eq!(config.capture.photos_per_run, 3);
        assert_eq!(config.strip.width, 600);
        assert_eq!(config.strip.height, 1500);
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test_config.toml");

        let original_config = Config::default();

        // Save and load
        original_config.save_to_file(&file_path).unwrap();
        let loaded_config = Config::from_file(&file_path).unwrap();

        assert_eq!(original_config.capture.countdown_from, loaded_config.capture.countdown_from);
        assert_eq!(original_config.strip.caption, loaded_config.strip.caption);
        assert_eq!(original_config.pipeline.sepia_url, loaded_config.pipeline.sepia_url);
    }

    #[test]
    fn test_invalid_capture_config() {
        let mut config = Config::default();
        config.capture.countdown_from = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_photos_rejected() {
        let mut config = Config::default();
        config.strip.photo_height = 500;
        assert!(config.validate().is_err());
    }
}
