//! Render configuration.
//!
//! Defaults reproduce the card: 800x800, 64 samples, every pixel seeded
//! with (10, 10, 10) and each sample weighted by 3.5.

use std::path::Path;

use crate::CameraSettings;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Errors from loading or validating a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// How accumulated color becomes an output byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelMapping {
    /// Clamp to [0, 255], then truncate
    #[default]
    Clamp,
    /// Truncate to an integer and keep the low byte (bytes wrap past 255)
    Wrap,
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Jittered camera rays per pixel
    pub samples_per_pixel: u32,
    /// Maximum ray segments per camera ray
    pub max_depth: u32,
    /// Seed for the per-pixel generators; `None` picks one at random
    pub seed: Option<u64>,
    /// Scale applied to every sample before accumulation
    pub sample_weight: f32,
    /// Starting value of each channel's accumulator
    pub pixel_bias: f32,
    /// Byte conversion policy for the written image
    pub channel_mapping: ChannelMapping,
    /// Tile edge length for parallel rendering
    pub bucket_size: u32,
    /// Camera pose and lens
    pub camera: CameraSettings,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            samples_per_pixel: 64,
            max_depth: 50,
            seed: None,
            sample_weight: 3.5,
            pixel_bias: 10.0,
            channel_mapping: ChannelMapping::Clamp,
            bucket_size: DEFAULT_BUCKET_SIZE,
            camera: CameraSettings::default(),
        }
    }
}

impl RenderConfig {
    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: RenderConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that cannot produce an image.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "image size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        // Three bytes per pixel must stay addressable as u32
        if self
            .width
            .checked_mul(self.height)
            .and_then(|pixels| pixels.checked_mul(3))
            .is_none()
        {
            return Err(ConfigError::Invalid(format!(
                "image size {}x{} is too large",
                self.width, self.height
            )));
        }
        if self.samples_per_pixel == 0 {
            return Err(ConfigError::Invalid(
                "samples_per_pixel must be at least 1".to_string(),
            ));
        }
        if self.bucket_size == 0 {
            return Err(ConfigError::Invalid(
                "bucket_size must be at least 1".to_string(),
            ));
        }
        if !self.sample_weight.is_finite() || !self.pixel_bias.is_finite() {
            return Err(ConfigError::Invalid(
                "sample_weight and pixel_bias must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples;
        self.max_depth = max_depth;
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_card() {
        let config = RenderConfig::default();
        assert_eq!((config.width, config.height), (800, 800));
        assert_eq!(config.samples_per_pixel, 64);
        assert_eq!(config.sample_weight, 3.5);
        assert_eq!(config.pixel_bias, 10.0);
        assert_eq!(config.channel_mapping, ChannelMapping::Clamp);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = RenderConfig::default()
            .with_resolution(8, 4)
            .with_quality(2, 5)
            .with_seed(9);
        assert_eq!((config.width, config.height), (8, 4));
        assert_eq!((config.samples_per_pixel, config.max_depth), (2, 5));
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn test_validate_rejects_empty_image() {
        let config = RenderConfig::default().with_resolution(0, 10);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = RenderConfig::default().with_quality(0, 10);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_oversized_image() {
        let config = RenderConfig::default().with_resolution(65536, 65536);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        // Pixel count fits in u32 but the byte count does not
        let config = RenderConfig::default().with_resolution(65536, 30000);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = RenderConfig::default().with_resolution(16384, 16384);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config: RenderConfig =
            serde_json::from_str(r#"{"width": 16, "seed": 3, "channel_mapping": "wrap"}"#)
                .unwrap();
        assert_eq!(config.width, 16);
        assert_eq!(config.height, 800);
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.channel_mapping, ChannelMapping::Wrap);
        assert_eq!(config.camera, CameraSettings::default());
    }

    #[test]
    fn test_from_json_file_missing() {
        let result = RenderConfig::from_json_file("/nonexistent/card.json");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
