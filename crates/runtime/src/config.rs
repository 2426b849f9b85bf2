use std::path::Path;

use isoworks_common::Rect;
use isoworks_tilemap::IsoProjection;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Engine settings, loadable from YAML. Missing keys take their defaults.
///
/// ```yaml
/// tile_width: 64
/// tile_height: 32
/// target_fps: 60
/// max_frame_skip: 5
/// viewport_width: 1280
/// viewport_height: 720
/// camera_speed: 300
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub tile_width: f32,
    pub tile_height: f32,
    /// Fixed update rate in Hz.
    pub target_fps: u32,
    /// Upper bound on fixed updates per rendered frame.
    pub max_frame_skip: u32,
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Camera pan speed in screen pixels per second.
    pub camera_speed: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tile_width: 64.0,
            tile_height: 32.0,
            target_fps: 60,
            max_frame_skip: 5,
            viewport_width: 1280.0,
            viewport_height: 720.0,
            camera_speed: 300.0,
        }
    }
}

impl EngineConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&text)?;
        tracing::debug!(path = %path.display(), ?config, "engine config loaded");
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        std::fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tile_width <= 0.0 || self.tile_height <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "tile size must be positive, got {}x{}",
                self.tile_width, self.tile_height
            )));
        }
        if self.target_fps == 0 {
            return Err(ConfigError::Invalid("target_fps must be at least 1".into()));
        }
        if self.max_frame_skip == 0 {
            return Err(ConfigError::Invalid("max_frame_skip must be at least 1".into()));
        }
        if self.viewport_width <= 0.0 || self.viewport_height <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "viewport must be positive, got {}x{}",
                self.viewport_width, self.viewport_height
            )));
        }
        Ok(())
    }

    /// Screen rectangle at the origin.
    pub fn viewport(&self) -> Rect {
        Rect::new(0.0, 0.0, self.viewport_width, self.viewport_height)
    }

    pub fn projection(&self) -> IsoProjection {
        IsoProjection::new(self.tile_width, self.tile_height)
    }
}
