use crate::camera::{Camera, CameraError};
use crate::drawing::Color;
use crate::math::{Rotation, Vec3};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid camera config: {0}")]
    Camera(#[from] CameraError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    pub rotation: Rotation,
    pub near_distance: f32,
    pub far_distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, -10.0),
            rotation: Rotation::ZERO,
            near_distance: 1.0,
            far_distance: 80.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    pub line_width: f32,
    pub background: Color,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            line_width: 2.0,
            background: Color::WHITE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub auto_rotate: bool,
    /// Radians per second of camera yaw while auto-rotating.
    pub rotate_speed: f32,
    pub move_step: f32,
    /// Radians per key press.
    pub turn_step: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            auto_rotate: false,
            rotate_speed: 0.5,
            move_step: 0.5,
            turn_step: 0.05,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    pub camera: CameraConfig,
    pub canvas: CanvasConfig,
    pub viewer: ViewerConfig,
    /// Turtle program to load at startup: plain text, or a saved `.json` command log.
    pub script: Option<PathBuf>,
}

impl LabConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: LabConfig = serde_json::from_str(json)?;
        config.camera()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn camera(&self) -> Result<Camera, CameraError> {
        Camera::new(
            self.camera.position,
            self.camera.rotation,
            self.camera.near_distance,
            self.camera.far_distance,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = LabConfig::from_json_str(
            r#"{ "camera": { "near_distance": 2.0 }, "viewer": { "auto_rotate": true } }"#,
        )
        .unwrap();
        assert_eq!(config.camera.near_distance, 2.0);
        assert_eq!(config.camera.far_distance, 80.0);
        assert!(config.viewer.auto_rotate);
        assert_eq!(config.canvas, CanvasConfig::default());
        assert_eq!(config.script, None);
    }

    #[test]
    fn test_invalid_camera_rejected() {
        let err = LabConfig::from_json_str(
            r#"{ "camera": { "near_distance": 50.0, "far_distance": 10.0 } }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Camera(CameraError::NearNotBeforeFar { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            LabConfig::load("/nonexistent/linelab.json"),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_default_camera_is_valid() {
        let camera = LabConfig::default().camera().unwrap();
        assert_eq!(camera.position(), Vec3::new(0.0, 0.0, -10.0));
    }
}
