// src/config.rs
//
// Viewer configuration loaded from TOML.

use crate::envelope::{CameraPose, FovSpec};
use crate::error::Result;
use crate::region::RoomRectangle;
use serde::Deserialize;
use std::path::Path;

/// Main configuration structure
#[derive(Clone, Debug, Default, Deserialize)]
pub struct FovCheckerConfig {
    #[serde(default)]
    pub lens: LensConfig,
    #[serde(default)]
    pub room: RoomConfig,
    #[serde(default)]
    pub initial: InitialPoseConfig,
}

/// Lens field of view, as half angles
#[derive(Clone, Debug, Deserialize)]
pub struct LensConfig {
    /// Half of the horizontal FOV in degrees (default: 45.0)
    #[serde(default = "default_half_horizontal")]
    pub half_horizontal_deg: f64,

    /// Half of the vertical FOV in degrees (default: 26.0)
    #[serde(default = "default_half_vertical")]
    pub half_vertical_deg: f64,
}

/// Room size in meters
#[derive(Clone, Debug, Deserialize)]
pub struct RoomConfig {
    #[serde(default = "default_room_side")]
    pub width_m: f64,

    #[serde(default = "default_room_side")]
    pub height_m: f64,
}

/// Slider positions at startup
#[derive(Clone, Debug, Deserialize)]
pub struct InitialPoseConfig {
    /// Camera tilt below the horizon in degrees (default: 26)
    #[serde(default = "default_tilt")]
    pub tilt_deg: f64,

    /// Camera pan in degrees, 90 faces the far wall (default: 90)
    #[serde(default = "default_pan")]
    pub pan_deg: f64,

    /// Mounting height in centimeters (default: 200)
    #[serde(default = "default_camera_height")]
    pub height_cm: f64,

    /// Position along the camera wall in centimeters (default: middle of the wall)
    #[serde(default)]
    pub x_position_cm: Option<f64>,

    /// Height of the person to check for, in centimeters (default: 180)
    #[serde(default = "default_target_height")]
    pub target_height_cm: f64,
}

impl Default for LensConfig {
    fn default() -> Self {
        Self {
            half_horizontal_deg: default_half_horizontal(),
            half_vertical_deg: default_half_vertical(),
        }
    }
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            width_m: default_room_side(),
            height_m: default_room_side(),
        }
    }
}

impl Default for InitialPoseConfig {
    fn default() -> Self {
        Self {
            tilt_deg: default_tilt(),
            pan_deg: default_pan(),
            height_cm: default_camera_height(),
            x_position_cm: None,
            target_height_cm: default_target_height(),
        }
    }
}

// Default value functions
/// Lens sold as 120 degrees, measured at 90.
fn default_half_horizontal() -> f64 {
    45.0
}
fn default_half_vertical() -> f64 {
    26.0
}
fn default_room_side() -> f64 {
    10.0
}
fn default_tilt() -> f64 {
    26.0
}
fn default_pan() -> f64 {
    90.0
}
fn default_camera_height() -> f64 {
    200.0
}
fn default_target_height() -> f64 {
    180.0
}

impl FovCheckerConfig {
    /// Load and validate configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: FovCheckerConfig = toml::from_str(&contents)?;
        config.fov()?;
        config.room()?;
        Ok(config)
    }

    /// Load from `path` when it exists, otherwise use defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            log::info!("Loading configuration from {:?}", path);
            Self::load(path)
        } else {
            log::info!("Using default configuration");
            Ok(Self::default())
        }
    }

    pub fn fov(&self) -> Result<FovSpec> {
        FovSpec::new(self.lens.half_horizontal_deg, self.lens.half_vertical_deg)
    }

    pub fn room(&self) -> Result<RoomRectangle> {
        RoomRectangle::new(self.room.width_m, self.room.height_m)
    }

    pub fn initial_pose(&self) -> CameraPose {
        CameraPose {
            tilt_deg: self.initial.tilt_deg,
            pan_deg: self.initial.pan_deg,
            height_cm: self.initial.height_cm,
            x_position_cm: self
                .initial
                .x_position_cm
                .unwrap_or(self.room.width_m * 100.0 / 2.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FovError;

    #[test]
    fn empty_file_gives_defaults() {
        let config: FovCheckerConfig = toml::from_str("").unwrap();
        assert_eq!(config.fov().unwrap(), FovSpec::default());
        assert_eq!(config.initial_pose().x_position_cm, 500.0);
        assert_eq!(config.initial.target_height_cm, 180.0);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: FovCheckerConfig = toml::from_str(
            r#"
            [lens]
            half_vertical_deg = 30.0

            [room]
            width_m = 6.0

            [initial]
            x_position_cm = 120.0
            "#,
        )
        .unwrap();
        assert_eq!(config.lens.half_horizontal_deg, 45.0);
        assert_eq!(config.lens.half_vertical_deg, 30.0);
        assert_eq!(config.room().unwrap(), RoomRectangle::new(6.0, 10.0).unwrap());
        assert_eq!(config.initial_pose().x_position_cm, 120.0);
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err: FovError = toml::from_str::<FovCheckerConfig>("[lens\n").unwrap_err().into();
        assert!(matches!(err, FovError::Config(_)));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config =
            FovCheckerConfig::load_or_default(Path::new("does/not/exist/fov_checker.toml")).unwrap();
        assert_eq!(config.room.width_m, 10.0);
    }
}
