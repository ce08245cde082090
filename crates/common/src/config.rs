//! Game configuration, loaded from YAML.
//!
//! Every section has a `Default` matching the shipped tuning, and missing
//! keys in a config file fall back to it.

use crate::grid::GridConfig;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors from loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Ray-cast collision controller tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Inward inset of the body box before casting rays.
    pub skin_width: f32,
    /// Rays cast along the leading vertical edge when moving horizontally.
    pub horizontal_ray_count: usize,
    /// Rays cast along the leading horizontal edge when moving vertically.
    pub vertical_ray_count: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            skin_width: 0.015,
            horizontal_ray_count: 4,
            vertical_ray_count: 4,
        }
    }
}

/// Character feel. Gravity and jump speed are derived from
/// `jump_height` and `time_to_jump_apex`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub jump_height: f32,
    pub time_to_jump_apex: f32,
    pub move_speed: f32,
    pub acceleration_time_airborne: f32,
    pub acceleration_time_grounded: f32,
    /// Magnitude of the terminal downward speed while sliding on a wall.
    pub wall_slide_speed_max: f32,
    pub wall_slide_smoothing_time: f32,
    /// How long the player must hold toward a touched wall before input
    /// pushes into it.
    pub wall_stick_time: f32,
    /// Extra jumps available while airborne.
    pub air_jumps: u32,
    /// Wall jump direction for a wall on the left; x points away from the
    /// wall. Normalised before use.
    pub wall_jump_direction: Vec2,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            jump_height: 4.0,
            time_to_jump_apex: 0.5,
            move_speed: 6.0,
            acceleration_time_airborne: 0.2,
            acceleration_time_grounded: 0.1,
            wall_slide_speed_max: 3.0,
            wall_slide_smoothing_time: 0.05,
            wall_stick_time: 0.25,
            air_jumps: 1,
            wall_jump_direction: Vec2::new(1.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Width and height of the player's collision box.
    pub size: Vec2,
    /// Analog stick values at or below this magnitude read as zero.
    pub input_deadzone: f32,
    pub controller: ControllerConfig,
    pub motion: MotionConfig,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            size: Vec2::new(0.35, 0.35),
            input_deadzone: 0.3,
            controller: ControllerConfig::default(),
            motion: MotionConfig::default(),
        }
    }
}

/// Where level files live under the writable data root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub levels_dir: String,
    pub level_suffix: String,
    pub index_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./zen_data"),
            levels_dir: "Levels".into(),
            level_suffix: ".zd".into(),
            index_file: "lvlnms.json".into(),
        }
    }
}

impl StorageConfig {
    /// Directory that holds the level files and the index.
    pub fn levels_path(&self) -> PathBuf {
        self.data_dir.join(&self.levels_dir)
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub grid: GridConfig,
    pub player: PlayerConfig,
    pub storage: StorageConfig,
}

impl GameConfig {
    /// Read and validate a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.cell_size <= 0.0 {
            return Err(ConfigError::Invalid("grid.cell_size must be positive".into()));
        }
        let motion = &self.player.motion;
        if motion.time_to_jump_apex <= 0.0 {
            return Err(ConfigError::Invalid(
                "player.motion.time_to_jump_apex must be positive".into(),
            ));
        }
        if motion.jump_height <= 0.0 {
            return Err(ConfigError::Invalid(
                "player.motion.jump_height must be positive".into(),
            ));
        }
        let controller = &self.player.controller;
        if controller.skin_width < 0.0 {
            return Err(ConfigError::Invalid(
                "player.controller.skin_width must not be negative".into(),
            ));
        }
        let size = self.player.size;
        if size.x <= 2.0 * controller.skin_width || size.y <= 2.0 * controller.skin_width {
            return Err(ConfigError::Invalid(
                "player.size must exceed twice the skin width".into(),
            ));
        }
        Ok(())
    }
}
