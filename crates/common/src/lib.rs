//! Shared types for the zen platformer.
//!
//! # Invariants
//! - `GridConfig::world_to_grid(grid_to_world(p)) == p` for every cell.
//! - Grid mapping never bounds-checks; callers that hit-test use `GridExtents`.

pub mod config;
pub mod grid;
pub mod types;

pub use config::{
    ConfigError, ControllerConfig, GameConfig, MotionConfig, PlayerConfig, StorageConfig,
};
pub use grid::{GridConfig, GridExtents, Neighbor};
pub use types::{GridPosition, LevelObjectData, LevelObjectType, SpawnHandle};
