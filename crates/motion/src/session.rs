use crate::character::{CharacterMotion, JumpKind};
use crate::controller::{CollisionInfo, KinematicController};
use crate::geometry::{Aabb, TileGeometry};
use glam::Vec2;
use zen_common::{GridConfig, GridPosition, PlayerConfig};
use zen_input::{PlayerInput, RawInput};
use zen_kernel::LevelState;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("level has no player start")]
    NoPlayerStart,
}

/// Player state after one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerFrame {
    pub tick: u64,
    pub position: Vec2,
    pub velocity: Vec2,
    pub collisions: CollisionInfo,
    pub jump: Option<JumpKind>,
}

/// A level being played.
///
/// Owns a copy of the level with the start marker removed; the editor's level
/// is never touched while playing.
#[derive(Debug)]
pub struct PlaySession {
    level: LevelState,
    start: GridPosition,
    geometry: TileGeometry,
    input: PlayerInput,
    controller: KinematicController,
    motion: CharacterMotion,
    tick: u64,
}

impl PlaySession {
    /// Spawn the player at the centre of the level's start cell.
    pub fn start(
        level: &LevelState,
        grid: &GridConfig,
        player: &PlayerConfig,
    ) -> Result<Self, SessionError> {
        let mut level = level.snapshot();
        let start = level.player_start().ok_or(SessionError::NoPlayerStart)?;
        level.destroy(start);
        level.drain_events();

        let geometry = TileGeometry::from_level(&level, grid);
        let spawn = grid.grid_to_world(start);
        tracing::info!(%start, x = spawn.x, y = spawn.y, solids = geometry.len(), "play session started");

        Ok(Self {
            level,
            start,
            geometry,
            input: PlayerInput::new(player.input_deadzone),
            controller: KinematicController::new(
                player.controller,
                Aabb::from_center_size(spawn, player.size),
            ),
            motion: CharacterMotion::new(player.motion),
            tick: 0,
        })
    }

    /// Advance one tick of `dt` seconds.
    pub fn step(&mut self, raw: RawInput, dt: f32) -> PlayerFrame {
        let _span = tracing::trace_span!("play_tick", tick = self.tick).entered();
        let intent = self.input.sample(raw);
        let step = self
            .motion
            .update(&mut self.controller, &self.geometry, intent, dt);
        self.tick += 1;

        let frame = PlayerFrame {
            tick: self.tick,
            position: self.controller.position(),
            velocity: self.motion.velocity(),
            collisions: self.controller.collisions(),
            jump: step.jump,
        };
        tracing::trace!(x = frame.position.x, y = frame.position.y, "player moved");
        frame
    }

    /// The level as played, without the start marker.
    pub fn level(&self) -> &LevelState {
        &self.level
    }

    pub fn start_cell(&self) -> GridPosition {
        self.start
    }

    pub fn geometry(&self) -> &TileGeometry {
        &self.geometry
    }

    pub fn player_bounds(&self) -> Aabb {
        self.controller.bounds()
    }

    pub fn player_position(&self) -> Vec2 {
        self.controller.position()
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zen_common::LevelObjectType;

    const DT: f32 = 1.0 / 60.0;

    fn grid() -> GridConfig {
        GridConfig::unbounded(1.0, Vec2::ZERO)
    }

    /// Floor along row 0, start marker at (2, 5).
    fn floor_level() -> LevelState {
        let mut level = LevelState::new();
        for column in 0..=10 {
            level
                .create(LevelObjectType::Block, GridPosition::new(0, column))
                .unwrap();
        }
        level
            .create(LevelObjectType::PlayerStart, GridPosition::new(2, 5))
            .unwrap();
        level
    }

    fn run(session: &mut PlaySession, raw: RawInput, ticks: usize) -> PlayerFrame {
        let mut frame = session.step(raw, DT);
        for _ in 1..ticks {
            frame = session.step(raw, DT);
        }
        frame
    }

    #[test]
    fn missing_start_is_an_error() {
        let level = LevelState::new();
        let err = PlaySession::start(&level, &grid(), &PlayerConfig::default());
        assert_eq!(err.err(), Some(SessionError::NoPlayerStart));
    }

    #[test]
    fn spawns_at_start_cell_without_marker() {
        let level = floor_level();
        let session = PlaySession::start(&level, &grid(), &PlayerConfig::default()).unwrap();
        assert_eq!(session.player_position(), Vec2::new(5.0, 2.0));
        assert_eq!(session.start_cell(), GridPosition::new(2, 5));
        assert!(session.level().player_start().is_none());
        assert!(level.player_start().is_some());
        assert_eq!(session.geometry().len(), 11);
    }

    #[test]
    fn player_falls_and_lands_on_floor() {
        let level = floor_level();
        let mut session = PlaySession::start(&level, &grid(), &PlayerConfig::default()).unwrap();
        let frame = run(&mut session, RawInput::default(), 120);
        assert!(frame.collisions.below);
        // Floor top at 0.5, half player height 0.175.
        assert!((frame.position.y - 0.675).abs() < 1e-3, "y {}", frame.position.y);
        assert_eq!(frame.tick, 120);
    }

    #[test]
    fn jump_is_edge_triggered() {
        let level = floor_level();
        let mut session = PlaySession::start(&level, &grid(), &PlayerConfig::default()).unwrap();
        run(&mut session, RawInput::default(), 120);

        let held = RawInput {
            jump_held: true,
            ..RawInput::default()
        };
        let first = session.step(held, DT);
        assert_eq!(first.jump, Some(JumpKind::Ground));
        let second = session.step(held, DT);
        assert_eq!(second.jump, None);
        assert!(second.position.y > first.position.y);
    }

    #[test]
    fn walking_stops_at_wall() {
        let mut level = floor_level();
        level
            .create(LevelObjectType::Block, GridPosition::new(1, 9))
            .unwrap();
        let mut session = PlaySession::start(&level, &grid(), &PlayerConfig::default()).unwrap();
        run(&mut session, RawInput::default(), 120);

        let right = RawInput {
            right: true,
            ..RawInput::default()
        };
        let frame = run(&mut session, right, 180);
        assert!(frame.collisions.right);
        // Wall face at 8.5, half player width 0.175.
        assert!(frame.position.x <= 8.325 + 1e-3, "x {}", frame.position.x);
        assert!(frame.position.x > 8.3);
    }
}
