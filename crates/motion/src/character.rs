use crate::controller::KinematicController;
use crate::geometry::RayCaster;
use crate::smooth::SmoothDamp;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use zen_common::MotionConfig;
use zen_input::MoveIntent;

/// Gravity and jump speed derived from the desired jump arc.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JumpPhysics {
    /// Negative: world units per second squared.
    pub gravity: f32,
    pub jump_velocity: f32,
}

impl JumpPhysics {
    /// Values that reach `jump_height` exactly `time_to_apex` seconds after
    /// a grounded jump.
    pub fn derive(jump_height: f32, time_to_apex: f32) -> Self {
        let gravity = -(2.0 * jump_height) / (time_to_apex * time_to_apex);
        Self {
            gravity,
            jump_velocity: gravity.abs() * time_to_apex,
        }
    }
}

/// Which jump fired during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JumpKind {
    Ground,
    /// Kicked off a wall on the player's left.
    OffLeftWall,
    OffRightWall,
    Air,
}

/// Result of one motion tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionStep {
    /// Displacement the controller actually applied.
    pub displacement: Vec2,
    pub jump: Option<JumpKind>,
}

/// Player velocity integration on top of a `KinematicController`.
///
/// Reads the controller's contacts from the previous tick to decide what the
/// player is standing on or touching, then asks the controller to move.
#[derive(Debug, Clone)]
pub struct CharacterMotion {
    config: MotionConfig,
    physics: JumpPhysics,
    velocity: Vec2,
    smooth_x: SmoothDamp,
    smooth_y: SmoothDamp,
    wall_hold_time: f32,
    air_jumps_used: u32,
}

impl CharacterMotion {
    pub fn new(config: MotionConfig) -> Self {
        Self {
            physics: JumpPhysics::derive(config.jump_height, config.time_to_jump_apex),
            config,
            velocity: Vec2::ZERO,
            smooth_x: SmoothDamp::new(),
            smooth_y: SmoothDamp::new(),
            wall_hold_time: 0.0,
            air_jumps_used: 0,
        }
    }

    pub fn physics(&self) -> JumpPhysics {
        self.physics
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Seconds spent pressing into the wall currently touched.
    pub fn wall_hold_time(&self) -> f32 {
        self.wall_hold_time
    }

    pub fn air_jumps_used(&self) -> u32 {
        self.air_jumps_used
    }

    pub fn update<C: RayCaster + ?Sized>(
        &mut self,
        controller: &mut KinematicController,
        world: &C,
        intent: MoveIntent,
        dt: f32,
    ) -> MotionStep {
        let contacts = controller.collisions();
        if contacts.above || contacts.below {
            self.velocity.y = 0.0;
        }

        let mut horizontal = intent.horizontal;
        let pressing_into_wall =
            (contacts.left && horizontal < 0.0) || (contacts.right && horizontal > 0.0);
        if pressing_into_wall {
            // Input toward a touched wall is ignored until the stick time passes.
            if self.wall_hold_time < self.config.wall_stick_time {
                horizontal = 0.0;
            }
            self.wall_hold_time += dt;
        } else {
            self.wall_hold_time = 0.0;
        }

        if contacts.below {
            self.air_jumps_used = 0;
        }

        let mut jump = None;
        if intent.jump_pressed {
            jump = self.jump(contacts.below, contacts.left, contacts.right);
        }

        let smooth_time = if contacts.below {
            self.config.acceleration_time_grounded
        } else {
            self.config.acceleration_time_airborne
        };
        let target_x = horizontal * self.config.move_speed;
        self.velocity.x = self.smooth_x.step(self.velocity.x, target_x, smooth_time, dt);

        // A falling body on a wall eases to the slide speed instead of
        // free-falling.
        let sliding = contacts.touching_wall() && !contacts.below && self.velocity.y < 0.0;
        if sliding {
            self.velocity.y = self.smooth_y.step(
                self.velocity.y,
                -self.config.wall_slide_speed_max,
                self.config.wall_slide_smoothing_time,
                dt,
            );
        } else {
            self.smooth_y.reset();
            self.velocity.y += self.physics.gravity * dt;
        }

        let displacement = controller.move_by(world, self.velocity * dt);
        if let Some(kind) = jump {
            tracing::debug!(?kind, velocity = ?self.velocity, "jump");
        }
        MotionStep { displacement, jump }
    }

    fn jump(&mut self, grounded: bool, left: bool, right: bool) -> Option<JumpKind> {
        let speed = self.physics.jump_velocity;
        let away = self.config.wall_jump_direction.normalize_or_zero();
        if grounded {
            self.velocity.y = speed;
            Some(JumpKind::Ground)
        } else if right {
            self.velocity = Vec2::new(-away.x, away.y) * speed;
            Some(JumpKind::OffRightWall)
        } else if left {
            self.velocity = away * speed;
            Some(JumpKind::OffLeftWall)
        } else if self.air_jumps_used < self.config.air_jumps {
            self.air_jumps_used += 1;
            self.velocity.y = speed;
            Some(JumpKind::Air)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Aabb, TileGeometry};
    use zen_common::ControllerConfig;

    const DT: f32 = 1.0 / 60.0;

    fn body(center: Vec2) -> KinematicController {
        KinematicController::new(
            ControllerConfig::default(),
            Aabb::from_center_size(center, Vec2::ONE),
        )
    }

    fn ground() -> Aabb {
        Aabb::new(Vec2::new(-50.0, -1.0), Vec2::new(50.0, 0.0))
    }

    fn idle() -> MoveIntent {
        MoveIntent::default()
    }

    fn jump() -> MoveIntent {
        MoveIntent {
            horizontal: 0.0,
            jump_pressed: true,
        }
    }

    fn right() -> MoveIntent {
        MoveIntent {
            horizontal: 1.0,
            jump_pressed: false,
        }
    }

    /// Settle a unit body on the ground.
    fn landed(world: &TileGeometry) -> (KinematicController, CharacterMotion) {
        let mut controller = body(Vec2::new(0.0, 0.6));
        let mut motion = CharacterMotion::new(MotionConfig::default());
        for _ in 0..30 {
            motion.update(&mut controller, world, idle(), DT);
        }
        assert!(controller.collisions().below);
        (controller, motion)
    }

    #[test]
    fn jump_physics_from_arc() {
        let physics = JumpPhysics::derive(4.0, 0.5);
        assert_eq!(physics.gravity, -32.0);
        assert_eq!(physics.jump_velocity, 16.0);
    }

    #[test]
    fn gravity_accumulates_in_free_fall() {
        let world = TileGeometry::default();
        let mut controller = body(Vec2::ZERO);
        let mut motion = CharacterMotion::new(MotionConfig::default());
        motion.update(&mut controller, &world, idle(), DT);
        motion.update(&mut controller, &world, idle(), DT);
        assert!((motion.velocity().y - 2.0 * -32.0 * DT).abs() < 1e-4);
    }

    #[test]
    fn standing_does_not_accumulate_fall_speed() {
        let world = TileGeometry::from_boxes(vec![ground()]);
        let (mut controller, mut motion) = landed(&world);
        motion.update(&mut controller, &world, idle(), DT);
        assert!((motion.velocity().y - -32.0 * DT).abs() < 1e-4);
        assert!(controller.collisions().below);
    }

    #[test]
    fn grounded_jump_sets_jump_velocity() {
        let world = TileGeometry::from_boxes(vec![ground()]);
        let (mut controller, mut motion) = landed(&world);
        let step = motion.update(&mut controller, &world, jump(), DT);
        assert_eq!(step.jump, Some(JumpKind::Ground));
        assert!((motion.velocity().y - (16.0 - 32.0 * DT)).abs() < 1e-4);
        assert!(step.displacement.y > 0.0);
    }

    #[test]
    fn air_jumps_are_limited_and_refilled_on_landing() {
        let world = TileGeometry::from_boxes(vec![ground()]);
        let (mut controller, mut motion) = landed(&world);
        motion.update(&mut controller, &world, jump(), DT);
        motion.update(&mut controller, &world, idle(), DT);

        let step = motion.update(&mut controller, &world, jump(), DT);
        assert_eq!(step.jump, Some(JumpKind::Air));
        assert_eq!(motion.air_jumps_used(), 1);

        let step = motion.update(&mut controller, &world, jump(), DT);
        assert_eq!(step.jump, None);

        for _ in 0..300 {
            motion.update(&mut controller, &world, idle(), DT);
        }
        assert!(controller.collisions().below);
        motion.update(&mut controller, &world, idle(), DT);
        assert_eq!(motion.air_jumps_used(), 0);
    }

    #[test]
    fn grounded_acceleration_is_quicker_than_airborne() {
        let world = TileGeometry::from_boxes(vec![ground()]);
        let (mut grounded, mut on_ground) = landed(&world);

        let empty = TileGeometry::default();
        let mut airborne = body(Vec2::new(0.0, 100.0));
        let mut in_air = CharacterMotion::new(MotionConfig::default());

        for _ in 0..6 {
            on_ground.update(&mut grounded, &world, right(), DT);
            in_air.update(&mut airborne, &empty, right(), DT);
        }
        assert!(on_ground.velocity().x > in_air.velocity().x);
        assert!(in_air.velocity().x > 0.0);
    }

    fn wall_world() -> TileGeometry {
        // Tall wall whose face is at x = 0.5, no floor.
        TileGeometry::from_boxes(vec![Aabb::new(
            Vec2::new(0.5, -100.0),
            Vec2::new(1.5, 100.0),
        )])
    }

    #[test]
    fn wall_slide_settles_at_slide_speed() {
        let world = wall_world();
        let config = MotionConfig::default();
        let mut controller = body(Vec2::ZERO);
        let mut motion = CharacterMotion::new(config);
        for _ in 0..60 {
            motion.update(&mut controller, &world, right(), DT);
        }
        assert!(controller.collisions().right);
        let vy = motion.velocity().y;
        assert!((vy + config.wall_slide_speed_max).abs() < 0.05, "vy {vy}");

        // Still there a second later: gravity does not creep back in.
        for _ in 0..60 {
            motion.update(&mut controller, &world, right(), DT);
        }
        let vy = motion.velocity().y;
        assert!((vy + config.wall_slide_speed_max).abs() < 0.05, "vy {vy}");
    }

    #[test]
    fn slide_speed_follows_config() {
        let world = wall_world();
        let config = MotionConfig {
            wall_slide_speed_max: 1.0,
            ..MotionConfig::default()
        };
        let mut controller = body(Vec2::ZERO);
        let mut motion = CharacterMotion::new(config);
        for _ in 0..90 {
            motion.update(&mut controller, &world, right(), DT);
        }
        assert!((motion.velocity().y + 1.0).abs() < 0.05);
    }

    #[test]
    fn wall_stick_holds_then_releases() {
        let world = wall_world();
        let config = MotionConfig::default();
        let mut controller = body(Vec2::ZERO);
        let mut motion = CharacterMotion::new(config);

        let mut vx = Vec::new();
        for _ in 0..15 {
            motion.update(&mut controller, &world, right(), DT);
            assert!(controller.collisions().right);
            vx.push(motion.velocity().x);
        }
        // Input toward the wall is ignored while holding: speed decays.
        assert!(motion.wall_hold_time() > 0.0);
        assert!(motion.wall_hold_time() < config.wall_stick_time);
        assert!(vx[14] < vx[5], "vx {vx:?}");
        assert!(vx[14] < 0.5 * config.move_speed);

        // Once the stick time has passed the input pushes into the wall.
        for _ in 0..45 {
            motion.update(&mut controller, &world, right(), DT);
        }
        assert!(motion.wall_hold_time() > config.wall_stick_time);
        assert!(motion.velocity().x > 4.0, "vx {}", motion.velocity().x);
        assert!(controller.collisions().right);

        motion.update(&mut controller, &world, idle(), DT);
        assert_eq!(motion.wall_hold_time(), 0.0);
    }

    #[test]
    fn wall_jumps_match_vertical_jump_speed() {
        let config = MotionConfig::default();
        let mut motion = CharacterMotion::new(config);
        let speed = motion.physics().jump_velocity;

        assert_eq!(motion.jump(false, false, true), Some(JumpKind::OffRightWall));
        let v = motion.velocity();
        assert!((v.length() - speed).abs() < 1e-4, "v {v}");
        assert!(v.x < 0.0 && v.y > 0.0);

        assert_eq!(motion.jump(false, true, false), Some(JumpKind::OffLeftWall));
        let v = motion.velocity();
        assert!((v.length() - speed).abs() < 1e-4, "v {v}");
        assert!(v.x > 0.0 && v.y > 0.0);

        // A steeper configured direction keeps the same speed.
        let mut steep = CharacterMotion::new(MotionConfig {
            wall_jump_direction: Vec2::new(1.0, 3.0),
            ..config
        });
        steep.jump(false, true, false);
        assert!((steep.velocity().length() - speed).abs() < 1e-4);
        assert!(steep.velocity().y > steep.velocity().x);
    }

    #[test]
    fn ground_jump_wins_over_wall_jump() {
        let mut motion = CharacterMotion::new(MotionConfig::default());
        assert_eq!(motion.jump(true, true, true), Some(JumpKind::Ground));
        assert_eq!(motion.velocity().x, 0.0);
        assert_eq!(motion.velocity().y, motion.physics().jump_velocity);
        assert_eq!(motion.air_jumps_used(), 0);
    }

    #[test]
    fn wall_jump_kicks_away_from_right_wall() {
        let world = wall_world();
        let mut controller = body(Vec2::ZERO);
        let mut motion = CharacterMotion::new(MotionConfig::default());
        motion.update(&mut controller, &world, right(), DT);
        assert!(controller.collisions().right);

        let step = motion.update(&mut controller, &world, jump(), DT);
        assert_eq!(step.jump, Some(JumpKind::OffRightWall));
        assert!(motion.velocity().x < 0.0);
        assert!(motion.velocity().y > 0.0);
        assert!(step.displacement.x < 0.0);
        assert_eq!(motion.air_jumps_used(), 0);
    }

    #[test]
    fn wall_jump_kicks_away_from_left_wall() {
        let world = TileGeometry::from_boxes(vec![Aabb::new(
            Vec2::new(-1.5, -100.0),
            Vec2::new(-0.5, 100.0),
        )]);
        let mut controller = body(Vec2::ZERO);
        let mut motion = CharacterMotion::new(MotionConfig::default());
        let left = MoveIntent {
            horizontal: -1.0,
            jump_pressed: false,
        };
        motion.update(&mut controller, &world, left, DT);
        assert!(controller.collisions().left);

        let step = motion.update(&mut controller, &world, jump(), DT);
        assert_eq!(step.jump, Some(JumpKind::OffLeftWall));
        assert!(motion.velocity().x > 0.0);
    }
}
