use crate::geometry::{Aabb, RayCaster};
use glam::Vec2;
use zen_common::ControllerConfig;

/// Which sides of the body touched geometry during the last move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionInfo {
    pub above: bool,
    pub below: bool,
    pub left: bool,
    pub right: bool,
}

impl CollisionInfo {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn touching_wall(&self) -> bool {
        self.left || self.right
    }

    pub fn any(&self) -> bool {
        self.above || self.below || self.left || self.right
    }
}

/// Corners of the skin-inset body box.
#[derive(Debug, Clone, Copy)]
struct RaycastOrigins {
    top_left: Vec2,
    bottom_left: Vec2,
    bottom_right: Vec2,
}

impl RaycastOrigins {
    fn of(inset: &Aabb) -> Self {
        Self {
            top_left: Vec2::new(inset.min.x, inset.max.y),
            bottom_left: inset.min,
            bottom_right: Vec2::new(inset.max.x, inset.min.y),
        }
    }
}

/// Kinematic box mover that resolves collisions with fans of rays.
///
/// Each axis casts `ray_count` rays from the leading edge of the box inset by
/// `skin_width`. Every hit shortens the remaining ray length, so the closest
/// obstacle along any ray wins. The horizontal axis resolves first and the
/// vertical rays start from the horizontally moved box.
#[derive(Debug, Clone)]
pub struct KinematicController {
    config: ControllerConfig,
    bounds: Aabb,
    collisions: CollisionInfo,
}

impl KinematicController {
    pub fn new(config: ControllerConfig, bounds: Aabb) -> Self {
        let config = ControllerConfig {
            horizontal_ray_count: config.horizontal_ray_count.max(2),
            vertical_ray_count: config.vertical_ray_count.max(2),
            ..config
        };
        Self {
            config,
            bounds,
            collisions: CollisionInfo::default(),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Centre of the body box.
    pub fn position(&self) -> Vec2 {
        self.bounds.center()
    }

    /// Teleport the body without collision checks.
    pub fn set_position(&mut self, center: Vec2) {
        self.bounds = Aabb::from_center_size(center, self.bounds.size());
    }

    /// Contacts from the most recent `move_by`.
    pub fn collisions(&self) -> CollisionInfo {
        self.collisions
    }

    /// Move by `displacement`, stopping short of geometry. Returns the
    /// displacement actually applied.
    pub fn move_by<C: RayCaster + ?Sized>(&mut self, world: &C, displacement: Vec2) -> Vec2 {
        let inset = self.bounds.inset(self.config.skin_width);
        let origins = RaycastOrigins::of(&inset);
        self.collisions.reset();

        let mut delta = displacement;
        if delta.x != 0.0 {
            self.horizontal_collisions(world, &inset, &origins, &mut delta);
        }
        if delta.y != 0.0 {
            self.vertical_collisions(world, &inset, &origins, &mut delta);
        }

        self.bounds = self.bounds.translated(delta);
        delta
    }

    fn horizontal_collisions<C: RayCaster + ?Sized>(
        &mut self,
        world: &C,
        inset: &Aabb,
        origins: &RaycastOrigins,
        delta: &mut Vec2,
    ) {
        let skin = self.config.skin_width;
        let count = self.config.horizontal_ray_count;
        let spacing = inset.height() / (count - 1) as f32;
        let direction = delta.x.signum();
        let mut ray_length = delta.x.abs() + skin;

        for i in 0..count {
            let base = if direction < 0.0 {
                origins.bottom_left
            } else {
                origins.bottom_right
            };
            let origin = base + Vec2::Y * (spacing * i as f32);
            let hit = world
                .cast(origin, Vec2::X * direction, ray_length)
                .filter(|hit| hit.distance <= ray_length);
            if let Some(hit) = hit {
                delta.x = (hit.distance - skin).max(0.0) * direction;
                ray_length = hit.distance;
                self.collisions.left = direction < 0.0;
                self.collisions.right = direction > 0.0;
            }
        }
    }

    fn vertical_collisions<C: RayCaster + ?Sized>(
        &mut self,
        world: &C,
        inset: &Aabb,
        origins: &RaycastOrigins,
        delta: &mut Vec2,
    ) {
        let skin = self.config.skin_width;
        let count = self.config.vertical_ray_count;
        let spacing = inset.width() / (count - 1) as f32;
        let direction = delta.y.signum();
        let mut ray_length = delta.y.abs() + skin;

        for i in 0..count {
            let base = if direction < 0.0 {
                origins.bottom_left
            } else {
                origins.top_left
            };
            // Start from where the horizontal pass left the body.
            let origin = base + Vec2::X * (spacing * i as f32 + delta.x);
            let hit = world
                .cast(origin, Vec2::Y * direction, ray_length)
                .filter(|hit| hit.distance <= ray_length);
            if let Some(hit) = hit {
                delta.y = (hit.distance - skin).max(0.0) * direction;
                ray_length = hit.distance;
                self.collisions.below = direction < 0.0;
                self.collisions.above = direction > 0.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::TileGeometry;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    fn unit_body(center: Vec2) -> KinematicController {
        KinematicController::new(
            ControllerConfig::default(),
            Aabb::from_center_size(center, Vec2::ONE),
        )
    }

    fn wall_at(min_x: f32) -> Aabb {
        Aabb::new(Vec2::new(min_x, -5.0), Vec2::new(min_x + 1.0, 5.0))
    }

    #[test]
    fn clear_path_moves_full_distance() {
        let world = TileGeometry::default();
        let mut body = unit_body(Vec2::ZERO);
        let applied = body.move_by(&world, Vec2::new(1.5, -0.75));
        assert_eq!(applied, Vec2::new(1.5, -0.75));
        assert!(!body.collisions().any());
        assert_eq!(body.position(), Vec2::new(1.5, -0.75));
    }

    #[test]
    fn wall_ahead_clamps_to_contact() {
        // Right edge at 0.5, wall face at 3.0.
        let world = TileGeometry::from_boxes(vec![wall_at(3.0)]);
        let mut body = unit_body(Vec2::ZERO);
        let applied = body.move_by(&world, Vec2::new(5.0, 0.0));
        assert!(approx(applied.x, 2.5), "applied {applied}");
        assert_eq!(applied.y, 0.0);
        let c = body.collisions();
        assert!(c.right);
        assert!(!c.left && !c.above && !c.below);
    }

    #[test]
    fn wall_behind_sets_left() {
        let world = TileGeometry::from_boxes(vec![wall_at(-4.0)]);
        let mut body = unit_body(Vec2::ZERO);
        let applied = body.move_by(&world, Vec2::new(-5.0, 0.0));
        assert!(approx(applied.x, -2.5), "applied {applied}");
        assert!(body.collisions().left);
        assert!(!body.collisions().right);
    }

    #[test]
    fn short_move_never_reaches_wall() {
        let world = TileGeometry::from_boxes(vec![wall_at(3.0)]);
        let mut body = unit_body(Vec2::ZERO);
        let applied = body.move_by(&world, Vec2::new(1.0, 0.0));
        assert_eq!(applied.x, 1.0);
        assert!(!body.collisions().right);
    }

    #[test]
    fn landing_sets_below() {
        let ground = Aabb::new(Vec2::new(-10.0, -1.0), Vec2::new(10.0, 0.0));
        let world = TileGeometry::from_boxes(vec![ground]);
        let mut body = unit_body(Vec2::new(0.0, 1.0));
        let applied = body.move_by(&world, Vec2::new(0.0, -5.0));
        assert!(approx(applied.y, -0.5), "applied {applied}");
        assert!(body.collisions().below);
        assert!(approx(body.bounds().min.y, 0.0));
    }

    #[test]
    fn ceiling_sets_above() {
        let ceiling = Aabb::new(Vec2::new(-10.0, 2.0), Vec2::new(10.0, 3.0));
        let world = TileGeometry::from_boxes(vec![ceiling]);
        let mut body = unit_body(Vec2::ZERO);
        let applied = body.move_by(&world, Vec2::new(0.0, 4.0));
        assert!(approx(applied.y, 1.5));
        assert!(body.collisions().above);
    }

    #[test]
    fn blocked_axis_does_not_affect_other_axis() {
        let world = TileGeometry::from_boxes(vec![wall_at(3.0)]);
        let mut body = unit_body(Vec2::ZERO);
        let applied = body.move_by(&world, Vec2::new(5.0, 1.0));
        assert!(approx(applied.x, 2.5));
        assert_eq!(applied.y, 1.0);
        let c = body.collisions();
        assert!(c.right && !c.above && !c.below);
    }

    #[test]
    fn zero_axis_casts_nothing() {
        // Touching the wall but only moving vertically.
        let world = TileGeometry::from_boxes(vec![wall_at(0.5)]);
        let mut body = unit_body(Vec2::ZERO);
        body.move_by(&world, Vec2::new(0.0, 0.5));
        assert!(!body.collisions().any());
    }

    #[test]
    fn pressing_into_touched_wall_moves_nothing() {
        let world = TileGeometry::from_boxes(vec![wall_at(3.0)]);
        let mut body = unit_body(Vec2::new(2.5, 0.0));
        let applied = body.move_by(&world, Vec2::new(1.0, 0.0));
        assert!(applied.x.abs() < 1e-5);
        assert!(body.collisions().right);
    }

    #[test]
    fn overlapping_body_clamps_to_zero_not_backwards() {
        // Inset right edge already inside the wall: hit distance 0.
        let world = TileGeometry::from_boxes(vec![wall_at(3.0)]);
        let mut body = unit_body(Vec2::new(3.2, 0.0));
        let applied = body.move_by(&world, Vec2::new(1.0, 0.0));
        assert_eq!(applied.x, 0.0);
        assert!(body.collisions().right);
    }

    #[test]
    fn nearest_obstacle_wins_regardless_of_ray_order() {
        let low_near = Aabb::new(Vec2::new(2.0, -0.5), Vec2::new(3.0, -0.2));
        let high_far = Aabb::new(Vec2::new(4.0, 0.2), Vec2::new(5.0, 0.5));
        let low_far = Aabb::new(Vec2::new(4.0, -0.5), Vec2::new(5.0, -0.2));
        let high_near = Aabb::new(Vec2::new(2.0, 0.2), Vec2::new(3.0, 0.5));

        for boxes in [vec![low_near, high_far], vec![low_far, high_near]] {
            let world = TileGeometry::from_boxes(boxes);
            let mut body = unit_body(Vec2::ZERO);
            let applied = body.move_by(&world, Vec2::new(10.0, 0.0));
            assert!(approx(applied.x, 1.5), "applied {applied}");
        }
    }

    #[test]
    fn vertical_rays_start_from_moved_position() {
        // Ground only exists under where the body ends up horizontally.
        let ledge = Aabb::new(Vec2::new(2.2, -1.0), Vec2::new(3.0, 0.0));
        let world = TileGeometry::from_boxes(vec![ledge]);
        let mut body = unit_body(Vec2::new(0.0, 2.0));
        let applied = body.move_by(&world, Vec2::new(2.0, -5.0));
        assert_eq!(applied.x, 2.0);
        assert!(approx(applied.y, -1.5), "applied {applied}");
        assert!(body.collisions().below);
    }

    #[test]
    fn collisions_reset_each_move() {
        let world = TileGeometry::from_boxes(vec![wall_at(3.0)]);
        let mut body = unit_body(Vec2::ZERO);
        body.move_by(&world, Vec2::new(5.0, 0.0));
        assert!(body.collisions().right);
        body.move_by(&world, Vec2::new(-1.0, 0.0));
        assert!(!body.collisions().any());
    }

    #[test]
    fn ray_counts_are_clamped_independently() {
        let config = ControllerConfig {
            horizontal_ray_count: 0,
            vertical_ray_count: 7,
            ..ControllerConfig::default()
        };
        let body = KinematicController::new(config, Aabb::from_center_size(Vec2::ZERO, Vec2::ONE));
        assert_eq!(body.config().horizontal_ray_count, 2);
        assert_eq!(body.config().vertical_ray_count, 7);
    }

    #[test]
    fn set_position_keeps_size() {
        let mut body = unit_body(Vec2::ZERO);
        body.set_position(Vec2::new(4.0, 4.0));
        assert_eq!(body.bounds().min, Vec2::new(3.5, 3.5));
        assert_eq!(body.bounds().size(), Vec2::ONE);
    }
}
