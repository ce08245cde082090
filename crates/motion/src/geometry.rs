use glam::Vec2;
use serde::{Deserialize, Serialize};
use zen_common::GridConfig;
use zen_kernel::LevelState;

/// Axis-aligned box in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Shrink every side inward by `amount`.
    pub fn inset(&self, amount: f32) -> Self {
        Self {
            min: self.min + Vec2::splat(amount),
            max: self.max - Vec2::splat(amount),
        }
    }

    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }
}

/// A ray intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub distance: f32,
    pub point: Vec2,
}

/// Ray query against static geometry.
///
/// This is the seam to the host engine's physics: the controller only ever
/// asks for the nearest hit along a ray. `direction` is a unit vector and
/// implementations must not report hits further than `max_distance`. A ray
/// whose origin is already inside geometry hits at distance 0.
pub trait RayCaster {
    fn cast(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<RayHit>;
}

impl<T: RayCaster + ?Sized> RayCaster for &T {
    fn cast(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<RayHit> {
        (**self).cast(origin, direction, max_distance)
    }
}

/// Slab test. Returns the entry distance along `direction`, or 0 when the
/// origin is inside the box.
pub fn ray_aabb_distance(origin: Vec2, direction: Vec2, max_distance: f32, aabb: &Aabb) -> Option<f32> {
    let mut tmin = f32::NEG_INFINITY;
    let mut tmax = f32::INFINITY;

    for axis in 0..2 {
        let (o, d, mn, mx) = if axis == 0 {
            (origin.x, direction.x, aabb.min.x, aabb.max.x)
        } else {
            (origin.y, direction.y, aabb.min.y, aabb.max.y)
        };
        if d.abs() < 1e-6 {
            if o < mn || o > mx {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let mut t1 = (mn - o) * inv;
        let mut t2 = (mx - o) * inv;
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
        }
        tmin = tmin.max(t1);
        tmax = tmax.min(t2);
        if tmin > tmax {
            return None;
        }
    }

    if tmax < 0.0 {
        return None;
    }
    let hit = tmin.max(0.0);
    (hit <= max_distance).then_some(hit)
}

/// Static collision boxes, one per solid level cell.
#[derive(Debug, Clone, Default)]
pub struct TileGeometry {
    boxes: Vec<Aabb>,
}

impl TileGeometry {
    pub fn from_boxes(boxes: Vec<Aabb>) -> Self {
        Self { boxes }
    }

    /// One cell-sized box centred on every solid cell of `level`.
    pub fn from_level(level: &LevelState, grid: &GridConfig) -> Self {
        let size = Vec2::splat(grid.cell_size);
        let boxes = level
            .solid_positions()
            .map(|p| Aabb::from_center_size(grid.grid_to_world(p), size))
            .collect();
        Self { boxes }
    }

    pub fn boxes(&self) -> &[Aabb] {
        &self.boxes
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

impl RayCaster for TileGeometry {
    fn cast(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<RayHit> {
        self.boxes
            .iter()
            .filter_map(|b| ray_aabb_distance(origin, direction, max_distance, b))
            .min_by(|a, b| a.total_cmp(b))
            .map(|distance| RayHit {
                distance,
                point: origin + direction * distance,
            })
    }
}
