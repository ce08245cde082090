use crate::types::GridPosition;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Fixed level extents, used only by callers that need hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridExtents {
    pub rows: i32,
    pub columns: i32,
}

impl GridExtents {
    /// The fixed editing area of the classic level layout.
    pub const CLASSIC: GridExtents = GridExtents::new(22, 48);

    pub const fn new(rows: i32, columns: i32) -> Self {
        Self { rows, columns }
    }

    /// Whether `pos` lies in `row ∈ [0, rows)` and `column ∈ [0, columns)`.
    pub fn contains(&self, pos: GridPosition) -> bool {
        (0..self.rows).contains(&pos.row) && (0..self.columns).contains(&pos.column)
    }

    /// Clamp `pos` onto the nearest in-bounds cell.
    pub fn clamp(&self, pos: GridPosition) -> GridPosition {
        GridPosition::new(
            pos.row.clamp(0, (self.rows - 1).max(0)),
            pos.column.clamp(0, (self.columns - 1).max(0)),
        )
    }
}

/// Mapping between grid cells and continuous world space.
///
/// `world = origin + (column, row) * cell_size`. The mapping never checks
/// bounds; `extents` is carried for callers that hit-test against a fixed
/// editing area. The default grid is sparse, with no extents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub cell_size: f32,
    pub origin: Vec2,
    pub extents: Option<GridExtents>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: 0.4,
            origin: Vec2::new(-9.4, -4.0),
            extents: None,
        }
    }
}

impl GridConfig {
    /// Sparse grid with no fixed extent.
    pub fn unbounded(cell_size: f32, origin: Vec2) -> Self {
        Self {
            cell_size,
            origin,
            extents: None,
        }
    }

    /// The same mapping, limited to `extents` for hit-testing.
    pub fn with_extents(self, extents: GridExtents) -> Self {
        Self {
            extents: Some(extents),
            ..self
        }
    }

    /// World position of the centre of `pos`. Exact, no rounding.
    pub fn grid_to_world(&self, pos: GridPosition) -> Vec2 {
        self.origin + Vec2::new(pos.column as f32, pos.row as f32) * self.cell_size
    }

    /// Cell containing `world`.
    ///
    /// Each axis rounds half away from zero, so a point exactly on the
    /// boundary between two cells lands in the one further from the origin
    /// on positive axes.
    pub fn world_to_grid(&self, world: Vec2) -> GridPosition {
        let local = (world - self.origin) / self.cell_size;
        GridPosition::new(local.y.round() as i32, local.x.round() as i32)
    }

    /// Whether `pos` is inside the configured extents; always true when the
    /// grid has none.
    pub fn in_bounds(&self, pos: GridPosition) -> bool {
        self.extents.is_none_or(|e| e.contains(pos))
    }
}

/// The eight neighbours of a cell, clockwise from north.
///
/// Even indices are sides, odd indices are corners, so the corner at index
/// `i` sits between the sides at `i - 1` and `i + 1` (mod 8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Neighbor {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Neighbor {
    pub const ALL: [Neighbor; 8] = [
        Neighbor::North,
        Neighbor::NorthEast,
        Neighbor::East,
        Neighbor::SouthEast,
        Neighbor::South,
        Neighbor::SouthWest,
        Neighbor::West,
        Neighbor::NorthWest,
    ];

    pub const SIDES: [Neighbor; 4] = [
        Neighbor::North,
        Neighbor::East,
        Neighbor::South,
        Neighbor::West,
    ];

    pub const CORNERS: [Neighbor; 4] = [
        Neighbor::NorthEast,
        Neighbor::SouthEast,
        Neighbor::SouthWest,
        Neighbor::NorthWest,
    ];

    /// (rows, columns) offset of this neighbour.
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Neighbor::North => (1, 0),
            Neighbor::NorthEast => (1, 1),
            Neighbor::East => (0, 1),
            Neighbor::SouthEast => (-1, 1),
            Neighbor::South => (-1, 0),
            Neighbor::SouthWest => (-1, -1),
            Neighbor::West => (0, -1),
            Neighbor::NorthWest => (1, -1),
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn of(self, pos: GridPosition) -> GridPosition {
        let (rows, columns) = self.offset();
        pos.offset(rows, columns)
    }
}
