use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// Row stride used when folding a grid position into a single hash value.
///
/// Must exceed any column count a level will use, otherwise two cells in
/// adjacent rows share a bucket.
pub const ROW_HASH_STRIDE: i64 = 1 << 20;

/// A discrete (row, column) cell address on the level grid.
///
/// Rows grow upward in world space, columns grow to the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPosition {
    pub row: i32,
    pub column: i32,
}

impl GridPosition {
    pub const fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }

    /// The cell `rows` up and `columns` to the right of this one.
    pub const fn offset(self, rows: i32, columns: i32) -> Self {
        Self {
            row: self.row + rows,
            column: self.column + columns,
        }
    }

    /// Signed (rows, columns) difference `self - origin`.
    pub const fn delta_from(self, origin: GridPosition) -> (i32, i32) {
        (self.row - origin.row, self.column - origin.column)
    }
}

impl Hash for GridPosition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i64(self.row as i64 * ROW_HASH_STRIDE + self.column as i64);
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// The kinds of object a level cell can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LevelObjectType {
    Block,
    PreviewBlock,
    PlayerStart,
    Player,
}

impl LevelObjectType {
    /// Whether the object is static geometry the player collides with.
    pub fn is_solid(self) -> bool {
        matches!(self, Self::Block)
    }

    /// Stable numeric tag used by the level file encoding.
    pub fn tag(self) -> u8 {
        match self {
            Self::Block => 0,
            Self::PreviewBlock => 1,
            Self::PlayerStart => 2,
            Self::Player => 3,
        }
    }
}

/// An object placed on the level grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelObjectData {
    pub object_type: LevelObjectType,
    pub position: GridPosition,
}

impl LevelObjectData {
    pub fn new(object_type: LevelObjectType, position: GridPosition) -> Self {
        Self {
            object_type,
            position,
        }
    }
}

/// Opaque handle to a visual spawned by the host engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpawnHandle(pub Uuid);

impl SpawnHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SpawnHandle {
    fn default() -> Self {
        Self::new()
    }
}
