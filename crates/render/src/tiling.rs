use zen_common::{GridConfig, GridPosition, Neighbor};
use zen_kernel::LevelState;

/// Occupancy around one corner of a tile: the side before it (clockwise),
/// the diagonal cell itself, and the side after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CornerAdjacency {
    pub prev: bool,
    pub opposite: bool,
    pub next: bool,
}

impl CornerAdjacency {
    pub const fn new(prev: bool, opposite: bool, next: bool) -> Self {
        Self {
            prev,
            opposite,
            next,
        }
    }

    /// Dense index in 0..8.
    pub const fn code(self) -> usize {
        ((self.prev as usize) << 2) | ((self.opposite as usize) << 1) | self.next as usize
    }

    pub const fn from_code(code: usize) -> Self {
        Self::new(code & 4 != 0, code & 2 != 0, code & 1 != 0)
    }
}

/// Sprite keys of the standard block tileset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileSprite {
    /// Side with no neighbour: drawn as an edge.
    SideOpen,
    /// Side joined to a neighbour: no edge.
    SideJoined,
    /// Both adjacent sides open.
    CornerOuter,
    /// Only the side before the corner is joined.
    CornerPrevEdge,
    /// Only the side after the corner is joined.
    CornerNextEdge,
    /// Both sides joined, diagonal empty.
    CornerInner,
    /// Both sides and the diagonal joined.
    CornerFilled,
}

/// Lookup tables from occupancy to sprite.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteTable<S> {
    sides: [S; 2],
    corners: [S; 8],
}

impl<S: Copy> SpriteTable<S> {
    /// `corner` is evaluated once for each of the 8 adjacency keys.
    pub fn new(open: S, joined: S, corner: impl Fn(CornerAdjacency) -> S) -> Self {
        Self {
            sides: [open, joined],
            corners: std::array::from_fn(|code| corner(CornerAdjacency::from_code(code))),
        }
    }

    pub fn side(&self, occupied: bool) -> S {
        self.sides[occupied as usize]
    }

    pub fn corner(&self, key: CornerAdjacency) -> S {
        self.corners[key.code()]
    }
}

impl SpriteTable<TileSprite> {
    /// The standard tileset. With one side open the diagonal cannot be seen,
    /// so those keys share a sprite.
    pub fn standard() -> Self {
        Self::new(TileSprite::SideOpen, TileSprite::SideJoined, |key| {
            match (key.prev, key.opposite, key.next) {
                (false, _, false) => TileSprite::CornerOuter,
                (true, _, false) => TileSprite::CornerPrevEdge,
                (false, _, true) => TileSprite::CornerNextEdge,
                (true, false, true) => TileSprite::CornerInner,
                (true, true, true) => TileSprite::CornerFilled,
            }
        })
    }
}

impl Default for SpriteTable<TileSprite> {
    fn default() -> Self {
        Self::standard()
    }
}

/// Occupancy of the 8 cells around a tile, clockwise from north.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighborhood {
    occupied: [bool; 8],
}

impl Neighborhood {
    pub fn new(occupied: [bool; 8]) -> Self {
        Self { occupied }
    }

    /// Sample `level` around `cell`. Cells outside the grid extents count as
    /// empty.
    pub fn sample(level: &LevelState, grid: &GridConfig, cell: GridPosition) -> Self {
        Self {
            occupied: Neighbor::ALL.map(|n| {
                let neighbor = n.of(cell);
                grid.in_bounds(neighbor) && level.is_occupied(neighbor)
            }),
        }
    }

    pub fn is_occupied(&self, neighbor: Neighbor) -> bool {
        self.occupied[neighbor.index()]
    }

    /// Key for a diagonal neighbour, from the sides on either side of it.
    pub fn corner(&self, corner: Neighbor) -> CornerAdjacency {
        let i = corner.index();
        CornerAdjacency::new(
            self.occupied[(i + 7) % 8],
            self.occupied[i],
            self.occupied[(i + 1) % 8],
        )
    }
}

/// Sprites chosen for one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileSprites<S> {
    /// North, east, south, west.
    pub sides: [S; 4],
    /// North-east, south-east, south-west, north-west.
    pub corners: [S; 4],
}

impl<S: Copy> TileSprites<S> {
    pub fn select(neighborhood: &Neighborhood, table: &SpriteTable<S>) -> Self {
        Self {
            sides: Neighbor::SIDES.map(|n| table.side(neighborhood.is_occupied(n))),
            corners: Neighbor::CORNERS.map(|n| table.corner(neighborhood.corner(n))),
        }
    }
}

/// Sprites for the tile at `cell` given the current level.
pub fn retile<S: Copy>(
    level: &LevelState,
    grid: &GridConfig,
    cell: GridPosition,
    table: &SpriteTable<S>,
) -> TileSprites<S> {
    TileSprites::select(&Neighborhood::sample(level, grid, cell), table)
}
