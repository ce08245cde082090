//! Rendering adapter: block auto-tiling and a debug text renderer.
//!
//! # Invariants
//! - Renderers and the retiler only read the level; they never mutate it.
//! - A tile's sprites depend only on the occupancy of its 8 neighbours.
//!   Cells outside the grid extents count as empty.
//! - After `Retiler::apply` every block tile whose neighbourhood changed has
//!   been recomputed, and no tile is kept for a cell that is not a block.

mod renderer;
mod retile;
mod tiling;

pub use renderer::{DebugTextRenderer, RenderView, Renderer, Scene};
pub use retile::Retiler;
pub use tiling::{
    CornerAdjacency, Neighborhood, SpriteTable, TileSprite, TileSprites, retile,
};
