use crate::tiling::{SpriteTable, TileSprites, retile};
use std::collections::{BTreeMap, BTreeSet};
use zen_common::{GridConfig, GridPosition, LevelObjectType, Neighbor};
use zen_kernel::{LevelEvent, LevelState};

/// Keeps the chosen sprites of every block tile up to date.
///
/// A create or destroy dirties the changed cell and its 8 neighbours; a
/// clear dirties everything. Only dirty block tiles are recomputed.
#[derive(Debug, Clone)]
pub struct Retiler<S> {
    grid: GridConfig,
    table: SpriteTable<S>,
    tiles: BTreeMap<GridPosition, TileSprites<S>>,
}

impl<S: Copy> Retiler<S> {
    pub fn new(grid: GridConfig, table: SpriteTable<S>) -> Self {
        Self {
            grid,
            table,
            tiles: BTreeMap::new(),
        }
    }

    pub fn sprites(&self, cell: GridPosition) -> Option<&TileSprites<S>> {
        self.tiles.get(&cell)
    }

    pub fn tiles(&self) -> impl Iterator<Item = (&GridPosition, &TileSprites<S>)> {
        self.tiles.iter()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Recompute every tile from scratch.
    pub fn rebuild(&mut self, level: &LevelState) -> BTreeSet<GridPosition> {
        self.apply(level, &[LevelEvent::Cleared])
    }

    /// Apply `events` (already applied to `level`) and return the block
    /// tiles that were retiled.
    pub fn apply(&mut self, level: &LevelState, events: &[LevelEvent]) -> BTreeSet<GridPosition> {
        let mut dirty = BTreeSet::new();
        let mut everything = false;
        for event in events {
            match event {
                LevelEvent::Created { position, .. } | LevelEvent::Destroyed { position, .. } => {
                    dirty.insert(*position);
                    dirty.extend(Neighbor::ALL.map(|n| n.of(*position)));
                }
                LevelEvent::Cleared => everything = true,
            }
        }

        if everything {
            self.tiles.clear();
            dirty.extend(level.positions_of(LevelObjectType::Block));
        }

        let mut retiled = BTreeSet::new();
        for cell in dirty {
            let is_block = level
                .get(cell)
                .is_some_and(|o| o.object_type == LevelObjectType::Block);
            if is_block {
                self.tiles
                    .insert(cell, retile(level, &self.grid, cell, &self.table));
                retiled.insert(cell);
            } else {
                self.tiles.remove(&cell);
            }
        }
        tracing::debug!(events = events.len(), retiled = retiled.len(), "retiled");
        retiled
    }
}
