use std::collections::BTreeMap;
use zen_common::{GridPosition, LevelObjectType};
use zen_kernel::LevelState;

/// Level inspector for developer tooling.
///
/// Read-only queries against a level for debugging and the command line.
pub struct LevelInspector;

impl LevelInspector {
    /// Produce a summary of the level.
    pub fn summary(level: &LevelState) -> LevelSummary {
        let mut counts = BTreeMap::new();
        let mut extent: Option<(GridPosition, GridPosition)> = None;
        for object in level.objects() {
            *counts.entry(object.object_type).or_insert(0) += 1;
            let p = object.position;
            extent = Some(match extent {
                None => (p, p),
                Some((lo, hi)) => (
                    GridPosition::new(lo.row.min(p.row), lo.column.min(p.column)),
                    GridPosition::new(hi.row.max(p.row), hi.column.max(p.column)),
                ),
            });
        }
        LevelSummary {
            object_count: level.len(),
            counts,
            extent,
            player_start: level.player_start(),
            pending_events: level.events().len(),
            state_hash: level.state_hash(),
        }
    }

    /// Cells holding an object of `object_type`, in canonical order.
    pub fn cells_of(level: &LevelState, object_type: LevelObjectType) -> Vec<GridPosition> {
        level.positions_of(object_type).collect()
    }

    /// Player start markers beyond the first. Play only ever uses the first.
    pub fn extra_player_starts(level: &LevelState) -> Vec<GridPosition> {
        level
            .positions_of(LevelObjectType::PlayerStart)
            .skip(1)
            .collect()
    }
}

/// Summary of a level for the inspector.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelSummary {
    pub object_count: usize,
    pub counts: BTreeMap<LevelObjectType, usize>,
    /// Smallest (min, max) cell box holding every object.
    pub extent: Option<(GridPosition, GridPosition)>,
    pub player_start: Option<GridPosition>,
    pub pending_events: usize,
    pub state_hash: u64,
}

impl LevelSummary {
    pub fn count(&self, object_type: LevelObjectType) -> usize {
        self.counts.get(&object_type).copied().unwrap_or(0)
    }
}

impl std::fmt::Display for LevelSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Level: objects={} blocks={} starts={} hash={:016x}",
            self.object_count,
            self.count(LevelObjectType::Block),
            self.count(LevelObjectType::PlayerStart),
            self.state_hash
        )?;
        if let Some((lo, hi)) = self.extent {
            write!(f, " extent={lo}..={hi}")?;
        }
        match self.player_start {
            Some(start) => write!(f, " start={start}"),
            None => write!(f, " start=none"),
        }
    }
}
