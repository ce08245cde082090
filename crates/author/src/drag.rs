use std::collections::{BTreeMap, BTreeSet};
use zen_common::{GridPosition, LevelObjectType};
use zen_kernel::LevelState;

/// What a pointer drag does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTool {
    /// Previews empty cells in the dragged rectangle and fills them on release.
    Place(LevelObjectType),
    /// Previews occupied cells in the dragged rectangle; they become the
    /// selection on release.
    Select,
    /// Shifts the selected objects by the drag offset.
    Move,
}

/// Cells of the rectangle with corners `a` and `b`, inclusive, in canonical
/// order.
pub fn rect_cells(a: GridPosition, b: GridPosition) -> impl Iterator<Item = GridPosition> {
    let rows = a.row.min(b.row)..=a.row.max(b.row);
    let columns = a.column.min(b.column)..=a.column.max(b.column);
    rows.flat_map(move |row| columns.clone().map(move |column| GridPosition::new(row, column)))
}

/// How a finished drag left the editor.
#[derive(Debug)]
pub struct DragOutcome {
    /// Level contents when the drag began.
    pub before: LevelState,
    /// Cells selected after the drag.
    pub selection: BTreeSet<GridPosition>,
}

/// One drag in progress.
///
/// Place and Select never touch the level until release. Move rewrites the
/// level on every update so the moved objects follow the pointer. A moved
/// object whose target holds an unselected object is dropped from the level
/// and from the selection while it stays there; the unselected object is
/// left alone and is not selected.
#[derive(Debug)]
pub struct Drag {
    tool: DragTool,
    start: GridPosition,
    current: GridPosition,
    before: LevelState,
    /// Selected objects at drag start, by original cell.
    origin: BTreeMap<GridPosition, LevelObjectType>,
    /// Occupied cells that were not selected at drag start. Never overwritten.
    others: BTreeSet<GridPosition>,
    /// Objects this drag currently has on the level.
    placed: BTreeMap<GridPosition, LevelObjectType>,
}

impl Drag {
    pub fn begin(
        tool: DragTool,
        start: GridPosition,
        level: &LevelState,
        selection: &BTreeSet<GridPosition>,
    ) -> Self {
        let mut origin = BTreeMap::new();
        let mut others = BTreeSet::new();
        if tool == DragTool::Move {
            for object in level.objects() {
                if selection.contains(&object.position) {
                    origin.insert(object.position, object.object_type);
                } else {
                    others.insert(object.position);
                }
            }
        }
        Self {
            tool,
            start,
            current: start,
            before: level.snapshot(),
            placed: origin.clone(),
            origin,
            others,
        }
    }

    pub fn tool(&self) -> DragTool {
        self.tool
    }

    pub fn start(&self) -> GridPosition {
        self.start
    }

    pub fn current(&self) -> GridPosition {
        self.current
    }

    /// Record the pointer cell. Returns false when it did not change.
    pub fn move_to(&mut self, cell: GridPosition) -> bool {
        if cell == self.current {
            return false;
        }
        self.current = cell;
        true
    }

    /// Preview cells for the current pointer cell. For Move this also
    /// shifts the selected objects on `level`; cells rejected by `in_bounds`
    /// drop out of the moved selection.
    pub fn update(
        &mut self,
        level: &mut LevelState,
        in_bounds: impl Fn(GridPosition) -> bool,
    ) -> BTreeSet<GridPosition> {
        match self.tool {
            DragTool::Place(_) => rect_cells(self.start, self.current)
                .filter(|p| !level.is_occupied(*p))
                .collect(),
            DragTool::Select => rect_cells(self.start, self.current)
                .filter(|p| level.is_occupied(*p))
                .collect(),
            DragTool::Move => self.shift_selection(level, in_bounds),
        }
    }

    fn shift_selection(
        &mut self,
        level: &mut LevelState,
        in_bounds: impl Fn(GridPosition) -> bool,
    ) -> BTreeSet<GridPosition> {
        let (rows, columns) = self.current.delta_from(self.start);
        let mut preview = BTreeSet::new();
        let mut desired = BTreeMap::new();
        for (&cell, &object_type) in &self.origin {
            let target = cell.offset(rows, columns);
            if !in_bounds(target) {
                continue;
            }
            if !self.others.contains(&target) {
                preview.insert(target);
                desired.insert(target, object_type);
            }
        }

        for (cell, object_type) in &self.placed {
            if desired.get(cell) != Some(object_type) {
                level.destroy(*cell);
            }
        }
        for (&cell, &object_type) in &desired {
            if self.placed.get(&cell) != Some(&object_type) {
                if let Err(err) = level.create(object_type, cell) {
                    tracing::debug!(%err, "move target unexpectedly occupied");
                }
            }
        }
        self.placed = desired;
        preview
    }

    /// Release. `preview` is the last preview returned by `update`.
    pub fn finish(self, level: &mut LevelState, preview: BTreeSet<GridPosition>) -> DragOutcome {
        let selection = match self.tool {
            DragTool::Place(object_type) => {
                for cell in preview {
                    // Cells only preview while empty.
                    if let Err(err) = level.create(object_type, cell) {
                        tracing::debug!(%err, "placement target unexpectedly occupied");
                    }
                }
                BTreeSet::new()
            }
            DragTool::Select | DragTool::Move => preview,
        };
        DragOutcome {
            before: self.before,
            selection,
        }
    }
}
