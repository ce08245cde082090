use crate::drag::{Drag, DragTool};
use crate::history::ChangeHistory;
use crate::spawner::ObjectSpawner;
use glam::Vec2;
use std::collections::{BTreeMap, BTreeSet};
use zen_common::{GridConfig, GridPosition, LevelObjectData, LevelObjectType, SpawnHandle};
use zen_input::EditorAction;
use zen_kernel::{LevelError, LevelEvent, LevelState};
use zen_persist::{LevelStore, StoreError};

/// Errors from editor operations.
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error("the level has no name yet")]
    NoLevelName,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Level(#[from] LevelError),
}

/// An active drag and its tracing span.
#[derive(Debug)]
struct ActiveDrag {
    drag: Drag,
    span: tracing::Span,
}

/// Level editor state for one editing session.
///
/// Owns the live level, its change history and the selection. Every level
/// object has a visual spawned through `S`; selected cells additionally
/// carry a preview block visual.
#[derive(Debug)]
pub struct EditorSession<S: ObjectSpawner> {
    grid: GridConfig,
    level: LevelState,
    history: ChangeHistory,
    spawner: S,
    visuals: BTreeMap<GridPosition, (LevelObjectType, SpawnHandle)>,
    preview: BTreeMap<GridPosition, SpawnHandle>,
    active: Option<ActiveDrag>,
    level_name: Option<String>,
    paused: bool,
}

impl<S: ObjectSpawner> EditorSession<S> {
    pub fn new(grid: GridConfig, spawner: S) -> Self {
        Self {
            grid,
            level: LevelState::new(),
            history: ChangeHistory::new(),
            spawner,
            visuals: BTreeMap::new(),
            preview: BTreeMap::new(),
            active: None,
            level_name: None,
            paused: false,
        }
    }

    pub fn grid(&self) -> &GridConfig {
        &self.grid
    }

    pub fn level(&self) -> &LevelState {
        &self.level
    }

    pub fn history(&self) -> &ChangeHistory {
        &self.history
    }

    pub fn spawner(&self) -> &S {
        &self.spawner
    }

    /// Level events since the last drain, for the retiler.
    pub fn drain_events(&mut self) -> Vec<LevelEvent> {
        self.level.drain_events()
    }

    pub fn level_name(&self) -> Option<&str> {
        self.level_name.as_deref()
    }

    pub fn set_level_name(&mut self, name: impl Into<String>) {
        self.level_name = Some(name.into());
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Cells currently selected (or previewed, mid-drag).
    pub fn selection(&self) -> BTreeSet<GridPosition> {
        self.preview.keys().copied().collect()
    }

    pub fn is_selected(&self, cell: GridPosition) -> bool {
        self.preview.contains_key(&cell)
    }

    pub fn active_tool(&self) -> Option<DragTool> {
        self.active.as_ref().map(|a| a.drag.tool())
    }

    /// Place an object and its visual.
    pub fn create_object(
        &mut self,
        object_type: LevelObjectType,
        cell: GridPosition,
    ) -> Result<(), LevelError> {
        self.level.create(object_type, cell)?;
        self.sync_visuals();
        Ok(())
    }

    /// Remove the object at `cell` and its visual.
    pub fn destroy_object(&mut self, cell: GridPosition) -> Option<LevelObjectData> {
        let removed = self.level.destroy(cell);
        if removed.is_some() {
            self.sync_visuals();
        }
        removed
    }

    /// Push the current level onto the undo stack.
    pub fn add_undo_state(&mut self) {
        self.history.store_state(self.level.snapshot());
    }

    /// Returns false when there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.cancel_drag();
        let Some(previous) = self.history.undo(self.level.snapshot()) else {
            return false;
        };
        self.replace_level(previous);
        tracing::debug!(undo = self.history.undo_count(), redo = self.history.redo_count(), "undo");
        true
    }

    /// Returns false when there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        self.cancel_drag();
        let Some(next) = self.history.redo(self.level.snapshot()) else {
            return false;
        };
        self.replace_level(next);
        tracing::debug!(undo = self.history.undo_count(), redo = self.history.redo_count(), "redo");
        true
    }

    /// Start editing from scratch: empty level, no history, no name.
    pub fn open_editor(&mut self) {
        self.cancel_drag();
        self.clear_selection();
        self.level.clear();
        self.sync_visuals();
        self.history.clear();
        self.level_name = None;
    }

    /// Load `name` from `store` as an undoable edit. Returns false when no
    /// such level is saved.
    pub fn load_level(&mut self, store: &LevelStore, name: &str) -> Result<bool, EditError> {
        let loaded = store.load(name)?;
        self.cancel_drag();
        self.add_undo_state();
        let Some(level) = loaded else {
            return Ok(false);
        };
        self.replace_level(level);
        self.level_name = Some(name.to_owned());
        tracing::debug!(%name, objects = self.level.len(), "level opened in editor");
        Ok(true)
    }

    /// Save under the current level name.
    pub fn save_level(&mut self, store: &mut LevelStore) -> Result<(), EditError> {
        let name = self.level_name.as_deref().ok_or(EditError::NoLevelName)?;
        store.save(name, &self.level)?;
        Ok(())
    }

    /// Remove the current level from `store` and forget its name.
    pub fn delete_level(&mut self, store: &mut LevelStore) -> Result<bool, EditError> {
        let name = self.level_name.take().ok_or(EditError::NoLevelName)?;
        Ok(store.delete(&name)?)
    }

    /// Destroy every selected object as one undoable edit.
    pub fn delete_selection(&mut self) -> bool {
        let doomed: Vec<GridPosition> = self
            .preview
            .keys()
            .copied()
            .filter(|cell| self.level.is_occupied(*cell))
            .collect();
        self.clear_selection();
        if doomed.is_empty() {
            return false;
        }
        self.add_undo_state();
        for cell in &doomed {
            self.level.destroy(*cell);
        }
        self.sync_visuals();
        tracing::debug!(count = doomed.len(), "selection deleted");
        true
    }

    pub fn clear_selection(&mut self) {
        self.set_preview(BTreeSet::new());
    }

    /// Primary button pressed at `pointer` (world space). Picks the drag
    /// tool from what is under the pointer; ignored while paused, while
    /// another drag is active, or outside the grid extents.
    pub fn begin_drag(&mut self, pointer: Vec2, placement: LevelObjectType) -> Option<DragTool> {
        if self.paused || self.active.is_some() {
            return None;
        }
        let cell = self.grid.world_to_grid(pointer);
        if !self.grid.in_bounds(cell) {
            return None;
        }

        let tool = if self.is_selected(cell) {
            DragTool::Move
        } else if self.level.is_occupied(cell) {
            DragTool::Select
        } else {
            DragTool::Place(placement)
        };
        let span = tracing::info_span!("drag", ?tool, %cell);
        let drag = Drag::begin(tool, cell, &self.level, &self.selection());
        self.active = Some(ActiveDrag { drag, span });
        self.refresh_drag();
        Some(tool)
    }

    /// Pointer moved with the button held. Returns whether the preview was
    /// recomputed.
    pub fn update_drag(&mut self, pointer: Vec2) -> bool {
        let mut cell = self.grid.world_to_grid(pointer);
        if let Some(extents) = self.grid.extents {
            cell = extents.clamp(cell);
        }
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        if !active.drag.move_to(cell) {
            return false;
        }
        self.refresh_drag();
        true
    }

    /// Button released. Returns whether the level changed; if so, the
    /// pre-drag level is pushed to the history.
    pub fn end_drag(&mut self) -> bool {
        let Some(ActiveDrag { drag, span }) = self.active.take() else {
            return false;
        };
        let _guard = span.enter();
        let preview = self.selection();
        let outcome = drag.finish(&mut self.level, preview);
        let changed = outcome.before != self.level;
        if changed {
            self.history.store_state(outcome.before);
        }
        self.sync_visuals();
        self.set_preview(outcome.selection);
        tracing::debug!(changed, selected = self.preview.len(), "drag finished");
        changed
    }

    /// Dispatch an editor action. Returns whether it did anything.
    pub fn handle(&mut self, action: EditorAction, store: &mut LevelStore) -> Result<bool, EditError> {
        let acted = match action {
            EditorAction::BeginDrag { pointer, placement } => {
                self.begin_drag(pointer, placement).is_some()
            }
            EditorAction::Drag { pointer } => self.update_drag(pointer),
            EditorAction::EndDrag => self.end_drag(),
            EditorAction::Undo => self.undo(),
            EditorAction::Redo => self.redo(),
            EditorAction::Save => {
                self.save_level(store)?;
                true
            }
            EditorAction::DeleteSelection => self.delete_selection(),
            EditorAction::Deselect => {
                let had_selection = !self.preview.is_empty();
                self.clear_selection();
                had_selection
            }
            EditorAction::Noop => false,
        };
        Ok(acted)
    }

    fn refresh_drag(&mut self) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let span = active.span.clone();
        let _guard = span.enter();
        let grid = self.grid;
        let preview = active
            .drag
            .update(&mut self.level, |cell| grid.in_bounds(cell));
        tracing::trace!(cell = %active.drag.current(), previewed = preview.len(), "drag updated");
        self.sync_visuals();
        self.set_preview(preview);
    }

    /// Drop an unfinished drag, putting the level back as it was.
    fn cancel_drag(&mut self) {
        if let Some(active) = self.active.take() {
            let outcome = active.drag.finish(&mut self.level, BTreeSet::new());
            if outcome.before != self.level {
                self.level.restore(outcome.before);
            }
            self.sync_visuals();
            self.clear_selection();
        }
    }

    fn replace_level(&mut self, level: LevelState) {
        self.clear_selection();
        self.level.restore(level);
        self.sync_visuals();
    }

    /// Bring spawned visuals in line with the level contents.
    fn sync_visuals(&mut self) {
        let stale: Vec<GridPosition> = self
            .visuals
            .iter()
            .filter(|(cell, (object_type, _))| {
                self.level.get(**cell).map(|o| o.object_type) != Some(*object_type)
            })
            .map(|(cell, _)| *cell)
            .collect();
        for cell in stale {
            if let Some((_, handle)) = self.visuals.remove(&cell) {
                self.spawner.despawn(handle);
            }
        }

        for object in self.level.objects() {
            if self.visuals.contains_key(&object.position) {
                continue;
            }
            let handle = self.spawner.spawn(
                object.object_type,
                self.grid.grid_to_world(object.position),
                0.0,
            );
            self.visuals
                .insert(object.position, (object.object_type, handle));
        }
    }

    fn set_preview(&mut self, cells: BTreeSet<GridPosition>) {
        let gone: Vec<GridPosition> = self
            .preview
            .keys()
            .filter(|cell| !cells.contains(cell))
            .copied()
            .collect();
        for cell in gone {
            if let Some(handle) = self.preview.remove(&cell) {
                self.spawner.despawn(handle);
            }
        }
        for cell in cells {
            if !self.preview.contains_key(&cell) {
                let handle = self.spawner.spawn(
                    LevelObjectType::PreviewBlock,
                    self.grid.grid_to_world(cell),
                    0.0,
                );
                self.preview.insert(cell, handle);
            }
        }
    }
}
