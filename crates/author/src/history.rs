use zen_kernel::LevelState;

/// Linear undo/redo history of whole-level snapshots.
///
/// Storing a new state discards everything that could have been redone.
#[derive(Debug, Default)]
pub struct ChangeHistory {
    undo_stack: Vec<LevelState>,
    redo_stack: Vec<LevelState>,
}

impl ChangeHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `snapshot` as the state to return to on the next undo.
    pub fn store_state(&mut self, snapshot: LevelState) {
        self.undo_stack.push(snapshot);
        self.redo_stack.clear();
    }

    /// Step back. `current` becomes redoable; returns the state to restore,
    /// or `None` with no change when there is nothing to undo.
    pub fn undo(&mut self, current: LevelState) -> Option<LevelState> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Step forward again. Symmetric to `undo`.
    pub fn redo(&mut self, current: LevelState) -> Option<LevelState> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(next)
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}
