use glam::Vec2;
use serde::{Deserialize, Serialize};
use zen_common::LevelObjectType;

/// A high-level editor action.
///
/// The editor session consumes actions, never raw input events, so pointer
/// and keyboard bindings can change without touching editing logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EditorAction {
    /// Primary button pressed at a world-space pointer position. Carries the
    /// object type chosen in the placement palette.
    BeginDrag {
        pointer: Vec2,
        placement: LevelObjectType,
    },
    /// Pointer moved while the primary button is held.
    Drag { pointer: Vec2 },
    /// Primary button released.
    EndDrag,
    /// Undo the last level change.
    Undo,
    /// Redo the last undone change.
    Redo,
    /// Save under the current level name.
    Save,
    /// Destroy every selected object.
    DeleteSelection,
    /// Drop the current selection.
    Deselect,
    /// No-op (input that isn't bound to anything).
    Noop,
}

/// Keys the editor binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Z,
    Y,
    S,
    X,
    Delete,
    Escape,
    Other,
}

/// Map a key press (with the control modifier state) to an editor action.
pub fn shortcut(key: Key, ctrl: bool) -> EditorAction {
    match (key, ctrl) {
        (Key::Z, true) => EditorAction::Undo,
        (Key::Y, true) => EditorAction::Redo,
        (Key::S, true) => EditorAction::Save,
        // Cut only deletes for now.
        (Key::X, true) => EditorAction::DeleteSelection,
        (Key::Delete, _) => EditorAction::DeleteSelection,
        (Key::Escape, _) => EditorAction::Deselect,
        _ => EditorAction::Noop,
    }
}
