//! Level authoring: change history, drag tools and the editor session.
//!
//! # Invariants
//! - Every level-changing drag, deletion or load is undoable.
//! - Storing a new history state clears the redo stack.
//! - A move drag never overwrites or destroys objects that were not selected
//!   when it began.
//! - Spawned visuals mirror the level after every editor operation.

pub mod drag;
pub mod editor;
pub mod history;
pub mod spawner;

pub use drag::{Drag, DragOutcome, DragTool, rect_cells};
pub use editor::{EditError, EditorSession};
pub use history::ChangeHistory;
pub use spawner::{HeadlessSpawner, ObjectSpawner, SpawnedObject};
