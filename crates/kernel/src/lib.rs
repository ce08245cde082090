//! Level Kernel: authoritative level state shared by the editor and the runtime.
//!
//! # Invariants
//! - A cell holds at most one object, and the stored object's position
//!   always equals its key.
//! - All state mutations flow through explicit operations and are recorded
//!   as `LevelEvent`s.
//! - Snapshots are deep value copies; no two levels share mutable state.

pub mod level;

pub use level::{LevelError, LevelEvent, LevelState};
