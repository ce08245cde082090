//! Input mapping: raw keys, buttons and axes become high-level actions.
//!
//! # Invariants
//! - The editor and the player consume actions and intents, never raw input.
//! - Jumps are edge-triggered: one press yields exactly one jump request.

pub mod action;
pub mod intent;

pub use action::{EditorAction, Key, shortcut};
pub use intent::{JumpButton, MoveIntent, PlayerInput, RawInput, apply_deadzone};
