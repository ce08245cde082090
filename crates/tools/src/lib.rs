//! Developer tooling: read-only level inspection.
//!
//! # Invariants
//! - Tools never mutate the level they inspect.

mod inspector;

pub use inspector::{LevelInspector, LevelSummary};
