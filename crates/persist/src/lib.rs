//! Persistence: versioned level files and the level name index.
//!
//! # Invariants
//! - A level file is replaced atomically (temp file + rename).
//! - Level files carry a schema version and a content digest; both are
//!   checked on load and a mismatch is an error, never a partial level.
//! - The index lists only names whose level file exists after `open`.

pub mod schema;
pub mod store;

pub use schema::{
    INDEX_SCHEMA_VERSION, LEVEL_SCHEMA_VERSION, LevelFile, LevelIndex, LevelRecord,
};
pub use store::{LevelStore, StoreError};
