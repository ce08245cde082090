use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zen_common::{GridPosition, LevelObjectData, LevelObjectType};
use zen_kernel::{LevelError, LevelState};

/// Current on-disk schema versions.
pub const LEVEL_SCHEMA_VERSION: u32 = 1;
pub const INDEX_SCHEMA_VERSION: u32 = 1;

/// One placed object as stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRecord {
    pub object_type: LevelObjectType,
    pub row: i32,
    pub column: i32,
}

impl LevelRecord {
    pub fn position(&self) -> GridPosition {
        GridPosition::new(self.row, self.column)
    }
}

/// A saved level.
///
/// Records are in canonical (row, column) order. `sha256` covers a fixed
/// little-endian encoding of the records, independent of the CBOR framing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelFile {
    pub schema_version: u32,
    pub objects: Vec<LevelRecord>,
    pub sha256: String,
}

impl LevelFile {
    pub fn capture(level: &LevelState) -> Self {
        let objects: Vec<LevelRecord> = level
            .objects()
            .map(|o| LevelRecord {
                object_type: o.object_type,
                row: o.position.row,
                column: o.position.column,
            })
            .collect();
        let sha256 = records_digest(&objects);
        Self {
            schema_version: LEVEL_SCHEMA_VERSION,
            objects,
            sha256,
        }
    }

    /// Recompute the digest and compare.
    pub fn verify(&self) -> bool {
        records_digest(&self.objects) == self.sha256
    }

    /// Rebuild the level. Duplicate cells are rejected.
    pub fn restore(&self) -> Result<LevelState, LevelError> {
        LevelState::from_objects(
            self.objects
                .iter()
                .map(|r| LevelObjectData::new(r.object_type, r.position())),
        )
    }
}

/// The ordered list of saved level names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelIndex {
    pub schema_version: u32,
    pub names: Vec<String>,
}

impl Default for LevelIndex {
    fn default() -> Self {
        Self {
            schema_version: INDEX_SCHEMA_VERSION,
            names: Vec::new(),
        }
    }
}

pub(crate) fn records_digest(records: &[LevelRecord]) -> String {
    let mut hasher = Sha256::new();
    for record in records {
        hasher.update([record.object_type.tag()]);
        hasher.update(record.row.to_le_bytes());
        hasher.update(record.column.to_le_bytes());
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LevelState {
        let mut level = LevelState::new();
        level
            .create(LevelObjectType::Block, GridPosition::new(0, 1))
            .unwrap();
        level
            .create(LevelObjectType::Block, GridPosition::new(0, 0))
            .unwrap();
        level
            .create(LevelObjectType::PlayerStart, GridPosition::new(2, 0))
            .unwrap();
        level
    }

    #[test]
    fn capture_is_sorted_and_verifiable() {
        let file = LevelFile::capture(&sample());
        assert_eq!(file.schema_version, LEVEL_SCHEMA_VERSION);
        let positions: Vec<_> = file.objects.iter().map(|r| r.position()).collect();
        assert_eq!(
            positions,
            vec![
                GridPosition::new(0, 0),
                GridPosition::new(0, 1),
                GridPosition::new(2, 0)
            ]
        );
        assert!(file.verify());
    }

    #[test]
    fn tampered_records_fail_verification() {
        let mut file = LevelFile::capture(&sample());
        file.objects[0].object_type = LevelObjectType::PlayerStart;
        assert!(!file.verify());
    }

    #[test]
    fn restore_reproduces_level() {
        let level = sample();
        let restored = LevelFile::capture(&level).restore().unwrap();
        assert_eq!(restored, level);
        assert_eq!(restored.state_hash(), level.state_hash());
        assert!(restored.events().is_empty());
    }

    #[test]
    fn restore_rejects_duplicate_cells() {
        let mut file = LevelFile::capture(&sample());
        file.objects[1] = file.objects[0];
        assert!(matches!(file.restore(), Err(LevelError::Occupied(_))));
    }

    #[test]
    fn empty_level_digest_is_stable() {
        let a = LevelFile::capture(&LevelState::new());
        let b = LevelFile::capture(&LevelState::new());
        assert_eq!(a.sha256, b.sha256);
        assert!(a.objects.is_empty());
    }
}
