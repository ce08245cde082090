//! File-backed level storage.
//!
//! Layout inside the levels directory:
//! ```text
//! lvlnms.json      - ordered index of level names (JSON)
//! <name>.zd        - one CBOR+zstd compressed level per file
//! ```

use crate::schema::{INDEX_SCHEMA_VERSION, LEVEL_SCHEMA_VERSION, LevelFile, LevelIndex};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use zen_common::StorageConfig;
use zen_kernel::{LevelError, LevelState};

/// Errors from file-backed persistence operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CBOR serialization error: {0}")]
    CborEncode(String),
    #[error("CBOR deserialization error: {0}")]
    CborDecode(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("integrity check failed: expected {expected}, got {actual}")]
    IntegrityMismatch { expected: String, actual: String },
    #[error("schema version mismatch: file has v{file_version}, expected v{expected_version}")]
    SchemaMismatch {
        file_version: u32,
        expected_version: u32,
    },
    #[error("invalid level name {0:?}")]
    InvalidName(String),
    #[error("level file is inconsistent: {0}")]
    Level(#[from] LevelError),
}

/// Level files plus their name index.
#[derive(Debug)]
pub struct LevelStore {
    root: PathBuf,
    suffix: String,
    index_file: String,
    index: LevelIndex,
}

impl LevelStore {
    /// Open the store described by `config`, creating the levels directory.
    pub fn open(config: &StorageConfig) -> Result<Self, StoreError> {
        Self::open_with(
            config.levels_path(),
            &config.level_suffix,
            &config.index_file,
        )
    }

    /// Open a store rooted at `dir` with the default file naming.
    pub fn open_dir(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let defaults = StorageConfig::default();
        Self::open_with(dir, &defaults.level_suffix, &defaults.index_file)
    }

    fn open_with(
        dir: impl AsRef<Path>,
        suffix: &str,
        index_file: &str,
    ) -> Result<Self, StoreError> {
        let root = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;

        let index_path = root.join(index_file);
        let (index, mut dirty) = if index_path.exists() {
            let index: LevelIndex = serde_json::from_reader(std::fs::File::open(&index_path)?)?;
            if index.schema_version != INDEX_SCHEMA_VERSION {
                return Err(StoreError::SchemaMismatch {
                    file_version: index.schema_version,
                    expected_version: INDEX_SCHEMA_VERSION,
                });
            }
            (index, false)
        } else {
            (LevelIndex::default(), true)
        };

        let mut store = Self {
            root,
            suffix: suffix.to_owned(),
            index_file: index_file.to_owned(),
            index,
        };

        // Drop index entries whose level file has gone missing.
        let before = store.index.names.len();
        let names = std::mem::take(&mut store.index.names);
        let kept: Vec<String> = names
            .into_iter()
            .filter(|name| {
                let present = store.file_path(name).exists();
                if !present {
                    tracing::warn!(%name, "index entry has no level file; dropping");
                }
                present
            })
            .collect();
        store.index.names = kept;
        dirty |= store.index.names.len() != before;

        if dirty {
            store.save_index()?;
        }
        tracing::debug!(root = %store.root.display(), levels = store.index.names.len(), "level store opened");
        Ok(store)
    }

    /// Directory holding the level files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Known level names in the order they were first saved.
    pub fn names(&self) -> &[String] {
        &self.index.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.names.iter().any(|n| n == name)
    }

    /// Path of the file for `name`.
    pub fn level_path(&self, name: &str) -> Result<PathBuf, StoreError> {
        validate_name(name)?;
        Ok(self.file_path(name))
    }

    /// Write `level` under `name`, replacing any previous save atomically.
    pub fn save(&mut self, name: &str, level: &LevelState) -> Result<(), StoreError> {
        let path = self.level_path(name)?;
        let file = LevelFile::capture(level);
        let compressed = zstd_compress(&cbor_serialize(&file)?)?;
        write_atomic(&path, &compressed)?;

        if !self.contains(name) {
            self.index.names.push(name.to_owned());
            self.save_index()?;
        }
        tracing::debug!(%name, objects = file.objects.len(), bytes = compressed.len(), "level saved");
        Ok(())
    }

    /// Read the level saved under `name`. A missing file is `Ok(None)`.
    pub fn load(&self, name: &str) -> Result<Option<LevelState>, StoreError> {
        let path = self.level_path(name)?;
        if !path.exists() {
            tracing::debug!(%name, "no saved level");
            return Ok(None);
        }
        let compressed = std::fs::read(&path)?;
        let file: LevelFile = cbor_deserialize(&zstd_decompress(&compressed)?)?;
        if file.schema_version != LEVEL_SCHEMA_VERSION {
            return Err(StoreError::SchemaMismatch {
                file_version: file.schema_version,
                expected_version: LEVEL_SCHEMA_VERSION,
            });
        }
        if !file.verify() {
            return Err(StoreError::IntegrityMismatch {
                expected: file.sha256.clone(),
                actual: crate::schema::records_digest(&file.objects),
            });
        }
        let level = file.restore()?;
        tracing::debug!(%name, objects = level.len(), "level loaded");
        Ok(Some(level))
    }

    /// Remove the level file and its index entry. Returns whether anything
    /// was removed.
    pub fn delete(&mut self, name: &str) -> Result<bool, StoreError> {
        let path = self.level_path(name)?;
        let had_file = path.exists();
        if had_file {
            std::fs::remove_file(&path)?;
        }
        let before = self.index.names.len();
        self.index.names.retain(|n| n != name);
        let had_entry = self.index.names.len() != before;
        if had_entry {
            self.save_index()?;
        }
        tracing::debug!(%name, had_file, had_entry, "level deleted");
        Ok(had_file || had_entry)
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}{}", self.suffix))
    }

    fn save_index(&self) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(&self.index)?;
        write_atomic(&self.root.join(&self.index_file), &bytes)
    }
}

/// Level names become file names, so they may not escape the directory.
fn validate_name(name: &str) -> Result<(), StoreError> {
    if name.trim().is_empty() || name.contains(['/', '\\']) || name.contains("..") {
        return Err(StoreError::InvalidName(name.to_owned()));
    }
    Ok(())
}

fn write_atomic(path: &Path, data: &[u8]) -> Result<(), StoreError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    std::fs::write(&tmp, data)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

fn cbor_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, StoreError> {
    let mut buf = Vec::new();
    ciborium::into_writer(value, &mut buf).map_err(|e| StoreError::CborEncode(e.to_string()))?;
    Ok(buf)
}

fn cbor_deserialize<T: for<'de> Deserialize<'de>>(data: &[u8]) -> Result<T, StoreError> {
    ciborium::from_reader(data).map_err(|e| StoreError::CborDecode(e.to_string()))
}

fn zstd_compress(data: &[u8]) -> Result<Vec<u8>, StoreError> {
    let mut encoder = zstd::Encoder::new(Vec::new(), 3)?;
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

fn zstd_decompress(data: &[u8]) -> Result<Vec<u8>, StoreError> {
    let mut decoder = zstd::Decoder::new(data)?;
    let mut buf = Vec::new();
    decoder.read_to_end(&mut buf)?;
    Ok(buf)
}
