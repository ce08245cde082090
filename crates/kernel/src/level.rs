use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use zen_common::{GridPosition, LevelObjectData, LevelObjectType};

/// An event record produced by every mutation to the level.
///
/// Consumers such as the retiler drain these to find out which cells changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LevelEvent {
    Created {
        position: GridPosition,
        object_type: LevelObjectType,
    },
    Destroyed {
        position: GridPosition,
        object_type: LevelObjectType,
    },
    /// Every object was removed at once.
    Cleared,
}

/// Errors from level mutations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LevelError {
    #[error("cell {0} is already occupied")]
    Occupied(GridPosition),
}

/// Sparse map of placed objects keyed by grid cell.
///
/// Uses BTreeMap so iteration, hashing and saved files are in canonical
/// (row, column) order. Cloning produces an independent snapshot with an
/// empty event log.
#[derive(Debug, Default)]
pub struct LevelState {
    objects: BTreeMap<GridPosition, LevelObjectData>,
    event_log: Vec<LevelEvent>,
}

impl Clone for LevelState {
    fn clone(&self) -> Self {
        Self {
            objects: self.objects.clone(),
            event_log: Vec::new(),
        }
    }
}

/// Two levels are equal when they hold the same objects; pending events are
/// not part of the level's value.
impl PartialEq for LevelState {
    fn eq(&self, other: &Self) -> bool {
        self.objects == other.objects
    }
}

impl Eq for LevelState {}

impl LevelState {
    /// Create an empty level.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a level from object records. Later records for an already
    /// occupied cell are rejected.
    pub fn from_objects(
        objects: impl IntoIterator<Item = LevelObjectData>,
    ) -> Result<Self, LevelError> {
        let mut level = Self::new();
        for object in objects {
            level.create(object.object_type, object.position)?;
        }
        level.event_log.clear();
        Ok(level)
    }

    /// Number of placed objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, position: GridPosition) -> Option<&LevelObjectData> {
        self.objects.get(&position)
    }

    pub fn is_occupied(&self, position: GridPosition) -> bool {
        self.objects.contains_key(&position)
    }

    /// All objects in canonical order.
    pub fn objects(&self) -> impl Iterator<Item = &LevelObjectData> {
        self.objects.values()
    }

    /// Cells holding an object of the given type.
    pub fn positions_of(&self, object_type: LevelObjectType) -> impl Iterator<Item = GridPosition> + '_ {
        self.objects
            .values()
            .filter(move |o| o.object_type == object_type)
            .map(|o| o.position)
    }

    /// Cells holding solid geometry.
    pub fn solid_positions(&self) -> impl Iterator<Item = GridPosition> + '_ {
        self.objects
            .values()
            .filter(|o| o.object_type.is_solid())
            .map(|o| o.position)
    }

    /// The first player start marker in canonical order, if any.
    pub fn player_start(&self) -> Option<GridPosition> {
        self.positions_of(LevelObjectType::PlayerStart).next()
    }

    /// Place an object. Fails without touching the level if the cell is taken.
    pub fn create(
        &mut self,
        object_type: LevelObjectType,
        position: GridPosition,
    ) -> Result<(), LevelError> {
        if self.objects.contains_key(&position) {
            tracing::warn!(%position, ?object_type, "placement rejected: cell occupied");
            return Err(LevelError::Occupied(position));
        }
        self.objects
            .insert(position, LevelObjectData::new(object_type, position));
        self.event_log.push(LevelEvent::Created {
            position,
            object_type,
        });
        tracing::debug!(%position, ?object_type, "object created");
        Ok(())
    }

    /// Remove the object at `position`. Returns it if the cell was occupied.
    pub fn destroy(&mut self, position: GridPosition) -> Option<LevelObjectData> {
        let removed = self.objects.remove(&position);
        if let Some(ref object) = removed {
            self.event_log.push(LevelEvent::Destroyed {
                position,
                object_type: object.object_type,
            });
            tracing::debug!(%position, object_type = ?object.object_type, "object destroyed");
        }
        removed
    }

    /// Remove every object.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.event_log.push(LevelEvent::Cleared);
    }

    /// Deep copy of the current contents, suitable for the change history.
    pub fn snapshot(&self) -> LevelState {
        self.clone()
    }

    /// Replace the contents with those of `snapshot`.
    ///
    /// Recorded as a `Cleared` event followed by one `Created` per object.
    pub fn restore(&mut self, snapshot: LevelState) {
        self.objects = snapshot.objects;
        self.event_log.push(LevelEvent::Cleared);
        for object in self.objects.values() {
            self.event_log.push(LevelEvent::Created {
                position: object.position,
                object_type: object.object_type,
            });
        }
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<LevelEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Read-only access to pending events.
    pub fn events(&self) -> &[LevelEvent] {
        &self.event_log
    }

    /// Deterministic FNV-1a hash of the level contents.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        for object in self.objects.values() {
            mix(&mut h, &object.position.row.to_le_bytes());
            mix(&mut h, &object.position.column.to_le_bytes());
            mix(&mut h, &[object.object_type.tag()]);
        }
        h
    }
}
