use glam::Vec2;
use std::collections::HashMap;
use zen_common::{LevelObjectType, SpawnHandle};

/// Capability to create and remove the host engine's visual for a level
/// object. Injected into the editor session.
pub trait ObjectSpawner {
    fn spawn(&mut self, object_type: LevelObjectType, position: Vec2, rotation: f32) -> SpawnHandle;
    fn despawn(&mut self, handle: SpawnHandle);
}

/// A spawned visual as recorded by `HeadlessSpawner`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnedObject {
    pub object_type: LevelObjectType,
    pub position: Vec2,
    pub rotation: f32,
}

/// Spawner with no engine behind it. Tracks what is alive, for tests and
/// command line tools.
#[derive(Debug, Default)]
pub struct HeadlessSpawner {
    live: HashMap<SpawnHandle, SpawnedObject>,
}

impl HeadlessSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn get(&self, handle: SpawnHandle) -> Option<&SpawnedObject> {
        self.live.get(&handle)
    }

    pub fn count_of(&self, object_type: LevelObjectType) -> usize {
        self.live
            .values()
            .filter(|o| o.object_type == object_type)
            .count()
    }
}

impl ObjectSpawner for HeadlessSpawner {
    fn spawn(&mut self, object_type: LevelObjectType, position: Vec2, rotation: f32) -> SpawnHandle {
        let handle = SpawnHandle::new();
        self.live.insert(
            handle,
            SpawnedObject {
                object_type,
                position,
                rotation,
            },
        );
        handle
    }

    fn despawn(&mut self, handle: SpawnHandle) {
        if self.live.remove(&handle).is_none() {
            tracing::warn!(?handle, "despawn of unknown handle");
        }
    }
}
