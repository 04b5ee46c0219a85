//! Spawn/instantiate facility.

use grimhold_common::Vec2;
use serde::{Deserialize, Serialize};

/// Name of a spawnable template (projectile body, impact effect).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrefabId(pub String);

impl PrefabId {
    /// Create a prefab id.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Prefab name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Opaque handle to a host-side instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpawnHandle(pub u64);

/// Creates presentation instances for projectiles and effects.
pub trait Spawner {
    /// Instantiate `prefab` at `position` with heading `heading` (radians).
    /// `None` means the prefab is not available.
    fn instantiate(&mut self, prefab: &PrefabId, position: Vec2, heading: f32) -> Option<SpawnHandle>;

    /// Release an instance created by [`Spawner::instantiate`].
    fn release(&mut self, _handle: SpawnHandle) {}
}

/// Spawner for hosts without presentation: every prefab exists and handles
/// are sequential.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSpawner {
    next: u64,
    live: u64,
}

impl HeadlessSpawner {
    /// Number of instances created and not yet released.
    #[must_use]
    pub fn live(&self) -> u64 {
        self.live
    }
}

impl Spawner for HeadlessSpawner {
    fn instantiate(&mut self, _prefab: &PrefabId, _position: Vec2, _heading: f32) -> Option<SpawnHandle> {
        self.next += 1;
        self.live += 1;
        Some(SpawnHandle(self.next))
    }

    fn release(&mut self, _handle: SpawnHandle) {
        self.live = self.live.saturating_sub(1);
    }
}
