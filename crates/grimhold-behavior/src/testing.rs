//! Recording test double for every collaborator trait.

use grimhold_common::{ColliderId, EntityId, Vec2};
use std::collections::{HashMap, HashSet};

use crate::damage::{DamageReceiver, DamageRegistry, Hit};
use crate::spawn::{HeadlessSpawner, PrefabId, SpawnHandle, Spawner};
use crate::status::StatusProvider;
use crate::target::{TargetBoard, TargetInfo, TargetLocator};

/// In-memory world: a target board, a health table, collider ownership and
/// a headless spawner, all recorded for assertions.
#[derive(Debug, Default)]
pub(crate) struct MockWorld {
    pub board: TargetBoard,
    pub health: HashMap<EntityId, f32>,
    pub disabled: HashSet<EntityId>,
    pub colliders: HashMap<ColliderId, EntityId>,
    pub hitboxes: HashMap<ColliderId, EntityId>,
    pub hits: Vec<(DamageReceiver, Hit)>,
    pub frozen: HashSet<EntityId>,
    pub speed_multiplier: f32,
    pub cooldown_bonus: f32,
    pub spawner: HeadlessSpawner,
    pub missing_prefabs: HashSet<String>,
    pub spawned: Vec<(PrefabId, Vec2)>,
    pub deaths: Vec<EntityId>,
}

impl MockWorld {
    pub fn new() -> Self {
        Self {
            speed_multiplier: 1.0,
            ..Self::default()
        }
    }

    /// World whose primary target is `player`.
    pub fn with_player(player: EntityId, position: Vec2, health: f32) -> Self {
        let mut world = Self::new();
        world.board = TargetBoard::with_primary(player, position);
        world.health.insert(player, health);
        world
    }

    pub fn move_entity(&mut self, id: EntityId, position: Vec2) {
        self.board.set_position(id, position);
    }

    pub fn set_health(&mut self, id: EntityId, health: f32) {
        self.health.insert(id, health);
    }

    pub fn attach_health(&mut self, collider: ColliderId, owner: EntityId) {
        self.colliders.insert(collider, owner);
    }

    /// Total damage received by `id`.
    pub fn damage_to(&self, id: EntityId) -> f32 {
        self.hits
            .iter()
            .filter(|(r, _)| r.owner == id)
            .map(|(_, h)| h.amount)
            .sum()
    }
}

impl TargetLocator for MockWorld {
    fn locate_target(&self, seeker: EntityId) -> Option<TargetInfo> {
        self.board.locate_target(seeker)
    }

    fn position_of(&self, id: EntityId) -> Option<Vec2> {
        self.board.position_of(id)
    }

    fn entity_died(&mut self, id: EntityId) {
        self.deaths.push(id);
        self.board.entity_died(id);
    }
}

impl DamageRegistry for MockWorld {
    fn is_alive(&self, id: EntityId) -> bool {
        self.health.get(&id).map_or(true, |h| *h > 0.0)
    }

    fn is_enabled(&self, id: EntityId) -> bool {
        self.is_alive(id) && !self.disabled.contains(&id)
    }

    fn take_damage(&mut self, receiver: DamageReceiver, hit: &Hit) {
        if let Some(health) = self.health.get_mut(&receiver.owner) {
            *health -= hit.amount;
        }
        self.hits.push((receiver, *hit));
    }

    fn hitbox_owner(&self, collider: ColliderId) -> Option<EntityId> {
        self.hitboxes.get(&collider).copied()
    }

    fn health_on(&self, collider: ColliderId) -> Option<EntityId> {
        self.colliders.get(&collider).copied()
    }
}

impl StatusProvider for MockWorld {
    fn move_speed_multiplier(&self, _id: EntityId) -> f32 {
        self.speed_multiplier
    }

    fn cooldown_bonus(&self, _id: EntityId) -> f32 {
        self.cooldown_bonus
    }

    fn is_frozen(&self, id: EntityId) -> bool {
        self.frozen.contains(&id)
    }
}

impl Spawner for MockWorld {
    fn instantiate(&mut self, prefab: &PrefabId, position: Vec2, heading: f32) -> Option<SpawnHandle> {
        if self.missing_prefabs.contains(prefab.name()) {
            return None;
        }
        self.spawned.push((prefab.clone(), position));
        self.spawner.instantiate(prefab, position, heading)
    }

    fn release(&mut self, handle: SpawnHandle) {
        self.spawner.release(handle);
    }
}
