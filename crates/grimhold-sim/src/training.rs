//! Scripted training target.
//!
//! A single dummy that strafes along the x axis and soaks every hit. It
//! stands in for the host game: it answers target, damage, status and
//! spawn queries, and it detects projectile contacts by distance.

use grimhold_behavior::{
    Arena, BehaviorResult, Contact, ContactClass, ContactOutcome, DamageReceiver, DamageRegistry, HeadlessSpawner,
    Hit, PrefabId, SpawnHandle, Spawner, StatusProvider, TargetBoard, TargetInfo, TargetLocator,
};
use grimhold_common::{ColliderId, EntityId, Vec2};
use std::collections::BTreeMap;
use std::f32::consts::TAU;
use tracing::trace;

/// Dummy id, chosen outside the range the arena allocates from.
pub const DUMMY_ID: EntityId = EntityId::from_raw(u64::MAX);

/// Collider the dummy's health sits on.
pub const DUMMY_COLLIDER: ColliderId = ColliderId::new(1);

/// Strafing motion of the dummy.
#[derive(Debug, Clone, Copy)]
pub struct Strafe {
    /// Center of the strafe
    pub origin: Vec2,
    /// Half-width of the strafe
    pub amplitude: f32,
    /// Seconds per full back-and-forth
    pub period: f32,
}

impl Default for Strafe {
    fn default() -> Self {
        Self {
            origin: Vec2::ZERO,
            amplitude: 2.0,
            period: 6.0,
        }
    }
}

/// The host world of the harness.
#[derive(Debug)]
pub struct TrainingGround {
    board: TargetBoard,
    strafe: Strafe,
    elapsed: f32,
    contact_radius: f32,
    damage_by_source: BTreeMap<EntityId, f32>,
    hits: u64,
    spawner: HeadlessSpawner,
}

impl TrainingGround {
    /// Place the dummy at the strafe origin.
    #[must_use]
    pub fn new(strafe: Strafe) -> Self {
        Self {
            board: TargetBoard::with_primary(DUMMY_ID, strafe.origin),
            strafe,
            elapsed: 0.0,
            contact_radius: 0.5,
            damage_by_source: BTreeMap::new(),
            hits: 0,
            spawner: HeadlessSpawner::default(),
        }
    }

    /// Current dummy position.
    #[must_use]
    pub fn dummy_position(&self) -> Vec2 {
        self.board.position_of(DUMMY_ID).unwrap_or(self.strafe.origin)
    }

    /// Move the dummy along its strafe.
    pub fn tick(&mut self, dt: f32) {
        self.elapsed += dt.max(0.0);
        let period = self.strafe.period.max(f32::EPSILON);
        let offset = (self.elapsed / period * TAU).sin() * self.strafe.amplitude;
        let position = self.strafe.origin + Vec2::new(offset, 0.0);
        self.board.set_position(DUMMY_ID, position);
    }

    /// Report every collidable projectile within reach of the dummy.
    pub fn report_contacts(&mut self, arena: &mut Arena) -> BehaviorResult<u32> {
        let dummy = self.dummy_position();
        let touching: Vec<EntityId> = arena
            .projectiles()
            .filter(|p| p.is_collidable() && p.position().distance(dummy) <= self.contact_radius)
            .map(|p| p.id())
            .collect();

        let mut landed = 0;
        for id in touching {
            let contact = Contact::new(DUMMY_COLLIDER, ContactClass::Target).with_owner(DUMMY_ID);
            let outcome = arena.report_contact(id, contact, self)?;
            if matches!(outcome, ContactOutcome::Hit(_) | ContactOutcome::Attached(_)) {
                landed += 1;
            }
        }
        Ok(landed)
    }

    /// Damage dealt by `source` so far.
    #[must_use]
    pub fn damage_from(&self, source: EntityId) -> f32 {
        self.damage_by_source.get(&source).copied().unwrap_or(0.0)
    }

    /// Total hits taken.
    #[must_use]
    pub fn hits(&self) -> u64 {
        self.hits
    }
}

impl TargetLocator for TrainingGround {
    fn locate_target(&self, seeker: EntityId) -> Option<TargetInfo> {
        self.board.locate_target(seeker)
    }

    fn position_of(&self, id: EntityId) -> Option<Vec2> {
        self.board.position_of(id)
    }
}

impl DamageRegistry for TrainingGround {
    fn is_alive(&self, _id: EntityId) -> bool {
        true
    }

    fn take_damage(&mut self, receiver: DamageReceiver, hit: &Hit) {
        trace!(receiver = %receiver.owner, source = %hit.source, amount = hit.amount, "dummy hit");
        *self.damage_by_source.entry(hit.source).or_default() += hit.amount;
        self.hits += 1;
    }

    fn health_on(&self, collider: ColliderId) -> Option<EntityId> {
        (collider == DUMMY_COLLIDER).then_some(DUMMY_ID)
    }
}

impl StatusProvider for TrainingGround {}

impl Spawner for TrainingGround {
    fn instantiate(&mut self, prefab: &PrefabId, position: Vec2, heading: f32) -> Option<SpawnHandle> {
        self.spawner.instantiate(prefab, position, heading)
    }

    fn release(&mut self, handle: SpawnHandle) {
        self.spawner.release(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strafe_returns_to_origin() {
        let mut ground = TrainingGround::new(Strafe::default());
        ground.tick(1.5);
        assert!((ground.dummy_position().x - 2.0).abs() < 1e-3);
        ground.tick(4.5);
        assert!(ground.dummy_position().x.abs() < 1e-3);
    }

    #[test]
    fn test_damage_tally_by_source() {
        let mut ground = TrainingGround::new(Strafe::default());
        let source = EntityId::from_raw(7);
        let hit = Hit {
            source,
            amount: 4.0,
            point: Vec2::ZERO,
            normal: Vec2::X,
            instance: 0,
        };
        ground.take_damage(DamageReceiver::health(DUMMY_ID), &hit);
        ground.take_damage(DamageReceiver::health(DUMMY_ID), &hit);
        assert_eq!(ground.damage_from(source), 8.0);
        assert_eq!(ground.hits(), 2);
    }

    #[test]
    fn test_melee_brawler_hits_dummy() {
        let mut ground = TrainingGround::new(Strafe {
            amplitude: 0.0,
            ..Strafe::default()
        });
        let mut arena = Arena::default();
        let brawler = arena.spawn_enemy("brawler", Vec2::new(3.0, 0.0)).expect("preset");

        for _ in 0..180 {
            ground.tick(1.0 / 60.0);
            arena.step(1.0 / 60.0, &mut ground);
        }
        assert!(ground.damage_from(brawler) > 0.0);
    }
}
