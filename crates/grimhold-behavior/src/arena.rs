//! Entity scheduler.
//!
//! The arena owns every actor and projectile, the pause-safe clock and the
//! death observers. Hosts drive it once per frame with [`Arena::advance`]
//! and drain [`BehaviorEvent`]s afterwards. Updates run in id order, so a
//! given sequence of host calls always produces the same event stream.

use grimhold_common::{EntityId, Vec2};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::clock::{FixedStep, PauseReason, SimClock};
use crate::config::{BehaviorConfig, SpeciesProfile};
use crate::enemy::{Enemy, EnemyReport, FireRequest};
use crate::error::{BehaviorError, BehaviorResult};
use crate::events::{BehaviorEvent, EventBus, DEFAULT_EVENT_CAPACITY};
use crate::observers::{DeathObservers, Watcher};
use crate::projectile::{Contact, ContactOutcome, DestroyReason, Projectile};
use crate::world::CombatWorld;

/// Owns and schedules every hostile actor and projectile.
#[derive(Debug)]
pub struct Arena {
    config: BehaviorConfig,
    clock: SimClock,
    fixed: FixedStep,
    enemies: BTreeMap<EntityId, Enemy>,
    projectiles: BTreeMap<EntityId, Projectile>,
    observers: DeathObservers,
    bus: EventBus,
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(BehaviorConfig::default())
    }
}

impl Arena {
    /// Create an empty arena.
    #[must_use]
    pub fn new(config: BehaviorConfig) -> Self {
        Self::with_event_capacity(config, DEFAULT_EVENT_CAPACITY)
    }

    /// Create an empty arena with a custom event bus capacity.
    #[must_use]
    pub fn with_event_capacity(mut config: BehaviorConfig, capacity: usize) -> Self {
        config.validate();
        let fixed = FixedStep::new(config.fixed_timestep, config.max_steps_per_frame);
        info!(
            species = config.species.len(),
            fixed_timestep = config.fixed_timestep,
            "Arena created"
        );
        Self {
            config,
            clock: SimClock::new(),
            fixed,
            enemies: BTreeMap::new(),
            projectiles: BTreeMap::new(),
            observers: DeathObservers::new(),
            bus: EventBus::new(capacity),
        }
    }

    // === Accessors ===

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &BehaviorConfig {
        &self.config
    }

    /// Pause-safe simulated time.
    #[must_use]
    pub fn now(&self) -> f32 {
        self.clock.now()
    }

    /// Simulation clock.
    #[must_use]
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Look up an actor.
    pub fn enemy(&self, id: EntityId) -> BehaviorResult<&Enemy> {
        self.enemies.get(&id).ok_or(BehaviorError::EntityNotFound(id))
    }

    /// Look up a projectile.
    pub fn projectile(&self, id: EntityId) -> BehaviorResult<&Projectile> {
        self.projectiles
            .get(&id)
            .ok_or(BehaviorError::ProjectileNotFound(id))
    }

    /// Every actor, in id order.
    pub fn enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.values()
    }

    /// Every projectile, in id order.
    pub fn projectiles(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.values()
    }

    /// Number of actors (including dying ones).
    #[must_use]
    pub fn enemy_count(&self) -> usize {
        self.enemies.len()
    }

    /// Number of projectiles (including destroying ones).
    #[must_use]
    pub fn projectile_count(&self) -> usize {
        self.projectiles.len()
    }

    /// Death observer registry.
    #[must_use]
    pub fn observers(&self) -> &DeathObservers {
        &self.observers
    }

    /// Drain every pending event.
    pub fn drain_events(&mut self) -> Vec<BehaviorEvent> {
        self.bus.drain()
    }

    // === Spawning ===

    /// Spawn an actor of a configured species.
    pub fn spawn_enemy(&mut self, species: &str, position: Vec2) -> BehaviorResult<EntityId> {
        let profile = self.config.species(species)?.clone();
        Ok(self.spawn_with_profile(species, profile, position))
    }

    /// Spawn an actor from an explicit profile.
    pub fn spawn_with_profile(&mut self, species: &str, mut profile: SpeciesProfile, position: Vec2) -> EntityId {
        profile.validate();
        let id = EntityId::new();
        let enemy = Enemy::new(id, species, profile, position).with_removal_delay(self.config.enemy_removal_delay);
        debug!(entity = %id, species, "enemy spawned");
        self.enemies.insert(id, enemy);
        id
    }

    // === Pausing ===

    /// Push a pause reason.
    pub fn pause(&mut self, reason: PauseReason) {
        self.clock.pause(reason);
    }

    /// Pop a pause reason. Returns false if it was not active.
    pub fn resume(&mut self, reason: PauseReason) -> bool {
        self.clock.resume(reason)
    }

    /// Whether simulated time is frozen.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    // === Simulation ===

    /// Feed one frame of wall time. Runs as many fixed steps as it covers
    /// and returns how many ran. Nothing runs while paused.
    pub fn advance<W: CombatWorld + ?Sized>(&mut self, frame_dt: f32, world: &mut W) -> u32 {
        if self.clock.is_paused() {
            self.clock.advance(frame_dt);
            return 0;
        }
        let steps = self.fixed.accumulate(frame_dt);
        let dt = self.fixed.fixed_dt();
        for _ in 0..steps {
            self.step(dt, world);
        }
        steps
    }

    /// Run one step of `dt` simulated seconds.
    pub fn step<W: CombatWorld + ?Sized>(&mut self, dt: f32, world: &mut W) {
        let dt = self.clock.advance(dt);
        if dt <= 0.0 {
            return;
        }
        let now = self.clock.now();

        let ids: Vec<EntityId> = self.enemies.keys().copied().collect();
        for id in ids {
            let Some(enemy) = self.enemies.get_mut(&id) else {
                continue;
            };
            let report = enemy.update(dt, now, world, &mut self.bus);
            self.apply_report(id, report, world);
        }

        let ids: Vec<EntityId> = self.projectiles.keys().copied().collect();
        for id in ids {
            let Some(projectile) = self.projectiles.get_mut(&id) else {
                continue;
            };
            let before = projectile.delivered();
            let removed = projectile.advance(dt, world, &mut self.bus);
            let after = projectile.delivered();
            let receiver = projectile.primary_receiver();

            if after > before {
                if let Some(receiver) = receiver {
                    self.check_death(receiver.owner, world);
                }
            }
            if removed {
                self.remove_projectile(id);
            }
        }
    }

    // === Host Interruptions ===

    /// Push an actor back.
    pub fn apply_knockback(&mut self, id: EntityId, direction: Vec2, force: f32) -> BehaviorResult<Option<Vec2>> {
        let now = self.clock.now();
        let enemy = self
            .enemies
            .get_mut(&id)
            .ok_or(BehaviorError::EntityNotFound(id))?;
        let before = enemy.attack_target();
        let applied = enemy.apply_knockback(direction, force, now, &mut self.bus);
        let after = enemy.attack_target();
        self.release_watch(id, before, after);
        Ok(applied)
    }

    /// Cancel an actor's sequence (and cooldown).
    pub fn cancel(&mut self, id: EntityId) -> BehaviorResult<bool> {
        let enemy = self
            .enemies
            .get_mut(&id)
            .ok_or(BehaviorError::EntityNotFound(id))?;
        let before = enemy.attack_target();
        let cancelled = enemy.cancel(&mut self.bus);
        self.release_watch(id, before, None);
        Ok(cancelled)
    }

    /// Kill an actor owned by the arena.
    pub fn kill<W: CombatWorld + ?Sized>(&mut self, id: EntityId, world: &mut W) -> BehaviorResult<bool> {
        if !self.enemies.contains_key(&id) {
            return Err(BehaviorError::EntityNotFound(id));
        }
        Ok(self.notify_died(id, world))
    }

    /// Tell the arena that `id` died: an actor it owns, the player, or any
    /// other entity something may be watching. Idempotent. Returns whether
    /// an actor performed its terminal transition.
    pub fn notify_died<W: CombatWorld + ?Sized>(&mut self, id: EntityId, world: &mut W) -> bool {
        let mut finalized = false;
        world.entity_died(id);
        if let Some(enemy) = self.enemies.get_mut(&id) {
            let before = enemy.attack_target();
            finalized = enemy.die(&mut self.bus);
            self.release_watch(id, before, None);
        }

        for watcher in self.observers.take(id) {
            match watcher {
                Watcher::Enemy(watcher_id) => {
                    if let Some(enemy) = self.enemies.get_mut(&watcher_id) {
                        enemy.on_target_died(id, &mut self.bus);
                    }
                },
                Watcher::Projectile(projectile_id) => {
                    if let Some(projectile) = self.projectiles.get_mut(&projectile_id) {
                        projectile.on_owner_died(world, &mut self.bus);
                    }
                },
            }
        }
        finalized
    }

    /// Report a physical contact for a projectile.
    pub fn report_contact<W: CombatWorld + ?Sized>(
        &mut self,
        id: EntityId,
        contact: Contact,
        world: &mut W,
    ) -> BehaviorResult<ContactOutcome> {
        let projectile = self
            .projectiles
            .get_mut(&id)
            .ok_or(BehaviorError::ProjectileNotFound(id))?;
        let outcome = projectile.on_contact(contact, world, &mut self.bus);

        if let ContactOutcome::Hit(receiver) | ContactOutcome::Attached(receiver) = outcome {
            self.check_death(receiver.owner, world);
        }
        Ok(outcome)
    }

    /// Destroy a projectile on host request.
    pub fn destroy_projectile<W: CombatWorld + ?Sized>(&mut self, id: EntityId, world: &mut W) -> BehaviorResult<bool> {
        let projectile = self
            .projectiles
            .get_mut(&id)
            .ok_or(BehaviorError::ProjectileNotFound(id))?;
        Ok(projectile.destroy(DestroyReason::Host, world, &mut self.bus))
    }

    // === Internals ===

    fn apply_report<W: CombatWorld + ?Sized>(&mut self, id: EntityId, report: EnemyReport, world: &mut W) {
        if let Some(target) = report.disengaged {
            self.observers.unsubscribe(target, Watcher::Enemy(id));
        }
        if let Some(target) = report.engaged {
            self.observers.subscribe(target, Watcher::Enemy(id));
        }
        for request in report.fired {
            self.fire(request, world);
        }
        for target in report.struck {
            self.check_death(target, world);
        }
        if report.removed {
            self.enemies.remove(&id);
            self.observers.unsubscribe_watcher(Watcher::Enemy(id));
            debug!(entity = %id, "enemy removed");
        }
    }

    fn fire<W: CombatWorld + ?Sized>(&mut self, request: FireRequest, world: &mut W) {
        let id = EntityId::new();
        let Some(projectile) = Projectile::launch(
            id,
            request.owner,
            &request.profile,
            request.origin,
            request.direction,
            self.config.projectile_removal_delay,
            world,
        ) else {
            return;
        };

        if request.profile.track_owner {
            self.observers.subscribe(request.owner, Watcher::Projectile(id));
        }
        if let Some(handle) = projectile.handle() {
            self.bus.publish(BehaviorEvent::ProjectileSpawned {
                projectile: id,
                owner: request.owner,
                handle,
            });
        }
        debug!(projectile = %id, owner = %request.owner, "projectile fired");
        self.projectiles.insert(id, projectile);
    }

    fn remove_projectile(&mut self, id: EntityId) {
        self.projectiles.remove(&id);
        self.observers.unsubscribe_watcher(Watcher::Projectile(id));
    }

    fn check_death<W: CombatWorld + ?Sized>(&mut self, id: EntityId, world: &mut W) {
        if !world.is_alive(id) {
            self.notify_died(id, world);
        }
    }

    fn release_watch(&mut self, id: EntityId, before: Option<EntityId>, after: Option<EntityId>) {
        if let Some(target) = before {
            if after != Some(target) && !self.observers.unsubscribe(target, Watcher::Enemy(id)) {
                warn!(entity = %id, %target, "attack target was not being watched");
            }
        }
    }
}
