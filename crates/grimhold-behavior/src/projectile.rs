//! Self-propelled projectiles.
//!
//! A projectile travels along a fixed direction until it expires, hits
//! something, or loses its owner. On its primary hit it either deals one
//! tick and goes away, or parks on the receiver and ticks through a timing
//! list with the same [`TimedDamageApplier`] the melee sequencer uses.
//!
//! Destruction goes through a [`DeathFinalizer`], so it is idempotent and
//! immediately disables travel, contact handling and ticking; only the
//! final removal is deferred.

use grimhold_common::{direction_to, heading_of, rotate_towards, ColliderId, EntityId, Vec2};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::clock::Suspension;
use crate::config::{HitMode, ProjectileProfile};
use crate::damage::{resolve_receiver, DamageReceiver, Hit};
use crate::death::DeathFinalizer;
use crate::events::{BehaviorEvent, EventBus};
use crate::spawn::{PrefabId, SpawnHandle};
use crate::timed_damage::{ApplierStatus, TickOutcome, TimedDamageApplier};
use crate::world::CombatWorld;

/// Collision classification reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactClass {
    /// Something of the primary target type (the player side).
    Target,
    /// Something on the hostile side (allies of the owner).
    Hostile,
    /// Another projectile.
    Projectile,
    /// Wall or obstacle.
    Obstacle,
    /// Anything else.
    Other,
}

/// One physical contact reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Collider touched
    pub collider: ColliderId,
    /// Entity owning the collider, if known
    pub owner: Option<EntityId>,
    /// Host classification
    pub class: ContactClass,
}

impl Contact {
    /// Contact with a collider of the given class.
    #[must_use]
    pub const fn new(collider: ColliderId, class: ContactClass) -> Self {
        Self {
            collider,
            owner: None,
            class,
        }
    }

    /// Record the entity owning the collider.
    #[must_use]
    pub const fn with_owner(mut self, owner: EntityId) -> Self {
        self.owner = Some(owner);
        self
    }
}

/// Why a projectile was destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DestroyReason {
    /// Lifetime ran out.
    Expired,
    /// Hit an obstacle.
    Obstacle,
    /// Damage delivery finished.
    Completed,
    /// The receiver died or went away mid delivery.
    Interrupted,
    /// The tracked owner died.
    OwnerDied,
    /// The contact had nothing that accepts damage.
    NoReceiver,
    /// Host request.
    Host,
}

/// Coarse projectile state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectilePhase {
    /// Moving.
    Traveling,
    /// Parked on the primary receiver, ticking damage.
    PrimaryHitProcessing,
    /// Terminal; waiting for removal.
    Destroying,
}

/// What a contact did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    /// Nothing happened.
    Ignored,
    /// One tick delivered and the projectile destroyed.
    Hit(DamageReceiver),
    /// Parked on the receiver for multi-hit ticking.
    Attached(DamageReceiver),
    /// Destroyed without damage.
    Destroyed(DestroyReason),
}

#[derive(Debug, Clone)]
enum Stage {
    Traveling,
    Ticking {
        receiver: DamageReceiver,
        applier: TimedDamageApplier,
    },
    Destroying,
}

/// A fired projectile.
#[derive(Debug, Clone)]
pub struct Projectile {
    id: EntityId,
    owner: EntityId,
    owner_alive: bool,
    profile: ProjectileProfile,
    position: Vec2,
    direction: Vec2,
    heading: f32,
    handle: Option<SpawnHandle>,
    lifetime: Suspension,
    stage: Stage,
    primary: Option<DamageReceiver>,
    delivered: u32,
    removal_delay: f32,
    death: DeathFinalizer,
}

impl Projectile {
    /// Create a projectile travelling along `direction` (normalized; a zero
    /// direction leaves it stationary until it expires).
    #[must_use]
    pub fn new(
        id: EntityId,
        owner: EntityId,
        profile: ProjectileProfile,
        position: Vec2,
        direction: Vec2,
        removal_delay: f32,
    ) -> Self {
        let direction = direction.normalize_or_zero();
        Self {
            id,
            owner,
            owner_alive: true,
            lifetime: Suspension::new(profile.lifetime),
            profile,
            position,
            direction,
            heading: heading_of(direction),
            handle: None,
            stage: Stage::Traveling,
            primary: None,
            delivered: 0,
            removal_delay,
            death: DeathFinalizer::new(),
        }
    }

    /// Instantiate the projectile body through the spawner. Returns `None`
    /// (and logs) if the prefab is not available.
    pub fn launch<W: CombatWorld + ?Sized>(
        id: EntityId,
        owner: EntityId,
        profile: &ProjectileProfile,
        origin: Vec2,
        direction: Vec2,
        removal_delay: f32,
        world: &mut W,
    ) -> Option<Self> {
        let mut projectile = Self::new(id, owner, profile.clone(), origin, direction, removal_delay);
        let prefab = PrefabId::new(profile.prefab.clone());
        let Some(handle) = world.instantiate(&prefab, origin, projectile.heading) else {
            warn!(%owner, prefab = prefab.name(), "projectile prefab unavailable, shot skipped");
            return None;
        };
        projectile.handle = Some(handle);
        Some(projectile)
    }

    /// Projectile id.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Owner (spawner) id.
    #[must_use]
    pub fn owner(&self) -> EntityId {
        self.owner
    }

    /// Profile in use.
    #[must_use]
    pub fn profile(&self) -> &ProjectileProfile {
        &self.profile
    }

    /// Presentation handle.
    #[must_use]
    pub fn handle(&self) -> Option<SpawnHandle> {
        self.handle
    }

    /// Current position.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Travel direction.
    #[must_use]
    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Presentation heading (radians).
    #[must_use]
    pub fn heading(&self) -> f32 {
        self.heading
    }

    /// Receiver of the primary hit, once processed.
    #[must_use]
    pub fn primary_receiver(&self) -> Option<DamageReceiver> {
        self.primary
    }

    /// Damage ticks delivered so far.
    #[must_use]
    pub fn delivered(&self) -> u32 {
        self.delivered
    }

    /// Whether travel and target collision are active.
    #[must_use]
    pub fn is_collidable(&self) -> bool {
        matches!(self.stage, Stage::Traveling)
    }

    /// Coarse state.
    #[must_use]
    pub fn phase(&self) -> ProjectilePhase {
        match self.stage {
            Stage::Traveling => ProjectilePhase::Traveling,
            Stage::Ticking { .. } => ProjectilePhase::PrimaryHitProcessing,
            Stage::Destroying => ProjectilePhase::Destroying,
        }
    }

    /// Whether destruction started.
    #[must_use]
    pub fn is_destroying(&self) -> bool {
        self.death.is_terminal()
    }

    /// Whether the deferred removal happened.
    #[must_use]
    pub fn is_removed(&self) -> bool {
        self.death.is_removed()
    }

    /// Advance by `dt` simulated seconds. Returns `true` on the step the
    /// projectile is removed.
    pub fn advance<W: CombatWorld + ?Sized>(&mut self, dt: f32, world: &mut W, bus: &mut EventBus) -> bool {
        if self.death.is_terminal() {
            return self.tick_removal(dt, world, bus);
        }

        match self.stage {
            Stage::Traveling => {
                if self.lifetime.advance(dt).is_some() {
                    self.destroy(DestroyReason::Expired, world, bus);
                    return false;
                }
                let target_heading = heading_of(self.direction);
                self.heading = if self.profile.turn_rate > 0.0 {
                    rotate_towards(self.heading, target_heading, self.profile.turn_rate * dt)
                } else {
                    target_heading
                };
                self.position += self.direction * self.profile.speed * dt;
            },
            Stage::Ticking { .. } => {
                self.run_ticks(dt, world, bus);
            },
            Stage::Destroying => {},
        }
        false
    }

    /// Handle one host-reported contact.
    pub fn on_contact<W: CombatWorld + ?Sized>(
        &mut self,
        contact: Contact,
        world: &mut W,
        bus: &mut EventBus,
    ) -> ContactOutcome {
        if self.death.is_terminal() {
            return ContactOutcome::Ignored;
        }
        if self.profile.track_owner && !self.owner_alive {
            self.destroy(DestroyReason::OwnerDied, world, bus);
            return ContactOutcome::Destroyed(DestroyReason::OwnerDied);
        }
        if contact.owner == Some(self.owner) {
            return ContactOutcome::Ignored;
        }

        // After the primary hit only new obstacles matter; other targets and
        // the protected receiver are ignored.
        if self.primary.is_some() {
            if contact.class == ContactClass::Obstacle {
                self.destroy(DestroyReason::Obstacle, world, bus);
                return ContactOutcome::Destroyed(DestroyReason::Obstacle);
            }
            return ContactOutcome::Ignored;
        }

        match contact.class {
            ContactClass::Target => self.primary_hit(contact.collider, world, bus),
            ContactClass::Obstacle => {
                self.destroy(DestroyReason::Obstacle, world, bus);
                ContactOutcome::Destroyed(DestroyReason::Obstacle)
            },
            ContactClass::Hostile | ContactClass::Projectile | ContactClass::Other => ContactOutcome::Ignored,
        }
    }

    /// The owner died. Tracking projectiles terminate without further
    /// damage; others keep flying.
    pub fn on_owner_died<W: CombatWorld + ?Sized>(&mut self, world: &mut W, bus: &mut EventBus) -> bool {
        self.owner_alive = false;
        if self.profile.track_owner {
            return self.destroy(DestroyReason::OwnerDied, world, bus);
        }
        false
    }

    /// Enter the destroying state. Returns `false` if already destroying.
    pub fn destroy<W: CombatWorld + ?Sized>(
        &mut self,
        reason: DestroyReason,
        world: &mut W,
        bus: &mut EventBus,
    ) -> bool {
        if !self.death.finalize(self.removal_delay) {
            return false;
        }
        if let Stage::Ticking { applier, .. } = &mut self.stage {
            applier.stop();
        }
        self.stage = Stage::Destroying;

        debug!(projectile = %self.id, ?reason, delivered = self.delivered, "projectile destroyed");
        bus.publish(BehaviorEvent::ProjectileDestroyed {
            projectile: self.id,
            reason,
        });

        if let Some(effect) = &self.profile.impact_effect {
            let offset = if self.direction.x < 0.0 {
                effect.left_offset
            } else {
                effect.right_offset
            };
            let position = self.position + offset;
            let prefab = PrefabId::new(effect.prefab.clone());
            match world.instantiate(&prefab, position, self.heading) {
                Some(handle) => bus.publish(BehaviorEvent::EffectSpawned { handle, position }),
                None => warn!(prefab = prefab.name(), "impact effect prefab unavailable"),
            }
        }
        true
    }

    fn primary_hit<W: CombatWorld + ?Sized>(
        &mut self,
        collider: ColliderId,
        world: &mut W,
        bus: &mut EventBus,
    ) -> ContactOutcome {
        let Some(receiver) = resolve_receiver(&*world, collider) else {
            self.destroy(DestroyReason::NoReceiver, world, bus);
            return ContactOutcome::Destroyed(DestroyReason::NoReceiver);
        };
        if !world.is_enabled(receiver.owner) {
            self.destroy(DestroyReason::Interrupted, world, bus);
            return ContactOutcome::Destroyed(DestroyReason::Interrupted);
        }
        self.primary = Some(receiver);

        match &self.profile.hit_mode {
            HitMode::DestroyOnContact => {
                self.deliver(receiver, 0, world, bus);
                self.destroy(DestroyReason::Completed, world, bus);
                ContactOutcome::Hit(receiver)
            },
            HitMode::MultiHit { offsets } => {
                let applier = TimedDamageApplier::new(offsets.iter().copied());
                self.stage = Stage::Ticking { receiver, applier };
                // Offsets at zero land on contact
                self.run_ticks(0.0, world, bus);
                ContactOutcome::Attached(receiver)
            },
        }
    }

    fn run_ticks<W: CombatWorld + ?Sized>(&mut self, dt: f32, world: &mut W, bus: &mut EventBus) {
        let Stage::Ticking { receiver, applier } = &mut self.stage else {
            return;
        };
        let receiver = *receiver;
        let track_owner = self.profile.track_owner;
        let owner_alive = self.owner_alive;
        let hit = Hit {
            source: self.owner,
            amount: self.profile.damage,
            point: self.position,
            normal: self.direction,
            instance: 0,
        };
        let projectile = self.id;
        let mut failure = None;

        let status = applier.advance(dt, |index| {
            if track_owner && !owner_alive {
                failure = Some(DestroyReason::OwnerDied);
                return TickOutcome::Stop;
            }
            if !world.is_enabled(receiver.owner) {
                failure = Some(DestroyReason::Interrupted);
                return TickOutcome::Stop;
            }
            let hit = Hit {
                instance: index as u32,
                ..hit
            };
            world.take_damage(receiver, &hit);
            trace!(%projectile, instance = index, "projectile tick delivered");
            bus.publish(BehaviorEvent::DamageDelivered {
                source: hit.source,
                receiver,
                amount: hit.amount,
                instance: hit.instance,
            });
            TickOutcome::Delivered
        });
        self.delivered = applier.delivered();

        match status {
            ApplierStatus::Waiting => {},
            ApplierStatus::Finished { .. } => {
                self.destroy(DestroyReason::Completed, world, bus);
            },
            ApplierStatus::Stopped => {
                self.destroy(failure.unwrap_or(DestroyReason::Interrupted), world, bus);
            },
        }
    }

    fn deliver<W: CombatWorld + ?Sized>(
        &mut self,
        receiver: DamageReceiver,
        instance: u32,
        world: &mut W,
        bus: &mut EventBus,
    ) {
        let hit = Hit {
            source: self.owner,
            amount: self.profile.damage,
            point: self.position,
            normal: self.direction,
            instance,
        };
        world.take_damage(receiver, &hit);
        self.delivered += 1;
        trace!(projectile = %self.id, receiver = %receiver.owner, "projectile hit delivered");
        bus.publish(BehaviorEvent::DamageDelivered {
            source: self.owner,
            receiver,
            amount: hit.amount,
            instance,
        });
    }

    fn tick_removal<W: CombatWorld + ?Sized>(&mut self, dt: f32, world: &mut W, bus: &mut EventBus) -> bool {
        if !self.death.tick(dt) {
            return false;
        }
        if let Some(handle) = self.handle.take() {
            world.release(handle);
        }
        bus.publish(BehaviorEvent::ProjectileRemoved { projectile: self.id });
        true
    }
}

/// Direction from `origin` towards `target`, falling back to `fallback`
/// when the points coincide.
#[must_use]
pub fn aim(origin: Vec2, target: Vec2, fallback: Vec2) -> Vec2 {
    let direction = direction_to(origin, target);
    if direction == Vec2::ZERO {
        fallback.normalize_or_zero()
    } else {
        direction
    }
}
