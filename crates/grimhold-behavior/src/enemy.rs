//! Hostile actor.
//!
//! One generic actor parameterized by a [`SpeciesProfile`]. Each physics
//! tick it either rides a knockback overlay, drives its attack sequence, or
//! seeks its target; at most one of approaching, attacking, cooling down
//! and dead holds at any time.

use grimhold_common::{direction_to, EntityId, Facing, Vec2};
use tracing::{debug, warn};

use crate::config::{Delivery, HitPoint, ProjectileProfile, SpeciesProfile};
use crate::damage::{DamageReceiver, Hit};
use crate::death::DeathFinalizer;
use crate::events::{BehaviorEvent, EventBus};
use crate::hooks::{ApproachDecision, BehaviorHooks, HookSet};
use crate::knockback::KnockbackOverlay;
use crate::presentation::{AnimPhase, AnimTracker};
use crate::projectile::aim;
use crate::sequencer::{ActionSequencer, AttackPhase, CancelCause, SequenceStatus, StrikeContext};
use crate::world::CombatWorld;

/// A projectile the actor wants fired this tick.
#[derive(Debug, Clone, PartialEq)]
pub struct FireRequest {
    /// Firing actor
    pub owner: EntityId,
    /// Spawn point
    pub origin: Vec2,
    /// Unit travel direction
    pub direction: Vec2,
    /// Projectile tuning
    pub profile: ProjectileProfile,
}

/// What one actor tick produced for the arena to act on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnemyReport {
    /// A sequence started against this target
    pub engaged: Option<EntityId>,
    /// The attack part of a sequence against this target ended
    pub disengaged: Option<EntityId>,
    /// Entities that took direct damage
    pub struck: Vec<EntityId>,
    /// Projectiles to fire
    pub fired: Vec<FireRequest>,
    /// The actor's deferred removal happened
    pub removed: bool,
}

/// A hostile actor.
#[derive(Debug)]
pub struct Enemy {
    id: EntityId,
    species: String,
    profile: SpeciesProfile,
    position: Vec2,
    velocity: Vec2,
    anim: AnimTracker,
    sequencer: ActionSequencer,
    knockback: KnockbackOverlay,
    death: DeathFinalizer,
    hooks: HookSet,
    removal_delay: f32,
}

impl Enemy {
    /// Create a live actor at `position`.
    #[must_use]
    pub fn new(id: EntityId, species: impl Into<String>, profile: SpeciesProfile, position: Vec2) -> Self {
        let hooks = profile.hooks.build();
        Self {
            id,
            species: species.into(),
            sequencer: ActionSequencer::new(profile.timing()),
            profile,
            position,
            velocity: Vec2::ZERO,
            anim: AnimTracker::default(),
            knockback: KnockbackOverlay::default(),
            death: DeathFinalizer::new(),
            hooks,
            removal_delay: 1.0,
        }
    }

    /// Set the delay between death and removal.
    #[must_use]
    pub fn with_removal_delay(mut self, seconds: f32) -> Self {
        self.removal_delay = seconds.max(0.0);
        self
    }

    /// Replace the configured hooks.
    #[must_use]
    pub fn with_hooks(mut self, hooks: HookSet) -> Self {
        self.hooks = hooks;
        self
    }

    // === Accessors ===

    /// Actor id.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Species name.
    #[must_use]
    pub fn species(&self) -> &str {
        &self.species
    }

    /// Species profile.
    #[must_use]
    pub fn profile(&self) -> &SpeciesProfile {
        &self.profile
    }

    /// Current position.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Velocity applied on the last tick.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Current facing.
    #[must_use]
    pub fn facing(&self) -> Facing {
        self.anim.facing()
    }

    /// Last presentation phase shown.
    #[must_use]
    pub fn anim_phase(&self) -> AnimPhase {
        self.anim.phase()
    }

    /// Attack sequencer (read-only).
    #[must_use]
    pub fn sequencer(&self) -> &ActionSequencer {
        &self.sequencer
    }

    /// Whether the actor is alive.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.death.is_alive()
    }

    /// Whether the actor was removed.
    #[must_use]
    pub fn is_removed(&self) -> bool {
        self.death.is_removed()
    }

    /// Whether a knockback overlay is active at `now`.
    #[must_use]
    pub fn is_knocked_back(&self, now: f32) -> bool {
        self.knockback.is_active(now)
    }

    /// Target of an in-flight attack (not cooldown).
    #[must_use]
    pub fn attack_target(&self) -> Option<EntityId> {
        if self.sequencer.is_attacking() {
            self.sequencer.target()
        } else {
            None
        }
    }

    /// Move the actor (host teleports, tests).
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    // === Interruptions ===

    /// Push the actor. Ignored while dead or invulnerable; otherwise cancels
    /// any sequence (and cooldown) and engages the overlay. Returns the
    /// overlay velocity when applied.
    pub fn apply_knockback(&mut self, direction: Vec2, force: f32, now: f32, bus: &mut EventBus) -> Option<Vec2> {
        if !self.death.is_alive() || self.hooks.is_invulnerable() {
            debug!(entity = %self.id, "knockback ignored");
            return None;
        }

        self.cancel_sequence(CancelCause::Knockback, bus);
        let velocity = self.knockback.engage(&self.profile.knockback, direction, force, now);
        self.velocity = velocity;
        self.anim.show(self.id, AnimPhase::KnockedBack, bus);
        bus.publish(BehaviorEvent::KnockbackApplied {
            entity: self.id,
            velocity,
            until: self.knockback.until(),
        });
        Some(velocity)
    }

    /// The sequence target died: halt movement and retire the attack.
    pub fn on_target_died(&mut self, target: EntityId, bus: &mut EventBus) {
        if !self.death.is_alive() {
            return;
        }
        if self.attack_target() == Some(target) {
            self.cancel_sequence(CancelCause::TargetDied, bus);
            self.anim.show(self.id, AnimPhase::Idle, bus);
        }
        self.velocity = Vec2::ZERO;
    }

    /// Host-requested cancellation.
    pub fn cancel(&mut self, bus: &mut EventBus) -> bool {
        self.cancel_sequence(CancelCause::Host, bus)
    }

    /// Terminal transition. Returns `true` only the first time.
    pub fn die(&mut self, bus: &mut EventBus) -> bool {
        if !self.death.finalize(self.removal_delay) {
            return false;
        }
        self.cancel_sequence(CancelCause::Death, bus);
        self.knockback.clear();
        self.velocity = Vec2::ZERO;
        self.anim.show(self.id, AnimPhase::Dead, bus);
        debug!(entity = %self.id, species = %self.species, "enemy died");
        bus.publish(BehaviorEvent::EnemyDied { entity: self.id });
        true
    }

    fn cancel_sequence(&mut self, cause: CancelCause, bus: &mut EventBus) -> bool {
        let in_flight = self.sequencer.cancel();
        if in_flight {
            debug!(entity = %self.id, ?cause, "attack sequence cancelled");
            bus.publish(BehaviorEvent::SequenceCancelled {
                entity: self.id,
                cause,
            });
        }
        in_flight
    }

    // === Update ===

    /// One physics tick of `dt` simulated seconds at clock time `now`.
    pub fn update<W: CombatWorld + ?Sized>(
        &mut self,
        dt: f32,
        now: f32,
        world: &mut W,
        bus: &mut EventBus,
    ) -> EnemyReport {
        let mut report = EnemyReport::default();

        if self.death.is_terminal() {
            if self.death.tick(dt) {
                bus.publish(BehaviorEvent::EnemyRemoved { entity: self.id });
                report.removed = true;
            }
            return report;
        }

        self.hooks.tick(dt);

        if let Some(velocity) = self.knockback.velocity_at(now) {
            self.velocity = velocity;
            self.anim.show(self.id, AnimPhase::KnockedBack, bus);
            self.position += velocity * dt;
            return report;
        }

        self.drive_sequence(dt, world, bus, &mut report);

        if self.sequencer.is_attacking() || self.sequencer.is_cooling_down() {
            self.velocity = Vec2::ZERO;
        } else {
            self.seek(world, bus, &mut report);
        }

        self.position += self.velocity * dt;
        report
    }

    fn drive_sequence<W: CombatWorld + ?Sized>(
        &mut self,
        dt: f32,
        world: &mut W,
        bus: &mut EventBus,
        report: &mut EnemyReport,
    ) {
        let target = self.sequencer.target();
        let was_attacking = self.sequencer.is_attacking();

        // Frozen actors of freezable species stop windup and strike timers.
        // Cooldown and cancellation still run.
        let frozen = self.profile.freezable && world.is_frozen(self.id);
        let attack_dt = if frozen && !self.sequencer.is_cooling_down() { 0.0 } else { dt };

        let mut ctx = Strike {
            attacker: self.id,
            position: self.position,
            alive: self.death.is_alive(),
            profile: &self.profile,
            world: &mut *world,
            bus: &mut *bus,
            anim: &mut self.anim,
            report: &mut *report,
        };
        let status = self.sequencer.advance(attack_dt, &mut ctx);

        match status {
            SequenceStatus::Aborted { reason, delivered } => {
                bus.publish(BehaviorEvent::SequenceAborted {
                    entity: self.id,
                    reason,
                    delivered,
                });
            },
            SequenceStatus::Completed { delivered } => {
                self.hooks.post_cooldown();
                bus.publish(BehaviorEvent::SequenceCompleted {
                    entity: self.id,
                    delivered,
                });
            },
            SequenceStatus::Idle | SequenceStatus::Running(_) => {},
        }

        if was_attacking && !self.sequencer.is_attacking() {
            report.disengaged = target;
        }
    }

    fn seek<W: CombatWorld + ?Sized>(&mut self, world: &mut W, bus: &mut EventBus, report: &mut EnemyReport) {
        let Some(target) = world.locate_target(self.id) else {
            self.velocity = Vec2::ZERO;
            self.anim.show(self.id, AnimPhase::Idle, bus);
            return;
        };
        if !world.is_alive(target.id) || !world.is_enabled(target.id) {
            self.velocity = Vec2::ZERO;
            self.anim.show(self.id, AnimPhase::Idle, bus);
            return;
        }

        let delta = target.position - self.position;
        if let Some(facing) = Facing::from_dx(delta.x) {
            self.anim.face(facing);
        }
        let distance = delta.length();

        let can_strike = distance <= self.profile.attack_range;
        if can_strike && self.sequencer.can_begin() && self.hooks.pre_windup() {
            if let Some(token) = self.sequencer.begin(target.id) {
                self.velocity = Vec2::ZERO;
                self.anim.show(self.id, AnimPhase::Windup, bus);
                bus.publish(BehaviorEvent::SequenceStarted {
                    entity: self.id,
                    token,
                    target: target.id,
                });
                bus.publish(BehaviorEvent::PhaseChanged {
                    entity: self.id,
                    phase: AttackPhase::WindupPending,
                });
                report.engaged = Some(target.id);
                return;
            }
        }

        if self.hooks.pre_approach() == ApproachDecision::Hold || distance <= self.profile.stop_distance {
            self.velocity = Vec2::ZERO;
            self.anim.show(self.id, AnimPhase::Idle, bus);
            return;
        }

        let speed = self.profile.move_speed * world.move_speed_multiplier(self.id).max(0.0);
        self.velocity = direction_to(self.position, target.position) * speed;
        self.anim.show(self.id, AnimPhase::Approaching, bus);
    }
}

// ============================================================================
// Strike Context
// ============================================================================

struct Strike<'a, W: ?Sized> {
    attacker: EntityId,
    position: Vec2,
    alive: bool,
    profile: &'a SpeciesProfile,
    world: &'a mut W,
    bus: &'a mut EventBus,
    anim: &'a mut AnimTracker,
    report: &'a mut EnemyReport,
}

impl<W: CombatWorld + ?Sized> StrikeContext for Strike<'_, W> {
    fn attacker_alive(&self) -> bool {
        self.alive
    }

    fn target_alive(&self, target: EntityId) -> bool {
        self.world.is_alive(target) && self.world.is_enabled(target)
    }

    fn target_distance(&self, target: EntityId) -> Option<f32> {
        self.world.position_of(target).map(|p| p.distance(self.position))
    }

    fn cooldown_bonus(&self) -> f32 {
        self.world.cooldown_bonus(self.attacker)
    }

    fn strike(&mut self, target: EntityId, instance: u32, _count: u32) {
        let Some(target_position) = self.world.position_of(target) else {
            return;
        };
        let normal = direction_to(self.position, target_position);

        match &self.profile.delivery {
            Delivery::Direct => {
                let point = match self.profile.hit_point {
                    HitPoint::Attacker => self.position,
                    HitPoint::Target => target_position,
                };
                let hit = Hit {
                    source: self.attacker,
                    amount: self.profile.damage,
                    point,
                    normal,
                    instance,
                };
                let receiver = DamageReceiver::health(target);
                self.world.take_damage(receiver, &hit);
                self.bus.publish(BehaviorEvent::DamageDelivered {
                    source: self.attacker,
                    receiver,
                    amount: hit.amount,
                    instance,
                });
                self.report.struck.push(target);
            },
            Delivery::Projectile(profile) => {
                let mut offset = profile.spawn_offset;
                if self.anim.facing() == Facing::Left {
                    offset.x = -offset.x;
                }
                let origin = self.position + offset;
                let fallback = match self.anim.facing() {
                    Facing::Left => Vec2::NEG_X,
                    Facing::Right => Vec2::X,
                };
                if profile.speed <= 0.0 {
                    warn!(entity = %self.attacker, "projectile speed is zero, shot will not travel");
                }
                self.report.fired.push(FireRequest {
                    owner: self.attacker,
                    origin,
                    direction: aim(origin, target_position, fallback),
                    profile: profile.clone(),
                });
            },
        }
    }

    fn phase_changed(&mut self, phase: AttackPhase) {
        self.bus.publish(BehaviorEvent::PhaseChanged {
            entity: self.attacker,
            phase,
        });
        let anim = match phase {
            AttackPhase::Idle => AnimPhase::Idle,
            AttackPhase::WindupPending | AttackPhase::ValidatingRange => AnimPhase::Windup,
            AttackPhase::DeliveringDamage { .. } | AttackPhase::Recovering => AnimPhase::Attacking,
            AttackPhase::OnCooldown => AnimPhase::Cooldown,
        };
        self.anim.show(self.attacker, anim, &mut *self.bus);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::SummonWindow;
    use crate::testing::MockWorld;

    const STEP: f32 = 0.05;

    fn player() -> EntityId {
        EntityId::from_raw(1)
    }

    fn grunt() -> SpeciesProfile {
        SpeciesProfile {
            move_speed: 2.0,
            attack_range: 1.2,
            stop_distance: 1.5,
            windup: 0.2,
            attack_duration: 0.4,
            cooldown: 1.0,
            damage: 15.0,
            ..SpeciesProfile::default()
        }
    }

    fn tick(enemy: &mut Enemy, world: &mut MockWorld, bus: &mut EventBus, now: &mut f32) -> EnemyReport {
        *now += STEP;
        enemy.update(STEP, *now, world, bus)
    }

    #[test]
    fn test_approaches_until_stop_distance() {
        let mut world = MockWorld::with_player(player(), Vec2::new(5.0, 0.0), 100.0);
        let mut bus = EventBus::default();
        let mut enemy = Enemy::new(EntityId::from_raw(10), "grunt", grunt(), Vec2::ZERO);
        let mut now = 0.0;

        tick(&mut enemy, &mut world, &mut bus, &mut now);
        assert_eq!(enemy.velocity(), Vec2::new(2.0, 0.0));
        assert_eq!(enemy.anim_phase(), AnimPhase::Approaching);
        assert_eq!(enemy.facing(), Facing::Right);

        for _ in 0..100 {
            tick(&mut enemy, &mut world, &mut bus, &mut now);
        }
        assert!(enemy.position().distance(Vec2::new(5.0, 0.0)) <= 1.5 + 0.1);
        assert_eq!(enemy.velocity(), Vec2::ZERO);
        assert_eq!(enemy.anim_phase(), AnimPhase::Idle);
        assert!(!enemy.sequencer().is_attacking());
    }

    #[test]
    fn test_speed_multiplier_applies() {
        let mut world = MockWorld::with_player(player(), Vec2::new(-5.0, 0.0), 100.0);
        world.speed_multiplier = 0.5;
        let mut bus = EventBus::default();
        let mut enemy = Enemy::new(EntityId::from_raw(10), "grunt", grunt(), Vec2::ZERO);
        let mut now = 0.0;

        tick(&mut enemy, &mut world, &mut bus, &mut now);
        assert_eq!(enemy.velocity(), Vec2::new(-1.0, 0.0));
        assert_eq!(enemy.facing(), Facing::Left);
    }

    #[test]
    fn test_attacks_when_in_range() {
        let mut world = MockWorld::with_player(player(), Vec2::new(1.0, 0.0), 100.0);
        let mut bus = EventBus::default();
        let mut enemy = Enemy::new(EntityId::from_raw(10), "grunt", grunt(), Vec2::ZERO);
        let mut now = 0.0;

        let report = tick(&mut enemy, &mut world, &mut bus, &mut now);
        assert_eq!(report.engaged, Some(player()));
        assert!(enemy.sequencer().is_attacking());
        assert_eq!(enemy.velocity(), Vec2::ZERO);

        let mut struck_at = None;
        for step in 2..=20 {
            let report = tick(&mut enemy, &mut world, &mut bus, &mut now);
            if !report.struck.is_empty() && struck_at.is_none() {
                struck_at = Some(step);
            }
        }
        // Started on step 1, windup 0.2s = 4 steps later
        assert_eq!(struck_at, Some(5));
        assert_eq!(world.damage_to(player()), 15.0);
        assert!(enemy.sequencer().is_cooling_down());
    }

    #[test]
    fn test_hit_point_and_normal() {
        let mut world = MockWorld::with_player(player(), Vec2::new(0.0, 1.0), 100.0);
        let mut bus = EventBus::default();
        let profile = SpeciesProfile {
            hit_point: HitPoint::Attacker,
            windup: 0.0,
            ..grunt()
        };
        let mut enemy = Enemy::new(EntityId::from_raw(10), "grunt", profile, Vec2::ZERO);
        let mut now = 0.0;

        tick(&mut enemy, &mut world, &mut bus, &mut now);
        tick(&mut enemy, &mut world, &mut bus, &mut now);
        let (receiver, hit) = world.hits[0];
        assert_eq!(receiver, DamageReceiver::health(player()));
        assert_eq!(hit.point, Vec2::ZERO);
        assert_eq!(hit.normal, Vec2::Y);
    }

    #[test]
    fn test_knockback_cancels_windup() {
        let mut world = MockWorld::with_player(player(), Vec2::new(1.0, 0.0), 100.0);
        let mut bus = EventBus::default();
        let profile = SpeciesProfile {
            windup: 1.0,
            attack_duration: 1.2,
            stop_distance: 1.0,
            ..grunt()
        };
        let mut enemy = Enemy::new(EntityId::from_raw(10), "grunt", profile, Vec2::ZERO);
        let mut now = 0.0;

        tick(&mut enemy, &mut world, &mut bus, &mut now);
        let first = enemy.sequencer().token();
        for _ in 0..8 {
            tick(&mut enemy, &mut world, &mut bus, &mut now);
        }

        let velocity = enemy.apply_knockback(Vec2::new(-1.0, 0.0), 4.0, now, &mut bus);
        assert_eq!(velocity, Some(Vec2::new(-4.0, 0.0)));
        assert!(!enemy.sequencer().is_attacking());
        assert!(first.is_some_and(|t| !enemy.sequencer().tokens().is_current(t)));
        assert!(world.hits.is_empty());

        // Overlay lasts 0.25s, then the actor walks back and attacks again
        let mut second = None;
        for _ in 0..40 {
            tick(&mut enemy, &mut world, &mut bus, &mut now);
            if second.is_none() {
                second = enemy.sequencer().token();
            }
            if enemy.is_knocked_back(now) {
                assert_eq!(enemy.anim_phase(), AnimPhase::KnockedBack);
            }
        }
        assert!(second > first);
    }

    #[test]
    fn test_knockback_ignored_when_dead_or_invulnerable() {
        let mut bus = EventBus::default();
        let mut dead = Enemy::new(EntityId::from_raw(10), "grunt", grunt(), Vec2::ZERO);
        dead.die(&mut bus);
        assert!(dead.apply_knockback(Vec2::X, 1.0, 0.0, &mut bus).is_none());

        let mut summoning = Enemy::new(EntityId::from_raw(11), "flyer", grunt(), Vec2::ZERO)
            .with_hooks(HookSet::new().with(SummonWindow::new(1.0)));
        assert!(summoning.apply_knockback(Vec2::X, 1.0, 0.0, &mut bus).is_none());
    }

    #[test]
    fn test_summon_window_holds_attack() {
        let mut world = MockWorld::with_player(player(), Vec2::new(1.0, 0.0), 100.0);
        let mut bus = EventBus::default();
        let mut enemy = Enemy::new(EntityId::from_raw(10), "flyer", grunt(), Vec2::ZERO)
            .with_hooks(HookSet::new().with(SummonWindow::new(0.5)));
        let mut now = 0.0;

        for _ in 0..9 {
            tick(&mut enemy, &mut world, &mut bus, &mut now);
            assert!(!enemy.sequencer().is_attacking());
            assert_eq!(enemy.velocity(), Vec2::ZERO);
        }
        tick(&mut enemy, &mut world, &mut bus, &mut now);
        assert!(enemy.sequencer().is_attacking());
    }

    #[test]
    fn test_target_death_cancels() {
        let mut world = MockWorld::with_player(player(), Vec2::new(1.0, 0.0), 100.0);
        let mut bus = EventBus::default();
        let mut enemy = Enemy::new(EntityId::from_raw(10), "grunt", grunt(), Vec2::ZERO);
        let mut now = 0.0;

        tick(&mut enemy, &mut world, &mut bus, &mut now);
        assert_eq!(enemy.attack_target(), Some(player()));

        enemy.on_target_died(player(), &mut bus);
        assert_eq!(enemy.attack_target(), None);
        assert!(bus.drain().contains(&BehaviorEvent::SequenceCancelled {
            entity: enemy.id(),
            cause: CancelCause::TargetDied,
        }));
    }

    #[test]
    fn test_frozen_stops_attack_timers() {
        let mut world = MockWorld::with_player(player(), Vec2::new(1.0, 0.0), 100.0);
        let mut bus = EventBus::default();
        let profile = SpeciesProfile {
            freezable: true,
            ..grunt()
        };
        let id = EntityId::from_raw(10);
        let mut enemy = Enemy::new(id, "caster", profile, Vec2::ZERO);
        let mut now = 0.0;

        tick(&mut enemy, &mut world, &mut bus, &mut now);
        world.frozen.insert(id);
        for _ in 0..40 {
            tick(&mut enemy, &mut world, &mut bus, &mut now);
        }
        assert!(world.hits.is_empty());
        assert_eq!(enemy.sequencer().phase(), AttackPhase::WindupPending);

        // Knockback still cancels a frozen sequence
        enemy.apply_knockback(Vec2::X, 1.0, now, &mut bus);
        assert!(!enemy.sequencer().is_attacking());
    }

    #[test]
    fn test_frozen_cooldown_still_elapses() {
        let mut world = MockWorld::with_player(player(), Vec2::new(1.0, 0.0), 100.0);
        let mut bus = EventBus::default();
        let profile = SpeciesProfile {
            freezable: true,
            ..grunt()
        };
        let id = EntityId::from_raw(10);
        let mut enemy = Enemy::new(id, "caster", profile, Vec2::ZERO);
        let mut now = 0.0;

        while !enemy.sequencer().is_cooling_down() {
            tick(&mut enemy, &mut world, &mut bus, &mut now);
            assert!(now < 5.0);
        }
        assert_eq!(world.hits.len(), 1);
        bus.drain();

        world.frozen.insert(id);
        for _ in 0..25 {
            tick(&mut enemy, &mut world, &mut bus, &mut now);
        }
        assert!(bus.drain().contains(&BehaviorEvent::SequenceCompleted {
            entity: id,
            delivered: 1,
        }));
        // The next windup is held by the freeze
        assert_eq!(world.hits.len(), 1);
        assert_eq!(enemy.sequencer().phase(), AttackPhase::WindupPending);
    }

    #[test]
    fn test_dead_target_is_not_chased() {
        let mut world = MockWorld::with_player(player(), Vec2::new(1.0, 0.0), 100.0);
        let mut bus = EventBus::default();
        let mut enemy = Enemy::new(EntityId::from_raw(10), "grunt", grunt(), Vec2::ZERO);
        let mut now = 0.0;

        tick(&mut enemy, &mut world, &mut bus, &mut now);
        assert!(enemy.sequencer().is_attacking());

        world.set_health(player(), 0.0);
        enemy.on_target_died(player(), &mut bus);
        // The corpse stays locatable and out of reach
        world.move_entity(player(), Vec2::new(4.0, 0.0));
        for _ in 0..20 {
            tick(&mut enemy, &mut world, &mut bus, &mut now);
        }
        assert_eq!(enemy.position(), Vec2::ZERO);
        assert_eq!(enemy.velocity(), Vec2::ZERO);
        assert_eq!(enemy.anim_phase(), AnimPhase::Idle);
        assert!(!enemy.sequencer().is_attacking());
    }

    #[test]
    fn test_disabled_target_is_not_chased() {
        let mut world = MockWorld::with_player(player(), Vec2::new(4.0, 0.0), 100.0);
        world.disabled.insert(player());
        let mut bus = EventBus::default();
        let mut enemy = Enemy::new(EntityId::from_raw(10), "grunt", grunt(), Vec2::ZERO);
        let mut now = 0.0;

        for _ in 0..10 {
            tick(&mut enemy, &mut world, &mut bus, &mut now);
        }
        assert_eq!(enemy.position(), Vec2::ZERO);
        assert_eq!(enemy.anim_phase(), AnimPhase::Idle);

        world.disabled.remove(&player());
        tick(&mut enemy, &mut world, &mut bus, &mut now);
        assert_eq!(enemy.anim_phase(), AnimPhase::Approaching);
    }

    #[test]
    fn test_projectile_delivery_requests_fire() {
        let mut world = MockWorld::with_player(player(), Vec2::new(-4.0, 0.0), 100.0);
        let mut bus = EventBus::default();
        let mut profile = SpeciesProfile::archer();
        profile.windup = 0.0;
        let mut enemy = Enemy::new(EntityId::from_raw(10), "archer", profile, Vec2::ZERO);
        let mut now = 0.0;

        tick(&mut enemy, &mut world, &mut bus, &mut now);
        let report = tick(&mut enemy, &mut world, &mut bus, &mut now);
        assert_eq!(report.fired.len(), 1);
        let shot = &report.fired[0];
        assert_eq!(shot.owner, enemy.id());
        // Spawn offset mirrored when facing left
        assert!((shot.origin.x + 0.4).abs() < 1e-5);
        assert!(shot.direction.x < 0.0);
        assert!(world.hits.is_empty());
    }

    #[test]
    fn test_death_is_idempotent_and_removes_once() {
        let mut world = MockWorld::with_player(player(), Vec2::new(1.0, 0.0), 100.0);
        let mut bus = EventBus::default();
        let mut enemy = Enemy::new(EntityId::from_raw(10), "grunt", grunt(), Vec2::ZERO).with_removal_delay(0.1);
        let mut now = 0.0;

        tick(&mut enemy, &mut world, &mut bus, &mut now);
        assert!(enemy.die(&mut bus));
        assert!(!enemy.die(&mut bus));

        let died = bus
            .drain()
            .iter()
            .filter(|e| matches!(e, BehaviorEvent::EnemyDied { .. }))
            .count();
        assert_eq!(died, 1);

        let mut removals = 0;
        for _ in 0..10 {
            if tick(&mut enemy, &mut world, &mut bus, &mut now).removed {
                removals += 1;
            }
            assert!(!enemy.die(&mut bus));
        }
        assert_eq!(removals, 1);
        assert!(world.hits.is_empty());
        assert_eq!(enemy.anim_phase(), AnimPhase::Dead);
    }
}
