//! Damage contracts.
//!
//! Health lives outside this crate. The core only needs to know whether
//! something is alive, how to hand it a hit, and how to find the thing that
//! should take the hit when a projectile touches a collider.

use grimhold_common::{ColliderId, EntityId, Vec2};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Guard against cyclic collider hierarchies.
pub const MAX_ANCESTRY_DEPTH: usize = 16;

/// One discrete damage application.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    /// Actor responsible for the damage
    pub source: EntityId,
    /// Damage amount
    pub amount: f32,
    /// World point of impact
    pub point: Vec2,
    /// Unit normal from attacker towards target (zero if coincident)
    pub normal: Vec2,
    /// Instance index within the attack or contact
    pub instance: u32,
}

/// Which capability a receiver was resolved through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReceiverKind {
    /// A dedicated hitbox volume.
    Hitbox,
    /// A concrete health component on the collider or an ancestor.
    Health,
    /// Anything else that accepts damage.
    Generic,
}

/// A resolved damage receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DamageReceiver {
    /// Capability the receiver was found through
    pub kind: ReceiverKind,
    /// Entity that owns the health behind it
    pub owner: EntityId,
}

impl DamageReceiver {
    /// Receiver for an entity's own health (melee targets).
    #[must_use]
    pub const fn health(owner: EntityId) -> Self {
        Self {
            kind: ReceiverKind::Health,
            owner,
        }
    }
}

/// Health/damageable capability provided by the host.
pub trait DamageRegistry {
    /// Whether the entity is alive.
    fn is_alive(&self, id: EntityId) -> bool;

    /// Whether the entity can currently be targeted (alive and enabled).
    fn is_enabled(&self, id: EntityId) -> bool {
        self.is_alive(id)
    }

    /// Deliver one hit.
    fn take_damage(&mut self, receiver: DamageReceiver, hit: &Hit);

    /// Owner of a dedicated hitbox volume.
    fn hitbox_owner(&self, _collider: ColliderId) -> Option<EntityId> {
        None
    }

    /// Owner of a health component sitting directly on `collider`.
    fn health_on(&self, _collider: ColliderId) -> Option<EntityId> {
        None
    }

    /// Parent collider in the host hierarchy.
    fn collider_parent(&self, _collider: ColliderId) -> Option<ColliderId> {
        None
    }

    /// Owner of any other damage-accepting capability.
    fn damageable_owner(&self, _collider: ColliderId) -> Option<EntityId> {
        None
    }
}

/// Resolve the receiver behind `collider`.
///
/// Lookup order: hitbox, then health on the collider or its ancestors, then
/// the generic capability. Returns `None` (and logs) if nothing accepts
/// damage.
pub fn resolve_receiver<R>(registry: &R, collider: ColliderId) -> Option<DamageReceiver>
where
    R: DamageRegistry + ?Sized,
{
    if let Some(owner) = registry.hitbox_owner(collider) {
        return Some(DamageReceiver {
            kind: ReceiverKind::Hitbox,
            owner,
        });
    }

    let mut current = Some(collider);
    for _ in 0..MAX_ANCESTRY_DEPTH {
        let Some(c) = current else { break };
        if let Some(owner) = registry.health_on(c) {
            return Some(DamageReceiver::health(owner));
        }
        current = registry.collider_parent(c);
    }

    if let Some(owner) = registry.damageable_owner(collider) {
        return Some(DamageReceiver {
            kind: ReceiverKind::Generic,
            owner,
        });
    }

    warn!(collider = collider.raw(), "no damage receiver on collider");
    None
}
