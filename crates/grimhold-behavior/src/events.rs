//! Event bus carrying behavior notifications to the host.

use crossbeam_channel::{bounded, Receiver, Sender};
use grimhold_common::{EntityId, Vec2};
use serde::{Deserialize, Serialize};

use crate::damage::DamageReceiver;
use crate::presentation::{AnimSignal, AnimationSink};
use crate::projectile::DestroyReason;
use crate::sequencer::{AbortReason, AttackPhase, CancelCause};
use crate::spawn::SpawnHandle;
use crate::token::ActionToken;

/// Default bus capacity.
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// Notifications published by the arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BehaviorEvent {
    /// An attack sequence took ownership of the actor
    SequenceStarted {
        /// Attacker
        entity: EntityId,
        /// Token captured by the sequence
        token: ActionToken,
        /// Target at start
        target: EntityId,
    },
    /// The sequence moved to a new phase
    PhaseChanged {
        /// Attacker
        entity: EntityId,
        /// New phase
        phase: AttackPhase,
    },
    /// A checkpoint failed and the sequence backed out
    SequenceAborted {
        /// Attacker
        entity: EntityId,
        /// Why the checkpoint failed
        reason: AbortReason,
        /// Damage instances delivered before the abort
        delivered: u32,
    },
    /// The sequence was cancelled out-of-band
    SequenceCancelled {
        /// Attacker
        entity: EntityId,
        /// What cancelled it
        cause: CancelCause,
    },
    /// Cooldown finished and the actor is free to attack again
    SequenceCompleted {
        /// Attacker
        entity: EntityId,
        /// Damage instances delivered by the finished run
        delivered: u32,
    },
    /// One damage instance was delivered
    DamageDelivered {
        /// Source actor (projectile owner for projectile hits)
        source: EntityId,
        /// Receiver that took the damage
        receiver: DamageReceiver,
        /// Damage amount
        amount: f32,
        /// Instance index within the sequence or projectile contact
        instance: u32,
    },
    /// Knockback overlay engaged
    KnockbackApplied {
        /// Actor pushed
        entity: EntityId,
        /// Overlay velocity
        velocity: Vec2,
        /// Pause-safe expiry time
        until: f32,
    },
    /// Actor entered its terminal state
    EnemyDied {
        /// Actor
        entity: EntityId,
    },
    /// Actor removed after its death delay
    EnemyRemoved {
        /// Actor
        entity: EntityId,
    },
    /// Projectile fired
    ProjectileSpawned {
        /// Projectile
        projectile: EntityId,
        /// Owner actor
        owner: EntityId,
        /// Presentation handle
        handle: SpawnHandle,
    },
    /// Projectile started its destruction
    ProjectileDestroyed {
        /// Projectile
        projectile: EntityId,
        /// Why
        reason: DestroyReason,
    },
    /// Projectile removed after its cleanup delay
    ProjectileRemoved {
        /// Projectile
        projectile: EntityId,
    },
    /// A transient effect was instantiated
    EffectSpawned {
        /// Presentation handle
        handle: SpawnHandle,
        /// World position
        position: Vec2,
    },
    /// Presentation signal
    Animation {
        /// Actor
        entity: EntityId,
        /// Signal
        signal: AnimSignal,
    },
}

/// Event bus for broadcasting behavior events to the host.
#[derive(Debug)]
pub struct EventBus {
    /// Sender for broadcasting events
    sender: Sender<BehaviorEvent>,
    /// Receiver for collecting events
    receiver: Receiver<BehaviorEvent>,
    /// Channel capacity
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

impl EventBus {
    /// Creates a new event bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity.max(1));
        Self {
            sender,
            receiver,
            capacity: capacity.max(1),
        }
    }

    /// Publishes an event to the bus.
    pub fn publish(&self, event: BehaviorEvent) {
        // Non-blocking send - if full, event is dropped
        let _ = self.sender.try_send(event);
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<BehaviorEvent> {
        self.receiver.try_iter().collect()
    }

    /// Returns the number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Returns the channel capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Creates a new sender handle for publishing events.
    #[must_use]
    pub fn sender(&self) -> Sender<BehaviorEvent> {
        self.sender.clone()
    }
}

impl AnimationSink for EventBus {
    fn signal(&mut self, entity: EntityId, signal: AnimSignal) {
        self.publish(BehaviorEvent::Animation { entity, signal });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_and_drain() {
        let bus = EventBus::new(4);
        let entity = EntityId::from_raw(3);
        bus.publish(BehaviorEvent::EnemyDied { entity });
        bus.publish(BehaviorEvent::EnemyRemoved { entity });
        assert_eq!(bus.pending_count(), 2);

        let events = bus.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(bus.pending_count(), 0);
    }

    #[test]
    fn test_full_bus_drops() {
        let bus = EventBus::new(1);
        let entity = EntityId::from_raw(3);
        bus.publish(BehaviorEvent::EnemyDied { entity });
        bus.publish(BehaviorEvent::EnemyRemoved { entity });
        assert_eq!(bus.drain(), vec![BehaviorEvent::EnemyDied { entity }]);
    }

    #[test]
    fn test_sender_handle_publishes() {
        let bus = EventBus::default();
        let entity = EntityId::from_raw(9);
        let sender = bus.sender();
        let _ = sender.try_send(BehaviorEvent::EnemyDied { entity });
        assert_eq!(bus.pending_count(), 1);
    }
}
