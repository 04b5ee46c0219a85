//! Animation presentation signals.
//!
//! The behavior core tells presentation which phase an actor is in and
//! which way it faces. Presentation never feeds anything back.

use grimhold_common::{EntityId, Facing};
use serde::{Deserialize, Serialize};

/// Discrete presentation phase of an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AnimPhase {
    /// Standing still.
    #[default]
    Idle,
    /// Moving towards the target.
    Approaching,
    /// Telegraphing an attack.
    Windup,
    /// Damage-capable part of the attack.
    Attacking,
    /// Recovered and waiting out the cooldown.
    Cooldown,
    /// Pushed back by a knockback overlay.
    KnockedBack,
    /// Terminal.
    Dead,
}

/// A phase plus the facing it should be shown with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimSignal {
    /// Phase to show.
    pub phase: AnimPhase,
    /// Left/right variant.
    pub facing: Facing,
}

/// Sink for presentation signals.
pub trait AnimationSink {
    /// Receive a signal for `entity`.
    fn signal(&mut self, entity: EntityId, signal: AnimSignal);
}

/// Remembers the last signal sent for one actor so that each transition is
/// emitted exactly once.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnimTracker {
    last: Option<AnimSignal>,
    facing: Facing,
}

impl AnimTracker {
    /// Last phase emitted (Idle before anything was sent).
    #[must_use]
    pub fn phase(&self) -> AnimPhase {
        self.last.map_or(AnimPhase::Idle, |s| s.phase)
    }

    /// Current facing.
    #[must_use]
    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Update the facing; takes effect with the next emitted phase.
    pub fn face(&mut self, facing: Facing) {
        self.facing = facing;
    }

    /// Emit `phase` if it differs from what was last shown. Returns whether a
    /// signal was sent.
    pub fn show(&mut self, entity: EntityId, phase: AnimPhase, sink: &mut dyn AnimationSink) -> bool {
        let signal = AnimSignal {
            phase,
            facing: self.facing,
        };
        if self.last == Some(signal) {
            return false;
        }
        // Dead is terminal for presentation too
        if self.phase() == AnimPhase::Dead {
            return false;
        }
        self.last = Some(signal);
        sink.signal(entity, signal);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<AnimSignal>);

    impl AnimationSink for Recorder {
        fn signal(&mut self, _entity: EntityId, signal: AnimSignal) {
            self.0.push(signal);
        }
    }

    #[test]
    fn test_tracker_emits_on_change_only() {
        let mut tracker = AnimTracker::default();
        let mut sink = Recorder::default();
        let id = EntityId::from_raw(1);

        assert!(tracker.show(id, AnimPhase::Windup, &mut sink));
        assert!(!tracker.show(id, AnimPhase::Windup, &mut sink));
        assert!(tracker.show(id, AnimPhase::Attacking, &mut sink));
        assert_eq!(sink.0.len(), 2);
    }

    #[test]
    fn test_facing_change_reemits() {
        let mut tracker = AnimTracker::default();
        let mut sink = Recorder::default();
        let id = EntityId::from_raw(1);

        tracker.show(id, AnimPhase::Approaching, &mut sink);
        tracker.face(Facing::Left);
        assert!(tracker.show(id, AnimPhase::Approaching, &mut sink));
        assert_eq!(sink.0[1].facing, Facing::Left);
    }

    #[test]
    fn test_dead_is_terminal() {
        let mut tracker = AnimTracker::default();
        let mut sink = Recorder::default();
        let id = EntityId::from_raw(1);

        tracker.show(id, AnimPhase::Dead, &mut sink);
        assert!(!tracker.show(id, AnimPhase::Idle, &mut sink));
        assert_eq!(tracker.phase(), AnimPhase::Dead);
        assert_eq!(sink.0.len(), 1);
    }
}
