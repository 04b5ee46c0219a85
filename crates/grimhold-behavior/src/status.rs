//! Status and modifier queries.

use grimhold_common::EntityId;

/// Status effects that bend an actor's timings, provided by the host.
///
/// Every method has a neutral default so hosts without a status system can
/// implement the trait with an empty block.
pub trait StatusProvider {
    /// Multiplier applied to move speed (slows, hastes).
    fn move_speed_multiplier(&self, _id: EntityId) -> f32 {
        1.0
    }

    /// Additive cooldown adjustment in seconds. May be negative; the
    /// resulting cooldown is clamped at zero.
    fn cooldown_bonus(&self, _id: EntityId) -> f32 {
        0.0
    }

    /// Whether the actor is frozen. Only species whose attacks honor the
    /// frozen status stop their attack timers.
    fn is_frozen(&self, _id: EntityId) -> bool {
        false
    }
}

/// Cooldown after applying an additive bonus, never negative.
#[must_use]
pub fn adjusted_cooldown(base: f32, bonus: f32) -> f32 {
    (base.max(0.0) + bonus).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjusted_cooldown() {
        assert_eq!(adjusted_cooldown(1.0, 0.5), 1.5);
        assert_eq!(adjusted_cooldown(1.0, -0.25), 0.75);
        assert_eq!(adjusted_cooldown(1.0, -5.0), 0.0);
        assert_eq!(adjusted_cooldown(-1.0, 0.0), 0.0);
    }
}
