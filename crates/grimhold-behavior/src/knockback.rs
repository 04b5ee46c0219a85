//! Knockback overlay.
//!
//! A short forced-velocity window. While it is active the owning actor
//! ignores its normal seek/attack logic and moves with the overlay
//! velocity; once simulated time passes the expiry, normal logic resumes
//! without any further bookkeeping.

use grimhold_common::Vec2;
use serde::{Deserialize, Serialize};

/// Per-species knockback response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnockbackParams {
    /// Scale applied to the incoming force
    pub intensity: f32,
    /// Seconds the overlay stays active
    pub duration: f32,
}

impl Default for KnockbackParams {
    fn default() -> Self {
        Self {
            intensity: 1.0,
            duration: 0.25,
        }
    }
}

impl KnockbackParams {
    /// Create params; negative values clamp to zero.
    #[must_use]
    pub fn new(intensity: f32, duration: f32) -> Self {
        Self {
            intensity: intensity.max(0.0),
            duration: duration.max(0.0),
        }
    }

    /// Overlay velocity for a push along `direction` with `force`.
    #[must_use]
    pub fn velocity(&self, direction: Vec2, force: f32) -> Vec2 {
        direction.normalize_or_zero() * force * self.intensity
    }
}

/// Active knockback state of one actor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct KnockbackOverlay {
    velocity: Vec2,
    until: f32,
    engaged: bool,
}

impl KnockbackOverlay {
    /// Engage the overlay at simulated time `now`. A new push replaces any
    /// overlay still running. Returns the overlay velocity.
    pub fn engage(&mut self, params: &KnockbackParams, direction: Vec2, force: f32, now: f32) -> Vec2 {
        self.velocity = params.velocity(direction, force);
        self.until = now + params.duration;
        self.engaged = true;
        self.velocity
    }

    /// Overlay velocity if the overlay is active at `now`.
    #[must_use]
    pub fn velocity_at(&self, now: f32) -> Option<Vec2> {
        self.is_active(now).then_some(self.velocity)
    }

    /// Whether the overlay overrides movement at `now`.
    #[must_use]
    pub fn is_active(&self, now: f32) -> bool {
        self.engaged && now < self.until
    }

    /// Expiry time of the last push.
    #[must_use]
    pub fn until(&self) -> f32 {
        self.until
    }

    /// Drop the overlay (death).
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_velocity_normalized_and_scaled() {
        let params = KnockbackParams::new(0.5, 0.3);
        let v = params.velocity(Vec2::new(3.0, 4.0), 10.0);
        assert!((v - Vec2::new(3.0, 4.0)).length() < 1e-5);
    }

    #[test]
    fn test_zero_direction_gives_zero_velocity() {
        let params = KnockbackParams::default();
        assert_eq!(params.velocity(Vec2::ZERO, 10.0), Vec2::ZERO);
    }

    #[test]
    fn test_overlay_expires() {
        let params = KnockbackParams::new(1.0, 0.25);
        let mut overlay = KnockbackOverlay::default();
        assert!(!overlay.is_active(0.0));

        overlay.engage(&params, Vec2::X, 4.0, 1.0);
        assert_eq!(overlay.velocity_at(1.1), Some(Vec2::new(4.0, 0.0)));
        assert!(overlay.is_active(1.24));
        assert!(!overlay.is_active(1.25));
        assert_eq!(overlay.velocity_at(2.0), None);
    }

    #[test]
    fn test_new_push_replaces_old() {
        let params = KnockbackParams::new(1.0, 0.5);
        let mut overlay = KnockbackOverlay::default();
        overlay.engage(&params, Vec2::X, 1.0, 0.0);
        overlay.engage(&params, Vec2::NEG_Y, 2.0, 0.4);
        assert_eq!(overlay.velocity_at(0.5), Some(Vec2::new(0.0, -2.0)));
        assert!((overlay.until() - 0.9).abs() < 1e-6);

        overlay.clear();
        assert!(!overlay.is_active(0.5));
    }
}
