//! Planar math helpers for the 2D arena.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

/// Lengths below this are treated as zero when normalizing.
pub const DIRECTION_EPSILON: f32 = 0.0001;

/// Horizontal facing of a sprite-based actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Facing {
    /// Facing towards negative X.
    Left,
    /// Facing towards positive X.
    #[default]
    Right,
}

impl Facing {
    /// Facing implied by a horizontal delta; `None` when the delta is too small
    /// to flip the sprite.
    #[must_use]
    pub fn from_dx(dx: f32) -> Option<Self> {
        if dx > DIRECTION_EPSILON {
            Some(Self::Right)
        } else if dx < -DIRECTION_EPSILON {
            Some(Self::Left)
        } else {
            None
        }
    }
}

/// Normalized direction from `from` to `to`, or zero when the points coincide.
#[must_use]
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    let delta = to - from;
    if delta.length() < DIRECTION_EPSILON {
        Vec2::ZERO
    } else {
        delta.normalize()
    }
}

/// Heading angle (radians) of a direction vector.
#[must_use]
pub fn heading_of(direction: Vec2) -> f32 {
    direction.y.atan2(direction.x)
}

/// Wraps an angle into `(-PI, PI]`.
#[must_use]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Rotates `current` towards `target` by at most `max_delta` radians,
/// always taking the short way round.
#[must_use]
pub fn rotate_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let diff = wrap_angle(target - current);
    let step = max_delta.max(0.0);
    if diff.abs() <= step {
        target
    } else {
        wrap_angle(current + step * diff.signum())
    }
}
