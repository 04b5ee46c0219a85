//! Terminal state shared by actors and projectiles.
//!
//! The finalizer is the single "already dead/destroying" flag. The first
//! call wins; every later call is a no-op that reports `false`, so callers
//! can run their teardown (cancel tokens, stop timers, freeze motion,
//! disable collision) only when `finalize` returns `true`.

use serde::{Deserialize, Serialize};

use crate::clock::Suspension;

/// Upper bound on any deferred removal delay.
pub const MAX_REMOVAL_DELAY: f32 = 2.0;

/// Lifecycle of an actor or projectile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum DeathState {
    /// Live and interactive.
    #[default]
    Alive,
    /// Terminal; waiting for deferred removal.
    Dying {
        /// Countdown to removal
        removal: Suspension,
    },
    /// Removal happened.
    Removed,
}

/// Idempotent terminal transition with deferred removal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DeathFinalizer {
    state: DeathState,
}

impl DeathFinalizer {
    /// Create a live finalizer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> DeathState {
        self.state
    }

    /// Whether no terminal transition happened yet.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        matches!(self.state, DeathState::Alive)
    }

    /// Whether the entity is terminal (dying or removed).
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !self.is_alive()
    }

    /// Whether removal already happened.
    #[must_use]
    pub fn is_removed(&self) -> bool {
        matches!(self.state, DeathState::Removed)
    }

    /// Enter the terminal state, scheduling removal after `removal_delay`
    /// seconds (clamped to `0..=MAX_REMOVAL_DELAY`). Returns `true` only for
    /// the call that performed the transition.
    pub fn finalize(&mut self, removal_delay: f32) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.state = DeathState::Dying {
            removal: Suspension::new(removal_delay.clamp(0.0, MAX_REMOVAL_DELAY)),
        };
        true
    }

    /// Advance the removal countdown. Returns `true` exactly once, on the
    /// step removal becomes due.
    pub fn tick(&mut self, dt: f32) -> bool {
        let DeathState::Dying { removal } = &mut self.state else {
            return false;
        };
        if removal.advance(dt).is_some() {
            self.state = DeathState::Removed;
            return true;
        }
        false
    }
}
