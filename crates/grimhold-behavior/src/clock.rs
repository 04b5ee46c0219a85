//! Pause-safe simulated time.
//!
//! This module provides:
//! - Pause reasons stacked by the host (menus, focus loss, loading)
//! - The arena clock, which only advances while unpaused
//! - A fixed-step accumulator for the physics phase
//! - Suspensions: countdowns that elapse only by the time they are fed

use serde::{Deserialize, Serialize};

/// Remaining time at or below this counts as elapsed (absorbs f32 drift
/// from summing many fixed steps).
pub const TIME_EPSILON: f32 = 1e-5;

// ============================================================================
// Pause Reasons
// ============================================================================

/// Why the simulation was paused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PauseReason {
    /// Paused by player (escape menu).
    PlayerPaused,
    /// Paused by inventory/menu.
    MenuOpen,
    /// Paused due to window losing focus.
    FocusLost,
    /// Paused during cutscene.
    Cutscene,
    /// Paused during loading.
    Loading,
    /// Paused by system.
    System,
}

impl PauseReason {
    /// Check if world should freeze.
    #[must_use]
    pub const fn should_freeze_world(&self) -> bool {
        match self {
            Self::Cutscene => false, // Cutscenes may script enemies
            Self::PlayerPaused
            | Self::MenuOpen
            | Self::FocusLost
            | Self::Loading
            | Self::System => true,
        }
    }
}

// ============================================================================
// Simulation Clock
// ============================================================================

/// Pause-aware simulation clock.
///
/// `now` only moves while no freezing pause reason is on the stack, which is
/// what makes every timer built on top of it pause-safe.
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    /// Simulated seconds since the arena started.
    now: f32,
    /// Stack of pause reasons (for nested pauses).
    pause_stack: Vec<PauseReason>,
    /// Wall time fed to the clock while it was paused.
    total_paused_time: f32,
}

impl SimClock {
    /// Create a running clock at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulated time in seconds.
    #[must_use]
    pub fn now(&self) -> f32 {
        self.now
    }

    /// Push a pause reason.
    pub fn pause(&mut self, reason: PauseReason) {
        self.pause_stack.push(reason);
    }

    /// Pop the most recent occurrence of `reason`. Returns false if it was
    /// not on the stack.
    pub fn resume(&mut self, reason: PauseReason) -> bool {
        match self.pause_stack.iter().rposition(|r| *r == reason) {
            Some(idx) => {
                self.pause_stack.remove(idx);
                true
            },
            None => false,
        }
    }

    /// Clear every pause reason.
    pub fn resume_all(&mut self) {
        self.pause_stack.clear();
    }

    /// Whether simulated time is frozen.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.pause_stack.iter().any(PauseReason::should_freeze_world)
    }

    /// Feed wall time to the clock. Returns the simulated time that actually
    /// elapsed (zero while paused).
    pub fn advance(&mut self, dt: f32) -> f32 {
        let dt = dt.max(0.0);
        if self.is_paused() {
            self.total_paused_time += dt;
            0.0
        } else {
            self.now += dt;
            dt
        }
    }

    /// Total wall time swallowed by pauses.
    #[must_use]
    pub fn total_paused_time(&self) -> f32 {
        self.total_paused_time
    }
}

// ============================================================================
// Fixed Step
// ============================================================================

/// Converts variable frame deltas into fixed physics steps.
#[derive(Debug, Clone)]
pub struct FixedStep {
    /// Fixed timestep delta
    fixed_dt: f32,
    /// Upper bound on steps per frame
    max_steps: u32,
    /// Unconsumed frame time
    accumulator: f32,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(1.0 / 60.0, 10)
    }
}

impl FixedStep {
    /// Create an accumulator. `fixed_dt` is floored at 1ms.
    #[must_use]
    pub fn new(fixed_dt: f32, max_steps: u32) -> Self {
        Self {
            fixed_dt: fixed_dt.max(0.001),
            max_steps: max_steps.max(1),
            accumulator: 0.0,
        }
    }

    /// Fixed timestep value.
    #[must_use]
    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    /// Accumulate frame time. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.max(0.0);
        let mut count = 0;

        while self.accumulator + TIME_EPSILON >= self.fixed_dt && count < self.max_steps {
            self.accumulator = (self.accumulator - self.fixed_dt).max(0.0);
            count += 1;
        }

        // Still behind after the cap: drop the backlog rather than spiral
        if self.accumulator > self.fixed_dt * 2.0 {
            self.accumulator = 0.0;
        }

        count
    }
}

// ============================================================================
// Suspension
// ============================================================================

/// A countdown of simulated seconds.
///
/// Suspensions never read a global clock. They only progress by the time the
/// owner feeds them, so an owner that stops feeding (pause, frozen status)
/// stops the countdown exactly where it was.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Suspension {
    remaining: f32,
}

impl Suspension {
    /// Create a suspension; negative and NaN durations clamp to zero.
    #[must_use]
    pub fn new(seconds: f32) -> Self {
        Self {
            remaining: seconds.max(0.0),
        }
    }

    /// A suspension that elapses on the next advance.
    #[must_use]
    pub const fn immediate() -> Self {
        Self { remaining: 0.0 }
    }

    /// Feed `dt` seconds. Returns `Some(overflow)` once elapsed, where
    /// `overflow` is the part of `dt` left over past the deadline.
    pub fn advance(&mut self, dt: f32) -> Option<f32> {
        if dt > 0.0 {
            self.remaining -= dt;
        }
        if self.remaining <= TIME_EPSILON {
            let overflow = (-self.remaining).max(0.0);
            self.remaining = 0.0;
            Some(overflow)
        } else {
            None
        }
    }

    /// Seconds left before the suspension elapses.
    #[must_use]
    pub fn remaining(&self) -> f32 {
        self.remaining.max(0.0)
    }

    /// Whether the deadline has passed.
    #[must_use]
    pub fn is_elapsed(&self) -> bool {
        self.remaining <= TIME_EPSILON
    }
}
