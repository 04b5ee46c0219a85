//! Species strategy hooks.
//!
//! Species differences that are not plain numbers (walk/pause gaits,
//! invulnerable summon windows) plug into the shared actor update at fixed
//! extension points instead of forking the update itself.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::clock::Suspension;

/// Whether the actor may move towards its target this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApproachDecision {
    /// Move normally.
    Proceed,
    /// Stand still this tick.
    Hold,
}

/// Extension points invoked by the actor update.
pub trait BehaviorHooks: fmt::Debug + Send {
    /// Advance hook-owned timers by simulated time.
    fn tick(&mut self, _dt: f32) {}

    /// Before approach movement is computed.
    fn pre_approach(&mut self) -> ApproachDecision {
        ApproachDecision::Proceed
    }

    /// Before a new attack sequence starts. `false` vetoes the attack.
    fn pre_windup(&mut self) -> bool {
        true
    }

    /// After a sequence finishes its cooldown.
    fn post_cooldown(&mut self) {}

    /// Whether knockback (and damage-side effects the host checks) should
    /// be ignored.
    fn is_invulnerable(&self) -> bool {
        false
    }
}

// ============================================================================
// Walk/Pause Cycle
// ============================================================================

/// Alternates walking and standing windows. Movement is held while paused;
/// attacks are unaffected.
#[derive(Debug, Clone)]
pub struct WalkPauseCycle {
    walk: f32,
    pause: f32,
    walking: bool,
    timer: Suspension,
}

impl WalkPauseCycle {
    /// Start in the walking window.
    #[must_use]
    pub fn new(walk: f32, pause: f32) -> Self {
        let walk = walk.max(0.0);
        Self {
            walk,
            pause: pause.max(0.0),
            walking: true,
            timer: Suspension::new(walk),
        }
    }

    /// Whether the current window is a walking one.
    #[must_use]
    pub fn is_walking(&self) -> bool {
        self.walking
    }
}

impl BehaviorHooks for WalkPauseCycle {
    fn tick(&mut self, dt: f32) {
        let mut budget = dt;
        // A zero-length cycle would never yield
        if self.walk + self.pause <= 0.0 {
            return;
        }
        while let Some(overflow) = self.timer.advance(budget) {
            self.walking = !self.walking;
            self.timer = Suspension::new(if self.walking { self.walk } else { self.pause });
            budget = overflow;
            if overflow <= 0.0 {
                break;
            }
        }
    }

    fn pre_approach(&mut self) -> ApproachDecision {
        if self.walking {
            ApproachDecision::Proceed
        } else {
            ApproachDecision::Hold
        }
    }
}

// ============================================================================
// Summon Window
// ============================================================================

/// Pre-combat window after spawn: invulnerable, stationary, not attacking.
#[derive(Debug, Clone)]
pub struct SummonWindow {
    remaining: Suspension,
}

impl SummonWindow {
    /// Window lasting `duration` seconds.
    #[must_use]
    pub fn new(duration: f32) -> Self {
        Self {
            remaining: Suspension::new(duration),
        }
    }

    /// Whether the window is still open.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.remaining.is_elapsed()
    }
}

impl BehaviorHooks for SummonWindow {
    fn tick(&mut self, dt: f32) {
        let _ = self.remaining.advance(dt);
    }

    fn pre_approach(&mut self) -> ApproachDecision {
        if self.is_active() {
            ApproachDecision::Hold
        } else {
            ApproachDecision::Proceed
        }
    }

    fn pre_windup(&mut self) -> bool {
        !self.is_active()
    }

    fn is_invulnerable(&self) -> bool {
        self.is_active()
    }
}

// ============================================================================
// Hook Set
// ============================================================================

/// Every hook attached to one actor, consulted in order.
#[derive(Debug, Default)]
pub struct HookSet {
    hooks: Vec<Box<dyn BehaviorHooks>>,
}

impl HookSet {
    /// Empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a hook.
    #[must_use]
    pub fn with(mut self, hook: impl BehaviorHooks + 'static) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    /// Add a boxed hook.
    pub fn push(&mut self, hook: Box<dyn BehaviorHooks>) {
        self.hooks.push(hook);
    }

    /// Number of hooks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Whether no hook is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl BehaviorHooks for HookSet {
    fn tick(&mut self, dt: f32) {
        for hook in &mut self.hooks {
            hook.tick(dt);
        }
    }

    fn pre_approach(&mut self) -> ApproachDecision {
        let mut decision = ApproachDecision::Proceed;
        for hook in &mut self.hooks {
            if hook.pre_approach() == ApproachDecision::Hold {
                decision = ApproachDecision::Hold;
            }
        }
        decision
    }

    fn pre_windup(&mut self) -> bool {
        self.hooks.iter_mut().fold(true, |ok, hook| hook.pre_windup() && ok)
    }

    fn post_cooldown(&mut self) {
        for hook in &mut self.hooks {
            hook.post_cooldown();
        }
    }

    fn is_invulnerable(&self) -> bool {
        self.hooks.iter().any(|h| h.is_invulnerable())
    }
}

// ============================================================================
// Hook Configuration
// ============================================================================

/// Walk/pause gait settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WalkPauseSettings {
    /// Seconds spent walking per cycle
    pub walk: f32,
    /// Seconds spent standing per cycle
    pub pause: f32,
}

/// Summon window settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummonWindowSettings {
    /// Seconds after spawn before the actor engages
    pub duration: f32,
}

/// Optional hooks of a species, as written in config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HooksConfig {
    /// Walk/pause gait
    pub walk_pause: Option<WalkPauseSettings>,
    /// Pre-combat summon window
    pub summon_window: Option<SummonWindowSettings>,
}

impl HooksConfig {
    /// Instantiate the configured hooks for one actor.
    #[must_use]
    pub fn build(&self) -> HookSet {
        let mut set = HookSet::new();
        if let Some(summon) = self.summon_window {
            set.push(Box::new(SummonWindow::new(summon.duration)));
        }
        if let Some(gait) = self.walk_pause {
            set.push(Box::new(WalkPauseCycle::new(gait.walk, gait.pause)));
        }
        set
    }
}
