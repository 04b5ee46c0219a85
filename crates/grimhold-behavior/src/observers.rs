//! Death notification registry.
//!
//! Watchers register interest in a watched entity's death and are released
//! deterministically: when the watcher goes away, when it unsubscribes, or
//! when the death is dispatched (subscriptions are one-shot).

use grimhold_common::EntityId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Who is waiting on a death.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Watcher {
    /// An actor watching its sequence target.
    Enemy(EntityId),
    /// A projectile watching its owner.
    Projectile(EntityId),
}

/// Watched id to watchers.
#[derive(Debug, Clone, Default)]
pub struct DeathObservers {
    subscriptions: HashMap<EntityId, Vec<Watcher>>,
}

impl DeathObservers {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `watcher` for the death of `watched`. Duplicate
    /// registrations collapse into one.
    pub fn subscribe(&mut self, watched: EntityId, watcher: Watcher) {
        let watchers = self.subscriptions.entry(watched).or_default();
        if !watchers.contains(&watcher) {
            watchers.push(watcher);
        }
    }

    /// Drop one registration. Returns whether it existed.
    pub fn unsubscribe(&mut self, watched: EntityId, watcher: Watcher) -> bool {
        let Some(watchers) = self.subscriptions.get_mut(&watched) else {
            return false;
        };
        let before = watchers.len();
        watchers.retain(|w| *w != watcher);
        let removed = watchers.len() != before;
        if watchers.is_empty() {
            self.subscriptions.remove(&watched);
        }
        removed
    }

    /// Drop every registration held by `watcher` (it is being removed).
    pub fn unsubscribe_watcher(&mut self, watcher: Watcher) {
        self.subscriptions.retain(|_, watchers| {
            watchers.retain(|w| *w != watcher);
            !watchers.is_empty()
        });
    }

    /// Take the watchers of `watched` for dispatch, sorted for a stable
    /// notification order.
    pub fn take(&mut self, watched: EntityId) -> Vec<Watcher> {
        let mut watchers = self.subscriptions.remove(&watched).unwrap_or_default();
        watchers.sort_unstable();
        watchers
    }

    /// Whether `watcher` is registered on `watched`.
    #[must_use]
    pub fn is_watching(&self, watched: EntityId, watcher: Watcher) -> bool {
        self.subscriptions
            .get(&watched)
            .is_some_and(|w| w.contains(&watcher))
    }

    /// Total number of live registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.values().map(Vec::len).sum()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}
