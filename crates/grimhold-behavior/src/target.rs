//! Target location.
//!
//! Actors never look the player up through a global. The host injects a
//! [`TargetLocator`]; taunts are layered on top with [`TauntLocator`].

use grimhold_common::{EntityId, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::clock::Suspension;

/// Resolved attack/movement target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetInfo {
    /// Target entity
    pub id: EntityId,
    /// Reference position of the target
    pub position: Vec2,
}

/// Resolves where an actor should go and whom it should hit.
///
/// Called every physics tick for every actor; implementations must be cheap.
pub trait TargetLocator {
    /// Current target for `seeker`, if any.
    fn locate_target(&self, seeker: EntityId) -> Option<TargetInfo>;

    /// Position of an arbitrary entity known to the locator.
    fn position_of(&self, id: EntityId) -> Option<Vec2>;

    /// `id` died. Locators holding redirections drop the ones involving it.
    fn entity_died(&mut self, _id: EntityId) {}
}

// ============================================================================
// Target Board
// ============================================================================

/// Host-maintained table of targetable positions with one primary target.
///
/// This is the usual "everyone chases the player" setup: the host writes
/// positions each frame and every seeker resolves to the primary.
#[derive(Debug, Clone, Default)]
pub struct TargetBoard {
    primary: Option<EntityId>,
    positions: HashMap<EntityId, Vec2>,
}

impl TargetBoard {
    /// Create an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a board with a primary target at `position`.
    #[must_use]
    pub fn with_primary(id: EntityId, position: Vec2) -> Self {
        let mut board = Self::new();
        board.set_primary(Some(id));
        board.set_position(id, position);
        board
    }

    /// Set or clear the primary target.
    pub fn set_primary(&mut self, id: Option<EntityId>) {
        self.primary = id;
    }

    /// Primary target id.
    #[must_use]
    pub fn primary(&self) -> Option<EntityId> {
        self.primary
    }

    /// Record an entity position.
    pub fn set_position(&mut self, id: EntityId, position: Vec2) {
        self.positions.insert(id, position);
    }

    /// Forget an entity.
    pub fn remove(&mut self, id: EntityId) {
        self.positions.remove(&id);
        if self.primary == Some(id) {
            self.primary = None;
        }
    }
}

impl TargetLocator for TargetBoard {
    fn locate_target(&self, _seeker: EntityId) -> Option<TargetInfo> {
        let id = self.primary?;
        let position = *self.positions.get(&id)?;
        Some(TargetInfo { id, position })
    }

    fn position_of(&self, id: EntityId) -> Option<Vec2> {
        self.positions.get(&id).copied()
    }
}

// ============================================================================
// Taunt Redirection
// ============================================================================

#[derive(Debug, Clone, Copy)]
struct Taunt {
    taunter: EntityId,
    remaining: Suspension,
}

/// Redirects seekers to a taunter for a limited, pause-safe duration.
#[derive(Debug, Clone)]
pub struct TauntLocator<L> {
    base: L,
    taunts: HashMap<EntityId, Taunt>,
}

impl<L: TargetLocator> TauntLocator<L> {
    /// Wrap a base locator.
    #[must_use]
    pub fn new(base: L) -> Self {
        Self {
            base,
            taunts: HashMap::new(),
        }
    }

    /// Base locator.
    pub fn base(&self) -> &L {
        &self.base
    }

    /// Mutable base locator.
    pub fn base_mut(&mut self) -> &mut L {
        &mut self.base
    }

    /// Force `seeker` to target `taunter` for `duration` seconds.
    pub fn taunt(&mut self, seeker: EntityId, taunter: EntityId, duration: f32) {
        self.taunts.insert(
            seeker,
            Taunt {
                taunter,
                remaining: Suspension::new(duration),
            },
        );
    }

    /// Lift a taunt early.
    pub fn clear(&mut self, seeker: EntityId) {
        self.taunts.remove(&seeker);
    }

    /// Drop every taunt held by `taunter` (e.g. it died).
    pub fn release_taunter(&mut self, taunter: EntityId) {
        self.taunts.retain(|_, t| t.taunter != taunter);
    }

    /// Advance taunt timers by simulated time.
    pub fn tick(&mut self, dt: f32) {
        self.taunts.retain(|_, t| t.remaining.advance(dt).is_none());
    }

    /// Whether `seeker` is currently taunted.
    #[must_use]
    pub fn is_taunted(&self, seeker: EntityId) -> bool {
        self.taunts.contains_key(&seeker)
    }
}

impl<L: TargetLocator> TargetLocator for TauntLocator<L> {
    fn locate_target(&self, seeker: EntityId) -> Option<TargetInfo> {
        if let Some(taunt) = self.taunts.get(&seeker) {
            if let Some(position) = self.base.position_of(taunt.taunter) {
                return Some(TargetInfo {
                    id: taunt.taunter,
                    position,
                });
            }
        }
        self.base.locate_target(seeker)
    }

    fn position_of(&self, id: EntityId) -> Option<Vec2> {
        self.base.position_of(id)
    }

    fn entity_died(&mut self, id: EntityId) {
        self.clear(id);
        self.release_taunter(id);
        self.base.entity_died(id);
    }
}
