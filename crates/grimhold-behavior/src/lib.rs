//! # Grimhold Behavior
//!
//! Hostile actor behavior for 2D action games.
//!
//! This crate provides the host-agnostic combat layer:
//! - Action sequencer with cancellation tokens (windup, damage, recovery, cooldown)
//! - Timed damage applier for multi-instance attacks
//! - Knockback overlay that suspends autonomous movement
//! - Projectile controller (single-hit and multi-hit, owner tracking)
//! - Death finalizer with delayed removal
//! - Species hooks, death observers and a pause-safe scheduler
//!
//! The host owns physics, rendering and the player. It talks to this crate
//! through the collaborator traits in [`world`] and reads back
//! [`BehaviorEvent`]s.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod arena;
pub mod clock;
pub mod config;
pub mod damage;
pub mod death;
pub mod enemy;
pub mod error;
pub mod events;
pub mod hooks;
pub mod knockback;
pub mod observers;
pub mod presentation;
pub mod projectile;
pub mod sequencer;
pub mod spawn;
pub mod status;
pub mod target;
pub mod timed_damage;
pub mod token;
pub mod world;

#[cfg(test)]
mod testing;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::arena::*;
    pub use crate::clock::*;
    pub use crate::config::*;
    pub use crate::damage::*;
    pub use crate::death::*;
    pub use crate::enemy::*;
    pub use crate::error::*;
    pub use crate::events::*;
    pub use crate::hooks::*;
    pub use crate::knockback::*;
    pub use crate::observers::*;
    pub use crate::presentation::*;
    pub use crate::projectile::*;
    pub use crate::sequencer::*;
    pub use crate::spawn::*;
    pub use crate::status::*;
    pub use crate::target::*;
    pub use crate::timed_damage::*;
    pub use crate::token::*;
    pub use crate::world::*;
}

pub use prelude::*;
