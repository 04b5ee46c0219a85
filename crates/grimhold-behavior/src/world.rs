//! The host world as seen by the behavior core.

use crate::damage::DamageRegistry;
use crate::spawn::Spawner;
use crate::status::StatusProvider;
use crate::target::TargetLocator;

/// Every collaborator the arena consumes, bundled.
///
/// Implemented automatically for any type that provides the individual
/// capabilities, so hosts implement the small traits and pass one value.
pub trait CombatWorld: TargetLocator + DamageRegistry + StatusProvider + Spawner {}

impl<T> CombatWorld for T where T: TargetLocator + DamageRegistry + StatusProvider + Spawner {}
