//! Error types for the behavior host API.
//!
//! Only the host-facing surface returns errors. A sequence that cannot
//! continue (dead target, stale token, out of range) is not an error: it
//! aborts and reports an [`AbortReason`](crate::sequencer::AbortReason).

use grimhold_common::{CommonError, EntityId};
use thiserror::Error;

/// Behavior system error types.
#[derive(Debug, Error)]
pub enum BehaviorError {
    /// Enemy not found
    #[error("enemy not found: {0}")]
    EntityNotFound(EntityId),
    /// Projectile not found
    #[error("projectile not found: {0}")]
    ProjectileNotFound(EntityId),
    /// Species name missing from the config
    #[error("unknown species: {0}")]
    UnknownSpecies(String),
    /// Config text could not be parsed
    #[error("failed to parse behavior config: {0}")]
    ConfigParse(String),
    /// Config parsed but holds values that cannot be clamped into range
    #[error("invalid behavior config: {0}")]
    InvalidConfig(String),
    /// Shared error
    #[error(transparent)]
    Common(#[from] CommonError),
}

/// Result type for behavior operations.
pub type BehaviorResult<T> = Result<T, BehaviorError>;
