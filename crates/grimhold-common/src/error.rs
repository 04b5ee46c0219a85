//! Error types shared by Grimhold crates.

use thiserror::Error;

use crate::ids::EntityId;

/// Top-level error type for Grimhold operations.
#[derive(Debug, Error)]
pub enum CommonError {
    /// Entity is unknown to the component that was asked about it
    #[error("unknown entity {0}")]
    UnknownEntity(EntityId),

    /// A numeric parameter was outside its legal range
    #[error("parameter `{name}` out of range: {value}")]
    OutOfRange {
        /// Parameter name
        name: &'static str,
        /// Offending value
        value: f32,
    },

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for common operations.
pub type CommonResult<T> = Result<T, CommonError>;
