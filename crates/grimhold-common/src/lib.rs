//! # Grimhold Common
//!
//! Common types and utilities shared by the Grimhold crates:
//! - ID types (EntityId, ColliderId)
//! - Planar math over `glam::Vec2`
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod ids;
pub mod planar;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::ids::*;
    pub use crate::planar::*;
    pub use glam::Vec2;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_entity_id_generation() {
        let id1 = EntityId::new();
        let id2 = EntityId::new();
        assert_ne!(id1, id2);
        assert!(id1 < id2);
    }

    #[test]
    fn test_null_entity_is_invalid() {
        assert!(!EntityId::NULL.is_valid());
        assert!(EntityId::from_raw(7).is_valid());
    }

    #[test]
    fn test_error_display() {
        let err = CommonError::OutOfRange {
            name: "windup",
            value: -1.0,
        };
        assert_eq!(err.to_string(), "parameter `windup` out of range: -1");
    }

    proptest! {
        #[test]
        fn prop_wrap_angle_in_range(angle in -100.0f32..100.0) {
            let wrapped = wrap_angle(angle);
            prop_assert!(wrapped > -std::f32::consts::PI - 1e-4);
            prop_assert!(wrapped <= std::f32::consts::PI + 1e-4);
        }
    }
}
