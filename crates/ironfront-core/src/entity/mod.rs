//! Entity module for the combat simulation.
//!
//! This module provides the two entity kinds the engine advances each frame:
//! - [`Vehicle`]: a tank with health, armor and energy pools, a weapon and a
//!   timed special ability
//! - [`Projectile`]: a damage-carrying point owned by the simulation
//!
//! Vehicles are addressed by [`VehicleId`]. Projectiles are anonymous; they
//! live in the engine's projectile collection until they expire.
//!
//! # Example
//!
//! ```
//! use ironfront_core::entity::{Vehicle, VehicleArchetype, VehicleId};
//! use glam::Vec2;
//!
//! let tank = Vehicle::new(VehicleId::new(1), VehicleArchetype::Heavy, Vec2::new(50.0, 50.0));
//!
//! assert_eq!(tank.health(), 120.0);
//! assert!(!tank.is_destroyed());
//! ```

pub mod projectile;
pub mod vehicle;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use projectile::Projectile;
pub use vehicle::{Vehicle, VehicleArchetype, VehicleClass, VehicleTuning};

/// Unique identifier for a vehicle.
///
/// IDs are assigned monotonically by the engine and never reused within a
/// battle, so ordering by ID is spawn order.
///
/// # Example
///
/// ```
/// use ironfront_core::entity::VehicleId;
///
/// let id1 = VehicleId::new(1);
/// let id2 = VehicleId::new(2);
///
/// assert!(id1 < id2);
/// assert_eq!(id1.as_u64(), 1);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VehicleId(u64);

impl VehicleId {
    /// Creates a new `VehicleId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VehicleId({})", self.0)
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for VehicleId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<VehicleId> for u64 {
    fn from(id: VehicleId) -> Self {
        id.0
    }
}

bitflags! {
    /// Status flags carried by a vehicle.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct VehicleFlags: u8 {
        /// Driven by player intents rather than an agent
        const PLAYER_CONTROLLED = 0b0000_0001;
        /// Special ability active: damage negated, speed boosted
        const INVULNERABLE = 0b0000_0010;
        /// Health reached zero
        const DESTROYED = 0b0000_0100;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod vehicle_id_tests {
        use super::*;

        #[test]
        fn new_creates_id_with_value() {
            let id = VehicleId::new(42);
            assert_eq!(id.as_u64(), 42);
        }

        #[test]
        fn ordering_follows_value() {
            let mut ids = vec![VehicleId::new(3), VehicleId::new(1), VehicleId::new(2)];
            ids.sort();
            assert_eq!(ids, vec![VehicleId::new(1), VehicleId::new(2), VehicleId::new(3)]);
        }

        #[test]
        fn debug_and_display_format() {
            let id = VehicleId::new(42);
            assert_eq!(format!("{id:?}"), "VehicleId(42)");
            assert_eq!(format!("{id}"), "42");
        }

        #[test]
        fn converts_to_and_from_u64() {
            let id: VehicleId = 7u64.into();
            let raw: u64 = id.into();
            assert_eq!(raw, 7);
        }
    }

    mod flag_tests {
        use super::*;

        #[test]
        fn default_is_empty() {
            assert!(VehicleFlags::default().is_empty());
        }

        #[test]
        fn flags_combine() {
            let flags = VehicleFlags::PLAYER_CONTROLLED | VehicleFlags::INVULNERABLE;
            assert!(flags.contains(VehicleFlags::INVULNERABLE));
            assert!(!flags.contains(VehicleFlags::DESTROYED));
        }

        #[test]
        fn serializes_as_bits() {
            let flags = VehicleFlags::DESTROYED;
            let json = serde_json::to_string(&flags).unwrap();
            let back: VehicleFlags = serde_json::from_str(&json).unwrap();
            assert_eq!(flags, back);
        }
    }
}
