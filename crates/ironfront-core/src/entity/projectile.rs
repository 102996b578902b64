//! Projectiles.
//!
//! A projectile is created from a [`FireRequest`] and then owned by the
//! engine. It outlives its firer: the owner id is kept only so kills can be
//! attributed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::VehicleId;
use crate::config::WorldBounds;
use crate::weapon::{FireRequest, WeaponKind, WeaponStats};

/// A moving, damage-carrying point.
///
/// Once [`Projectile::is_active`] turns false it never turns true again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    owner: Option<VehicleId>,
    kind: WeaponKind,
    position: Vec2,
    velocity: Vec2,
    damage: f32,
    active: bool,
    stats: WeaponStats,
}

impl Projectile {
    /// Creates a projectile heading along `angle` at `stats.projectile_speed`
    /// units per reference frame.
    #[must_use]
    pub fn new(
        position: Vec2,
        angle: f32,
        stats: WeaponStats,
        kind: WeaponKind,
        owner: Option<VehicleId>,
    ) -> Self {
        Self {
            owner,
            kind,
            position,
            velocity: Vec2::from_angle(angle) * stats.projectile_speed,
            damage: stats.damage,
            active: true,
            stats,
        }
    }

    /// Creates a projectile from a weapon's fire request.
    #[must_use]
    pub fn from_request(request: &FireRequest, owner: Option<VehicleId>) -> Self {
        Self::new(
            request.position,
            request.angle,
            request.stats,
            request.kind,
            owner,
        )
    }

    /// Returns the firing vehicle, if any.
    #[must_use]
    pub const fn owner(&self) -> Option<VehicleId> {
        self.owner
    }

    /// Returns the weapon archetype that fired this projectile.
    #[must_use]
    pub const fn kind(&self) -> WeaponKind {
        self.kind
    }

    /// Returns the current position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Returns the per-reference-frame velocity.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Returns the damage dealt on hit.
    #[must_use]
    pub const fn damage(&self) -> f32 {
        self.damage
    }

    /// Returns the stats snapshot taken when fired.
    #[must_use]
    pub const fn stats(&self) -> &WeaponStats {
        &self.stats
    }

    /// Returns `true` until the projectile hits something or leaves the world.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Marks the projectile spent.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Integrates position over `frames` reference frames, deactivating the
    /// projectile if it ends up outside `bounds`.
    pub fn advance(&mut self, frames: f32, bounds: &WorldBounds) {
        if !self.active {
            return;
        }
        self.position += self.velocity * frames;
        if !bounds.contains(self.position) {
            self.active = false;
        }
    }
}
