//! Combat resolver: projectile hits, damage and kills.
//!
//! The `CombatResolver` runs once per frame after projectiles have moved.
//! It mutates vehicles and projectiles in place and reports what happened
//! as a [`CombatOutcome`]; turning that into score and events is the
//! engine's job.
//!
//! # Resolution Order
//!
//! For each active projectile, in collection order:
//!
//! 1. Test against the player first. On hit the projectile is deactivated
//!    immediately and damage is applied.
//! 2. Test the same projectile against each enemy in order. An enemy brought
//!    to zero health is removed from the enemy collection on the spot, so no
//!    later projectile in the same frame can touch it.
//!
//! Deactivation gates everything: a projectile that hit the player is
//! skipped by the enemy pass, and a projectile stops at the first enemy it
//! hits.
//!
//! Projectiles carry no friend-or-foe filter. Any projectile can hit any
//! vehicle; the owner is recorded only for attribution.
//!
//! # Destruction Handling
//!
//! Enemies are removed by the resolver, including any that reached zero
//! health before the pass through some other path; those are reported as
//! kills without a killer. The player is never removed: it is
//! flagged `DESTROYED`, stops taking hits, and the outcome reports
//! `player_destroyed` on the frame it happened.

use std::borrow::BorrowMut;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::collision::{projectile_hits, HITBOX_RADIUS};
use crate::entity::{Projectile, Vehicle, VehicleId};

/// A projectile connecting with a vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    /// Vehicle that was struck
    pub target: VehicleId,
    /// Firer of the projectile
    pub source: Option<VehicleId>,
    /// Health actually lost
    pub amount: f32,
    /// Health left after the hit
    pub health: f32,
    /// Where the projectile was when it connected
    pub position: Vec2,
}

/// An enemy removed this frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kill {
    /// Destroyed enemy
    pub victim: VehicleId,
    /// Firer of the killing projectile
    pub killer: Option<VehicleId>,
    /// Where the enemy died
    pub position: Vec2,
}

/// Everything the resolver changed during one pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatOutcome {
    /// Hits in resolution order
    pub hits: Vec<Hit>,
    /// Enemies removed, in resolution order
    pub kills: Vec<Kill>,
    /// `true` if the player reached zero health during this pass
    pub player_destroyed: bool,
}

impl CombatOutcome {
    /// Returns `true` if nothing was hit.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty() && self.kills.is_empty() && !self.player_destroyed
    }

    /// Appends another pass's results after this one's.
    pub fn merge(&mut self, other: Self) {
        self.hits.extend(other.hits);
        self.kills.extend(other.kills);
        self.player_destroyed |= other.player_destroyed;
    }
}

/// Resolver for projectile-versus-vehicle combat.
///
/// # Example
///
/// ```
/// use ironfront_core::resolver::CombatResolver;
///
/// let resolver = CombatResolver::new();
/// assert_eq!(resolver.hitbox_radius(), 25.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombatResolver {
    hitbox_radius: f32,
}

impl Default for CombatResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl CombatResolver {
    /// Creates a resolver using the default hitbox radius.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_radius(HITBOX_RADIUS)
    }

    /// Creates a resolver using a custom hitbox radius.
    #[must_use]
    pub const fn with_radius(hitbox_radius: f32) -> Self {
        Self { hitbox_radius }
    }

    /// Returns the hitbox radius.
    #[must_use]
    pub const fn hitbox_radius(&self) -> f32 {
        self.hitbox_radius
    }

    /// Resolves every active projectile against the player and the enemies.
    ///
    /// # Arguments
    ///
    /// * `projectiles` - Live projectiles; hits deactivate them but nothing is
    ///   removed here
    /// * `player` - The player vehicle
    /// * `enemies` - Enemy collection; destroyed enemies are removed in place
    ///   and the remaining order is preserved
    pub fn resolve<E>(
        &self,
        projectiles: &mut [Projectile],
        player: &mut Vehicle,
        enemies: &mut Vec<E>,
    ) -> CombatOutcome
    where
        E: BorrowMut<Vehicle>,
    {
        let mut outcome = CombatOutcome::default();
        Self::sweep_wrecks(enemies, &mut outcome);

        for projectile in projectiles.iter_mut() {
            if !projectile.is_active() {
                continue;
            }

            if !player.is_destroyed() && self.strikes(projectile, player) {
                projectile.deactivate();
                if Self::apply_hit(projectile, player, &mut outcome) {
                    outcome.player_destroyed = true;
                }
            }

            enemies.retain_mut(|slot| {
                let enemy: &mut Vehicle = slot.borrow_mut();
                if !projectile.is_active() || !self.strikes(projectile, enemy) {
                    return true;
                }
                projectile.deactivate();
                if Self::apply_hit(projectile, enemy, &mut outcome) {
                    outcome.kills.push(Kill {
                        victim: enemy.id(),
                        killer: projectile.owner(),
                        position: enemy.position(),
                    });
                    return false;
                }
                true
            });
        }

        outcome
    }

    /// Removes enemies that reached zero health outside combat (scripted
    /// damage, host edits) and reports them as kills with no killer.
    fn sweep_wrecks<E>(enemies: &mut Vec<E>, outcome: &mut CombatOutcome)
    where
        E: BorrowMut<Vehicle>,
    {
        enemies.retain_mut(|slot| {
            let enemy: &mut Vehicle = slot.borrow_mut();
            if !enemy.is_destroyed() {
                return true;
            }
            outcome.kills.push(Kill {
                victim: enemy.id(),
                killer: None,
                position: enemy.position(),
            });
            false
        });
    }

    fn strikes(&self, projectile: &Projectile, vehicle: &Vehicle) -> bool {
        projectile_hits(projectile.position(), vehicle.position(), self.hitbox_radius)
    }

    /// Applies a projectile's damage, returning `true` if the vehicle died.
    fn apply_hit(projectile: &Projectile, vehicle: &mut Vehicle, outcome: &mut CombatOutcome) -> bool {
        let before = vehicle.health();
        let destroyed = vehicle.take_damage(projectile.damage());
        outcome.hits.push(Hit {
            target: vehicle.id(),
            source: projectile.owner(),
            amount: before - vehicle.health(),
            health: vehicle.health(),
            position: projectile.position(),
        });
        destroyed
    }
}
