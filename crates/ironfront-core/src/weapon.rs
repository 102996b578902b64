//! Weapon parameterization and firing.
//!
//! A [`WeaponSystem`] owns its own copy of [`WeaponStats`]. Upgrading one
//! vehicle's weapon never touches the archetype table or another vehicle.
//!
//! # Example
//!
//! ```
//! use ironfront_core::weapon::{WeaponKind, WeaponSystem};
//! use glam::Vec2;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(7);
//! let mut cannon = WeaponSystem::new(WeaponKind::Cannon);
//!
//! assert!(cannon.can_fire(0.0, 100.0));
//! let shots = cannon.fire(Vec2::new(100.0, 100.0), 0.0, 0.0, &mut rng);
//! assert_eq!(shots.len(), 1);
//!
//! // Reloading for 800 ms
//! assert!(!cannon.can_fire(500.0, 100.0));
//! assert!(cannon.can_fire(800.0, 100.0));
//! ```

use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One of the six statically parameterized weapon archetypes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeaponKind {
    /// Standard main gun
    Cannon,
    /// Rapid, weak, inaccurate
    Machinegun,
    /// Slow energy bolt
    Plasma,
    /// Heavy, slow, long range
    Missile,
    /// Perfectly accurate, very long reload
    Railgun,
    /// Six pellets in a wide cone
    Shotgun,
}

impl WeaponKind {
    /// All archetypes in HUD order.
    pub const ALL: [Self; 6] = [
        Self::Cannon,
        Self::Machinegun,
        Self::Plasma,
        Self::Missile,
        Self::Railgun,
        Self::Shotgun,
    ];

    /// Identifier used in configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cannon => "cannon",
            Self::Machinegun => "machinegun",
            Self::Plasma => "plasma",
            Self::Missile => "missile",
            Self::Railgun => "railgun",
            Self::Shotgun => "shotgun",
        }
    }

    /// Reference stats for this archetype at level 1.
    #[must_use]
    pub const fn base_stats(self) -> WeaponStats {
        match self {
            Self::Cannon => WeaponStats {
                damage: 30.0,
                reload_time_ms: 800.0,
                spread: 0.03,
                projectile_speed: 10.0,
                projectile_count: 1,
                range: 400.0,
                energy_cost: 20.0,
            },
            Self::Machinegun => WeaponStats {
                damage: 10.0,
                reload_time_ms: 100.0,
                spread: 0.1,
                projectile_speed: 15.0,
                projectile_count: 1,
                range: 400.0,
                energy_cost: 5.0,
            },
            Self::Plasma => WeaponStats {
                damage: 40.0,
                reload_time_ms: 1000.0,
                spread: 0.05,
                projectile_speed: 8.0,
                projectile_count: 1,
                range: 300.0,
                energy_cost: 30.0,
            },
            Self::Missile => WeaponStats {
                damage: 50.0,
                reload_time_ms: 2000.0,
                spread: 0.02,
                projectile_speed: 6.0,
                projectile_count: 1,
                range: 500.0,
                energy_cost: 40.0,
            },
            Self::Railgun => WeaponStats {
                damage: 80.0,
                reload_time_ms: 3000.0,
                spread: 0.0,
                projectile_speed: 20.0,
                projectile_count: 1,
                range: 800.0,
                energy_cost: 50.0,
            },
            Self::Shotgun => WeaponStats {
                damage: 15.0,
                reload_time_ms: 1500.0,
                spread: 0.3,
                projectile_speed: 12.0,
                projectile_count: 6,
                range: 200.0,
                energy_cost: 35.0,
            },
        }
    }
}

impl fmt::Display for WeaponKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeaponKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownWeapon(s.to_string()))
    }
}

/// Tunable combat stats of a weapon.
///
/// Speeds are in world units per reference frame; times in milliseconds;
/// `spread` is the full cone width in radians (shots deviate by at most
/// `spread / 2` either side of the aim).
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponStats {
    /// Damage carried by each projectile
    pub damage: f32,
    /// Minimum time between shots
    pub reload_time_ms: f32,
    /// Cone width in radians
    pub spread: f32,
    /// Projectile speed (units per reference frame)
    pub projectile_speed: f32,
    /// Projectiles per trigger pull
    pub projectile_count: u32,
    /// Effective range in world units
    pub range: f32,
    /// Energy consumed per shot
    pub energy_cost: f32,
}

/// A single projectile the caller should spawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireRequest {
    /// Spawn point
    pub position: Vec2,
    /// Travel direction in radians, spread already applied
    pub angle: f32,
    /// Stats snapshot at the moment of firing
    pub stats: WeaponStats,
    /// Archetype that produced the shot
    pub kind: WeaponKind,
}

/// A weapon instance bound to one vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponSystem {
    kind: WeaponKind,
    stats: WeaponStats,
    last_fire_ms: Option<f64>,
    level: u32,
    level_cap: u32,
}

impl WeaponSystem {
    /// Highest level reachable through [`WeaponSystem::upgrade`] unless overridden.
    pub const DEFAULT_LEVEL_CAP: u32 = 10;

    const DAMAGE_GROWTH: f32 = 1.2;
    const RELOAD_DECAY: f32 = 0.9;
    const SPREAD_DECAY: f32 = 0.9;
    const RANGE_GROWTH: f32 = 1.1;

    /// Creates a level-1 weapon of the given archetype.
    #[must_use]
    pub const fn new(kind: WeaponKind) -> Self {
        Self {
            kind,
            stats: kind.base_stats(),
            last_fire_ms: None,
            level: 1,
            level_cap: Self::DEFAULT_LEVEL_CAP,
        }
    }

    /// Overrides the upgrade cap. A cap below 1 is treated as 1.
    #[must_use]
    pub fn with_level_cap(mut self, cap: u32) -> Self {
        self.level_cap = cap.max(1);
        self
    }

    /// Returns the archetype.
    #[must_use]
    pub const fn kind(&self) -> WeaponKind {
        self.kind
    }

    /// Returns a copy of the current stats.
    #[must_use]
    pub const fn stats(&self) -> WeaponStats {
        self.stats
    }

    /// Returns the current level (starts at 1).
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Returns the upgrade cap.
    #[must_use]
    pub const fn level_cap(&self) -> u32 {
        self.level_cap
    }

    /// Returns the simulation time of the last shot, if any.
    #[must_use]
    pub const fn last_fire_ms(&self) -> Option<f64> {
        self.last_fire_ms
    }

    /// Returns `true` while the reload window of the last shot is still open.
    #[must_use]
    pub fn is_reloading(&self, now_ms: f64) -> bool {
        self.last_fire_ms
            .is_some_and(|last| now_ms - last < f64::from(self.stats.reload_time_ms))
    }

    /// Returns `true` if the weapon has reloaded and `energy` covers the shot.
    #[must_use]
    pub fn can_fire(&self, now_ms: f64, energy: f32) -> bool {
        !self.is_reloading(now_ms) && energy >= self.stats.energy_cost
    }

    /// Produces `projectile_count` fire requests around `aim_angle`.
    ///
    /// Always stamps the fire time. Callers must check [`WeaponSystem::can_fire`]
    /// first; no precondition is enforced here.
    pub fn fire<R: Rng + ?Sized>(
        &mut self,
        position: Vec2,
        aim_angle: f32,
        now_ms: f64,
        rng: &mut R,
    ) -> Vec<FireRequest> {
        self.last_fire_ms = Some(now_ms);

        (0..self.stats.projectile_count)
            .map(|_| {
                let deviation = (rng.gen::<f32>() - 0.5) * self.stats.spread;
                FireRequest {
                    position,
                    angle: aim_angle + deviation,
                    stats: self.stats,
                    kind: self.kind,
                }
            })
            .collect()
    }

    /// Raises the weapon one level.
    ///
    /// Returns `false` and leaves the stats untouched once the level cap is reached.
    pub fn upgrade(&mut self) -> bool {
        if self.level >= self.level_cap {
            return false;
        }
        self.level += 1;
        self.stats.damage *= Self::DAMAGE_GROWTH;
        self.stats.reload_time_ms *= Self::RELOAD_DECAY;
        self.stats.spread *= Self::SPREAD_DECAY;
        self.stats.range *= Self::RANGE_GROWTH;
        true
    }
}

impl Default for WeaponSystem {
    fn default() -> Self {
        Self::new(WeaponKind::Cannon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    mod archetype_tests {
        use super::*;

        #[test]
        fn cannon_reference_stats() {
            let stats = WeaponKind::Cannon.base_stats();
            assert_eq!(stats.damage, 30.0);
            assert_eq!(stats.reload_time_ms, 800.0);
            assert_eq!(stats.spread, 0.03);
            assert_eq!(stats.projectile_speed, 10.0);
            assert_eq!(stats.projectile_count, 1);
            assert_eq!(stats.range, 400.0);
            assert_eq!(stats.energy_cost, 20.0);
        }

        #[test]
        fn shotgun_fires_six_pellets() {
            assert_eq!(WeaponKind::Shotgun.base_stats().projectile_count, 6);
        }

        #[test]
        fn railgun_has_no_spread() {
            assert_eq!(WeaponKind::Railgun.base_stats().spread, 0.0);
        }

        #[test]
        fn parses_known_identifiers() {
            for kind in WeaponKind::ALL {
                assert_eq!(kind.as_str().parse::<WeaponKind>().unwrap(), kind);
            }
            assert_eq!("RailGun".parse::<WeaponKind>().unwrap(), WeaponKind::Railgun);
        }

        #[test]
        fn unknown_identifier_fails_fast() {
            let err = "flamethrower".parse::<WeaponKind>().unwrap_err();
            assert!(matches!(err, ConfigError::UnknownWeapon(ref id) if id == "flamethrower"));
        }

        #[test]
        fn serializes_as_lowercase_identifier() {
            let json = serde_json::to_string(&WeaponKind::Machinegun).unwrap();
            assert_eq!(json, "\"machinegun\"");
            assert!(serde_json::from_str::<WeaponKind>("\"laser\"").is_err());
        }
    }

    mod can_fire_tests {
        use super::*;

        #[test]
        fn fresh_weapon_can_fire() {
            let weapon = WeaponSystem::new(WeaponKind::Cannon);
            assert!(weapon.can_fire(0.0, 100.0));
            assert!(!weapon.is_reloading(0.0));
        }

        #[test]
        fn insufficient_energy_blocks_fire() {
            let weapon = WeaponSystem::new(WeaponKind::Railgun);
            assert!(!weapon.can_fire(0.0, 49.9));
            assert!(weapon.can_fire(0.0, 50.0));
        }

        #[test]
        fn machinegun_rejects_shots_inside_reload_window() {
            let mut weapon = WeaponSystem::new(WeaponKind::Machinegun);
            let mut rng = rng();

            assert!(weapon.can_fire(1000.0, 100.0));
            weapon.fire(Vec2::ZERO, 0.0, 1000.0, &mut rng);

            for offset in [10.0, 30.0, 50.0, 70.0, 99.0] {
                assert!(
                    !weapon.can_fire(1000.0 + offset, 100.0),
                    "shot at +{offset}ms should be rejected"
                );
            }
            assert!(weapon.can_fire(1100.0, 100.0));
        }
    }

    mod fire_tests {
        use super::*;

        #[test]
        fn fire_stamps_time_without_precondition() {
            let mut weapon = WeaponSystem::new(WeaponKind::Plasma);
            let mut rng = rng();

            weapon.fire(Vec2::ZERO, 0.0, 10.0, &mut rng);
            weapon.fire(Vec2::ZERO, 0.0, 20.0, &mut rng);

            assert_eq!(weapon.last_fire_ms(), Some(20.0));
        }

        #[test]
        fn zero_spread_keeps_exact_angle() {
            let mut weapon = WeaponSystem::new(WeaponKind::Railgun);
            let requests = weapon.fire(Vec2::new(5.0, 5.0), 1.25, 0.0, &mut rng());

            assert_eq!(requests.len(), 1);
            assert_eq!(requests[0].angle, 1.25);
            assert_eq!(requests[0].position, Vec2::new(5.0, 5.0));
            assert_eq!(requests[0].kind, WeaponKind::Railgun);
        }

        #[test]
        fn spread_stays_within_half_cone() {
            let mut weapon = WeaponSystem::new(WeaponKind::Shotgun);
            let mut rng = rng();
            let half = WeaponKind::Shotgun.base_stats().spread / 2.0;

            for i in 0..50 {
                let requests = weapon.fire(Vec2::ZERO, 0.5, f64::from(i) * 2000.0, &mut rng);
                assert_eq!(requests.len(), 6);
                for request in requests {
                    assert!((request.angle - 0.5).abs() <= half + 1e-6);
                }
            }
        }

        #[test]
        fn requests_carry_stats_snapshot() {
            let mut weapon = WeaponSystem::new(WeaponKind::Cannon);
            let requests = weapon.fire(Vec2::ZERO, 0.0, 0.0, &mut rng());
            weapon.upgrade();

            assert_eq!(requests[0].stats.damage, 30.0);
            assert!((weapon.stats().damage - 36.0).abs() < 1e-4);
        }
    }

    mod upgrade_tests {
        use super::*;

        #[test]
        fn two_upgrades_compound() {
            let mut weapon = WeaponSystem::new(WeaponKind::Cannon);
            assert!(weapon.upgrade());
            assert!(weapon.upgrade());

            let stats = weapon.stats();
            assert!((stats.damage - 43.2).abs() < 1e-4);
            assert!((stats.reload_time_ms - 648.0).abs() < 1e-3);
            assert!((stats.spread - 0.0243).abs() < 1e-6);
            assert!((stats.range - 484.0).abs() < 1e-3);
            assert_eq!(weapon.level(), 3);
        }

        #[test]
        fn upgrade_stops_at_cap() {
            let mut weapon = WeaponSystem::new(WeaponKind::Machinegun).with_level_cap(3);
            assert!(weapon.upgrade());
            assert!(weapon.upgrade());
            let capped = weapon.stats();

            assert!(!weapon.upgrade());
            assert_eq!(weapon.level(), 3);
            assert_eq!(weapon.stats(), capped);
        }

        #[test]
        fn upgrades_do_not_leak_into_archetype_table() {
            let mut first = WeaponSystem::new(WeaponKind::Missile);
            let second = WeaponSystem::new(WeaponKind::Missile);
            first.upgrade();

            assert_eq!(second.stats(), WeaponKind::Missile.base_stats());
            assert_ne!(first.stats(), second.stats());
        }

        #[test]
        fn zero_cap_is_clamped_to_one() {
            let mut weapon = WeaponSystem::new(WeaponKind::Cannon).with_level_cap(0);
            assert_eq!(weapon.level_cap(), 1);
            assert!(!weapon.upgrade());
        }
    }
}
