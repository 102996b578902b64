//! Vehicles: archetypes, resource pools and the special ability.
//!
//! Speeds are expressed in world units per reference frame (1/60 s). The
//! vehicle itself does not know about elapsed time when moving: callers pass a
//! direction already scaled by terrain and frame length.

use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{VehicleFlags, VehicleId};
use crate::error::ConfigError;
use crate::weapon::{WeaponKind, WeaponSystem};

/// Vehicle archetype identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleArchetype {
    /// Balanced tank driven by the player
    Player,
    /// Fast, fragile skirmisher
    Light,
    /// Slow, armored brawler
    Heavy,
}

impl VehicleArchetype {
    /// All archetypes.
    pub const ALL: [Self; 3] = [Self::Player, Self::Light, Self::Heavy];

    /// Identifier used in configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Light => "light",
            Self::Heavy => "heavy",
        }
    }

    /// Returns the fixed class definition for this archetype.
    #[must_use]
    pub const fn class(self) -> VehicleClass {
        match self {
            Self::Player => VehicleClass {
                max_health: 100.0,
                max_armor: 100.0,
                max_energy: 100.0,
                base_speed: 5.0,
                weapon: WeaponKind::Cannon,
                fire_rate_ms: 500.0,
            },
            Self::Light => VehicleClass {
                max_health: 70.0,
                max_armor: 60.0,
                max_energy: 80.0,
                base_speed: 6.0,
                weapon: WeaponKind::Machinegun,
                fire_rate_ms: 300.0,
            },
            Self::Heavy => VehicleClass {
                max_health: 120.0,
                max_armor: 120.0,
                max_energy: 60.0,
                base_speed: 3.0,
                weapon: WeaponKind::Missile,
                fire_rate_ms: 1000.0,
            },
        }
    }
}

impl fmt::Display for VehicleArchetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleArchetype {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|archetype| archetype.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownVehicle(s.to_string()))
    }
}

/// Immutable class definition shared by every vehicle of an archetype.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleClass {
    /// Health pool size
    pub max_health: f32,
    /// Armor pool size; armor / max is the damage reduction ratio
    pub max_armor: f32,
    /// Energy pool size
    pub max_energy: f32,
    /// Cruising speed in units per reference frame
    pub base_speed: f32,
    /// Weapon the vehicle spawns with
    pub weapon: WeaponKind,
    /// Minimum time between trigger pulls
    pub fire_rate_ms: f32,
}

/// Ability and regeneration tuning applied to every vehicle of a battle.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleTuning {
    /// Energy needed (and spent) to trigger the special ability
    pub ability_cost: f32,
    /// How long the ability lasts
    pub ability_duration_ms: f64,
    /// Speed multiplier while the ability is active
    pub ability_speed_multiplier: f32,
    /// Energy regained per second of simulation time
    pub energy_regen_per_second: f32,
}

impl Default for VehicleTuning {
    fn default() -> Self {
        Self {
            ability_cost: 30.0,
            ability_duration_ms: 3000.0,
            ability_speed_multiplier: 1.5,
            // 0.1 per frame at 60 frames per second
            energy_regen_per_second: 6.0,
        }
    }
}

/// A combatant.
///
/// # Invariants
///
/// - `0 <= health <= max_health`, `0 <= armor <= max_armor`,
///   `0 <= energy <= max_energy`
/// - `health == 0` if and only if the `DESTROYED` flag is set
/// - `speed > base_speed` only while `INVULNERABLE` is set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    id: VehicleId,
    archetype: VehicleArchetype,
    class: VehicleClass,
    tuning: VehicleTuning,
    position: Vec2,
    body_rotation: f32,
    turret_rotation: f32,
    speed: f32,
    health: f32,
    armor: f32,
    energy: f32,
    flags: VehicleFlags,
    ability_expiry_ms: Option<f64>,
    weapon: WeaponSystem,
    last_fire_ms: Option<f64>,
}

impl Vehicle {
    /// Creates an agent-driven vehicle with full pools.
    #[must_use]
    pub fn new(id: VehicleId, archetype: VehicleArchetype, position: Vec2) -> Self {
        let class = archetype.class();
        Self {
            id,
            archetype,
            class,
            tuning: VehicleTuning::default(),
            position,
            body_rotation: 0.0,
            turret_rotation: 0.0,
            speed: class.base_speed,
            health: class.max_health,
            armor: class.max_armor,
            energy: class.max_energy,
            flags: VehicleFlags::empty(),
            ability_expiry_ms: None,
            weapon: WeaponSystem::new(class.weapon),
            last_fire_ms: None,
        }
    }

    /// Marks the vehicle as player controlled.
    #[must_use]
    pub fn as_player(mut self) -> Self {
        self.flags.insert(VehicleFlags::PLAYER_CONTROLLED);
        self
    }

    /// Replaces the ability and regeneration tuning.
    #[must_use]
    pub fn with_tuning(mut self, tuning: VehicleTuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Replaces the spawn weapon.
    #[must_use]
    pub fn with_weapon(mut self, weapon: WeaponSystem) -> Self {
        self.weapon = weapon;
        self
    }

    /// Returns the vehicle's identifier.
    #[must_use]
    pub const fn id(&self) -> VehicleId {
        self.id
    }

    /// Returns the archetype the vehicle was spawned as.
    #[must_use]
    pub const fn archetype(&self) -> VehicleArchetype {
        self.archetype
    }

    /// Returns the class definition.
    #[must_use]
    pub const fn class(&self) -> &VehicleClass {
        &self.class
    }

    /// Returns the ability tuning.
    #[must_use]
    pub const fn tuning(&self) -> &VehicleTuning {
        &self.tuning
    }

    /// Returns the world position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Teleports the vehicle (spawn placement, level transitions).
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Returns the hull facing in radians.
    #[must_use]
    pub const fn body_rotation(&self) -> f32 {
        self.body_rotation
    }

    /// Returns the turret facing in radians.
    #[must_use]
    pub const fn turret_rotation(&self) -> f32 {
        self.turret_rotation
    }

    /// Returns the current speed.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Returns the class base speed.
    #[must_use]
    pub const fn base_speed(&self) -> f32 {
        self.class.base_speed
    }

    /// Returns the current health.
    #[must_use]
    pub const fn health(&self) -> f32 {
        self.health
    }

    /// Returns the current armor.
    #[must_use]
    pub const fn armor(&self) -> f32 {
        self.armor
    }

    /// Sets armor, clamped into `[0, max_armor]`.
    pub fn set_armor(&mut self, armor: f32) {
        self.armor = armor.clamp(0.0, self.class.max_armor);
    }

    /// Returns the current energy.
    #[must_use]
    pub const fn energy(&self) -> f32 {
        self.energy
    }

    /// Sets energy, clamped into `[0, max_energy]`.
    pub fn set_energy(&mut self, energy: f32) {
        self.energy = energy.clamp(0.0, self.class.max_energy);
    }

    /// Returns the status flags.
    #[must_use]
    pub const fn flags(&self) -> VehicleFlags {
        self.flags
    }

    /// Returns `true` for the player's vehicle.
    #[must_use]
    pub const fn is_player_controlled(&self) -> bool {
        self.flags.contains(VehicleFlags::PLAYER_CONTROLLED)
    }

    /// Returns `true` while the special ability is active.
    #[must_use]
    pub const fn is_invulnerable(&self) -> bool {
        self.flags.contains(VehicleFlags::INVULNERABLE)
    }

    /// Returns `true` once health has reached zero.
    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        self.flags.contains(VehicleFlags::DESTROYED)
    }

    /// Returns when the active ability wears off, if one is active.
    #[must_use]
    pub const fn ability_expiry_ms(&self) -> Option<f64> {
        self.ability_expiry_ms
    }

    /// Returns the bound weapon.
    #[must_use]
    pub const fn weapon(&self) -> &WeaponSystem {
        &self.weapon
    }

    /// Returns the bound weapon mutably (upgrades, firing).
    #[must_use]
    pub fn weapon_mut(&mut self) -> &mut WeaponSystem {
        &mut self.weapon
    }

    /// Swaps in a fresh level-1 weapon of `kind`, keeping the upgrade cap.
    pub fn select_weapon(&mut self, kind: WeaponKind) {
        let cap = self.weapon.level_cap();
        self.weapon = WeaponSystem::new(kind).with_level_cap(cap);
    }

    /// Returns the simulation time of the last trigger pull.
    #[must_use]
    pub const fn last_fire_ms(&self) -> Option<f64> {
        self.last_fire_ms
    }

    /// Displaces the vehicle by `direction * speed` and turns the hull to face it.
    ///
    /// `direction` is expected to be normalized and already multiplied by any
    /// terrain modifier and frame scale.
    pub fn move_along(&mut self, direction: Vec2) {
        self.position += direction * self.speed;
        if direction != Vec2::ZERO {
            self.body_rotation = direction.y.atan2(direction.x);
        }
    }

    /// Points the turret at `angle` without touching the hull.
    pub fn rotate_turret(&mut self, angle: f32) {
        self.turret_rotation = angle;
    }

    /// World position of the turret tip, `offset` units along the turret facing.
    #[must_use]
    pub fn muzzle(&self, offset: f32) -> Vec2 {
        self.position + Vec2::from_angle(self.turret_rotation) * offset
    }

    /// Applies damage after armor reduction.
    ///
    /// Returns `true` exactly when this call brought health to zero. An
    /// invulnerable or already destroyed vehicle takes nothing and returns `false`.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if self.is_destroyed() || self.is_invulnerable() {
            return false;
        }

        let reduction = if self.class.max_armor > 0.0 {
            self.armor / self.class.max_armor
        } else {
            0.0
        };
        let effective = amount.max(0.0) * (1.0 - reduction);
        self.health = (self.health - effective).clamp(0.0, self.class.max_health);

        if self.health <= 0.0 {
            self.health = 0.0;
            self.flags.insert(VehicleFlags::DESTROYED);
            return true;
        }
        false
    }

    /// Triggers invulnerability and a speed boost if enough energy is stored.
    ///
    /// Returns `false` and changes nothing when energy is short.
    pub fn activate_special_ability(&mut self, now_ms: f64) -> bool {
        if self.is_destroyed() || self.energy < self.tuning.ability_cost {
            return false;
        }

        self.energy -= self.tuning.ability_cost;
        self.flags.insert(VehicleFlags::INVULNERABLE);
        self.speed = self.class.base_speed * self.tuning.ability_speed_multiplier;
        self.ability_expiry_ms = Some(now_ms + self.tuning.ability_duration_ms);
        debug!(vehicle = %self.id, energy = self.energy, "special ability activated");
        true
    }

    /// Advances timers and regeneration.
    ///
    /// Returns `true` if the special ability expired during this call.
    pub fn update(&mut self, now_ms: f64, elapsed_ms: f64) -> bool {
        let mut expired = false;
        if self.ability_expiry_ms.is_some_and(|expiry| now_ms >= expiry) {
            self.flags.remove(VehicleFlags::INVULNERABLE);
            self.speed = self.class.base_speed;
            self.ability_expiry_ms = None;
            expired = true;
            debug!(vehicle = %self.id, "special ability expired");
        }

        if self.energy < self.class.max_energy {
            #[allow(clippy::cast_possible_truncation)]
            let gained = (f64::from(self.tuning.energy_regen_per_second) * elapsed_ms / 1000.0) as f32;
            self.energy = (self.energy + gained.max(0.0)).min(self.class.max_energy);
        }

        expired
    }

    /// Returns `true` if the class fire rate has elapsed since the last shot.
    #[must_use]
    pub fn can_fire(&self, now_ms: f64) -> bool {
        self.last_fire_ms
            .map_or(true, |last| now_ms - last >= f64::from(self.class.fire_rate_ms))
    }

    /// Records a trigger pull.
    pub fn mark_fired(&mut self, now_ms: f64) {
        self.last_fire_ms = Some(now_ms);
    }

    /// Spends energy, never dropping below zero.
    pub fn drain_energy(&mut self, amount: f32) {
        self.energy = (self.energy - amount.max(0.0)).max(0.0);
    }
}
