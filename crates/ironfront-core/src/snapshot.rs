//! Read-only frame snapshots for the presentation layer.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::WorldBounds;
use crate::entity::{Vehicle, VehicleArchetype, VehicleId};
use crate::mission::ObjectivesSnapshot;
use crate::weapon::WeaponKind;

/// HUD view of one vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleSnapshot {
    /// Identifier
    pub id: VehicleId,
    /// Archetype
    pub archetype: VehicleArchetype,
    /// World position
    pub position: Vec2,
    /// Hull facing
    pub body_rotation: f32,
    /// Turret facing
    pub turret_rotation: f32,
    /// Current health
    pub health: f32,
    /// Health pool size
    pub max_health: f32,
    /// Current armor
    pub armor: f32,
    /// Armor pool size
    pub max_armor: f32,
    /// Current energy
    pub energy: f32,
    /// Energy pool size
    pub max_energy: f32,
    /// Special ability active
    pub invulnerable: bool,
    /// Health reached zero
    pub destroyed: bool,
    /// Bound weapon
    pub weapon: WeaponKind,
    /// Weapon level
    pub weapon_level: u32,
}

impl From<&Vehicle> for VehicleSnapshot {
    fn from(v: &Vehicle) -> Self {
        Self {
            id: v.id(),
            archetype: v.archetype(),
            position: v.position(),
            body_rotation: v.body_rotation(),
            turret_rotation: v.turret_rotation(),
            health: v.health(),
            max_health: v.class().max_health,
            armor: v.armor(),
            max_armor: v.class().max_armor,
            energy: v.energy(),
            max_energy: v.class().max_energy,
            invulnerable: v.is_invulnerable(),
            destroyed: v.is_destroyed(),
            weapon: v.weapon().kind(),
            weapon_level: v.weapon().level(),
        }
    }
}

/// What a minimap dot represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    /// The player's vehicle
    Player,
    /// A live enemy
    Enemy,
}

/// A minimap dot in normalized world coordinates (`[0, 1]` on both axes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinimapMarker {
    /// What the dot stands for
    pub kind: MarkerKind,
    /// Position divided by world size
    pub position: Vec2,
}

impl MinimapMarker {
    /// Places a marker for a world position.
    #[must_use]
    pub fn new(kind: MarkerKind, world_position: Vec2, bounds: &WorldBounds) -> Self {
        let clamped = bounds.clamp(world_position);
        Self {
            kind,
            position: Vec2::new(clamped.x / bounds.width, clamped.y / bounds.height),
        }
    }
}

/// Everything the presentation layer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    /// Frames completed
    pub tick: u64,
    /// Simulation time
    pub now_ms: f64,
    /// Player vehicle
    pub player: VehicleSnapshot,
    /// Live enemies in spawn order
    pub enemies: Vec<VehicleSnapshot>,
    /// Live projectiles
    pub projectile_count: usize,
    /// Running score
    pub score: u64,
    /// Enemies destroyed so far
    pub destroyed: u32,
    /// Camera top-left corner
    pub camera: Vec2,
    /// Mission progress
    pub objectives: ObjectivesSnapshot,
    /// Minimap dots, player first
    pub minimap: Vec<MinimapMarker>,
}
