//! Autonomous control for non-player vehicles.
//!
//! Agents read, the engine writes. Each frame the engine hands every agent
//! an [`AgentContext`] (its own vehicle, the vehicle it is hunting, the world
//! rectangle and the current simulation time) and gets back an [`Intent`].
//! The engine then performs the movement, turret rotation and firing itself,
//! using the same code path as player input.
//!
//! Because agents only read, the engine evaluates them in parallel and
//! applies the results in enemy order, so the outcome does not depend on
//! thread scheduling.
//!
//! # Example
//!
//! ```
//! use ironfront_core::agent::{Agent, AgentContext, PursuitAgent};
//! use ironfront_core::config::WorldBounds;
//! use ironfront_core::entity::{Vehicle, VehicleArchetype, VehicleId};
//! use glam::Vec2;
//!
//! let hunter = Vehicle::new(VehicleId::new(2), VehicleArchetype::Light, Vec2::new(0.0, 0.0));
//! let prey = Vehicle::new(VehicleId::new(1), VehicleArchetype::Player, Vec2::new(200.0, 0.0));
//!
//! let ctx = AgentContext {
//!     vehicle: &hunter,
//!     target: Some(&prey),
//!     bounds: WorldBounds::new(1000.0, 1000.0).unwrap(),
//!     hitbox_radius: 25.0,
//!     now_ms: 0.0,
//! };
//!
//! let intent = PursuitAgent::new().decide(&ctx);
//! assert_eq!(intent.movement, Some(Vec2::X));
//! assert!(intent.fire);
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::collision::vehicles_overlap;
use crate::config::WorldBounds;
use crate::entity::Vehicle;

/// A per-frame decision for one vehicle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    /// Direction to drive in; normalized by the engine
    pub movement: Option<Vec2>,
    /// Turret facing in radians
    pub aim: Option<f32>,
    /// Pull the trigger if the weapon allows it
    pub fire: bool,
    /// Trigger the special ability if energy allows it
    pub ability: bool,
}

impl Intent {
    /// An intent that does nothing.
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            movement: None,
            aim: None,
            fire: false,
            ability: false,
        }
    }
}

/// Read-only world knowledge handed to an agent.
#[derive(Debug, Clone, Copy)]
pub struct AgentContext<'a> {
    /// The vehicle being controlled
    pub vehicle: &'a Vehicle,
    /// The vehicle to engage, if one is alive
    pub target: Option<&'a Vehicle>,
    /// World rectangle
    pub bounds: WorldBounds,
    /// Hitbox radius used for spacing
    pub hitbox_radius: f32,
    /// Current simulation time
    pub now_ms: f64,
}

/// Decision function for an autonomous vehicle.
///
/// Implementations must be pure with respect to the world: they are called
/// from worker threads with shared references only.
pub trait Agent: Send + Sync {
    /// Returns this frame's intent.
    fn decide(&self, ctx: &AgentContext<'_>) -> Intent;

    /// Short name used in logs.
    fn name(&self) -> &str {
        "agent"
    }
}

/// Seek the target, keep the turret on it, fire when in weapon range.
///
/// Stops closing once the two hulls would touch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PursuitAgent {
    /// Overrides the weapon range as the firing distance
    pub engage_range: Option<f32>,
}

impl PursuitAgent {
    /// Creates an agent that fires at its weapon's range.
    #[must_use]
    pub const fn new() -> Self {
        Self { engage_range: None }
    }

    /// Creates an agent that fires within `range` units.
    #[must_use]
    pub const fn with_engage_range(range: f32) -> Self {
        Self {
            engage_range: Some(range),
        }
    }
}

impl Agent for PursuitAgent {
    fn decide(&self, ctx: &AgentContext<'_>) -> Intent {
        let Some(target) = ctx.target.filter(|t| !t.is_destroyed()) else {
            return Intent::idle();
        };

        let own = ctx.vehicle.position();
        let offset = target.position() - own;
        let distance = offset.length();
        let range = self
            .engage_range
            .unwrap_or_else(|| ctx.vehicle.weapon().stats().range);

        let aim = (distance > 0.0).then(|| offset.y.atan2(offset.x));

        // Stop if one more step would put the hulls in contact.
        let next = own + offset.normalize_or_zero() * ctx.vehicle.speed();
        let movement = if vehicles_overlap(next, target.position(), ctx.hitbox_radius) {
            None
        } else {
            Some(offset.normalize_or_zero()).filter(|d| *d != Vec2::ZERO)
        };

        Intent {
            movement,
            aim,
            fire: distance <= range,
            ability: false,
        }
    }

    fn name(&self) -> &str {
        "pursuit"
    }
}

/// Stay put, track the target, fire when it comes into range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HoldPositionAgent;

impl Agent for HoldPositionAgent {
    fn decide(&self, ctx: &AgentContext<'_>) -> Intent {
        let Some(target) = ctx.target.filter(|t| !t.is_destroyed()) else {
            return Intent::idle();
        };
        let offset = target.position() - ctx.vehicle.position();
        Intent {
            movement: None,
            aim: Some(offset.y.atan2(offset.x)),
            fire: offset.length() <= ctx.vehicle.weapon().stats().range,
            ability: false,
        }
    }

    fn name(&self) -> &str {
        "hold"
    }
}
