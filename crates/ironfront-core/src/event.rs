//! State-change events emitted by the engine.
//!
//! Events are recorded in the order they happen during a frame and handed
//! to the presenter at the end of it. Observers (HUD, score, mission
//! tracking, audio) react to events; they never reach into the engine.
//!
//! # Usage
//!
//! The engine owns an [`EventLog`]. After each frame the log is drained
//! with [`EventLog::take_events`]; anything not drained accumulates.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::VehicleId;
use crate::weapon::WeaponKind;

/// Something observers may want to react to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    /// A vehicle pulled the trigger.
    ProjectileFired {
        /// Firing vehicle
        shooter: VehicleId,
        /// Weapon used
        weapon: WeaponKind,
        /// Number of projectiles spawned
        count: u32,
    },
    /// A projectile connected.
    VehicleDamaged {
        /// Vehicle that was hit
        target: VehicleId,
        /// Firer of the projectile, if known
        source: Option<VehicleId>,
        /// Health lost after armor and invulnerability
        amount: f32,
        /// Health remaining
        health: f32,
        /// Where the projectile connected
        position: Vec2,
    },
    /// An enemy reached zero health and was removed.
    EnemyDestroyed {
        /// Destroyed enemy
        victim: VehicleId,
        /// Firer of the killing projectile
        killer: Option<VehicleId>,
        /// Score awarded
        score: u64,
        /// Where the wreck lies
        position: Vec2,
    },
    /// Score moved.
    ScoreChanged {
        /// Amount added
        delta: u64,
        /// Running total
        total: u64,
    },
    /// The player's health reached zero. Emitted once.
    PlayerDestroyed {
        /// Player vehicle
        player: VehicleId,
    },
    /// A special ability started.
    AbilityActivated {
        /// Vehicle that triggered it
        vehicle: VehicleId,
        /// When it wears off
        expires_at_ms: f64,
    },
    /// A special ability wore off.
    AbilityExpired {
        /// Vehicle whose ability ended
        vehicle: VehicleId,
    },
    /// The player's weapon gained a level.
    WeaponUpgraded {
        /// Player vehicle
        vehicle: VehicleId,
        /// Weapon archetype
        weapon: WeaponKind,
        /// New level
        level: u32,
    },
    /// The objective evaluator moved on to another mission.
    MissionAdvanced {
        /// Id of the mission now in progress
        mission_id: u32,
    },
    /// The player switched weapon.
    WeaponSelected {
        /// Player vehicle
        vehicle: VehicleId,
        /// Newly bound archetype
        weapon: WeaponKind,
    },
}

/// Ordered buffer of events for the current frame.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<SimEvent>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event.
    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    /// Drains and returns all recorded events in the order they were pushed.
    pub fn take_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Returns the number of events currently in the log.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn destroyed(id: u64) -> SimEvent {
        SimEvent::EnemyDestroyed {
            victim: VehicleId::new(id),
            killer: Some(VehicleId::new(1)),
            score: 100,
            position: Vec2::new(10.0, 20.0),
        }
    }

    #[test]
    fn new_log_is_empty() {
        let log = EventLog::new();
        assert_eq!(log.event_count(), 0);
    }

    #[test]
    fn take_events_drains_in_order() {
        let mut log = EventLog::new();
        log.push(destroyed(2));
        log.push(destroyed(3));
        assert_eq!(log.event_count(), 2);

        let events = log.take_events();
        assert_eq!(events, vec![destroyed(2), destroyed(3)]);
        assert_eq!(log.event_count(), 0);
        assert!(log.take_events().is_empty());
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_value(SimEvent::PlayerDestroyed {
            player: VehicleId::new(1),
        })
        .unwrap();
        assert_eq!(json["type"], "player_destroyed");
        assert_eq!(json["player"], 1);
    }

    #[test]
    fn wreck_position_is_serialized() {
        let json = serde_json::to_value(destroyed(2)).unwrap();
        assert_eq!(json["type"], "enemy_destroyed");
        assert_eq!(json["position"], serde_json::json!([10.0, 20.0]));
    }

    #[test]
    fn mission_advance_serializes() {
        let json = serde_json::to_value(SimEvent::MissionAdvanced { mission_id: 2 }).unwrap();
        assert_eq!(json["type"], "mission_advanced");
        assert_eq!(json["mission_id"], 2);
    }
}
