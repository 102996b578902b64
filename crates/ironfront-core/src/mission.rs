//! Missions and objective tracking.
//!
//! The engine reports two facts each frame: where the player is and how many
//! enemies have been destroyed. [`MissionTracker`] turns those into an
//! [`ObjectivesSnapshot`] for the current mission. Completion latches: an
//! objective that has been met stays met even if the player leaves the
//! region again.
//!
//! # Example
//!
//! ```
//! use ironfront_core::mission::MissionTracker;
//! use ironfront_core::ports::ObjectiveEvaluator;
//! use glam::Vec2;
//!
//! let mut tracker = MissionTracker::new();
//! let snapshot = tracker.evaluate(Vec2::new(1500.0, 1500.0), 5);
//!
//! assert_eq!(snapshot.mission_id, 1);
//! assert!(snapshot.all_complete);
//! ```

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ports::ObjectiveEvaluator;

/// A completion predicate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Objective {
    /// Destroy at least `count` enemies during this mission.
    DestroyEnemies {
        /// Required kills
        count: u32,
    },
    /// Drive within `radius` of `center`.
    ReachRegion {
        /// Region center
        center: Vec2,
        /// Region radius
        radius: f32,
    },
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DestroyEnemies { count } => write!(f, "destroy {count} enemy tanks"),
            Self::ReachRegion { center, .. } => {
                write!(f, "reach the checkpoint at ({:.0}, {:.0})", center.x, center.y)
            }
        }
    }
}

/// Permanent upgrade granted by a mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeReward {
    /// More armor
    ArmorBoost,
    /// Faster hull
    SpeedBoost,
    /// Harder hitting weapons
    DamageBoost,
    /// Larger energy pool
    EnergyBoost,
    /// Better field repairs
    RepairBoost,
}

/// What completing a mission pays out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionRewards {
    /// Experience points
    pub experience: u32,
    /// Upgrade tokens
    pub upgrades: Vec<UpgradeReward>,
}

/// One entry of the campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    /// 1-based campaign position
    pub id: u32,
    /// Short title
    pub name: String,
    /// Briefing line
    pub description: String,
    /// Enemies spawned when the mission starts
    pub enemy_count: u32,
    /// Completion predicates
    pub objectives: Vec<Objective>,
    /// Payout
    pub rewards: MissionRewards,
}

/// The built-in four-mission campaign.
#[must_use]
pub fn campaign() -> Vec<Mission> {
    vec![
        Mission {
            id: 1,
            name: "Forest Encounter".to_string(),
            description: "Clear the enemy tanks out of the forest. Watch for ambushes.".to_string(),
            enemy_count: 5,
            objectives: vec![Objective::DestroyEnemies { count: 5 }],
            rewards: MissionRewards {
                experience: 1000,
                upgrades: vec![UpgradeReward::ArmorBoost],
            },
        },
        Mission {
            id: 2,
            name: "Blizzard Assault".to_string(),
            description: "Break through the line in the storm and reach the checkpoint.".to_string(),
            enemy_count: 8,
            objectives: vec![
                Objective::ReachRegion {
                    center: Vec2::new(2500.0, 500.0),
                    radius: 150.0,
                },
                Objective::DestroyEnemies { count: 6 },
            ],
            rewards: MissionRewards {
                experience: 1500,
                upgrades: vec![UpgradeReward::SpeedBoost],
            },
        },
        Mission {
            id: 3,
            name: "Desert Escort".to_string(),
            description: "Escort the supply convoy through the blockade.".to_string(),
            enemy_count: 10,
            objectives: vec![
                Objective::ReachRegion {
                    center: Vec2::new(2700.0, 2700.0),
                    radius: 200.0,
                },
                Objective::DestroyEnemies { count: 8 },
            ],
            rewards: MissionRewards {
                experience: 2000,
                upgrades: vec![UpgradeReward::DamageBoost, UpgradeReward::EnergyBoost],
            },
        },
        Mission {
            id: 4,
            name: "City Defense".to_string(),
            description: "Hold the city against the full assault.".to_string(),
            enemy_count: 15,
            objectives: vec![Objective::DestroyEnemies { count: 15 }],
            rewards: MissionRewards {
                experience: 2500,
                upgrades: vec![UpgradeReward::RepairBoost],
            },
        },
    ]
}

/// Progress on one objective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveStatus {
    /// The predicate
    pub objective: Objective,
    /// Human-readable description
    pub description: String,
    /// Progress in `[0, 1]`
    pub progress: f32,
    /// Latched completion
    pub completed: bool,
}

/// Objective progress for the current mission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectivesSnapshot {
    /// Current mission id, 0 when no mission is loaded
    pub mission_id: u32,
    /// Current mission title
    pub mission_name: String,
    /// One entry per objective
    pub objectives: Vec<ObjectiveStatus>,
    /// `true` once every objective has been met
    pub all_complete: bool,
}

/// Default objective evaluator walking through a mission list.
#[derive(Debug, Clone, PartialEq)]
pub struct MissionTracker {
    missions: Vec<Mission>,
    current: usize,
    completed: Vec<bool>,
    baseline_destroyed: u32,
    last_destroyed: u32,
}

impl Default for MissionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl MissionTracker {
    /// Creates a tracker over the built-in campaign.
    #[must_use]
    pub fn new() -> Self {
        Self::with_missions(campaign())
    }

    /// Creates a tracker over a custom mission list.
    #[must_use]
    pub fn with_missions(missions: Vec<Mission>) -> Self {
        let completed = missions
            .first()
            .map(|m| vec![false; m.objectives.len()])
            .unwrap_or_default();
        Self {
            missions,
            current: 0,
            completed,
            baseline_destroyed: 0,
            last_destroyed: 0,
        }
    }

    /// Returns the current mission, if the list is not empty.
    #[must_use]
    pub fn current_mission(&self) -> Option<&Mission> {
        self.missions.get(self.current)
    }

    /// Returns the 0-based index of the current mission.
    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current
    }

    /// Returns how many missions the tracker holds.
    #[must_use]
    pub fn mission_count(&self) -> usize {
        self.missions.len()
    }

}

impl ObjectiveEvaluator for MissionTracker {
    /// Moves to the next mission. Stays on the last one.
    ///
    /// Kills counted so far do not carry over.
    fn advance(&mut self) -> bool {
        if self.current + 1 >= self.missions.len() {
            return false;
        }
        self.current += 1;
        self.baseline_destroyed = self.last_destroyed;
        self.completed = vec![false; self.missions[self.current].objectives.len()];
        if let Some(mission) = self.current_mission() {
            debug!(mission = mission.id, name = %mission.name, "mission tracker advanced");
        }
        true
    }

    fn evaluate(&mut self, player_position: Vec2, destroyed: u32) -> ObjectivesSnapshot {
        self.last_destroyed = destroyed;
        let Some(mission) = self.missions.get(self.current) else {
            return ObjectivesSnapshot::default();
        };
        let kills = destroyed.saturating_sub(self.baseline_destroyed);

        let objectives: Vec<ObjectiveStatus> = mission
            .objectives
            .iter()
            .zip(self.completed.iter_mut())
            .map(|(objective, done)| {
                let progress = match *objective {
                    Objective::DestroyEnemies { count } => {
                        if count == 0 {
                            1.0
                        } else {
                            #[allow(clippy::cast_precision_loss)]
                            let ratio = kills as f32 / count as f32;
                            ratio.min(1.0)
                        }
                    }
                    Objective::ReachRegion { center, radius } => {
                        if player_position.distance(center) <= radius {
                            1.0
                        } else {
                            0.0
                        }
                    }
                };
                *done |= progress >= 1.0;
                ObjectiveStatus {
                    objective: *objective,
                    description: objective.to_string(),
                    progress: if *done { 1.0 } else { progress },
                    completed: *done,
                }
            })
            .collect();

        ObjectivesSnapshot {
            mission_id: mission.id,
            mission_name: mission.name.clone(),
            all_complete: objectives.iter().all(|o| o.completed),
            objectives,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod campaign_tests {
        use super::*;

        #[test]
        fn four_missions_in_order() {
            let missions = campaign();
            assert_eq!(missions.len(), 4);
            let ids: Vec<u32> = missions.iter().map(|m| m.id).collect();
            assert_eq!(ids, vec![1, 2, 3, 4]);
            assert_eq!(missions[2].rewards.upgrades.len(), 2);
        }
    }

    mod tracker_tests {
        use super::*;

        #[test]
        fn kill_progress_is_fractional() {
            let mut tracker = MissionTracker::new();
            let snapshot = tracker.evaluate(Vec2::ZERO, 2);
            assert!((snapshot.objectives[0].progress - 0.4).abs() < 1e-4);
            assert!(!snapshot.all_complete);
        }

        #[test]
        fn region_completion_latches() {
            let mut tracker = MissionTracker::new();
            assert!(tracker.advance());

            let inside = tracker.evaluate(Vec2::new(2500.0, 520.0), 0);
            assert!(inside.objectives[0].completed);

            let outside = tracker.evaluate(Vec2::ZERO, 0);
            assert!(outside.objectives[0].completed);
            assert!(!outside.all_complete);
        }

        #[test]
        fn kills_reset_on_advance() {
            let mut tracker = MissionTracker::new();
            tracker.evaluate(Vec2::ZERO, 5);
            tracker.advance();

            let snapshot = tracker.evaluate(Vec2::ZERO, 8);
            assert_eq!(snapshot.mission_id, 2);
            assert!((snapshot.objectives[1].progress - 0.5).abs() < 1e-4);
        }

        #[test]
        fn advance_stays_on_last_mission() {
            let mut tracker = MissionTracker::new();
            for _ in 0..3 {
                assert!(tracker.advance());
            }
            assert!(!tracker.advance());
            assert_eq!(tracker.current_index(), 3);
        }

        #[test]
        fn empty_tracker_reports_nothing() {
            let mut tracker = MissionTracker::with_missions(Vec::new());
            assert_eq!(tracker.evaluate(Vec2::ZERO, 3), ObjectivesSnapshot::default());
            assert!(!tracker.advance());
        }
    }
}
