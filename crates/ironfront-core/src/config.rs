//! Engine configuration.
//!
//! [`EngineConfig`] gathers every tunable the frame loop reads. It can be
//! built in code (starting from [`Default`]) or loaded from JSON, where any
//! missing field falls back to its default:
//!
//! ```
//! use ironfront_core::config::EngineConfig;
//!
//! let config = EngineConfig::from_json_str(r#"{ "world_width": 800, "world_height": 600 }"#).unwrap();
//! assert_eq!(config.world_width, 800.0);
//! assert_eq!(config.hitbox_radius, 25.0);
//! ```
//!
//! Unknown archetype identifiers are rejected while parsing, so a bad file
//! fails at construction time rather than at the first shot.

use std::io::Read;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::{VehicleArchetype, VehicleTuning};
use crate::error::ConfigError;
use crate::weapon::WeaponSystem;

/// The axis-aligned world rectangle `[0, width] x [0, height]`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    /// Extent along x
    pub width: f32,
    /// Extent along y
    pub height: f32,
}

impl WorldBounds {
    /// Creates bounds, rejecting non-positive or non-finite dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidWorld`] if either dimension is not a
    /// positive finite number.
    pub fn new(width: f32, height: f32) -> Result<Self, ConfigError> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if valid(width) && valid(height) {
            Ok(Self { width, height })
        } else {
            Err(ConfigError::InvalidWorld { width, height })
        }
    }

    /// Returns `true` if `point` lies inside the rectangle (edges included).
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.x <= self.width && point.y >= 0.0 && point.y <= self.height
    }

    /// Clamps `point` into the rectangle.
    #[must_use]
    pub fn clamp(&self, point: Vec2) -> Vec2 {
        Vec2::new(point.x.clamp(0.0, self.width), point.y.clamp(0.0, self.height))
    }

    /// Returns the rectangle's center.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

/// Every tunable read by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// World width in units
    pub world_width: f32,
    /// World height in units
    pub world_height: f32,
    /// Where the player spawns
    pub player_start: Vec2,
    /// Archetype the player drives
    pub player_archetype: VehicleArchetype,
    /// Radius of every circular hitbox
    pub hitbox_radius: f32,
    /// Distance from hull center to turret tip
    pub muzzle_offset: f32,
    /// Length of the frame the per-frame speeds were tuned for
    pub reference_frame_ms: f64,
    /// Upper bound on a single frame's elapsed time
    pub max_frame_delta_ms: f64,
    /// Ability and regeneration tuning
    pub vehicle: VehicleTuning,
    /// Score awarded per destroyed enemy
    pub kill_score: u64,
    /// Highest reachable weapon level
    pub weapon_level_cap: u32,
    /// Distance from the world edge kept clear when spawning waves
    pub spawn_margin: f32,
    /// Share of the armor pool vehicles spawn with, in `[0, 1]`
    pub spawn_armor_fraction: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            world_width: 3000.0,
            world_height: 3000.0,
            player_start: Vec2::new(1500.0, 1500.0),
            player_archetype: VehicleArchetype::Player,
            hitbox_radius: 25.0,
            muzzle_offset: 30.0,
            reference_frame_ms: 1000.0 / 60.0,
            max_frame_delta_ms: 250.0,
            vehicle: VehicleTuning::default(),
            kill_score: 100,
            weapon_level_cap: WeaponSystem::DEFAULT_LEVEL_CAP,
            spawn_margin: 100.0,
            spawn_armor_fraction: 1.0,
        }
    }
}

impl EngineConfig {
    /// Parses a JSON document and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown archetype
    /// identifiers, or any error from [`EngineConfig::validate`].
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON document.
    ///
    /// # Errors
    ///
    /// Same as [`EngineConfig::from_json_str`].
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Returns the world rectangle.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidWorld`] for a degenerate world.
    pub fn bounds(&self) -> Result<WorldBounds, ConfigError> {
        WorldBounds::new(self.world_width, self.world_height)
    }

    /// Checks every value is in range.
    ///
    /// # Errors
    ///
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bounds()?;

        let positive = |field: &'static str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::InvalidValue { field, value })
            }
        };
        let non_negative = |field: &'static str, value: f64| {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::InvalidValue { field, value })
            }
        };

        positive("hitbox_radius", f64::from(self.hitbox_radius))?;
        non_negative("muzzle_offset", f64::from(self.muzzle_offset))?;
        positive("reference_frame_ms", self.reference_frame_ms)?;
        positive("max_frame_delta_ms", self.max_frame_delta_ms)?;
        non_negative("vehicle.ability_cost", f64::from(self.vehicle.ability_cost))?;
        non_negative("vehicle.ability_duration_ms", self.vehicle.ability_duration_ms)?;
        positive(
            "vehicle.ability_speed_multiplier",
            f64::from(self.vehicle.ability_speed_multiplier),
        )?;
        non_negative(
            "vehicle.energy_regen_per_second",
            f64::from(self.vehicle.energy_regen_per_second),
        )?;
        positive("weapon_level_cap", f64::from(self.weapon_level_cap))?;
        non_negative("spawn_margin", f64::from(self.spawn_margin))?;
        if !(0.0..=1.0).contains(&self.spawn_armor_fraction) {
            return Err(ConfigError::InvalidValue {
                field: "spawn_armor_fraction",
                value: f64::from(self.spawn_armor_fraction),
            });
        }

        if self.spawn_margin * 2.0 > self.world_width.min(self.world_height) {
            return Err(ConfigError::InvalidValue {
                field: "spawn_margin",
                value: f64::from(self.spawn_margin),
            });
        }
        if !self.player_start.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "player_start",
                value: f64::from(self.player_start.x),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod bounds_tests {
        use super::*;

        #[test]
        fn rejects_degenerate_world() {
            assert!(matches!(
                WorldBounds::new(0.0, 10.0),
                Err(ConfigError::InvalidWorld { .. })
            ));
            assert!(WorldBounds::new(f32::NAN, 10.0).is_err());
        }

        #[test]
        fn contains_includes_edges() {
            let bounds = WorldBounds::new(100.0, 50.0).unwrap();
            assert!(bounds.contains(Vec2::new(0.0, 0.0)));
            assert!(bounds.contains(Vec2::new(100.0, 50.0)));
            assert!(!bounds.contains(Vec2::new(100.1, 10.0)));
            assert!(!bounds.contains(Vec2::new(10.0, -0.1)));
        }

        #[test]
        fn clamp_pulls_points_inside() {
            let bounds = WorldBounds::new(100.0, 50.0).unwrap();
            assert_eq!(bounds.clamp(Vec2::new(-5.0, 80.0)), Vec2::new(0.0, 50.0));
        }
    }

    mod parse_tests {
        use super::*;

        #[test]
        fn defaults_fill_missing_fields() {
            let config = EngineConfig::from_json_str("{}").unwrap();
            assert_eq!(config, EngineConfig::default());
        }

        #[test]
        fn nested_tuning_overrides() {
            let config =
                EngineConfig::from_json_str(r#"{ "vehicle": { "ability_cost": 50 } }"#).unwrap();
            assert_eq!(config.vehicle.ability_cost, 50.0);
            assert_eq!(config.vehicle.ability_duration_ms, 3000.0);
        }

        #[test]
        fn unknown_archetype_fails_at_load() {
            let err =
                EngineConfig::from_json_str(r#"{ "player_archetype": "hovercraft" }"#).unwrap_err();
            assert!(matches!(err, ConfigError::Parse(_)));
        }

        #[test]
        fn reader_source_is_supported() {
            let json = br#"{ "kill_score": 250 }"#;
            let config = EngineConfig::from_json_reader(&json[..]).unwrap();
            assert_eq!(config.kill_score, 250);
        }
    }

    mod validate_tests {
        use super::*;

        #[test]
        fn default_is_valid() {
            assert!(EngineConfig::default().validate().is_ok());
        }

        #[test]
        fn zero_hitbox_is_rejected() {
            let config = EngineConfig {
                hitbox_radius: 0.0,
                ..EngineConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidValue {
                    field: "hitbox_radius",
                    ..
                })
            ));
        }

        #[test]
        fn armor_fraction_must_be_a_ratio() {
            let config = EngineConfig {
                spawn_armor_fraction: 1.5,
                ..EngineConfig::default()
            };
            assert!(config.validate().is_err());
        }

        #[test]
        fn oversized_margin_is_rejected() {
            let config = EngineConfig {
                world_width: 150.0,
                spawn_margin: 100.0,
                ..EngineConfig::default()
            };
            assert!(config.validate().is_err());
        }
    }
}
