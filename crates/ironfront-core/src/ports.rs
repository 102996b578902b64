//! Collaborator interfaces.
//!
//! The engine talks to everything outside the combat core through the
//! traits in this module. Each trait has a default implementation so an
//! engine can run headless:
//!
//! | trait                   | default          | role                               |
//! |-------------------------|------------------|------------------------------------|
//! | [`TerrainModifier`]     | [`FlatTerrain`]  | movement multiplier in `(0, 1]`    |
//! | [`WeatherTick`]         | [`ClearWeather`] | visual tick, no simulation effect  |
//! | [`ObjectiveEvaluator`]  | `MissionTracker` | mission progress                   |
//! | [`Camera`]              | [`FollowCamera`] | viewport placement                 |
//! | [`AudioSink`]           | [`SilentAudio`]  | sound cues                         |
//! | [`Presenter`]           | [`NullPresenter`]| per-frame snapshot consumer        |
//! | [`InputSubscription`]   | none             | device listener released on cleanup|
//!
//! Calls are fire-and-forget. Nothing returned by a collaborator can stop a
//! frame; audio failures are logged and dropped.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::WorldBounds;
use crate::error::AudioError;
use crate::event::SimEvent;
use crate::mission::ObjectivesSnapshot;
use crate::snapshot::FrameSnapshot;
use crate::weapon::WeaponKind;

// =============================================================================
// Terrain and weather
// =============================================================================

/// Movement speed multiplier by position.
pub trait TerrainModifier: Send {
    /// Returns a multiplier in `(0, 1]` for a vehicle at `position`.
    fn movement_modifier(&self, position: Vec2) -> f32;
}

/// Terrain that never slows anything down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlatTerrain;

impl TerrainModifier for FlatTerrain {
    fn movement_modifier(&self, _position: Vec2) -> f32 {
        1.0
    }
}

/// Terrain with the same multiplier everywhere (mud, snow, sand).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniformTerrain {
    /// Multiplier applied at every position
    pub modifier: f32,
}

impl TerrainModifier for UniformTerrain {
    fn movement_modifier(&self, _position: Vec2) -> f32 {
        self.modifier
    }
}

/// Brings a collaborator-supplied modifier into `(0, 1]`.
///
/// Non-finite or non-positive values are replaced by 1.0 with a warning.
#[must_use]
pub fn sanitize_modifier(raw: f32) -> f32 {
    if raw.is_finite() && raw > 0.0 {
        raw.min(1.0)
    } else {
        warn!(modifier = raw, "terrain modifier out of range, using 1.0");
        1.0
    }
}

/// Visual weather state advanced once per frame.
pub trait WeatherTick: Send {
    /// Advances the effect to `now_ms`.
    fn tick(&mut self, now_ms: f64);
}

/// No weather.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearWeather;

impl WeatherTick for ClearWeather {
    fn tick(&mut self, _now_ms: f64) {}
}

// =============================================================================
// Objectives
// =============================================================================

/// Mission progress evaluator.
pub trait ObjectiveEvaluator: Send {
    /// Returns progress given where the player is and how many enemies have
    /// been destroyed so far.
    fn evaluate(&mut self, player_position: Vec2, destroyed: u32) -> ObjectivesSnapshot;

    /// Moves on to the next mission, returning `true` if it changed.
    ///
    /// Evaluators without a mission sequence never advance.
    fn advance(&mut self) -> bool {
        false
    }
}

// =============================================================================
// Camera
// =============================================================================

/// Viewport placement.
pub trait Camera: Send {
    /// Re-centers on `focus`.
    fn follow(&mut self, focus: Vec2);

    /// Updates the viewport size.
    fn resize(&mut self, width: f32, height: f32);

    /// Returns the top-left corner of the viewport in world space.
    fn position(&self) -> Vec2;
}

/// Camera that centers on its focus, clamped so the viewport never shows
/// anything outside the world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FollowCamera {
    bounds: WorldBounds,
    viewport: Vec2,
    position: Vec2,
}

impl FollowCamera {
    /// Default viewport size.
    pub const DEFAULT_VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);

    /// Creates a camera over `bounds` with the default viewport.
    #[must_use]
    pub const fn new(bounds: WorldBounds) -> Self {
        Self {
            bounds,
            viewport: Self::DEFAULT_VIEWPORT,
            position: Vec2::ZERO,
        }
    }

    /// Returns the viewport size.
    #[must_use]
    pub const fn viewport(&self) -> Vec2 {
        self.viewport
    }
}

impl Camera for FollowCamera {
    fn follow(&mut self, focus: Vec2) {
        let max = Vec2::new(
            (self.bounds.width - self.viewport.x).max(0.0),
            (self.bounds.height - self.viewport.y).max(0.0),
        );
        self.position = (focus - self.viewport * 0.5).clamp(Vec2::ZERO, max);
    }

    fn resize(&mut self, width: f32, height: f32) {
        if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
            self.viewport = Vec2::new(width, height);
        } else {
            warn!(width, height, "ignoring invalid viewport size");
        }
    }

    fn position(&self) -> Vec2 {
        self.position
    }
}

// =============================================================================
// Audio
// =============================================================================

/// A sound the engine asks to have played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "cue", content = "weapon", rename_all = "snake_case")]
pub enum SoundCue {
    /// Weapon discharge
    Fire(WeaponKind),
    /// Projectile impact
    Hit,
    /// Vehicle destroyed
    Explosion,
    /// Upgrade or ability
    PowerUp,
}

/// Sound output.
pub trait AudioSink: Send {
    /// Plays `cue`.
    ///
    /// # Errors
    ///
    /// Returns an [`AudioError`] if the platform refuses playback. The engine
    /// logs and drops it.
    fn play(&mut self, cue: SoundCue) -> Result<(), AudioError>;

    /// Applies a master volume already clamped to `[0, 1]` by the engine.
    fn set_volume(&mut self, _volume: f32) {}
}

/// Sink that accepts every cue and plays nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&mut self, _cue: SoundCue) -> Result<(), AudioError> {
        Ok(())
    }
}

// =============================================================================
// Presentation and input
// =============================================================================

/// Consumer of the per-frame snapshot.
pub trait Presenter: Send {
    /// Receives the frame's snapshot and the events raised during it.
    fn present(&mut self, snapshot: &FrameSnapshot, events: &[SimEvent]);
}

/// Presenter that discards everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn present(&mut self, _snapshot: &FrameSnapshot, _events: &[SimEvent]) {}
}

/// A live input-device listener owned by the engine.
pub trait InputSubscription: Send {
    /// Detaches the listener. Called at most once by the engine.
    fn release(&mut self);
}
