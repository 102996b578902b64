//! Test helper functions for setting up engines and vehicles.
//!
//! This module provides factory functions, scripted agents and recording
//! collaborators that make writing tests more ergonomic and consistent.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use glam::Vec2;

use crate::agent::{Agent, AgentContext, Intent};
use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::entity::{VehicleArchetype, VehicleId};
use crate::error::AudioError;
use crate::event::SimEvent;
use crate::ports::{AudioSink, InputSubscription, Presenter, SoundCue};
use crate::snapshot::FrameSnapshot;

/// One reference frame at 60 frames per second.
pub const FRAME_MS: f64 = 1000.0 / 60.0;

// =============================================================================
// Engine Setup
// =============================================================================

/// Creates an engine with the default configuration and the player at `start`.
pub fn engine_with_player_at(start: Vec2, seed: u64) -> Engine {
    let config = EngineConfig {
        player_start: start,
        ..EngineConfig::default()
    };
    Engine::new(config, seed).expect("default config is valid")
}

/// Spawns an unarmored enemy that never acts.
///
/// # Returns
///
/// The spawned enemy's ID.
pub fn spawn_dummy(engine: &mut Engine, archetype: VehicleArchetype, position: Vec2) -> VehicleId {
    let id = engine.spawn_enemy(archetype, position, Box::new(ScriptedAgent::idle()));
    engine
        .enemy_mut(id)
        .expect("enemy just spawned")
        .set_armor(0.0);
    id
}

/// Steps the engine `frames` times by one reference frame each.
pub fn run_frames(engine: &mut Engine, frames: usize) {
    for _ in 0..frames {
        engine.step(FRAME_MS);
    }
}

/// Steps the engine and returns every event published along the way.
pub fn run_frames_collecting(engine: &mut Engine, frames: usize) -> Vec<SimEvent> {
    let mut events = Vec::new();
    for _ in 0..frames {
        engine.step(FRAME_MS);
        events.extend_from_slice(engine.last_events());
    }
    events
}

/// Counts events matching a predicate.
pub fn count_events(events: &[SimEvent], predicate: impl Fn(&SimEvent) -> bool) -> usize {
    events.iter().filter(|e| predicate(e)).count()
}

// =============================================================================
// Scripted Agents
// =============================================================================

/// An agent that returns the same intent every frame.
#[derive(Debug, Clone, Copy)]
pub struct ScriptedAgent {
    intent: Intent,
}

impl ScriptedAgent {
    /// An agent that never does anything.
    pub const fn idle() -> Self {
        Self {
            intent: Intent::idle(),
        }
    }

    /// An agent that always returns `intent`.
    pub const fn always(intent: Intent) -> Self {
        Self { intent }
    }
}

impl Agent for ScriptedAgent {
    fn decide(&self, _ctx: &AgentContext<'_>) -> Intent {
        self.intent
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

// =============================================================================
// Recording Collaborators
// =============================================================================

/// Presenter that keeps every frame it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingPresenter {
    /// Frames in publication order
    pub frames: Arc<Mutex<Vec<(FrameSnapshot, Vec<SimEvent>)>>>,
}

impl Presenter for RecordingPresenter {
    fn present(&mut self, snapshot: &FrameSnapshot, events: &[SimEvent]) {
        self.frames
            .lock()
            .unwrap()
            .push((snapshot.clone(), events.to_vec()));
    }
}

/// Audio sink that rejects every cue and counts the attempts.
#[derive(Debug, Clone, Default)]
pub struct RejectingAudio {
    /// Number of `play` calls
    pub attempts: Arc<AtomicUsize>,
}

impl AudioSink for RejectingAudio {
    fn play(&mut self, cue: SoundCue) -> Result<(), AudioError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(AudioError::Rejected(format!("{cue:?}")))
    }
}

/// Audio sink that records every volume the engine applies.
#[derive(Debug, Clone, Default)]
pub struct VolumeAudio {
    /// Volumes in the order they were set
    pub volumes: Arc<Mutex<Vec<f32>>>,
}

impl AudioSink for VolumeAudio {
    fn play(&mut self, _cue: SoundCue) -> Result<(), AudioError> {
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) {
        self.volumes.lock().unwrap().push(volume);
    }
}

/// Input subscription that counts releases.
#[derive(Debug, Clone, Default)]
pub struct CountingInput {
    /// Number of `release` calls
    pub releases: Arc<AtomicUsize>,
}

impl InputSubscription for CountingInput {
    fn release(&mut self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}
