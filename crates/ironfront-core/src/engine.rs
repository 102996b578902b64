//! The frame loop.
//!
//! [`Engine`] owns the player, the enemies with their agents, and every live
//! projectile. One call to [`Engine::update`] runs one frame in a fixed
//! order:
//!
//! 1. **CLOCK**: turn the caller's timestamp into a clamped elapsed time
//! 2. **PLAYER**: apply buffered input (movement scaled by terrain, aim,
//!    ability, fire)
//! 3. **AGENTS**: evaluate every agent in parallel, then apply the intents
//!    sequentially in enemy order
//! 4. **PROJECTILES**: integrate positions; anything leaving the world goes
//!    inactive
//! 5. **COMBAT**: resolve hits, remove destroyed enemies, score kills, then
//!    purge inactive projectiles
//!
//!    Steps 4 and 5 run in sub-steps so no projectile travels more than one
//!    hitbox radius between collision tests, whatever the frame length.
//! 6. **TIMERS**: ability expiry and energy regeneration
//! 7. **COLLABORATORS**: weather tick, camera follow, objective evaluation
//! 8. **PUBLISH**: hand the snapshot and the frame's events to the presenter
//!
//! # Determinism
//!
//! The only randomness (weapon spread, wave placement) comes from a
//! `ChaCha8Rng` seeded at construction and consumed in a fixed order. Agent
//! evaluation runs on the rayon pool but results are collected in enemy
//! order before anything is applied. Given the same seed, the same
//! timestamps and the same input calls, two engines produce identical
//! snapshots.
//!
//! # Example
//!
//! ```
//! use ironfront_core::config::EngineConfig;
//! use ironfront_core::engine::Engine;
//! use ironfront_core::entity::VehicleArchetype;
//! use glam::Vec2;
//!
//! let mut engine = Engine::new(EngineConfig::default(), 42).unwrap();
//! engine.spawn_enemy_wave(3, VehicleArchetype::Light);
//!
//! engine.handle_move_intent(Vec2::new(1.0, 0.0));
//! for frame in 0..60 {
//!     engine.update(f64::from(frame) * 1000.0 / 60.0);
//! }
//!
//! assert_eq!(engine.tick(), 60);
//! assert!(engine.player_vehicle().position().x > 1500.0);
//! ```

use std::borrow::{Borrow, BorrowMut};
use std::fmt;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::agent::{Agent, AgentContext, Intent, PursuitAgent};
use crate::clock::{FrameTime, SimClock};
use crate::config::{EngineConfig, WorldBounds};
use crate::entity::{Projectile, Vehicle, VehicleArchetype, VehicleId};
use crate::error::ConfigError;
use crate::event::{EventLog, SimEvent};
use crate::mission::{MissionTracker, ObjectivesSnapshot};
use crate::ports::{
    sanitize_modifier, AudioSink, Camera, ClearWeather, FlatTerrain, FollowCamera,
    InputSubscription, NullPresenter, ObjectiveEvaluator, Presenter, SilentAudio, SoundCue,
    TerrainModifier, WeatherTick,
};
use crate::resolver::{CombatOutcome, CombatResolver};
use crate::snapshot::{FrameSnapshot, MarkerKind, MinimapMarker, VehicleSnapshot};
use crate::weapon::{WeaponKind, WeaponSystem};

/// Upper bound on projectile sub-steps in one frame.
const MAX_PROJECTILE_SUBSTEPS: usize = 64;

// =============================================================================
// Enemy slot
// =============================================================================

/// An enemy vehicle and the agent driving it.
struct Enemy {
    vehicle: Vehicle,
    agent: Box<dyn Agent>,
}

impl Borrow<Vehicle> for Enemy {
    fn borrow(&self) -> &Vehicle {
        &self.vehicle
    }
}

impl BorrowMut<Vehicle> for Enemy {
    fn borrow_mut(&mut self) -> &mut Vehicle {
        &mut self.vehicle
    }
}

/// Player input buffered between frames.
#[derive(Debug, Clone, Copy, Default)]
struct PlayerInput {
    movement: Vec2,
    aim: Option<f32>,
    firing: bool,
    ability: bool,
}

/// Projectiles produced by one trigger pull.
struct Volley {
    shooter: VehicleId,
    weapon: WeaponKind,
    projectiles: Vec<Projectile>,
}

// =============================================================================
// Engine
// =============================================================================

/// The combat simulation.
pub struct Engine {
    config: EngineConfig,
    bounds: WorldBounds,
    resolver: CombatResolver,
    clock: SimClock,
    rng: ChaCha8Rng,
    seed: u64,
    next_id: u64,
    tick: u64,

    player: Vehicle,
    enemies: Vec<Enemy>,
    projectiles: Vec<Projectile>,
    input: PlayerInput,

    destroyed: u32,
    score: u64,
    player_down_reported: bool,
    events: EventLog,
    last_events: Vec<SimEvent>,
    objectives: ObjectivesSnapshot,

    terrain: Box<dyn TerrainModifier>,
    weather: Box<dyn WeatherTick>,
    evaluator: Box<dyn ObjectiveEvaluator>,
    camera: Box<dyn Camera>,
    audio: Box<dyn AudioSink>,
    presenter: Box<dyn Presenter>,
    input_subscription: Option<Box<dyn InputSubscription>>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("tick", &self.tick)
            .field("now_ms", &self.clock.now_ms())
            .field("seed", &self.seed)
            .field("player", &self.player.id())
            .field("enemies", &format!("[{} enemies]", self.enemies.len()))
            .field("projectiles", &self.projectiles.len())
            .field("score", &self.score)
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Creates an engine with the player spawned and no enemies.
    ///
    /// Collaborators start as headless defaults: flat terrain, clear weather,
    /// the built-in mission campaign, a follow camera, silent audio and a
    /// presenter that discards snapshots.
    ///
    /// # Arguments
    ///
    /// * `config` - Tunables; validated here
    /// * `seed` - Seed for weapon spread and wave placement
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration fails validation.
    pub fn new(config: EngineConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let bounds = config.bounds()?;

        let player = Self::build_vehicle(
            &config,
            VehicleId::new(1),
            config.player_archetype,
            bounds.clamp(config.player_start),
        )
        .as_player();

        let mut evaluator = MissionTracker::new();
        let objectives = evaluator.evaluate(player.position(), 0);
        let mut camera = FollowCamera::new(bounds);
        camera.follow(player.position());

        Ok(Self {
            bounds,
            resolver: CombatResolver::with_radius(config.hitbox_radius),
            clock: SimClock::new(config.reference_frame_ms, config.max_frame_delta_ms),
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            next_id: 2,
            tick: 0,
            player,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            input: PlayerInput::default(),
            destroyed: 0,
            score: 0,
            player_down_reported: false,
            events: EventLog::new(),
            last_events: Vec::new(),
            objectives,
            terrain: Box::new(FlatTerrain),
            weather: Box::new(ClearWeather),
            evaluator: Box::new(evaluator),
            camera: Box::new(camera),
            audio: Box::new(SilentAudio),
            presenter: Box::new(NullPresenter),
            input_subscription: None,
            config,
        })
    }

    /// Replaces the terrain collaborator.
    #[must_use]
    pub fn with_terrain(mut self, terrain: impl TerrainModifier + 'static) -> Self {
        self.terrain = Box::new(terrain);
        self
    }

    /// Replaces the weather collaborator.
    #[must_use]
    pub fn with_weather(mut self, weather: impl WeatherTick + 'static) -> Self {
        self.weather = Box::new(weather);
        self
    }

    /// Replaces the objective evaluator and evaluates it once.
    #[must_use]
    pub fn with_objectives(mut self, evaluator: impl ObjectiveEvaluator + 'static) -> Self {
        self.evaluator = Box::new(evaluator);
        self.objectives = self.evaluator.evaluate(self.player.position(), self.destroyed);
        self
    }

    /// Replaces the camera and points it at the player.
    #[must_use]
    pub fn with_camera(mut self, camera: impl Camera + 'static) -> Self {
        self.camera = Box::new(camera);
        self.camera.follow(self.player.position());
        self
    }

    /// Replaces the audio sink.
    #[must_use]
    pub fn with_audio(mut self, audio: impl AudioSink + 'static) -> Self {
        self.audio = Box::new(audio);
        self
    }

    /// Replaces the presenter.
    #[must_use]
    pub fn with_presenter(mut self, presenter: impl Presenter + 'static) -> Self {
        self.presenter = Box::new(presenter);
        self
    }

    /// Hands the engine an input listener to release on [`Engine::cleanup`].
    #[must_use]
    pub fn with_input(mut self, subscription: impl InputSubscription + 'static) -> Self {
        self.input_subscription = Some(Box::new(subscription));
        self
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the world rectangle.
    #[must_use]
    pub const fn bounds(&self) -> WorldBounds {
        self.bounds
    }

    /// Returns the seed the engine was created with.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns how many frames have run.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Returns the simulation time of the latest frame.
    #[must_use]
    pub const fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    /// Returns the player vehicle.
    #[must_use]
    pub const fn player_vehicle(&self) -> &Vehicle {
        &self.player
    }

    /// Returns the player vehicle mutably, for level setup and progression.
    #[must_use]
    pub fn player_vehicle_mut(&mut self) -> &mut Vehicle {
        &mut self.player
    }

    /// Returns the live enemies in spawn order.
    pub fn enemy_vehicles(&self) -> impl Iterator<Item = &Vehicle> + '_ {
        self.enemies.iter().map(|e| &e.vehicle)
    }

    /// Returns how many enemies are alive.
    #[must_use]
    pub fn enemy_count(&self) -> usize {
        self.enemies.len()
    }

    /// Looks up a live enemy.
    #[must_use]
    pub fn enemy(&self, id: VehicleId) -> Option<&Vehicle> {
        self.enemies.iter().map(|e| &e.vehicle).find(|v| v.id() == id)
    }

    /// Looks up a live enemy mutably.
    ///
    /// An enemy damaged to zero health through this handle stops acting at
    /// once and is removed and scored as a kill on the next frame.
    #[must_use]
    pub fn enemy_mut(&mut self, id: VehicleId) -> Option<&mut Vehicle> {
        self.enemies
            .iter_mut()
            .map(|e| &mut e.vehicle)
            .find(|v| v.id() == id)
    }

    /// Returns the live projectiles.
    #[must_use]
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Returns how many enemies have been destroyed.
    #[must_use]
    pub const fn destroyed_count(&self) -> u32 {
        self.destroyed
    }

    /// Returns the running score.
    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Returns the camera's top-left corner in world space.
    #[must_use]
    pub fn camera_focus(&self) -> Vec2 {
        self.camera.position()
    }

    /// Returns the latest objective evaluation.
    #[must_use]
    pub const fn objectives_snapshot(&self) -> &ObjectivesSnapshot {
        &self.objectives
    }

    /// Returns the events published with the latest frame.
    #[must_use]
    pub fn last_events(&self) -> &[SimEvent] {
        &self.last_events
    }

    /// Builds a snapshot of the current state.
    #[must_use]
    pub fn snapshot(&self) -> FrameSnapshot {
        let mut minimap = Vec::with_capacity(self.enemies.len() + 1);
        minimap.push(MinimapMarker::new(
            MarkerKind::Player,
            self.player.position(),
            &self.bounds,
        ));
        minimap.extend(self.enemies.iter().map(|e| {
            MinimapMarker::new(MarkerKind::Enemy, e.vehicle.position(), &self.bounds)
        }));

        FrameSnapshot {
            tick: self.tick,
            now_ms: self.clock.now_ms(),
            player: VehicleSnapshot::from(&self.player),
            enemies: self
                .enemies
                .iter()
                .map(|e| VehicleSnapshot::from(&e.vehicle))
                .collect(),
            projectile_count: self.projectiles.len(),
            score: self.score,
            destroyed: self.destroyed,
            camera: self.camera.position(),
            objectives: self.objectives.clone(),
            minimap,
        }
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    /// Sets the movement direction applied every frame until changed.
    ///
    /// The direction is normalized; `Vec2::ZERO` stops the player. Non-finite
    /// input is dropped.
    pub fn handle_move_intent(&mut self, direction: Vec2) {
        if !direction.is_finite() {
            warn!(?direction, "dropping non-finite move intent");
            return;
        }
        self.input.movement = direction.normalize_or_zero();
    }

    /// Holds or releases the trigger.
    pub fn handle_fire_intent(&mut self, firing: bool) {
        self.input.firing = firing;
    }

    /// Points the turret. Non-finite angles are dropped.
    pub fn handle_aim_intent(&mut self, angle: f32) {
        if !angle.is_finite() {
            warn!(angle, "dropping non-finite aim intent");
            return;
        }
        self.input.aim = Some(angle);
    }

    /// Requests the special ability on the next frame.
    pub fn handle_ability_intent(&mut self) {
        self.input.ability = true;
    }

    /// Swaps the player's weapon for a fresh one of `kind`.
    ///
    /// Selecting the weapon already bound does nothing.
    pub fn handle_weapon_select(&mut self, kind: WeaponKind) {
        if self.player.is_destroyed() || self.player.weapon().kind() == kind {
            return;
        }
        self.player.select_weapon(kind);
        debug!(vehicle = %self.player.id(), weapon = ?kind, "weapon selected");
        self.events.push(SimEvent::WeaponSelected {
            vehicle: self.player.id(),
            weapon: kind,
        });
    }

    /// Forwards a viewport change to the camera. Does not touch the simulation.
    pub fn on_resize(&mut self, width: f32, height: f32) {
        self.camera.resize(width, height);
        self.camera.follow(self.player.position());
    }

    /// Sets the master volume, clamped to `[0, 1]` (NaN mutes).
    pub fn set_volume(&mut self, volume: f32) {
        let volume = if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) };
        self.audio.set_volume(volume);
    }

    /// Releases the input subscription. Safe to call any number of times.
    pub fn cleanup(&mut self) {
        if let Some(mut subscription) = self.input_subscription.take() {
            subscription.release();
            debug!("input subscription released");
        }
    }

    // -------------------------------------------------------------------------
    // Progression and spawning
    // -------------------------------------------------------------------------

    /// Moves the objective evaluator to its next mission.
    ///
    /// Objectives are re-evaluated at once so the snapshot reflects the new
    /// mission. Returns `false` if the evaluator has nothing to advance to.
    pub fn advance_mission(&mut self) -> bool {
        if !self.evaluator.advance() {
            return false;
        }
        self.objectives = self.evaluator.evaluate(self.player.position(), self.destroyed);
        info!(mission = self.objectives.mission_id, tick = self.tick, "mission advanced");
        self.events.push(SimEvent::MissionAdvanced {
            mission_id: self.objectives.mission_id,
        });
        self.play_cue(SoundCue::PowerUp);
        true
    }

    /// Raises the player's weapon one level.
    ///
    /// Returns `false` at the level cap or once the player is destroyed.
    pub fn upgrade_player_weapon(&mut self) -> bool {
        if self.player.is_destroyed() || !self.player.weapon_mut().upgrade() {
            return false;
        }
        let weapon = self.player.weapon();
        let (kind, level) = (weapon.kind(), weapon.level());
        debug!(vehicle = %self.player.id(), weapon = ?kind, level, "weapon upgraded");
        self.events.push(SimEvent::WeaponUpgraded {
            vehicle: self.player.id(),
            weapon: kind,
            level,
        });
        self.play_cue(SoundCue::PowerUp);
        true
    }

    /// Adds an enemy driven by `agent`. The position is clamped into the world.
    pub fn spawn_enemy(
        &mut self,
        archetype: VehicleArchetype,
        position: Vec2,
        agent: Box<dyn Agent>,
    ) -> VehicleId {
        let position = if position.is_finite() {
            self.bounds.clamp(position)
        } else {
            warn!(?position, "non-finite spawn position, using world center");
            self.bounds.center()
        };

        let id = VehicleId::new(self.next_id);
        self.next_id += 1;

        let vehicle = Self::build_vehicle(&self.config, id, archetype, position);
        debug!(vehicle = %id, %archetype, agent = agent.name(), "enemy spawned");
        self.enemies.push(Enemy { vehicle, agent });
        id
    }

    /// Spawns `count` pursuing enemies at random positions at least
    /// `spawn_margin` units from every edge.
    pub fn spawn_enemy_wave(&mut self, count: usize, archetype: VehicleArchetype) -> Vec<VehicleId> {
        let margin = self.config.spawn_margin;
        let (max_x, max_y) = (self.bounds.width - margin, self.bounds.height - margin);

        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            let position = Vec2::new(
                self.rng.gen_range(margin..=max_x),
                self.rng.gen_range(margin..=max_y),
            );
            ids.push(self.spawn_enemy(archetype, position, Box::new(PursuitAgent::new())));
        }
        ids
    }

    /// Spawns a vehicle with the configured tuning, weapon cap and armor.
    fn build_vehicle(
        config: &EngineConfig,
        id: VehicleId,
        archetype: VehicleArchetype,
        position: Vec2,
    ) -> Vehicle {
        let mut vehicle = Vehicle::new(id, archetype, position)
            .with_tuning(config.vehicle)
            .with_weapon(
                WeaponSystem::new(archetype.class().weapon).with_level_cap(config.weapon_level_cap),
            );
        vehicle.set_armor(archetype.class().max_armor * config.spawn_armor_fraction);
        vehicle
    }

    /// Removes an enemy outside of combat (level transitions, scripting).
    ///
    /// Projectiles it fired stay in flight. Despawning does not count as a kill.
    pub fn despawn_enemy(&mut self, id: VehicleId) -> Option<Vehicle> {
        let index = self.enemies.iter().position(|e| e.vehicle.id() == id)?;
        Some(self.enemies.remove(index).vehicle)
    }

    // -------------------------------------------------------------------------
    // Frame loop
    // -------------------------------------------------------------------------

    /// Runs one frame ending at simulation time `now_ms`.
    pub fn update(&mut self, now_ms: f64) {
        let frame = self.clock.advance_to(now_ms);

        self.apply_player_input(&frame);
        self.run_agents(&frame);

        let frames = frame.scale_f32();
        let substeps = self.projectile_substeps(frames);
        #[allow(clippy::cast_precision_loss)]
        let slice = frames / substeps as f32;
        let mut outcome = CombatOutcome::default();
        for _ in 0..substeps {
            for projectile in &mut self.projectiles {
                projectile.advance(slice, &self.bounds);
            }
            outcome.merge(self.resolver.resolve(
                &mut self.projectiles,
                &mut self.player,
                &mut self.enemies,
            ));
        }
        self.apply_outcome(outcome);
        self.projectiles.retain(Projectile::is_active);

        self.tick_vehicles(&frame);

        self.weather.tick(frame.now_ms);
        self.camera.follow(self.player.position());
        self.objectives = self
            .evaluator
            .evaluate(self.player.position(), self.destroyed);

        self.tick += 1;
        self.publish();
    }

    /// Number of advance-and-resolve passes needed so the fastest active
    /// projectile moves at most one hitbox radius per pass.
    fn projectile_substeps(&self, frames: f32) -> usize {
        let fastest = self
            .projectiles
            .iter()
            .filter(|p| p.is_active())
            .map(|p| p.velocity().length())
            .fold(0.0_f32, f32::max);
        let travel = fastest * frames / self.config.hitbox_radius;
        if !travel.is_finite() || travel <= 1.0 {
            return 1;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let passes = travel.ceil() as usize;
        passes.min(MAX_PROJECTILE_SUBSTEPS)
    }

    /// Runs one frame `dt_ms` after the previous one.
    pub fn step(&mut self, dt_ms: f64) {
        self.update(self.clock.now_ms() + dt_ms);
    }

    fn apply_player_input(&mut self, frame: &FrameTime) {
        let ability = std::mem::take(&mut self.input.ability);
        if self.player.is_destroyed() {
            return;
        }

        let intent = Intent {
            movement: (self.input.movement != Vec2::ZERO).then_some(self.input.movement),
            aim: self.input.aim,
            fire: self.input.firing,
            ability,
        };

        Self::drive(&mut self.player, &intent, self.terrain.as_ref(), &self.bounds, frame);
        if intent.ability {
            self.try_ability_for_player(frame.now_ms);
        }
        if intent.fire {
            if let Some(volley) = Self::discharge(
                &mut self.player,
                frame.now_ms,
                self.config.muzzle_offset,
                &mut self.rng,
            ) {
                self.record_volley(volley);
            }
        }
    }

    fn try_ability_for_player(&mut self, now_ms: f64) {
        if self.player.activate_special_ability(now_ms) {
            self.events.push(SimEvent::AbilityActivated {
                vehicle: self.player.id(),
                expires_at_ms: self.player.ability_expiry_ms().unwrap_or(now_ms),
            });
            self.play_cue(SoundCue::PowerUp);
        }
    }

    fn run_agents(&mut self, frame: &FrameTime) {
        let target = (!self.player.is_destroyed()).then_some(&self.player);
        let bounds = self.bounds;
        let hitbox_radius = self.config.hitbox_radius;
        let now_ms = frame.now_ms;

        let intents: Vec<Intent> = self
            .enemies
            .par_iter()
            .map(|enemy| {
                enemy.agent.decide(&AgentContext {
                    vehicle: &enemy.vehicle,
                    target,
                    bounds,
                    hitbox_radius,
                    now_ms,
                })
            })
            .collect();

        let mut volleys = Vec::new();
        let mut activations = Vec::new();
        for (enemy, intent) in self.enemies.iter_mut().zip(intents) {
            let vehicle = &mut enemy.vehicle;
            Self::drive(vehicle, &intent, self.terrain.as_ref(), &self.bounds, frame);
            if intent.ability && vehicle.activate_special_ability(now_ms) {
                activations.push((vehicle.id(), vehicle.ability_expiry_ms().unwrap_or(now_ms)));
            }
            if intent.fire {
                if let Some(volley) =
                    Self::discharge(vehicle, now_ms, self.config.muzzle_offset, &mut self.rng)
                {
                    volleys.push(volley);
                }
            }
        }

        for (vehicle, expires_at_ms) in activations {
            self.events.push(SimEvent::AbilityActivated {
                vehicle,
                expires_at_ms,
            });
        }
        for volley in volleys {
            self.record_volley(volley);
        }
    }

    /// Moves and aims a vehicle according to an intent.
    fn drive(
        vehicle: &mut Vehicle,
        intent: &Intent,
        terrain: &dyn TerrainModifier,
        bounds: &WorldBounds,
        frame: &FrameTime,
    ) {
        if vehicle.is_destroyed() {
            return;
        }
        if let Some(direction) = intent.movement.filter(|d| d.is_finite()) {
            let direction = direction.normalize_or_zero();
            if direction != Vec2::ZERO {
                let modifier = sanitize_modifier(terrain.movement_modifier(vehicle.position()));
                vehicle.move_along(direction * modifier * frame.scale_f32());
                vehicle.set_position(bounds.clamp(vehicle.position()));
            }
        }
        if let Some(angle) = intent.aim.filter(|a| a.is_finite()) {
            vehicle.rotate_turret(angle);
        }
    }

    /// Fires the vehicle's weapon if both the class fire rate and the weapon
    /// allow it, spending the weapon's energy cost.
    fn discharge(
        vehicle: &mut Vehicle,
        now_ms: f64,
        muzzle_offset: f32,
        rng: &mut ChaCha8Rng,
    ) -> Option<Volley> {
        if vehicle.is_destroyed()
            || !vehicle.can_fire(now_ms)
            || !vehicle.weapon().can_fire(now_ms, vehicle.energy())
        {
            return None;
        }

        let muzzle = vehicle.muzzle(muzzle_offset);
        let angle = vehicle.turret_rotation();
        let shooter = vehicle.id();
        let requests = vehicle.weapon_mut().fire(muzzle, angle, now_ms, rng);
        vehicle.mark_fired(now_ms);
        let cost = vehicle.weapon().stats().energy_cost;
        vehicle.drain_energy(cost);

        let weapon = vehicle.weapon().kind();
        debug!(shooter = %shooter, weapon = ?weapon, count = requests.len(), "weapon fired");
        Some(Volley {
            shooter,
            weapon,
            projectiles: requests
                .iter()
                .map(|request| Projectile::from_request(request, Some(shooter)))
                .collect(),
        })
    }

    fn record_volley(&mut self, volley: Volley) {
        #[allow(clippy::cast_possible_truncation)]
        let count = volley.projectiles.len() as u32;
        self.projectiles.extend(volley.projectiles);
        self.events.push(SimEvent::ProjectileFired {
            shooter: volley.shooter,
            weapon: volley.weapon,
            count,
        });
        self.play_cue(SoundCue::Fire(volley.weapon));
    }

    fn apply_outcome(&mut self, outcome: CombatOutcome) {
        if outcome.is_empty() {
            return;
        }
        for hit in outcome.hits {
            self.events.push(SimEvent::VehicleDamaged {
                target: hit.target,
                source: hit.source,
                amount: hit.amount,
                health: hit.health,
                position: hit.position,
            });
            self.play_cue(SoundCue::Hit);
        }

        for kill in outcome.kills {
            let delta = self.config.kill_score;
            self.destroyed += 1;
            self.score += delta;
            info!(
                victim = %kill.victim,
                killer = ?kill.killer,
                destroyed = self.destroyed,
                score = self.score,
                "enemy destroyed"
            );
            self.events.push(SimEvent::EnemyDestroyed {
                victim: kill.victim,
                killer: kill.killer,
                score: delta,
                position: kill.position,
            });
            self.events.push(SimEvent::ScoreChanged {
                delta,
                total: self.score,
            });
            self.play_cue(SoundCue::Explosion);
        }

        if outcome.player_destroyed && !self.player_down_reported {
            self.player_down_reported = true;
            info!(player = %self.player.id(), tick = self.tick, "player destroyed");
            self.events.push(SimEvent::PlayerDestroyed {
                player: self.player.id(),
            });
            self.play_cue(SoundCue::Explosion);
        }
    }

    fn tick_vehicles(&mut self, frame: &FrameTime) {
        if !self.player.is_destroyed() && self.player.update(frame.now_ms, frame.elapsed_ms) {
            self.events.push(SimEvent::AbilityExpired {
                vehicle: self.player.id(),
            });
        }
        for enemy in &mut self.enemies {
            if enemy.vehicle.update(frame.now_ms, frame.elapsed_ms) {
                self.events.push(SimEvent::AbilityExpired {
                    vehicle: enemy.vehicle.id(),
                });
            }
        }
    }

    fn publish(&mut self) {
        let snapshot = self.snapshot();
        debug!(tick = self.tick, events = self.events.event_count(), "frame published");
        let events = self.events.take_events();
        self.presenter.present(&snapshot, &events);
        self.last_events = events;
    }

    /// Sends a cue to the audio sink, logging and dropping failures.
    fn play_cue(&mut self, cue: SoundCue) {
        if let Err(err) = self.audio.play(cue) {
            warn!(?cue, error = %err, "audio cue dropped");
        }
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.cleanup();
    }
}
