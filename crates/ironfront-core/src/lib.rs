//! # Ironfront Core
//!
//! Real-time combat simulation core for Ironfront, a top-down tank battle
//! game.
//!
//! This crate advances a world of one player-controlled tank, any number of
//! agent-driven enemy tanks and their projectiles, one frame at a time. It
//! resolves hits and kills, and reports state changes to whatever presents
//! them. Rendering, input devices, audio playback and persistence live
//! outside; the engine talks to them through the traits in [`ports`].
//!
//! ## Architecture
//!
//! - **Entities**: [`Vehicle`] with health, armor and energy pools and a
//!   timed special ability; [`Projectile`]
//! - **Weapons**: six archetypes with per-instance, upgradeable stats
//!   ([`WeaponSystem`])
//! - **Combat**: circular hitboxes ([`collision`]) and a fixed-order
//!   [`CombatResolver`]
//! - **Agents**: pure decision functions returning an [`Intent`]
//! - **Engine**: the eight-step frame loop ([`Engine`])
//!
//! Time is explicit: every timing-sensitive call takes the simulation time
//! in milliseconds, and per-frame speeds are scaled by the elapsed time.
//!
//! ## Usage
//!
//! ```
//! use ironfront_core::{Engine, EngineConfig, VehicleArchetype};
//! use glam::Vec2;
//!
//! let mut engine = Engine::new(EngineConfig::default(), 42)?;
//! engine.spawn_enemy_wave(5, VehicleArchetype::Light);
//!
//! engine.handle_move_intent(Vec2::new(0.0, -1.0));
//! engine.handle_fire_intent(true);
//! engine.step(1000.0 / 60.0);
//!
//! println!("score: {}", engine.score());
//! # Ok::<(), ironfront_core::ConfigError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod agent;
pub mod clock;
pub mod collision;
pub mod config;
pub mod engine;
pub mod entity;
pub mod error;
pub mod event;
pub mod mission;
pub mod ports;
pub mod resolver;
pub mod snapshot;
pub mod weapon;

#[cfg(test)]
mod tests;

pub use agent::{Agent, AgentContext, HoldPositionAgent, Intent, PursuitAgent};
pub use config::{EngineConfig, WorldBounds};
pub use engine::Engine;
pub use entity::{Projectile, Vehicle, VehicleArchetype, VehicleFlags, VehicleId};
pub use error::{AudioError, ConfigError};
pub use event::SimEvent;
pub use resolver::{CombatOutcome, CombatResolver};
pub use snapshot::FrameSnapshot;
pub use weapon::{WeaponKind, WeaponStats, WeaponSystem};
