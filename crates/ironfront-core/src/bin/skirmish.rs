//! Headless skirmish runner.
//!
//! Usage: `skirmish [--config engine.json] [--seed N] [--seconds S]`
//!
//! Spawns a mixed wave around the player, holds the trigger with a slowly
//! sweeping turret and reports the outcome. Set `RUST_LOG=debug` to see every
//! shot.

use std::env;
use std::fs::File;
use std::io::BufReader;

use anyhow::{bail, Context, Result};
use glam::Vec2;
use ironfront_core::clock::FixedStep;
use ironfront_core::config::EngineConfig;
use ironfront_core::engine::Engine;
use ironfront_core::entity::VehicleArchetype;
use ironfront_core::SimEvent;
use tracing::info;

struct Args {
    config: Option<String>,
    seed: u64,
    seconds: f64,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        config: None,
        seed: 42,
        seconds: 60.0,
    };
    let mut iter = env::args().skip(1);
    while let Some(flag) = iter.next() {
        let value = iter
            .next()
            .with_context(|| format!("missing value for {flag}"))?;
        match flag.as_str() {
            "--config" => args.config = Some(value),
            "--seed" => args.seed = value.parse().context("--seed expects an integer")?,
            "--seconds" => args.seconds = value.parse().context("--seconds expects a number")?,
            other => bail!("unknown flag {other}"),
        }
    }
    Ok(args)
}

fn load_config(path: Option<&str>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig {
            spawn_armor_fraction: 0.3,
            ..EngineConfig::default()
        });
    };
    let file = File::open(path).with_context(|| format!("opening {path}"))?;
    EngineConfig::from_json_reader(BufReader::new(file)).with_context(|| format!("loading {path}"))
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let args = parse_args()?;
    let config = load_config(args.config.as_deref())?;
    let frame_ms = config.reference_frame_ms;

    let mut engine = Engine::new(config, args.seed).context("building engine")?;
    engine.spawn_enemy_wave(6, VehicleArchetype::Light);
    engine.spawn_enemy_wave(3, VehicleArchetype::Heavy);
    engine.handle_fire_intent(true);
    info!(seed = args.seed, enemies = engine.enemy_count(), "skirmish started");

    // Wall time arrives in uneven chunks; the engine only ever sees whole frames.
    let mut stepper = FixedStep::new(frame_ms);
    let mut wall_ms = 0.0;
    let mut kills = 0usize;
    while wall_ms < args.seconds * 1000.0 {
        let chunk = if engine.tick() % 7 == 0 { 40.0 } else { 12.0 };
        wall_ms += chunk;

        for _ in 0..stepper.push(chunk) {
            let player = engine.player_vehicle().position();
            let nearest = engine
                .enemy_vehicles()
                .map(|v| v.position())
                .min_by(|a, b| a.distance_squared(player).total_cmp(&b.distance_squared(player)));
            if let Some(target) = nearest {
                let to_target = target - player;
                engine.handle_aim_intent(to_target.y.atan2(to_target.x));
                engine.handle_move_intent(-to_target.normalize_or_zero());
            } else {
                engine.handle_move_intent(Vec2::ZERO);
            }
            if engine.player_vehicle().energy() >= 80.0 {
                engine.handle_ability_intent();
            }

            engine.step(frame_ms);
            kills += engine
                .last_events()
                .iter()
                .filter(|e| matches!(e, SimEvent::EnemyDestroyed { .. }))
                .count();
        }

        if engine.player_vehicle().is_destroyed() || engine.enemy_count() == 0 {
            break;
        }
    }

    let player = engine.player_vehicle();
    info!(
        ticks = engine.tick(),
        sim_ms = engine.now_ms(),
        kills,
        score = engine.score(),
        health = player.health(),
        survivors = engine.enemy_count(),
        "skirmish finished"
    );
    println!(
        "score {} | destroyed {} | player {}",
        engine.score(),
        engine.destroyed_count(),
        if player.is_destroyed() { "down" } else { "alive" }
    );
    Ok(())
}
