use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::Vec2;
use ironfront_core::{Engine, EngineConfig, VehicleArchetype, WeaponKind};

const FRAME_MS: f64 = 1000.0 / 60.0;

fn engine_with_wave(enemies: usize) -> Engine {
    let mut engine = Engine::new(EngineConfig::default(), 7).expect("default config is valid");
    engine.spawn_enemy_wave(enemies, VehicleArchetype::Light);
    engine
}

fn bench_idle_frame(c: &mut Criterion) {
    // Agents run but nobody is in range, so this is mostly pursuit math
    let mut engine = engine_with_wave(20);

    c.bench_function("frame_20_enemies", |b| {
        b.iter(|| {
            engine.step(black_box(FRAME_MS));
        })
    });
}

fn bench_busy_frame(c: &mut Criterion) {
    // Shotgun volleys keep plenty of projectiles in flight for the resolver
    let mut engine = engine_with_wave(200);
    engine.handle_weapon_select(WeaponKind::Shotgun);
    engine.handle_fire_intent(true);
    engine.handle_move_intent(Vec2::new(1.0, 0.3));

    c.bench_function("frame_200_enemies_firing", |b| {
        b.iter(|| {
            engine.step(black_box(FRAME_MS));
        })
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let mut engine = engine_with_wave(100);
    engine.step(FRAME_MS);

    c.bench_function("snapshot_100_enemies", |b| {
        b.iter(|| black_box(engine.snapshot()))
    });
}

criterion_group!(benches, bench_idle_frame, bench_busy_frame, bench_snapshot);
criterion_main!(benches);
