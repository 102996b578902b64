//! Property tests for vehicle, weapon and collision invariants.

use glam::Vec2;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::collision::{circles_overlap, projectile_hits};
use crate::config::WorldBounds;
use crate::entity::{Projectile, Vehicle, VehicleArchetype, VehicleId};
use crate::weapon::{WeaponKind, WeaponSystem};

fn archetype() -> impl Strategy<Value = VehicleArchetype> {
    prop_oneof![
        Just(VehicleArchetype::Player),
        Just(VehicleArchetype::Light),
        Just(VehicleArchetype::Heavy),
    ]
}

fn weapon_kind() -> impl Strategy<Value = WeaponKind> {
    prop_oneof![
        Just(WeaponKind::Cannon),
        Just(WeaponKind::Machinegun),
        Just(WeaponKind::Plasma),
        Just(WeaponKind::Missile),
        Just(WeaponKind::Railgun),
        Just(WeaponKind::Shotgun),
    ]
}

fn point() -> impl Strategy<Value = Vec2> {
    (-2000.0f32..2000.0, -2000.0f32..2000.0).prop_map(|(x, y)| Vec2::new(x, y))
}

proptest! {
    #[test]
    fn health_stays_within_pool(
        archetype in archetype(),
        armor in 0.0f32..=1.0,
        hits in prop::collection::vec(-50.0f32..200.0, 0..40),
    ) {
        let mut vehicle = Vehicle::new(VehicleId::new(1), archetype, Vec2::ZERO);
        vehicle.set_armor(vehicle.class().max_armor * armor);

        let mut kills = 0;
        for amount in hits {
            let before = vehicle.health();
            if vehicle.take_damage(amount) {
                kills += 1;
            }
            prop_assert!(vehicle.health() >= 0.0);
            prop_assert!(vehicle.health() <= vehicle.class().max_health);
            prop_assert!(vehicle.health() <= before, "damage never heals");
        }
        prop_assert!(kills <= 1, "destruction is reported at most once");
        prop_assert_eq!(kills == 1, vehicle.is_destroyed());
    }

    #[test]
    fn invulnerable_vehicle_never_loses_health(
        hits in prop::collection::vec(0.0f32..500.0, 1..20),
    ) {
        let mut vehicle = Vehicle::new(VehicleId::new(1), VehicleArchetype::Player, Vec2::ZERO);
        vehicle.set_armor(0.0);
        prop_assert!(vehicle.activate_special_ability(0.0));

        for amount in hits {
            prop_assert!(!vehicle.take_damage(amount));
        }
        prop_assert_eq!(vehicle.health(), vehicle.class().max_health);
    }

    #[test]
    fn ability_without_energy_changes_nothing(
        archetype in archetype(),
        energy in 0.0f32..29.99,
        now in 0.0f64..100_000.0,
    ) {
        let mut vehicle = Vehicle::new(VehicleId::new(1), archetype, Vec2::ZERO);
        vehicle.set_energy(energy);
        let before = vehicle.clone();

        prop_assert!(!vehicle.activate_special_ability(now));
        prop_assert_eq!(vehicle, before);
    }

    #[test]
    fn overlap_is_symmetric(a in point(), b in point(), radius in 0.1f32..200.0) {
        prop_assert_eq!(circles_overlap(a, b, radius), circles_overlap(b, a, radius));
        prop_assert_eq!(projectile_hits(a, b, radius), projectile_hits(b, a, radius));
    }

    #[test]
    fn railgun_flies_straight(
        angle in -std::f32::consts::PI..std::f32::consts::PI,
        seed in any::<u64>(),
    ) {
        let mut weapon = WeaponSystem::new(WeaponKind::Railgun);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let requests = weapon.fire(Vec2::new(1500.0, 1500.0), angle, 0.0, &mut rng);
        prop_assert_eq!(requests.len(), 1);

        let mut projectile = Projectile::from_request(&requests[0], None);
        let bounds = WorldBounds::new(3000.0, 3000.0).unwrap();
        projectile.advance(1.0, &bounds);

        let expected = Vec2::new(1500.0, 1500.0) + Vec2::from_angle(angle) * 20.0;
        prop_assert!((projectile.position() - expected).length() < 1e-3);
    }

    #[test]
    fn upgrades_are_monotonic_and_capped(
        kind in weapon_kind(),
        cap in 1u32..15,
        attempts in 0usize..30,
    ) {
        let mut weapon = WeaponSystem::new(kind).with_level_cap(cap);
        let base = weapon.stats();

        for _ in 0..attempts {
            let before = weapon.stats();
            let upgraded = weapon.upgrade();
            let after = weapon.stats();
            if upgraded {
                prop_assert!(after.damage > before.damage);
                prop_assert!(after.reload_time_ms < before.reload_time_ms);
                prop_assert!(after.spread <= before.spread);
                prop_assert!(after.range > before.range);
            } else {
                prop_assert_eq!(after, before);
            }
            prop_assert!(weapon.level() <= cap);
        }
        prop_assert_eq!(weapon.stats().projectile_count, base.projectile_count);
        prop_assert_eq!(weapon.stats().energy_cost, base.energy_cost);
    }
}
