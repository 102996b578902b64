//! Circular hitbox predicates.
//!
//! Every overlap test in the core is a distance check between two circle
//! centers, strictly less than a threshold. There is no broad phase: the
//! resolver checks every projectile against every live vehicle.

use glam::Vec2;

/// Default hitbox radius.
pub const HITBOX_RADIUS: f32 = 25.0;

/// Returns `true` if `a` and `b` are strictly closer than `threshold`.
///
/// Symmetric in its two points.
#[must_use]
pub fn circles_overlap(a: Vec2, b: Vec2, threshold: f32) -> bool {
    a.distance_squared(b) < threshold * threshold
}

/// Projectile versus vehicle: a point against one hitbox radius.
#[must_use]
pub fn projectile_hits(projectile: Vec2, vehicle: Vec2, radius: f32) -> bool {
    circles_overlap(projectile, vehicle, radius)
}

/// Vehicle versus vehicle: two hitboxes, so twice the radius.
#[must_use]
pub fn vehicles_overlap(a: Vec2, b: Vec2, radius: f32) -> bool {
    circles_overlap(a, b, radius * 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_distance_does_not_collide() {
        let a = Vec2::new(0.0, 0.0);
        assert!(!projectile_hits(a, Vec2::new(25.0, 0.0), HITBOX_RADIUS));
        assert!(projectile_hits(a, Vec2::new(24.9, 0.0), HITBOX_RADIUS));
    }

    #[test]
    fn vehicles_use_double_radius() {
        let a = Vec2::new(100.0, 100.0);
        assert!(vehicles_overlap(a, Vec2::new(149.0, 100.0), HITBOX_RADIUS));
        assert!(!vehicles_overlap(a, Vec2::new(150.0, 100.0), HITBOX_RADIUS));
    }

    #[test]
    fn ten_units_is_a_hit() {
        assert!(projectile_hits(
            Vec2::new(110.0, 100.0),
            Vec2::new(100.0, 100.0),
            HITBOX_RADIUS
        ));
    }
}
