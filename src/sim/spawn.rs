//! Collectible population
//!
//! Seeded so the same seed always lays out the same round.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{Collectible, Shape, ShapeKind};
use crate::config::PlayfieldConfig;
use crate::consts::GROUND_Y;

/// Keep spawns this far (ground distance) from the ball's starting point
pub const SPAWN_CLEARANCE: f32 = 3.0;
/// Rejection-sampling attempts per collectible before accepting any spot
const MAX_PLACEMENT_ATTEMPTS: u32 = 16;

/// Random dimensions for a shape of the given kind
pub fn random_shape(rng: &mut impl Rng, kind: ShapeKind) -> Shape {
    match kind {
        ShapeKind::Box => Shape::Box {
            width: rng.random_range(0.5..1.5),
            height: rng.random_range(0.5..1.5),
            depth: rng.random_range(0.5..1.5),
        },
        ShapeKind::Sphere => Shape::Sphere {
            radius: rng.random_range(0.3..0.8),
        },
        ShapeKind::Cone => Shape::Cone {
            radius: rng.random_range(0.3..0.7),
            height: rng.random_range(0.8..1.6),
        },
        ShapeKind::Torus => Shape::Torus {
            radius: rng.random_range(0.4..0.8),
            tube: rng.random_range(0.1..0.25),
        },
    }
}

/// Scatter `count` collectibles over the playfield
///
/// Objects rest on the ground plane, stay inside the bounds and avoid the
/// area around `start`. Ids run from `first_id` upward in population order.
pub fn spawn_collectibles(
    seed: u64,
    count: usize,
    playfield: &PlayfieldConfig,
    start: Vec3,
    first_id: u32,
) -> Vec<Collectible> {
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut collectibles = Vec::with_capacity(count);

    for index in 0..count {
        let kind = ShapeKind::ALL[rng.random_range(0..ShapeKind::ALL.len())];
        let shape = random_shape(&mut rng, kind);
        let half = shape.half_extents();
        let color = rng.random_range(0..=0xff_ffffu32);

        // Keep the whole footprint inside the bounds
        let max_x = (playfield.bound_x - half.x).max(0.0);
        let max_z = (playfield.bound_z - half.z).max(0.0);

        let mut position = Vec3::ZERO;
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            position = Vec3::new(
                sample_symmetric(&mut rng, max_x),
                GROUND_Y + half.y,
                sample_symmetric(&mut rng, max_z),
            );
            if crate::ground_distance(position, start) >= SPAWN_CLEARANCE {
                break;
            }
        }

        collectibles.push(Collectible::new(first_id + index as u32, position, shape, color));
    }

    log::debug!("Spawned {} collectibles (seed {})", collectibles.len(), seed);
    collectibles
}

fn sample_symmetric(rng: &mut impl Rng, half: f32) -> f32 {
    if half > 0.0 {
        rng.random_range(-half..=half)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_deterministic() {
        let field = PlayfieldConfig::default();
        let a = spawn_collectibles(42, 50, &field, Vec3::ZERO, 1);
        let b = spawn_collectibles(42, 50, &field, Vec3::ZERO, 1);
        assert_eq!(a, b);

        let c = spawn_collectibles(43, 50, &field, Vec3::ZERO, 1);
        assert_ne!(a, c);
    }

    #[test]
    fn test_spawn_within_bounds_and_clear_of_start() {
        let field = PlayfieldConfig {
            bound_x: 20.0,
            bound_z: 10.0,
        };
        let objects = spawn_collectibles(7, 200, &field, Vec3::ZERO, 1);
        assert_eq!(objects.len(), 200);
        for c in &objects {
            let b = c.bounds();
            assert!(b.min.x >= -20.0 - 1e-4 && b.max.x <= 20.0 + 1e-4);
            assert!(b.min.z >= -10.0 - 1e-4 && b.max.z <= 10.0 + 1e-4);
            assert!((b.min.y - GROUND_Y).abs() < 1e-4);
            assert!(crate::ground_distance(c.position, Vec3::ZERO) >= SPAWN_CLEARANCE);
            assert!(c.alive);
        }
    }

    #[test]
    fn test_spawn_ids_sequential() {
        let objects = spawn_collectibles(1, 5, &PlayfieldConfig::default(), Vec3::ZERO, 10);
        let ids: Vec<u32> = objects.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![10, 11, 12, 13, 14]);
    }

    #[test]
    fn test_spawn_uses_every_shape() {
        let objects = spawn_collectibles(3, 200, &PlayfieldConfig::default(), Vec3::ZERO, 1);
        for kind in ShapeKind::ALL {
            assert!(objects.iter().any(|c| c.shape.kind() == kind));
        }
    }
}
