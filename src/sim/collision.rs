//! Collision detection and scoring
//!
//! Broad phase only: the ball's axis-aligned box against every live
//! collectible's box, recomputed each call. The scan is O(n) with no spatial
//! index, which is fine for a few hundred objects.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::effects::FeedbackEffect;
use super::state::{Ball, Collectible};
use crate::config::ScoringConfig;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn from_center_half_extents(center: Vec3, half: Vec3) -> Self {
        let half = half.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Overlap test; touching faces count as intersecting
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }

    pub fn contains_point(&self, p: Vec3) -> bool {
        self.min.cmple(p).all() && p.cmple(self.max).all()
    }
}

/// Where collectible bounding volumes come from
///
/// The scene collaborator may know better bounds than the shape table (for
/// loaded meshes); returning `None` falls back to the shape-derived box.
pub trait BoundsSource {
    fn collectible_bounds(&self, collectible: &Collectible) -> Option<Aabb>;
}

/// Bounds straight from each collectible's shape
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeBounds;

impl BoundsSource for ShapeBounds {
    fn collectible_bounds(&self, collectible: &Collectible) -> Option<Aabb> {
        Some(collectible.bounds())
    }
}

/// Result of one collision pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionOutcome {
    pub score_delta: u64,
    /// Collected ids, population order
    pub removed_ids: Vec<u32>,
    /// Positions of collected objects
    pub removed_positions: Vec<Vec3>,
    pub feedback: Vec<FeedbackEffect>,
}

impl CollisionOutcome {
    pub fn is_empty(&self) -> bool {
        self.removed_ids.is_empty()
    }
}

/// Collect every live object the ball overlaps
///
/// Each hit awards `rules.award`, grows the ball by `rules.growth` and removes
/// the object from `collectibles`. The ball's box is taken once at the start
/// of the pass, so growth during the pass does not pull in extra objects.
/// `feedback_ids` hands out ids for flash effects.
pub fn check_collisions(
    ball: &mut Ball,
    collectibles: &mut Vec<Collectible>,
    rules: &ScoringConfig,
    now: f64,
    bounds: &dyn BoundsSource,
    mut feedback_ids: impl FnMut() -> u32,
) -> CollisionOutcome {
    let ball_box = ball.bounds();
    let mut outcome = CollisionOutcome::default();

    for collectible in collectibles.iter_mut().filter(|c| c.alive) {
        let Some(object_box) = bounds.collectible_bounds(collectible) else {
            continue;
        };
        if !ball_box.intersects(&object_box) {
            continue;
        }

        collectible.alive = false;
        outcome.score_delta += rules.award;
        outcome.removed_ids.push(collectible.id);
        outcome.removed_positions.push(collectible.position);
        ball.radius += rules.growth;

        if rules.flash {
            outcome.feedback.push(FeedbackEffect {
                id: feedback_ids(),
                position: collectible.position,
                color: collectible.color,
                expires_at: now + rules.flash_lifetime,
            });
        }
    }

    if !outcome.is_empty() {
        collectibles.retain(|c| c.alive);
    }
    outcome
}
