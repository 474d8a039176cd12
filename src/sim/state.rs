//! Game state and core simulation types
//!
//! Everything a round mutates lives in [`GameSession`]; nothing is held at
//! process scope.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::effects::FeedbackEffect;
use crate::consts::*;

/// Round lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Session built, deadline not armed
    NotStarted,
    /// Ticks drive motion and collisions
    Active,
    /// Deadline fired; state is frozen
    Ended,
}

/// The player's ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub position: Vec3,
    pub velocity: Vec3,
    pub radius: f32,
    /// Accumulated rolling rotation
    pub orientation: Quat,
}

impl Ball {
    pub fn new(position: Vec3, radius: f32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            radius,
            orientation: Quat::IDENTITY,
        }
    }

    /// Axis-aligned box enclosing the ball at its current radius
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_half_extents(self.position, Vec3::splat(self.radius))
    }
}

impl Default for Ball {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, BALL_REST_Y, 0.0), BALL_RADIUS)
    }
}

/// Collectible shape families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Box,
    Sphere,
    Cone,
    Torus,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 4] = [
        ShapeKind::Box,
        ShapeKind::Sphere,
        ShapeKind::Cone,
        ShapeKind::Torus,
    ];
}

/// Shape with dimensions. Only appearance and bounding volume depend on it;
/// scoring treats every shape the same.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Box { width: f32, height: f32, depth: f32 },
    Sphere { radius: f32 },
    /// Upright cone centered on its position
    Cone { radius: f32, height: f32 },
    /// Torus lying flat on the ground plane
    Torus { radius: f32, tube: f32 },
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Box { .. } => ShapeKind::Box,
            Shape::Sphere { .. } => ShapeKind::Sphere,
            Shape::Cone { .. } => ShapeKind::Cone,
            Shape::Torus { .. } => ShapeKind::Torus,
        }
    }

    /// Half extents of the unrotated shape
    pub fn half_extents(&self) -> Vec3 {
        match *self {
            Shape::Box {
                width,
                height,
                depth,
            } => Vec3::new(width, height, depth) * 0.5,
            Shape::Sphere { radius } => Vec3::splat(radius),
            Shape::Cone { radius, height } => Vec3::new(radius, height * 0.5, radius),
            Shape::Torus { radius, tube } => {
                let outer = radius + tube;
                Vec3::new(outer, tube, outer)
            }
        }
    }
}

/// A static object waiting to be rolled up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub position: Vec3,
    pub shape: Shape,
    /// 0xRRGGBB
    pub color: u32,
    pub alive: bool,
}

impl Collectible {
    pub fn new(id: u32, position: Vec3, shape: Shape, color: u32) -> Self {
        Self {
            id,
            position,
            shape,
            color,
            alive: true,
        }
    }

    /// Bounding box derived from the shape and current position
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_half_extents(self.position, self.shape.half_extents())
    }
}

/// Complete round state
///
/// Constructed at round start and owned by the
/// [`RoundController`](super::round::RoundController).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    /// Seed the population was generated from
    pub seed: u64,
    pub ball: Ball,
    /// Live collectibles, population order
    pub collectibles: Vec<Collectible>,
    /// Collectible count at round start
    pub initial_count: usize,
    pub score: u64,
    pub phase: RoundPhase,
    /// Ticks executed while active
    pub time_ticks: u64,
    /// Session clock in seconds, advanced by the frame driver
    pub now: f64,
    /// Clock value when the round started
    pub started_at: Option<f64>,
    /// Clock value when the round is due to end
    pub deadline: Option<f64>,
    /// Transient feedback, purely cosmetic
    #[serde(skip)]
    pub effects: Vec<FeedbackEffect>,
    pub(super) next_id: u32,
}

impl GameSession {
    /// Create a session with the given ball and population
    pub fn new(seed: u64, ball: Ball, collectibles: Vec<Collectible>) -> Self {
        let next_id = collectibles.iter().map(|c| c.id).max().map_or(1, |id| id + 1);
        let initial_count = collectibles.len();
        Self {
            seed,
            ball,
            collectibles,
            initial_count,
            score: 0,
            phase: RoundPhase::NotStarted,
            time_ticks: 0,
            now: 0.0,
            started_at: None,
            deadline: None,
            effects: Vec::new(),
            next_id,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_active(&self) -> bool {
        self.phase == RoundPhase::Active
    }

    pub fn collectibles_remaining(&self) -> usize {
        self.collectibles.len()
    }

    pub fn collected_count(&self) -> usize {
        self.initial_count - self.collectibles.len()
    }

    /// Seconds left on the round clock (full duration before start, zero once ended)
    pub fn remaining_time(&self, duration: f64) -> f64 {
        match (self.phase, self.deadline) {
            (RoundPhase::Ended, _) => 0.0,
            (_, Some(deadline)) => (deadline - self.now).max(0.0),
            (_, None) => duration,
        }
    }
}
