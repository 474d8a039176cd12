//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - One fixed step per tick, no timestep scaling
//! - Seeded RNG only
//! - Stable iteration order (population order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod camera;
pub mod collision;
pub mod effects;
pub mod input;
pub mod motion;
pub mod round;
pub mod spawn;
pub mod state;
pub mod tick;

pub use camera::{CameraView, follow_camera};
pub use collision::{Aabb, BoundsSource, CollisionOutcome, ShapeBounds, check_collisions};
pub use effects::FeedbackEffect;
pub use input::{Direction, InputTracker, KeyCode, SharedInput};
pub use motion::{MotionReport, integrate, rolling_step};
pub use round::{
    DeadlineScheduler, DeadlineSignal, ManualScheduler, RoundController, ThreadScheduler,
};
pub use spawn::spawn_collectibles;
pub use state::{Ball, Collectible, GameSession, RoundPhase, Shape, ShapeKind};
pub use tick::{GameEvent, TickReport, tick};
