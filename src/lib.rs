//! Roll Collect - a rolling ball collector arcade round
//!
//! Core modules:
//! - `sim`: Deterministic simulation (input, motion, collisions, round lifecycle)
//! - `game`: Frame driver sequencing the simulation against the scene
//! - `scene`: Rendering/asset/presentation collaborator boundary
//! - `config`: Data-driven tuning, loaded from JSON
//! - `error`: Error taxonomy for setup and session misuse

pub mod config;
pub mod error;
pub mod game;
pub mod scene;
pub mod sim;

pub use config::{BoundaryPolicy, CameraPreset, ControlScheme, GameConfig};
pub use error::GameError;
pub use game::{FrameStatus, Game};

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Initial ball radius
    pub const BALL_RADIUS: f32 = 1.0;
    /// Ball rests on the ground plane at this height
    pub const BALL_REST_Y: f32 = 0.0;
    /// Ground plane sits just below the ball's starting center
    pub const GROUND_Y: f32 = -0.5;
    /// Ground plane side length
    pub const GROUND_SIZE: f32 = 500.0;

    /// Direct-velocity mode: velocity per held key, units/tick
    pub const VELOCITY_STEP: f32 = 0.1;
    /// Acceleration mode: acceleration per held key, units/tick²
    pub const ACCELERATION_STEP: f32 = 0.01;
    /// Per-tick multiplicative velocity decay in acceleration mode
    pub const FRICTION: f32 = 0.98;

    /// Points per collected object
    pub const COLLECT_AWARD: u64 = 10;
    /// Radius growth per collected object
    pub const GROWTH_PER_COLLECT: f32 = 0.02;
    /// Lifetime of the flash shown on collection (seconds)
    pub const FLASH_LIFETIME: f64 = 0.15;

    /// Round length (seconds)
    pub const ROUND_DURATION: f64 = 20.0;
    /// Collectibles spawned at round start
    pub const COLLECTIBLE_COUNT: usize = 100;
    /// Playfield half extent along x and z
    pub const PLAYFIELD_HALF_EXTENT: f32 = 50.0;

    /// Chase camera offset from the ball
    pub const CHASE_OFFSET: [f32; 3] = [5.0, 5.0, 5.0];
    /// Overview camera offset from the ball
    pub const OVERVIEW_OFFSET: [f32; 3] = [0.0, 30.0, 20.0];
}

/// World up direction; the ground plane is the XZ plane
pub const WORLD_UP: Vec3 = Vec3::Y;

/// Project a vector onto the ground plane (drop the vertical component)
#[inline]
pub fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Horizontal distance between two points, ignoring height
#[inline]
pub fn ground_distance(a: Vec3, b: Vec3) -> f32 {
    flatten(b - a).length()
}
