//! Game configuration
//!
//! Every tunable of a round lives here. Loaded from JSON; any section or
//! field left out falls back to the defaults in [`crate::consts`].

use std::path::Path;
use std::time::Duration;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::GameError;

/// How arrow keys drive the ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ControlScheme {
    /// Held keys pin the velocity; no friction
    #[default]
    DirectVelocity,
    /// Held keys set an acceleration; friction damps velocity
    Acceleration,
}

impl ControlScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlScheme::DirectVelocity => "direct",
            ControlScheme::Acceleration => "acceleration",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "direct" | "velocity" | "direct_velocity" => Some(ControlScheme::DirectVelocity),
            "accel" | "acceleration" => Some(ControlScheme::Acceleration),
            _ => None,
        }
    }
}

/// What happens when the ball reaches the playfield edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Clamp the ball's center to the bounds
    #[default]
    Clamp,
    /// Solid walls at the bounds; the ball's whole extent stays inside
    Walls,
    /// No boundary handling
    Unbounded,
}

/// Camera offset presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CameraPreset {
    /// Close chase cam behind and above the ball
    #[default]
    Chase,
    /// Elevated view over the playfield
    Overview,
}

impl CameraPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            CameraPreset::Chase => "Chase",
            CameraPreset::Overview => "Overview",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "chase" => Some(CameraPreset::Chase),
            "overview" | "over" => Some(CameraPreset::Overview),
            _ => None,
        }
    }

    /// Offset from the ball to the camera eye
    pub fn offset(&self) -> Vec3 {
        match self {
            CameraPreset::Chase => Vec3::from_array(CHASE_OFFSET),
            CameraPreset::Overview => Vec3::from_array(OVERVIEW_OFFSET),
        }
    }
}

/// Input and integration tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub scheme: ControlScheme,
    /// Velocity per held key in direct mode
    pub velocity_step: f32,
    /// Acceleration per held key in acceleration mode
    pub acceleration_step: f32,
    /// Per-tick velocity multiplier in acceleration mode
    pub friction: f32,
    /// Rotate the ball to match the distance rolled
    pub rolling: bool,
    pub boundary: BoundaryPolicy,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            scheme: ControlScheme::DirectVelocity,
            velocity_step: VELOCITY_STEP,
            acceleration_step: ACCELERATION_STEP,
            friction: FRICTION,
            rolling: true,
            boundary: BoundaryPolicy::Clamp,
        }
    }
}

impl MotionConfig {
    /// Magnitude a held key contributes on its axis for the active scheme
    pub fn step(&self) -> f32 {
        match self.scheme {
            ControlScheme::DirectVelocity => self.velocity_step,
            ControlScheme::Acceleration => self.acceleration_step,
        }
    }
}

/// Collection rewards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub award: u64,
    pub growth: f32,
    /// Spawn a flash on every collection
    pub flash: bool,
    /// Flash lifetime in seconds
    pub flash_lifetime: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            award: COLLECT_AWARD,
            growth: GROWTH_PER_COLLECT,
            flash: true,
            flash_lifetime: FLASH_LIFETIME,
        }
    }
}

/// Round timing and population
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    /// Round length in seconds
    pub duration: f64,
    pub collectible_count: usize,
    pub ball_radius: f32,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            duration: ROUND_DURATION,
            collectible_count: COLLECTIBLE_COUNT,
            ball_radius: BALL_RADIUS,
        }
    }
}

/// Playfield extents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayfieldConfig {
    pub bound_x: f32,
    pub bound_z: f32,
}

impl Default for PlayfieldConfig {
    fn default() -> Self {
        Self {
            bound_x: PLAYFIELD_HALF_EXTENT,
            bound_z: PLAYFIELD_HALF_EXTENT,
        }
    }
}

/// Camera placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CameraConfig {
    pub preset: CameraPreset,
    /// Overrides the preset offset when set
    pub offset: Option<Vec3>,
}

impl CameraConfig {
    pub fn effective_offset(&self) -> Vec3 {
        self.offset.unwrap_or_else(|| self.preset.offset())
    }
}

/// Asset locations resolved by the [`crate::scene::AssetLoader`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub ground_texture: String,
    pub ball_texture: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            ground_texture: "assets/grass.jpg".into(),
            ball_texture: "assets/rocks.jpg".into(),
        }
    }
}

/// Complete configuration for a round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GameConfig {
    pub motion: MotionConfig,
    pub scoring: ScoringConfig,
    pub round: RoundConfig,
    pub playfield: PlayfieldConfig,
    pub camera: CameraConfig,
    pub assets: AssetConfig,
}

impl GameConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self, GameError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GameError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, GameError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would break the simulation's invariants
    pub fn validate(&self) -> Result<(), GameError> {
        fn check(ok: bool, msg: &str) -> Result<(), GameError> {
            if ok {
                Ok(())
            } else {
                Err(GameError::InvalidConfig(msg.to_string()))
            }
        }

        let m = &self.motion;
        check(m.velocity_step.is_finite() && m.velocity_step >= 0.0, "velocity_step must be >= 0")?;
        check(
            m.acceleration_step.is_finite() && m.acceleration_step >= 0.0,
            "acceleration_step must be >= 0",
        )?;
        check(m.friction > 0.0 && m.friction <= 1.0, "friction must be in (0, 1]")?;

        let s = &self.scoring;
        check(s.growth.is_finite() && s.growth >= 0.0, "growth must be >= 0")?;
        check(s.flash_lifetime >= 0.0, "flash_lifetime must be >= 0")?;

        let r = &self.round;
        check(r.duration.is_finite() && r.duration > 0.0, "duration must be > 0")?;
        check(
            Duration::try_from_secs_f64(r.duration).is_ok(),
            "duration is too long",
        )?;
        check(r.ball_radius.is_finite() && r.ball_radius > 0.0, "ball_radius must be > 0")?;

        let p = &self.playfield;
        check(p.bound_x > 0.0 && p.bound_z > 0.0, "playfield bounds must be > 0")?;
        if m.boundary == BoundaryPolicy::Walls {
            check(
                r.ball_radius < p.bound_x && r.ball_radius < p.bound_z,
                "ball must fit between the walls",
            )?;
        }

        check(self.camera.effective_offset().is_finite(), "camera offset must be finite")?;
        Ok(())
    }
}
