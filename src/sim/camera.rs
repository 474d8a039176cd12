//! Follow camera
//!
//! Stateless: the view is recomputed from the ball every frame.

use glam::{Mat4, Vec3};

use super::state::Ball;
use crate::WORLD_UP;

/// Camera eye and look-at target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub eye: Vec3,
    pub target: Vec3,
}

impl CameraView {
    /// Right-handed view matrix for the renderer
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, WORLD_UP)
    }
}

/// Place the camera at `offset` from the ball, looking at it
///
/// Returns `None` while the ball does not exist yet (assets still loading).
pub fn follow_camera(ball: Option<&Ball>, offset: Vec3) -> Option<CameraView> {
    let ball = ball?;
    Some(CameraView {
        eye: ball.position + offset,
        target: ball.position,
    })
}
