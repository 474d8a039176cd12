//! Kinematic motion integration
//!
//! One fixed step per tick with no timestep scaling. There is no mass or
//! torque model: velocity comes straight from input (direct mode) or from
//! input acceleration damped by friction.

use glam::{Quat, Vec3};

use super::state::Ball;
use crate::WORLD_UP;
use crate::config::{BoundaryPolicy, ControlScheme, MotionConfig, PlayfieldConfig};

/// What a single integration step did
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionReport {
    /// Position change actually applied (after boundary handling)
    pub displacement: Vec3,
    /// Rolling rotation applied this step, if any
    pub rotation: Option<(Vec3, f32)>,
    pub clamped_x: bool,
    pub clamped_z: bool,
}

/// Advance the ball by one tick
///
/// `intent` is the input vector already scaled by the scheme's step: a
/// velocity in direct mode, an acceleration in acceleration mode.
pub fn integrate(
    ball: &mut Ball,
    intent: Vec3,
    motion: &MotionConfig,
    playfield: &PlayfieldConfig,
) -> MotionReport {
    match motion.scheme {
        ControlScheme::DirectVelocity => {
            ball.velocity = intent;
        }
        ControlScheme::Acceleration => {
            ball.velocity += intent;
            ball.velocity *= motion.friction;
        }
    }

    let before = ball.position;
    ball.position += ball.velocity;

    let mut report = MotionReport::default();
    if motion.rolling {
        report.rotation = roll(ball);
    }

    match motion.boundary {
        BoundaryPolicy::Clamp => {
            (report.clamped_x, report.clamped_z) =
                clamp_center(ball, playfield.bound_x, playfield.bound_z);
        }
        BoundaryPolicy::Walls => {
            (report.clamped_x, report.clamped_z) =
                stop_at_walls(ball, before, playfield.bound_x, playfield.bound_z);
        }
        BoundaryPolicy::Unbounded => {}
    }

    report.displacement = ball.position - before;
    report
}

/// Rotation axis and angle for rolling at `velocity` with no slip
///
/// The angle is the distance travelled over the circumference. Returns
/// `None` for zero velocity, where the axis is undefined.
pub fn rolling_step(velocity: Vec3, radius: f32) -> Option<(Vec3, f32)> {
    let speed = velocity.length();
    if speed == 0.0 || radius <= 0.0 {
        return None;
    }
    let axis = velocity.cross(WORLD_UP).try_normalize()?;
    let angle = speed / (std::f32::consts::TAU * radius);
    Some((axis, angle))
}

/// Apply one rolling step to the ball's orientation
fn roll(ball: &mut Ball) -> Option<(Vec3, f32)> {
    let (axis, angle) = rolling_step(ball.velocity, ball.radius)?;
    ball.orientation = (Quat::from_axis_angle(axis, angle) * ball.orientation).normalize();
    Some((axis, angle))
}

/// Clamp the center to the playfield rectangle; height is left alone
fn clamp_center(ball: &mut Ball, bound_x: f32, bound_z: f32) -> (bool, bool) {
    let p = ball.position;
    ball.position.x = p.x.clamp(-bound_x, bound_x);
    ball.position.z = p.z.clamp(-bound_z, bound_z);
    (ball.position.x != p.x, ball.position.z != p.z)
}

/// Solid walls at the bounds
///
/// The ball's surface stops flush against a wall and the velocity component
/// into it is dropped. Walls are planes checked against the end of the full
/// step, so no speed can carry the ball through one.
///
/// A ball that grew while resting on a wall may overlap it. The walls only
/// stop outward motion past the limit (or past where the step began), never
/// push the ball back, so a step is never longer than the velocity.
fn stop_at_walls(ball: &mut Ball, before: Vec3, bound_x: f32, bound_z: f32) -> (bool, bool) {
    let limit_x = (bound_x - ball.radius).max(0.0);
    let limit_z = (bound_z - ball.radius).max(0.0);

    let (x, hit_x) = stop_axis(ball.position.x, before.x, limit_x);
    if hit_x {
        ball.position.x = x;
        ball.velocity.x = 0.0;
    }
    let (z, hit_z) = stop_axis(ball.position.z, before.z, limit_z);
    if hit_z {
        ball.position.z = z;
        ball.velocity.z = 0.0;
    }
    (hit_x, hit_z)
}

/// Stop one coordinate at `±limit`, widened to wherever the step started
fn stop_axis(value: f32, start: f32, limit: f32) -> (f32, bool) {
    let high = limit.max(start);
    let low = (-limit).min(start);
    let stopped = value.clamp(low, high);
    (stopped, stopped != value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(half: f32) -> PlayfieldConfig {
        PlayfieldConfig {
            bound_x: half,
            bound_z: half,
        }
    }

    #[test]
    fn test_direct_mode_moves_by_intent() {
        let mut ball = Ball::default();
        let motion = MotionConfig::default();
        let report = integrate(&mut ball, Vec3::new(0.1, 0.0, 0.0), &motion, &field(50.0));

        assert_eq!(ball.position, Vec3::new(0.1, 0.0, 0.0));
        assert_eq!(ball.velocity, Vec3::new(0.1, 0.0, 0.0));
        assert_eq!(report.displacement, Vec3::new(0.1, 0.0, 0.0));
        assert!(report.rotation.is_some());
    }

    #[test]
    fn test_direct_mode_stops_on_release() {
        let mut ball = Ball::default();
        let motion = MotionConfig::default();
        integrate(&mut ball, Vec3::new(0.1, 0.0, 0.0), &motion, &field(50.0));
        integrate(&mut ball, Vec3::ZERO, &motion, &field(50.0));
        assert_eq!(ball.velocity, Vec3::ZERO);
        assert_eq!(ball.position.x, 0.1);
    }

    #[test]
    fn test_acceleration_mode_friction() {
        let mut ball = Ball::default();
        let motion = MotionConfig {
            scheme: ControlScheme::Acceleration,
            friction: 0.5,
            ..Default::default()
        };
        integrate(&mut ball, Vec3::new(1.0, 0.0, 0.0), &motion, &field(50.0));
        assert_eq!(ball.velocity.x, 0.5);
        assert_eq!(ball.position.x, 0.5);

        // Coasting: only friction acts
        integrate(&mut ball, Vec3::ZERO, &motion, &field(50.0));
        assert_eq!(ball.velocity.x, 0.25);
        assert_eq!(ball.position.x, 0.75);
    }

    #[test]
    fn test_zero_velocity_no_rotation() {
        let mut ball = Ball::default();
        let report = integrate(&mut ball, Vec3::ZERO, &MotionConfig::default(), &field(50.0));
        assert!(report.rotation.is_none());
        assert_eq!(ball.orientation, Quat::IDENTITY);
        assert!(ball.orientation.is_finite());
    }

    #[test]
    fn test_rolling_step_angle() {
        let (axis, angle) = rolling_step(Vec3::new(0.1, 0.0, 0.0), 1.0).unwrap();
        // cross(+x, +y) = +z
        assert!((axis - Vec3::Z).length() < 1e-6);
        assert!((angle - 0.1 / std::f32::consts::TAU).abs() < 1e-7);

        assert!(rolling_step(Vec3::ZERO, 1.0).is_none());
        // Straight up has no ground-plane rolling axis
        assert!(rolling_step(Vec3::Y, 1.0).is_none());
    }

    #[test]
    fn test_rolling_disabled() {
        let mut ball = Ball::default();
        let motion = MotionConfig {
            rolling: false,
            ..Default::default()
        };
        let report = integrate(&mut ball, Vec3::new(0.1, 0.0, 0.1), &motion, &field(50.0));
        assert!(report.rotation.is_none());
        assert_eq!(ball.orientation, Quat::IDENTITY);
    }

    #[test]
    fn test_clamp_keeps_center_inside() {
        let mut ball = Ball::new(Vec3::new(4.95, 0.3, -4.95), 1.0);
        let motion = MotionConfig {
            velocity_step: 1.0,
            ..Default::default()
        };
        let report = integrate(&mut ball, Vec3::new(1.0, 0.0, -1.0), &motion, &field(5.0));
        assert_eq!(ball.position, Vec3::new(5.0, 0.3, -5.0));
        assert!(report.clamped_x && report.clamped_z);
        // Clamping never lengthens the step
        assert!(report.displacement.length() <= ball.velocity.length());
    }

    #[test]
    fn test_walls_stop_surface_and_velocity() {
        let mut ball = Ball::new(Vec3::new(3.5, 0.0, 0.0), 1.0);
        let motion = MotionConfig {
            scheme: ControlScheme::Acceleration,
            friction: 1.0,
            boundary: BoundaryPolicy::Walls,
            ..Default::default()
        };
        let report = integrate(&mut ball, Vec3::new(100.0, 0.0, 0.0), &motion, &field(5.0));
        assert_eq!(ball.position.x, 4.0);
        assert_eq!(ball.velocity.x, 0.0);
        assert!(report.clamped_x);
        assert!(!report.clamped_z);
    }

    #[test]
    fn test_walls_leave_grown_ball_in_place() {
        // Radius grew from 1.0 while the surface was flush at x = 5
        let mut ball = Ball::new(Vec3::new(4.0, 0.0, 0.0), 1.02);
        let motion = MotionConfig {
            boundary: BoundaryPolicy::Walls,
            ..Default::default()
        };

        let report = integrate(&mut ball, Vec3::ZERO, &motion, &field(5.0));
        assert_eq!(ball.position.x, 4.0);
        assert_eq!(report.displacement, Vec3::ZERO);

        // Pushing outward goes nowhere
        let report = integrate(&mut ball, Vec3::new(0.1, 0.0, 0.0), &motion, &field(5.0));
        assert_eq!(ball.position.x, 4.0);
        assert_eq!(ball.velocity.x, 0.0);
        assert!(report.clamped_x);

        // Moving away is a normal step
        integrate(&mut ball, Vec3::new(-0.1, 0.0, 0.0), &motion, &field(5.0));
        assert!((ball.position.x - 3.9).abs() < 1e-6);
    }

    #[test]
    fn test_unbounded_leaves_position() {
        let mut ball = Ball::default();
        let motion = MotionConfig {
            boundary: BoundaryPolicy::Unbounded,
            ..Default::default()
        };
        integrate(&mut ball, Vec3::new(80.0, 0.0, 0.0), &motion, &field(5.0));
        assert_eq!(ball.position.x, 80.0);
    }
}
