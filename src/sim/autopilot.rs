//! Demo autopilot
//!
//! Plays the round hands-free by holding the arrow keys that point at the
//! nearest collectible. It only ever produces key edges, so it drives the
//! game through the same path as a player.

use glam::Vec3;

use super::input::{InputTracker, KeyCode};
use super::state::GameSession;

/// Axis offsets smaller than this are treated as aligned
pub const DEAD_ZONE: f32 = 0.05;

/// A key press or release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEdge {
    Down(KeyCode),
    Up(KeyCode),
}

/// Keys that should be held to move from `from` toward `to`
fn desired_keys(from: Vec3, to: Vec3) -> [(KeyCode, bool); 4] {
    let delta = crate::flatten(to - from);
    [
        (KeyCode::ArrowLeft, delta.x < -DEAD_ZONE),
        (KeyCode::ArrowRight, delta.x > DEAD_ZONE),
        (KeyCode::ArrowUp, delta.z < -DEAD_ZONE),
        (KeyCode::ArrowDown, delta.z > DEAD_ZONE),
    ]
}

/// Nearest live collectible on the ground plane
pub fn nearest_target(session: &GameSession) -> Option<Vec3> {
    let ball = session.ball.position;
    session
        .collectibles
        .iter()
        .filter(|c| c.alive)
        .map(|c| c.position)
        .min_by(|a, b| {
            crate::ground_distance(ball, *a)
                .partial_cmp(&crate::ground_distance(ball, *b))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// Key edges that turn `held` into the keys needed to chase the nearest target
///
/// With nothing left to collect every held key is released.
pub fn steer(session: &GameSession, held: &InputTracker) -> Vec<KeyEdge> {
    let keys = match nearest_target(session) {
        Some(target) => desired_keys(session.ball.position, target),
        None => [
            (KeyCode::ArrowLeft, false),
            (KeyCode::ArrowRight, false),
            (KeyCode::ArrowUp, false),
            (KeyCode::ArrowDown, false),
        ],
    };

    keys.into_iter()
        .filter_map(|(key, want)| {
            let is_held = held.is_held(key.direction());
            match (want, is_held) {
                (true, false) => Some(KeyEdge::Down(key)),
                (false, true) => Some(KeyEdge::Up(key)),
                _ => None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Ball, Collectible, Shape};

    fn session(targets: &[Vec3]) -> GameSession {
        let objects = targets
            .iter()
            .enumerate()
            .map(|(i, p)| Collectible::new(i as u32 + 1, *p, Shape::Sphere { radius: 0.5 }, 0))
            .collect();
        GameSession::new(1, Ball::default(), objects)
    }

    #[test]
    fn test_steer_toward_nearest() {
        let s = session(&[Vec3::new(10.0, 0.0, 10.0), Vec3::new(-3.0, 0.0, -2.0)]);
        assert_eq!(nearest_target(&s), Some(Vec3::new(-3.0, 0.0, -2.0)));

        let edges = steer(&s, &InputTracker::new());
        assert_eq!(
            edges,
            vec![KeyEdge::Down(KeyCode::ArrowLeft), KeyEdge::Down(KeyCode::ArrowUp)]
        );
    }

    #[test]
    fn test_steer_releases_keys_no_longer_needed() {
        let s = session(&[Vec3::new(5.0, 0.0, 0.0)]);
        let mut held = InputTracker::new();
        held.on_key_down(KeyCode::ArrowUp);
        held.on_key_down(KeyCode::ArrowRight);

        let edges = steer(&s, &held);
        assert_eq!(edges, vec![KeyEdge::Up(KeyCode::ArrowUp)]);
    }

    #[test]
    fn test_steer_idle_when_empty() {
        let s = session(&[]);
        let mut held = InputTracker::new();
        held.on_key_down(KeyCode::ArrowDown);
        assert_eq!(steer(&s, &held), vec![KeyEdge::Up(KeyCode::ArrowDown)]);
        assert!(steer(&s, &InputTracker::new()).is_empty());
    }
}
