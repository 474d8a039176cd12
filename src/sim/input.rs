//! Keyboard intent tracking
//!
//! Arrow key edges set or clear one flag per direction. The intent on an
//! axis is the sum of its two opposite directions, so releasing Left while
//! Right is still held leaves the ball moving right.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use glam::Vec3;

/// Logical movement direction on the ground plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// -z
    Forward,
    /// +z
    Back,
    /// -x
    Left,
    /// +x
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Forward,
        Direction::Back,
        Direction::Left,
        Direction::Right,
    ];

    fn bit(self) -> u8 {
        match self {
            Direction::Forward => 1 << 0,
            Direction::Back => 1 << 1,
            Direction::Left => 1 << 2,
            Direction::Right => 1 << 3,
        }
    }

    /// Unit contribution on the ground plane
    pub fn unit(self) -> Vec3 {
        match self {
            Direction::Forward => Vec3::NEG_Z,
            Direction::Back => Vec3::Z,
            Direction::Left => Vec3::NEG_X,
            Direction::Right => Vec3::X,
        }
    }
}

/// Recognized physical keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

impl KeyCode {
    /// Parse a DOM `KeyboardEvent.code` / `key` name
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowUp" | "Up" => Some(KeyCode::ArrowUp),
            "ArrowDown" | "Down" => Some(KeyCode::ArrowDown),
            "ArrowLeft" | "Left" => Some(KeyCode::ArrowLeft),
            "ArrowRight" | "Right" => Some(KeyCode::ArrowRight),
            _ => None,
        }
    }

    /// Parse a legacy numeric key code
    pub fn from_key_code(code: u32) -> Option<Self> {
        match code {
            37 => Some(KeyCode::ArrowLeft),
            38 => Some(KeyCode::ArrowUp),
            39 => Some(KeyCode::ArrowRight),
            40 => Some(KeyCode::ArrowDown),
            _ => None,
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            KeyCode::ArrowUp => Direction::Forward,
            KeyCode::ArrowDown => Direction::Back,
            KeyCode::ArrowLeft => Direction::Left,
            KeyCode::ArrowRight => Direction::Right,
        }
    }
}

/// Held-direction flags for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputTracker {
    held: u8,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_key_down(&mut self, key: KeyCode) {
        self.held |= key.direction().bit();
    }

    pub fn on_key_up(&mut self, key: KeyCode) {
        self.held &= !key.direction().bit();
    }

    pub fn is_held(&self, direction: Direction) -> bool {
        self.held & direction.bit() != 0
    }

    pub fn is_idle(&self) -> bool {
        self.held == 0
    }

    /// Release everything
    pub fn clear(&mut self) {
        self.held = 0;
    }

    /// Per-axis intent with magnitude `step`; each component is -step, 0 or +step
    pub fn intent(&self, step: f32) -> Vec3 {
        Direction::ALL
            .iter()
            .filter(|d| self.is_held(**d))
            .map(|d| d.unit())
            .sum::<Vec3>()
            * step
    }
}

/// Input tracker shared with event handlers on other threads
///
/// Each edge is a single atomic bit operation; the tick takes a snapshot.
#[derive(Debug, Clone, Default)]
pub struct SharedInput {
    held: Arc<AtomicU8>,
}

impl SharedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&self, key: KeyCode) {
        self.held.fetch_or(key.direction().bit(), Ordering::AcqRel);
    }

    pub fn key_up(&self, key: KeyCode) {
        self.held.fetch_and(!key.direction().bit(), Ordering::AcqRel);
    }

    /// DOM-style key name; unrecognized keys are ignored
    pub fn key_down_code(&self, code: &str) {
        match KeyCode::from_code(code) {
            Some(key) => self.key_down(key),
            None => log::trace!("Ignoring keydown {code}"),
        }
    }

    pub fn key_up_code(&self, code: &str) {
        match KeyCode::from_code(code) {
            Some(key) => self.key_up(key),
            None => log::trace!("Ignoring keyup {code}"),
        }
    }

    pub fn snapshot(&self) -> InputTracker {
        InputTracker {
            held: self.held.load(Ordering::Acquire),
        }
    }

    pub fn clear(&self) {
        self.held.store(0, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_key_intent() {
        let mut input = InputTracker::new();
        input.on_key_down(KeyCode::ArrowLeft);
        assert_eq!(input.intent(0.1), Vec3::new(-0.1, 0.0, 0.0));

        input.on_key_up(KeyCode::ArrowLeft);
        assert_eq!(input.intent(0.1), Vec3::ZERO);
        assert!(input.is_idle());
    }

    #[test]
    fn test_release_opposite_keeps_held_key() {
        let mut input = InputTracker::new();
        input.on_key_down(KeyCode::ArrowRight);
        input.on_key_down(KeyCode::ArrowLeft);
        // Both held cancel out
        assert_eq!(input.intent(0.1).x, 0.0);

        input.on_key_up(KeyCode::ArrowLeft);
        assert_eq!(input.intent(0.1), Vec3::new(0.1, 0.0, 0.0));
    }

    #[test]
    fn test_diagonal_intent() {
        let mut input = InputTracker::new();
        input.on_key_down(KeyCode::ArrowUp);
        input.on_key_down(KeyCode::ArrowRight);
        assert_eq!(input.intent(2.0), Vec3::new(2.0, 0.0, -2.0));

        input.on_key_up(KeyCode::ArrowDown);
        assert_eq!(input.intent(2.0), Vec3::new(2.0, 0.0, -2.0));
    }

    #[test]
    fn test_key_code_mapping() {
        assert_eq!(KeyCode::from_key_code(37), Some(KeyCode::ArrowLeft));
        assert_eq!(KeyCode::from_key_code(40), Some(KeyCode::ArrowDown));
        assert_eq!(KeyCode::from_key_code(32), None);
        assert_eq!(KeyCode::from_code("ArrowUp"), Some(KeyCode::ArrowUp));
        assert_eq!(KeyCode::from_code("KeyW"), None);
    }

    #[test]
    fn test_shared_input_across_threads() {
        let shared = SharedInput::new();
        let handle = shared.clone();
        std::thread::spawn(move || {
            handle.key_down(KeyCode::ArrowDown);
            handle.key_down_code("Space");
        })
        .join()
        .unwrap();

        let snapshot = shared.snapshot();
        assert!(snapshot.is_held(Direction::Back));
        assert_eq!(snapshot.intent(1.0), Vec3::Z);

        shared.key_up_code("ArrowDown");
        assert!(shared.snapshot().is_idle());
    }
}
