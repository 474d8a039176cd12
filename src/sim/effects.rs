//! Transient collection feedback
//!
//! Each flash carries its own expiry time and is swept on every tick, so a
//! round that ends mid-effect leaves nothing scheduled behind it.

use glam::Vec3;

/// A short-lived light flash at a collection point
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackEffect {
    pub id: u32,
    pub position: Vec3,
    pub color: u32,
    /// Session clock value after which the flash is gone
    pub expires_at: f64,
}

impl FeedbackEffect {
    pub fn is_expired(&self, now: f64) -> bool {
        now >= self.expires_at
    }
}

/// Drop expired effects, returning their ids
pub fn expire_effects(effects: &mut Vec<FeedbackEffect>, now: f64) -> Vec<u32> {
    let mut expired = Vec::new();
    effects.retain(|e| {
        if e.is_expired(now) {
            expired.push(e.id);
            false
        } else {
            true
        }
    });
    expired
}
