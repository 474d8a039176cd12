//! Fixed-step simulation tick
//!
//! Input → motion → collisions → effects, once per frame, with no timestep
//! scaling. The round controller decides whether a tick may run at all.

use glam::Vec3;

use super::collision::{BoundsSource, CollisionOutcome, check_collisions};
use super::effects::expire_effects;
use super::input::InputTracker;
use super::motion::{MotionReport, integrate};
use super::state::GameSession;
use crate::config::GameConfig;

/// Notifications for the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A collectible was rolled up
    Collected { id: u32, position: Vec3 },
    /// Score after this tick's collections
    ScoreChanged { score: u64 },
    /// Ball radius after this tick's collections
    BallGrew { radius: f32 },
    /// Deadline fired; nothing moves after this
    RoundEnded { final_score: u64 },
}

/// Everything one tick changed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub motion: MotionReport,
    pub collisions: CollisionOutcome,
    /// Feedback effects that timed out this tick
    pub expired_effects: Vec<u32>,
    pub events: Vec<GameEvent>,
}

/// Advance an active session by one tick
///
/// Inactive sessions are left untouched.
pub fn tick(
    session: &mut GameSession,
    input: &InputTracker,
    config: &GameConfig,
    bounds: &dyn BoundsSource,
) -> TickReport {
    let mut report = TickReport::default();
    if !session.is_active() {
        return report;
    }

    session.time_ticks += 1;

    let intent = input.intent(config.motion.step());
    report.motion = integrate(&mut session.ball, intent, &config.motion, &config.playfield);

    report.expired_effects = expire_effects(&mut session.effects, session.now);

    // Flash effects draw ids from the entity id space
    let GameSession {
        ball,
        collectibles,
        now,
        next_id,
        ..
    } = session;
    let outcome = check_collisions(ball, collectibles, &config.scoring, *now, bounds, || {
        let id = *next_id;
        *next_id += 1;
        id
    });

    if !outcome.is_empty() {
        session.score += outcome.score_delta;
        for (id, position) in outcome.removed_ids.iter().zip(&outcome.removed_positions) {
            log::debug!("Collected #{id} at ({:.1}, {:.1})", position.x, position.z);
            report.events.push(GameEvent::Collected {
                id: *id,
                position: *position,
            });
        }
        report.events.push(GameEvent::ScoreChanged {
            score: session.score,
        });
        report.events.push(GameEvent::BallGrew {
            radius: session.ball.radius,
        });
        session.effects.extend(outcome.feedback.iter().cloned());
    }

    report.collisions = outcome;
    report
}
