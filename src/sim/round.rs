//! Round lifecycle
//!
//! `NotStarted -> Active -> Ended`, each edge taken at most once. The end of
//! the round is driven by a one-shot deadline armed on a
//! [`DeadlineScheduler`]; the timer sets a shared [`DeadlineSignal`] that the
//! next tick observes before doing anything else, so a stalled frame loop
//! still ends on time and no tick runs after expiry.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::Duration;

use super::collision::BoundsSource;
use super::input::InputTracker;
use super::state::{GameSession, RoundPhase};
use super::tick::{GameEvent, TickReport, tick};
use crate::config::GameConfig;
use crate::error::GameError;

/// Cross-task "round is over" flag
#[derive(Debug, Clone, Default)]
pub struct DeadlineSignal(Arc<AtomicBool>);

impl DeadlineSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flag; true only for the call that actually set it
    pub fn fire(&self) -> bool {
        !self.0.swap(true, Ordering::AcqRel)
    }

    pub fn is_fired(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Something that can fire a signal after a delay
pub trait DeadlineScheduler {
    fn schedule(&mut self, after: Duration, signal: DeadlineSignal);

    /// Let simulated time pass. Real-time schedulers ignore this.
    fn advance(&mut self, _dt: Duration) {}

    /// Drop every pending deadline without firing it
    fn cancel_all(&mut self);
}

/// Wall-clock deadlines, one timer thread each
///
/// Dropping the scheduler cancels anything still pending.
#[derive(Debug, Default)]
pub struct ThreadScheduler {
    timers: Vec<(mpsc::Sender<()>, JoinHandle<()>)>,
}

impl ThreadScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DeadlineScheduler for ThreadScheduler {
    fn schedule(&mut self, after: Duration, signal: DeadlineSignal) {
        let (cancel_tx, cancel_rx) = mpsc::channel::<()>();
        let handle = std::thread::spawn(move || {
            // A message or a dropped sender both mean cancel
            if let Err(mpsc::RecvTimeoutError::Timeout) = cancel_rx.recv_timeout(after) {
                signal.fire();
            }
        });
        self.timers.push((cancel_tx, handle));
    }

    fn cancel_all(&mut self) {
        for (cancel_tx, handle) in self.timers.drain(..) {
            let _ = cancel_tx.send(());
            if handle.join().is_err() {
                log::warn!("Round timer thread panicked");
            }
        }
    }
}

impl Drop for ThreadScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

/// Simulated clock; deadlines fire from [`DeadlineScheduler::advance`]
#[derive(Debug, Default)]
pub struct ManualScheduler {
    elapsed: Duration,
    pending: Vec<(Duration, DeadlineSignal)>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl DeadlineScheduler for ManualScheduler {
    fn schedule(&mut self, after: Duration, signal: DeadlineSignal) {
        self.pending.push((self.elapsed + after, signal));
    }

    fn advance(&mut self, dt: Duration) {
        self.elapsed += dt;
        let now = self.elapsed;
        self.pending.retain(|(due, signal)| {
            if *due <= now {
                signal.fire();
                false
            } else {
                true
            }
        });
    }

    fn cancel_all(&mut self) {
        self.pending.clear();
    }
}

/// Owns the session and gates every mutation on the round phase
#[derive(Debug)]
pub struct RoundController {
    session: GameSession,
    config: GameConfig,
    signal: DeadlineSignal,
}

impl RoundController {
    pub fn new(config: GameConfig, session: GameSession) -> Self {
        Self {
            session,
            config,
            signal: DeadlineSignal::new(),
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> RoundPhase {
        self.session.phase
    }

    pub fn is_active(&self) -> bool {
        self.session.is_active()
    }

    pub fn score(&self) -> u64 {
        self.session.score
    }

    /// Handle to the deadline flag (for hosts that end rounds themselves)
    pub fn signal(&self) -> DeadlineSignal {
        self.signal.clone()
    }

    /// Arm the deadline and enable ticking
    pub fn start(&mut self, scheduler: &mut dyn DeadlineScheduler) -> Result<(), GameError> {
        match self.session.phase {
            RoundPhase::NotStarted => {}
            RoundPhase::Active => {
                log::warn!("Round already started");
                return Ok(());
            }
            RoundPhase::Ended => return Err(GameError::RoundEnded),
        }

        let duration = self.config.round.duration;
        let timeout = Duration::try_from_secs_f64(duration)
            .map_err(|e| GameError::InvalidConfig(format!("round duration {duration}: {e}")))?;
        self.session.phase = RoundPhase::Active;
        self.session.started_at = Some(self.session.now);
        self.session.deadline = Some(self.session.now + duration);
        scheduler.schedule(timeout, self.signal.clone());

        log::info!(
            "Round started: {} collectibles, {:.1}s",
            self.session.collectibles.len(),
            duration
        );
        Ok(())
    }

    /// Move the session clock forward; frozen once the round has ended
    pub fn advance_clock(&mut self, dt: f64) {
        if self.session.phase != RoundPhase::Ended {
            self.session.now += dt;
        }
    }

    /// End the round if the deadline fired; yields the final score exactly once
    pub fn observe_deadline(&mut self) -> Option<u64> {
        if self.session.phase != RoundPhase::Active || !self.signal.is_fired() {
            return None;
        }
        self.session.phase = RoundPhase::Ended;
        self.session.effects.clear();
        log::info!(
            "Round ended: score {} ({} of {} collected)",
            self.session.score,
            self.session.collected_count(),
            self.session.initial_count
        );
        Some(self.session.score)
    }

    /// Run one tick, or end the round if the deadline has fired
    pub fn tick(
        &mut self,
        input: &InputTracker,
        bounds: &dyn BoundsSource,
    ) -> Result<TickReport, GameError> {
        match self.session.phase {
            RoundPhase::NotStarted => return Err(GameError::RoundNotStarted),
            RoundPhase::Ended => return Err(GameError::RoundEnded),
            RoundPhase::Active => {}
        }

        if let Some(final_score) = self.observe_deadline() {
            return Ok(TickReport {
                events: vec![GameEvent::RoundEnded { final_score }],
                ..Default::default()
            });
        }

        Ok(tick(&mut self.session, input, &self.config, bounds))
    }
}
