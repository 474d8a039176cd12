//! Frame driver
//!
//! Owns the round, the scene and the presentation sink, and runs one
//! simulation tick per frame: input snapshot, tick, scene sync, camera,
//! render, notifications. Setup loads assets first and refuses to build a
//! game if any of them fail, so a tick never sees a half-built round.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use glam::Vec3;

use crate::config::GameConfig;
use crate::consts::{BALL_REST_Y, GROUND_SIZE, GROUND_Y};
use crate::error::GameError;
use crate::scene::{
    Appearance, AssetHandle, AssetLoader, AssetRequest, GameObserver, ObjectHandle, SceneBackend,
    SceneBounds, SceneShape, Transform,
};
use crate::sim::{
    Ball, CameraView, DeadlineScheduler, GameEvent, GameSession, KeyCode, RoundController,
    RoundPhase, SharedInput, TickReport, follow_camera, spawn_collectibles,
};

/// Whether the host should schedule another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Continue,
    Stop,
}

/// Textures resolved during setup
#[derive(Debug, Clone, Copy, Default)]
struct LoadedAssets {
    ground: Option<AssetHandle>,
    ball: Option<AssetHandle>,
}

/// Game instance holding all state
pub struct Game<S: SceneBackend, O: GameObserver, D: DeadlineScheduler> {
    round: RoundController,
    scene: S,
    observer: O,
    scheduler: D,
    input: SharedInput,
    ball_handle: ObjectHandle,
    /// Collectible id → scene object
    handles: HashMap<u32, ObjectHandle>,
    flashes: HashSet<u32>,
    finished: bool,
}

impl<S: SceneBackend, O: GameObserver, D: DeadlineScheduler> Game<S, O, D> {
    /// Load assets, lay out a seeded round and build the scene
    ///
    /// Fails without creating anything if the configuration is invalid or an
    /// asset does not load.
    pub fn setup(
        config: GameConfig,
        seed: u64,
        assets: &mut dyn AssetLoader,
        scene: S,
        observer: O,
        scheduler: D,
    ) -> Result<Self, GameError> {
        config.validate()?;

        let loaded = LoadedAssets {
            ground: Some(assets.load(&AssetRequest::texture(&config.assets.ground_texture))?),
            ball: Some(assets.load(&AssetRequest::texture(&config.assets.ball_texture))?),
        };

        let start = Vec3::new(0.0, BALL_REST_Y, 0.0);
        let ball = Ball::new(start, config.round.ball_radius);
        let collectibles = spawn_collectibles(
            seed,
            config.round.collectible_count,
            &config.playfield,
            start,
            1,
        );
        let session = GameSession::new(seed, ball, collectibles);

        log::info!("Setup complete (seed {seed})");
        Ok(Self::build(config, session, loaded, scene, observer, scheduler))
    }

    /// Build a game around an existing session, skipping asset loading
    pub fn with_session(
        config: GameConfig,
        session: GameSession,
        scene: S,
        observer: O,
        scheduler: D,
    ) -> Result<Self, GameError> {
        config.validate()?;
        match session.phase {
            RoundPhase::NotStarted => {}
            RoundPhase::Active => return Err(GameError::RoundInProgress),
            RoundPhase::Ended => return Err(GameError::RoundEnded),
        }
        Ok(Self::build(
            config,
            session,
            LoadedAssets::default(),
            scene,
            observer,
            scheduler,
        ))
    }

    fn build(
        config: GameConfig,
        session: GameSession,
        assets: LoadedAssets,
        mut scene: S,
        observer: O,
        scheduler: D,
    ) -> Self {
        scene.create_object(
            SceneShape::Ground { size: GROUND_SIZE },
            Transform::at(Vec3::new(0.0, GROUND_Y, 0.0)),
            Appearance {
                color: 0x55aa55,
                texture: assets.ground,
            },
        );

        let ball_handle = scene.create_object(
            SceneShape::Ball {
                radius: session.ball.radius,
            },
            Transform {
                position: session.ball.position,
                rotation: session.ball.orientation,
            },
            Appearance {
                color: 0xffffff,
                texture: assets.ball,
            },
        );

        let handles = session
            .collectibles
            .iter()
            .map(|c| {
                let handle = scene.create_object(
                    SceneShape::Collectible(c.shape),
                    Transform::at(c.position),
                    Appearance {
                        color: c.color,
                        texture: None,
                    },
                );
                (c.id, handle)
            })
            .collect();

        let mut game = Self {
            round: RoundController::new(config, session),
            scene,
            observer,
            scheduler,
            input: SharedInput::new(),
            ball_handle,
            handles,
            flashes: HashSet::new(),
            finished: false,
        };
        game.apply_camera();
        game
    }

    /// Arm the round timer and start accepting ticks
    pub fn start(&mut self) -> Result<(), GameError> {
        self.round.start(&mut self.scheduler)
    }

    /// Input handle for event callbacks (any thread)
    pub fn input(&self) -> SharedInput {
        self.input.clone()
    }

    pub fn key_down(&self, key: KeyCode) {
        self.input.key_down(key);
    }

    pub fn key_up(&self, key: KeyCode) {
        self.input.key_up(key);
    }

    pub fn session(&self) -> &GameSession {
        self.round.session()
    }

    pub fn config(&self) -> &GameConfig {
        self.round.config()
    }

    pub fn phase(&self) -> RoundPhase {
        self.round.phase()
    }

    pub fn score(&self) -> u64 {
        self.round.score()
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Scene object for a live collectible
    pub fn collectible_handle(&self, id: u32) -> Option<ObjectHandle> {
        self.handles.get(&id).copied()
    }

    pub fn camera_view(&self) -> Option<CameraView> {
        follow_camera(
            Some(&self.round.session().ball),
            self.round.config().camera.effective_offset(),
        )
    }

    /// Run one frame after `dt` seconds of wall time
    pub fn frame(&mut self, dt: f64) -> FrameStatus {
        if self.finished {
            return FrameStatus::Stop;
        }

        let step = match Duration::try_from_secs_f64(dt.max(0.0)) {
            Ok(step) => step,
            Err(e) => {
                log::warn!("Skipping frame with dt {dt}: {e}");
                return FrameStatus::Continue;
            }
        };
        self.scheduler.advance(step);
        self.round.advance_clock(step.as_secs_f64());

        let input = self.input.snapshot();
        let bounds = SceneBounds {
            scene: &self.scene,
            handles: &self.handles,
        };
        let report = match self.round.tick(&input, &bounds) {
            Ok(report) => report,
            Err(GameError::RoundNotStarted) => {
                self.apply_camera();
                self.scene.render_frame();
                return FrameStatus::Continue;
            }
            Err(e) => {
                log::warn!("Frame after round end: {e}");
                self.finished = true;
                return FrameStatus::Stop;
            }
        };

        self.apply(&report)
    }

    /// Run frames of `dt` until the round ends or `max_frames` have run
    pub fn run(&mut self, dt: f64, max_frames: u64) -> u64 {
        let mut frames = 0;
        while frames < max_frames {
            frames += 1;
            if self.frame(dt) == FrameStatus::Stop {
                break;
            }
        }
        frames
    }

    /// Push one tick's changes out to the scene and observer
    fn apply(&mut self, report: &TickReport) -> FrameStatus {
        let mut ended = None;
        for event in &report.events {
            match event {
                GameEvent::Collected { id, .. } => {
                    if let Some(handle) = self.handles.remove(id) {
                        self.scene.remove_object(handle);
                    }
                }
                GameEvent::ScoreChanged { score } => self.observer.on_score_changed(*score),
                GameEvent::BallGrew { radius } => {
                    self.scene.set_ball_radius(self.ball_handle, *radius);
                }
                GameEvent::RoundEnded { final_score } => ended = Some(*final_score),
            }
        }
        for id in &report.expired_effects {
            if self.flashes.remove(id) {
                self.scene.remove_flash(*id);
            }
        }
        for effect in &report.collisions.feedback {
            self.scene.add_flash(effect.id, effect.position, effect.color);
            self.flashes.insert(effect.id);
        }

        let ball = &self.round.session().ball;
        self.scene
            .set_transform(self.ball_handle, ball.position, ball.orientation);

        self.apply_camera();
        self.scene.render_frame();

        if let Some(final_score) = ended {
            for id in self.flashes.drain() {
                self.scene.remove_flash(id);
            }
            self.scheduler.cancel_all();
            self.observer.on_game_ended(final_score);
            self.finished = true;
            return FrameStatus::Stop;
        }
        FrameStatus::Continue
    }

    fn apply_camera(&mut self) {
        if let Some(view) = self.camera_view() {
            self.scene.set_camera(view);
        }
    }
}
