//! End-to-end round scenarios through the frame driver

use std::time::{Duration, Instant};

use glam::Vec3;

use roll_collect::scene::{HeadlessScene, RecordingObserver};
use roll_collect::sim::{
    Ball, Collectible, GameSession, KeyCode, ManualScheduler, RoundPhase, Shape, ThreadScheduler,
};
use roll_collect::{BoundaryPolicy, ControlScheme, FrameStatus, Game, GameConfig};

fn sphere(id: u32, x: f32, z: f32) -> Collectible {
    Collectible::new(id, Vec3::new(x, 0.0, z), Shape::Sphere { radius: 0.5 }, 0xff8800)
}

fn five_objects() -> Vec<Collectible> {
    vec![
        sphere(1, -6.0, 0.0),
        sphere(2, 0.0, 6.0),
        sphere(3, 3.0, 0.0),
        sphere(4, 0.0, -6.0),
        sphere(5, 10.0, 10.0),
    ]
}

fn manual_game(
    config: GameConfig,
    objects: Vec<Collectible>,
) -> Game<HeadlessScene, RecordingObserver, ManualScheduler> {
    let session = GameSession::new(1, Ball::new(Vec3::ZERO, 1.0), objects);
    Game::with_session(
        config,
        session,
        HeadlessScene::new(),
        RecordingObserver::default(),
        ManualScheduler::new(),
    )
    .unwrap()
}

#[test]
fn test_drive_onto_collectible() {
    let mut config = GameConfig::default();
    config.motion.velocity_step = 3.0;
    let mut game = manual_game(config, five_objects());
    game.start().unwrap();

    let target = game.collectible_handle(3).unwrap();
    game.key_down(KeyCode::ArrowRight);
    assert_eq!(game.frame(1.0 / 60.0), FrameStatus::Continue);

    let session = game.session();
    assert_eq!(session.ball.position, Vec3::new(3.0, 0.0, 0.0));
    assert_eq!(session.score, 10);
    assert_eq!(session.collectibles_remaining(), 4);
    assert!(session.collectibles.iter().all(|c| c.id != 3));
    assert!((session.ball.radius - 1.02).abs() < 1e-6);

    assert!(game.scene().object(target).is_none());
    assert!(game.collectible_handle(3).is_none());
    assert_eq!(game.scene().flash_count(), 1);
    assert_eq!(game.observer().scores, vec![10]);

    // Standing still on the same spot collects nothing more
    game.key_up(KeyCode::ArrowRight);
    game.frame(1.0 / 60.0);
    assert_eq!(game.session().score, 10);
    assert_eq!(game.observer().scores, vec![10]);
}

#[test]
fn test_round_ends_once_after_duration() {
    let mut config = GameConfig::default();
    config.round.duration = 20.0;
    let mut game = manual_game(config, five_objects());
    game.start().unwrap();

    for _ in 0..19 {
        assert_eq!(game.frame(1.0), FrameStatus::Continue);
    }
    assert_eq!(game.phase(), RoundPhase::Active);

    assert_eq!(game.frame(1.0), FrameStatus::Stop);
    assert_eq!(game.phase(), RoundPhase::Ended);
    assert_eq!(game.observer().final_scores, vec![0]);

    let snapshot = game.session().clone();
    game.key_down(KeyCode::ArrowLeft);
    for _ in 0..10 {
        assert_eq!(game.frame(1.0), FrameStatus::Stop);
    }
    let session = game.session();
    assert_eq!(session.ball, snapshot.ball);
    assert_eq!(session.score, snapshot.score);
    assert_eq!(session.time_ticks, 19);
    assert_eq!(session.collectibles, snapshot.collectibles);
    assert_eq!(game.observer().final_scores, vec![0]);
}

#[test]
fn test_deadline_fires_during_stalled_loop() {
    let mut config = GameConfig::default();
    config.round.duration = 0.05;
    let session = GameSession::new(1, Ball::default(), five_objects());
    let mut game = Game::with_session(
        config,
        session,
        HeadlessScene::new(),
        RecordingObserver::default(),
        ThreadScheduler::new(),
    )
    .unwrap();
    game.start().unwrap();

    // No frames run while the timer expires
    std::thread::sleep(Duration::from_millis(100));
    game.key_down(KeyCode::ArrowDown);

    let started = Instant::now();
    while game.frame(1.0 / 60.0) == FrameStatus::Continue {
        assert!(started.elapsed() < Duration::from_secs(5), "timer never fired");
        std::thread::sleep(Duration::from_millis(1));
    }
    assert_eq!(game.phase(), RoundPhase::Ended);
    // The first frame after expiry ended the round without moving the ball
    assert_eq!(game.session().ball.position, Vec3::ZERO);
    assert_eq!(game.session().time_ticks, 0);
}

#[test]
fn test_acceleration_mode_coasts_to_rest() {
    let mut config = GameConfig::default();
    config.motion.scheme = ControlScheme::Acceleration;
    config.motion.acceleration_step = 0.05;
    config.motion.friction = 0.9;
    let mut game = manual_game(config, Vec::new());
    game.start().unwrap();

    game.key_down(KeyCode::ArrowUp);
    game.run(1.0 / 60.0, 30);
    let moving = game.session().ball.velocity;
    assert!(moving.z < 0.0);
    assert_eq!(moving.x, 0.0);

    game.key_up(KeyCode::ArrowUp);
    game.run(1.0 / 60.0, 200);
    let coasting = game.session().ball.velocity;
    assert!(coasting.length() < moving.length() * 0.01);
    assert!(game.session().ball.position.z < 0.0);
}

#[test]
fn test_walls_hold_fast_ball() {
    let mut config = GameConfig::default();
    config.motion.boundary = BoundaryPolicy::Walls;
    config.motion.velocity_step = 25.0;
    config.playfield.bound_x = 10.0;
    config.playfield.bound_z = 10.0;
    let mut game = manual_game(config, Vec::new());
    game.start().unwrap();

    game.key_down(KeyCode::ArrowRight);
    game.key_down(KeyCode::ArrowDown);
    for _ in 0..5 {
        game.frame(1.0 / 60.0);
        let ball = &game.session().ball;
        assert!(ball.position.x + ball.radius <= 10.0);
        assert!(ball.position.z + ball.radius <= 10.0);
    }
    assert_eq!(game.session().ball.position, Vec3::new(9.0, 0.0, 9.0));
}

#[test]
fn test_camera_follows_ball() {
    let mut config = GameConfig::default();
    config.motion.velocity_step = 1.0;
    let mut game = manual_game(config, Vec::new());
    game.start().unwrap();

    game.key_down(KeyCode::ArrowLeft);
    game.run(1.0 / 60.0, 4);
    let view = game.scene().camera().unwrap();
    assert_eq!(view.target, Vec3::new(-4.0, 0.0, 0.0));
    assert_eq!(view.eye, Vec3::new(1.0, 5.0, 5.0));
}
