//! Roll Collect entry point
//!
//! Runs a headless round: the scene is in-memory, the autopilot holds the
//! arrow keys, and the round ends on the real-time timer (or on simulated
//! time with `--fast`).

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;

use roll_collect::scene::{AssetLoader, FileAssets, HeadlessScene, LogObserver, StaticAssets};
use roll_collect::sim::autopilot::{KeyEdge, steer};
use roll_collect::sim::{DeadlineScheduler, ManualScheduler, ThreadScheduler};
use roll_collect::{CameraPreset, ControlScheme, FrameStatus, Game, GameConfig};

/// Frame interval for the headless loop (60 Hz)
const FRAME_DT: f64 = 1.0 / 60.0;

#[derive(Parser, Debug)]
#[command(about = "Roll a growing ball over a field of collectibles", version)]
struct Args {
    /// Seed for the collectible layout (defaults to the current time)
    #[arg(long)]
    seed: Option<u64>,
    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory the ground/ball textures are loaded from; skip to run without files
    #[arg(long)]
    assets: Option<PathBuf>,
    /// Control scheme: direct | acceleration
    #[arg(long)]
    scheme: Option<String>,
    /// Camera preset: chase | overview
    #[arg(long)]
    camera: Option<String>,
    /// Round length in seconds
    #[arg(long)]
    duration: Option<f64>,
    /// Stop after this many frames even if the round is still running
    #[arg(long, default_value_t = 100_000)]
    frames: u64,
    /// Simulated time instead of sleeping between frames
    #[arg(long)]
    fast: bool,
    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    print_config: bool,
}

fn build_config(args: &Args) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };

    if let Some(scheme) = &args.scheme {
        config.motion.scheme = ControlScheme::from_str(scheme)
            .with_context(|| format!("unknown control scheme `{scheme}`"))?;
    }
    if let Some(camera) = &args.camera {
        config.camera.preset = CameraPreset::from_str(camera)
            .with_context(|| format!("unknown camera preset `{camera}`"))?;
    }
    if let Some(duration) = args.duration {
        config.round.duration = duration;
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn play<D: DeadlineScheduler>(
    config: GameConfig,
    seed: u64,
    assets: &mut dyn AssetLoader,
    scheduler: D,
    max_frames: u64,
    realtime: bool,
) -> Result<u64> {
    let mut game = Game::setup(
        config,
        seed,
        assets,
        HeadlessScene::new(),
        LogObserver,
        scheduler,
    )
    .context("round setup failed")?;
    game.start()?;

    let input = game.input();
    let mut last = Instant::now();
    for _ in 0..max_frames {
        for edge in steer(game.session(), &input.snapshot()) {
            match edge {
                KeyEdge::Down(key) => input.key_down(key),
                KeyEdge::Up(key) => input.key_up(key),
            }
        }

        let dt = if realtime {
            std::thread::sleep(Duration::from_secs_f64(FRAME_DT));
            let now = Instant::now();
            let dt = now.duration_since(last).as_secs_f64();
            last = now;
            dt
        } else {
            FRAME_DT
        };

        if game.frame(dt) == FrameStatus::Stop {
            break;
        }
    }

    let session = game.session();
    log::info!(
        "{} ticks, {} of {} collected, ball radius {:.2}",
        session.time_ticks,
        session.collected_count(),
        session.initial_count,
        session.ball.radius
    );
    Ok(game.score())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = build_config(&args)?;

    if args.print_config {
        println!("{}", config.to_json_pretty()?);
        return Ok(());
    }

    let seed = args.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    });
    log::info!(
        "Roll Collect starting (seed {seed}, {} mode, {}s round)",
        config.motion.scheme.as_str(),
        config.round.duration
    );

    let mut assets: Box<dyn AssetLoader> = match &args.assets {
        Some(dir) => Box::new(FileAssets::new(dir)),
        None => Box::new(StaticAssets::accept_all()),
    };

    let score = if args.fast {
        play(config, seed, assets.as_mut(), ManualScheduler::new(), args.frames, false)?
    } else {
        play(config, seed, assets.as_mut(), ThreadScheduler::new(), args.frames, true)?
    };

    println!("Final score: {score}");
    Ok(())
}
