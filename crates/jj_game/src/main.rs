//! Jump Jack -- headless host and entry point.
//!
//! The host stands in for the browser: it owns the event hub and a recording
//! draw surface, feeds scripted key events (from a replay file) into the hub
//! between frames, and drives the game loop one frame per iteration.
//!
//! Each frame inside the loop runs input -> gimmicks -> actor -> collisions ->
//! camera -> draw. Draw calls land in a `CommandRecorder`; the host only
//! inspects them for a summary.

mod actor;
mod body;
mod camera;
mod collision;
mod manager;
mod replay;
mod scene;
mod stage;

use std::path::PathBuf;

use clap::Parser;
use jj_core::coords::Viewport;
use jj_core::draw::CommandRecorder;
use jj_core::input::EventHub;

use manager::{GameLoop, GameState};
use replay::{load_replay_from_path, ReplayDriver};
use scene::{SceneConfig, SceneNotice};
use stage::{builtin_stage_file, load_stage_from_path, Stage};

const DEFAULT_FRAMES: u64 = 600;

/// Jump Jack platformer, run headless.
#[derive(Parser)]
#[command(name = "jj_game", version, about = "Jump Jack headless runner")]
struct Args {
    /// Stage JSON to load instead of the built-in tower.
    #[arg(long, value_name = "PATH")]
    stage: Option<PathBuf>,

    /// Replay JSON whose key frames drive the actor.
    #[arg(long, value_name = "PATH")]
    replay: Option<PathBuf>,

    /// Frames to run. Defaults to the replay length, or 600 without one.
    #[arg(long)]
    frames: Option<u64>,

    #[arg(long, default_value_t = 960.0)]
    width: f32,

    #[arg(long, default_value_t = 720.0)]
    height: f32,
}

fn run(args: Args) -> Result<(), String> {
    if args.width <= 0.0 || args.height <= 0.0 {
        return Err(format!(
            "Viewport must be positive, got {}x{}",
            args.width, args.height
        ));
    }

    let stage_file = match &args.stage {
        Some(path) => load_stage_from_path(path)?,
        None => builtin_stage_file()?,
    };
    log::info!(
        "Stage loaded: {} ({}), {} obstacles, {} winds",
        stage_file.stage_id,
        stage_file.version,
        stage_file.obstacles.len(),
        stage_file.winds.len()
    );

    let mut driver = match &args.replay {
        Some(path) => {
            let replay = load_replay_from_path(path)?;
            log::info!(
                "Replay loaded: {} ({} frames)",
                path.display(),
                replay.total_frames()
            );
            Some(ReplayDriver::new(&replay))
        }
        None => None,
    };
    let frames = args.frames.unwrap_or_else(|| {
        driver
            .as_ref()
            .map_or(DEFAULT_FRAMES, |d| d.remaining() as u64)
    });

    let config = SceneConfig::with_viewport(Viewport::new(args.width, args.height));
    let mut game = GameLoop::new(config, Stage::from_file(&stage_file), EventHub::new());
    let mut surface = CommandRecorder::new();
    let mut jumps = 0u32;
    let mut lands = 0u32;
    let mut bounces = 0u32;

    game.start();
    for frame in 0..frames {
        if let Some(events) = driver.as_mut().and_then(ReplayDriver::next_events) {
            for event in &events {
                game.hub().dispatch(event);
            }
        }

        surface.clear();
        let Some(report) = game.frame(&mut surface) else {
            break;
        };
        for notice in &report.notices {
            match notice {
                SceneNotice::Actor(actor::ActorNotice::JumpUp) => jumps += 1,
                SceneNotice::Actor(actor::ActorNotice::Land) => lands += 1,
                SceneNotice::Actor(actor::ActorNotice::Bounce) => bounces += 1,
                SceneNotice::StageCleared => {
                    log::info!(
                        "Stage cleared on frame {frame} at ({:.1}, {:.1}), camera y {}",
                        report.actor_position.x,
                        report.actor_position.y,
                        report.camera_y
                    );
                }
            }
        }
    }

    if let Some(scene) = game.scene() {
        let actor = scene.actor();
        log::info!(
            "Finished {} frames on '{}': actor at ({:.1}, {:.1}), camera y {}, {} jumps, {} landings, {} bounces, {} draw calls last frame",
            game.frame_count(),
            scene.stage().stage_id,
            actor.body.position.x,
            actor.body.position.y,
            scene.camera().position.0.y,
            jumps,
            lands,
            bounces,
            surface.commands().len()
        );
    }
    if game.state() == GameState::Cleared {
        log::info!("Congratulations!");
    }
    game.end();
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Jump Jack starting...");

    if let Err(err) = run(Args::parse()) {
        log::error!("{err}");
        std::process::exit(1);
    }
}
