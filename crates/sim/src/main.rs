//! Headless driver: loads a level, runs the simulation for a number of frames
//! and optionally saves or restores the world state.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use platformer_content::{ConfigLoader, LevelLoader, TuningLoader};
use platformer_core::{
    Event, EventQueue, Extent, GameEnv, PcgRng, Player, Position, Rect, SaveGame, SimConfig,
    TileOracle, World,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Run the platformer actor simulation without a renderer
#[derive(Parser, Debug)]
#[command(name = "platformer-sim")]
#[command(version, about, long_about = None)]
struct Args {
    /// Level file (RON)
    #[arg(short, long, value_name = "FILE")]
    level: PathBuf,

    /// Simulation config (TOML); defaults apply when omitted
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Species tuning overrides (RON); a broken file falls back to defaults
    #[arg(short, long, value_name = "FILE")]
    tuning: Option<PathBuf>,

    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    /// Session seed for every probability roll
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Write the final save blob to this file
    #[arg(long, value_name = "FILE")]
    save: Option<PathBuf>,

    /// Restore actors, player and difficulty from this save blob before running
    #[arg(long, value_name = "FILE")]
    restore: Option<PathBuf>,

    /// Player start column in tiles, overriding the level
    #[arg(long, requires = "player_y")]
    player_x: Option<i32>,

    /// Player start row in tiles, overriding the level
    #[arg(long, requires = "player_x")]
    player_y: Option<i32>,
}

fn main() -> Result<()> {
    setup_logging();
    let args = Args::parse();
    run(args)
}

/// Logs go to stderr; `RUST_LOG` overrides the default `info` level.
fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => ConfigLoader::load(path)?,
        None => SimConfig::default(),
    };
    let tuning = TuningLoader::load_or_default(args.tuning.as_deref());
    let level = LevelLoader::load(&args.level)?;

    let rng = PcgRng;
    let env = GameEnv::from_oracles(&level.map, &rng).with_tuning(&tuning);

    let mut world = World::new(config, args.seed);
    level.populate(&mut world, &env);
    if let (Some(tx), Some(ty)) = (args.player_x, args.player_y) {
        let rations = world.player().map(|p| p.rations).unwrap_or_default();
        world.set_player(Player::new(Position::from_tile(tx, ty)).with_rations(rations));
    }

    let dimensions = level.map.dimensions();
    world.set_viewport(Some(Rect::new(
        Position::ORIGIN,
        Extent::new(
            SimConfig::tiles(dimensions.width as i32),
            SimConfig::tiles(dimensions.height as i32),
        ),
    )));

    if let Some(path) = &args.restore {
        let blob = std::fs::read(path)
            .with_context(|| format!("Failed to read save {}", path.display()))?;
        world
            .restore(&blob, &env)
            .with_context(|| format!("Failed to restore {}", path.display()))?;
    }

    tracing::info!(
        level = %args.level.display(),
        actors = world.len(),
        seed = args.seed,
        frames = args.frames,
        "simulation starting"
    );

    let mut events = EventQueue::new();
    let mut player_was_dead = world.player().is_some_and(|p| p.dead);
    for _ in 0..args.frames {
        let report = world.step(env, &mut events);
        tracing::trace!(?report, "frame done");
        if report.spawned > 0 || report.removed > 0 {
            tracing::debug!(
                frame = report.frame,
                spawned = report.spawned,
                removed = report.removed,
                "population changed"
            );
        }

        for event in events.drain() {
            log_event(report.frame, &event);
        }

        let player_dead = world.player().is_some_and(|p| p.dead);
        if player_dead && !player_was_dead {
            tracing::info!(frame = report.frame, "player died");
        }
        player_was_dead = player_dead;
    }

    let blob = world.save()?;
    if let Some(path) = &args.save {
        std::fs::write(path, &blob)
            .with_context(|| format!("Failed to write save {}", path.display()))?;
        tracing::info!(path = %path.display(), "save written");
    }

    let live = world.actors().iter().filter(|a| a.body.exists).count();
    tracing::info!(frame = world.frame(), actors = world.len(), live, "simulation finished");
    if let Some(digest) = SaveGame::digest(&blob) {
        println!("{}", hex::encode(digest));
    }
    Ok(())
}

fn log_event(frame: u64, event: &Event) {
    match event {
        Event::Sound(sound) => tracing::info!(frame, %sound, "sound"),
        Event::Dialog(key) => tracing::info!(frame, %key, "dialog"),
        Event::TileTrigger { x, y } => tracing::info!(frame, x, y, "tile trigger"),
    }
}
