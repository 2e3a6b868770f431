//! Space Shooter entry point
//!
//! Parses the command line, loads the settings record and either runs a
//! headless autoplay session or reports that a presentation layer is needed.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use space_shooter::game::{Action, Board, Game, Key, Mode};
use space_shooter::sim::StaticAssets;
use space_shooter::Config;

/// Autoplay input cadence (ms of logical time per step)
const DEMO_STEP_MS: u32 = 50;

#[derive(Parser, Debug)]
#[command(name = "space-shooter")]
#[command(about = "Side-scrolling arcade shooter")]
struct Args {
    /// Startup font, overrides the stored one
    #[arg(long)]
    font: Option<String>,

    /// Fullscreen presentation instead of a window
    #[arg(short, long)]
    fullscreen: bool,

    /// Start from default settings and an empty hiscore table
    #[arg(long)]
    reset: bool,

    /// Settings file (defaults to ~/.spaceshooterrc)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for spawn coordinates
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Run a headless autoplay session for this many ms of logical time
    #[arg(long)]
    demo_ms: Option<u32>,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    log::info!("Space Shooter starting...");

    let path = args.config.clone().or_else(Config::default_path);
    let mut config = Config::new(path, args.font.clone());
    if args.reset {
        log::info!("Reset requested, starting from defaults");
    } else {
        config.read().context("loading settings")?;
    }
    log::info!(
        "Font {:?}, {}, {}",
        config.lastfont,
        config.lastmode.as_str(),
        if args.fullscreen { "fullscreen" } else { "windowed" }
    );

    match args.demo_ms {
        Some(ms) => run_demo(config, args.seed, ms),
        None => {
            log::info!("Interactive play requires a presentation layer; use --demo-ms for a headless run");
            Ok(())
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The presentation layer owns the wasm entry point
}

/// Autoplay: weave up and down while holding fire, drop a bomb now and then
#[cfg(not(target_arch = "wasm32"))]
fn run_demo(config: Config, seed: u64, total_ms: u32) -> Result<()> {
    let bound = |action: Action| config.get_key(action).unwrap_or(Key::None);
    let (fire, bomb, up, down) = (
        bound(Action::Fire),
        bound(Action::Bomb),
        bound(Action::Up),
        bound(Action::Down),
    );

    let mut game = Game::new(config, Box::new(StaticAssets), seed);
    game.start();
    // Skip the splash, then Menu -> Player -> Game
    game.key_released(Key::Enter);
    game.key_released(Key::Enter);
    game.key_released(Key::Enter);
    anyhow::ensure!(game.board() == Board::Game, "demo did not reach the game board");

    let mut elapsed = 0;
    let mut step = 0u32;
    while elapsed < total_ms {
        match game.mode() {
            Mode::Play => {
                let dir = if (step / 40) % 2 == 0 { up } else { down };
                game.key_pressed(dir);
                game.key_released(fire);
                if step % 20 == 0 {
                    game.key_released(bomb);
                }
            }
            Mode::Killed => game.key_released(Key::Enter),
            Mode::Gameover | Mode::Congrats => break,
            _ => {}
        }
        game.advance(DEMO_STEP_MS);
        elapsed += DEMO_STEP_MS;
        step += 1;
    }

    let world = game.world();
    log::info!(
        "Demo finished after {} ms: mode {:?}, level {}, {} points, {} lives, {} frames",
        elapsed,
        game.mode(),
        world.level + 1,
        world.points,
        world.lives,
        game.frames()
    );
    println!(
        "{:?}: level {}, {} points, {} lives",
        game.mode(),
        world.level + 1,
        world.points,
        world.lives
    );

    // The Quit board persists settings
    game.change_board(Board::Quit);
    Ok(())
}
