//! Space Shooter - A side-scrolling arcade shooter core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, scripted spawning, collisions)
//! - `game`: Session state machine (boards, play modes, timers, input)
//! - `settings`: Persisted configuration (key bindings, language, difficulty)
//! - `highscores`: Top 10 leaderboard

pub mod error;
pub mod game;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use game::{Board, Game, Mode};
pub use highscores::HighScores;
pub use settings::{Config, Difficulty, Language};

/// Game configuration constants
pub mod consts {
    /// Arena dimensions (world units)
    pub const ARENA_WIDTH: i32 = 1920;
    pub const ARENA_HEIGHT: i32 = 1080;
    pub const BOTTOM_BAR: i32 = 60;
    pub const STAGE_WIDTH: i32 = ARENA_WIDTH;
    pub const STAGE_HEIGHT: i32 = ARENA_HEIGHT - BOTTOM_BAR;

    // === Timer intervals (ms) ===
    pub const TIMEOUT_PAINT: u32 = 15;
    pub const TIMEOUT_GAME_UPDATE: u32 = 40;
    pub const TIMEOUT_WELCOME: u32 = 1000;
    pub const TIMEOUT_GAME_COUNTER: u32 = 1000;
    pub const TIMEOUT_SETUP_ENTER: u32 = 500;
    pub const TIMEOUT_GAME_EVENTS: u32 = 1000;
    pub const TIMEOUT_ENEMIES_EVENTS: u32 = 1000;
    pub const TIMEOUT_BOMB_LOCK: u32 = 300;
    pub const TIMEOUT_MISSILE_LOCK: u32 = 150;
    pub const TIMEOUT_SHIELD: u32 = 1000;
    pub const TIMEOUT_FREEZE: u32 = 1000;
    pub const TIMEOUT_LIGHT: u32 = 1000;
    pub const TIMEOUT_NEWSCORE: u32 = 500;
    pub const TIMEOUT_GET_READY: u32 = 1000;
    pub const TIMEOUT_SMOKE: u32 = 300;
    /// Cadence intervals never drop below this, whatever the level/difficulty
    pub const MIN_CADENCE: u32 = 100;

    /// Power-up durations in counter ticks (seconds)
    pub const SHIELD_TIMER: u32 = 10;
    pub const LIGHTBALL_TIMER: u32 = 10;
    pub const FROZEN_TIMER: u32 = 10;

    /// Object speeds
    pub const SPEEDX_BOMB: i32 = -2;
    pub const MOVABLE_SPEED: i32 = 2;
    pub const STAR_SPEED: i32 = 1;

    /// Player health and session defaults
    pub const MAX_INDICATORS: u32 = 10;
    pub const START_LIVES: u32 = 3;
    pub const START_TNT: u32 = 3;
    pub const BOSS_HP: u32 = 10;

    /// Max values
    pub const MAX_PLAYER_INDEX: usize = 3;
    pub const MAX_LEVEL: i32 = 4;
    /// Spawner queue length multiplier per iteration
    pub const EVENTS_FACTOR: usize = 3000;
    pub const MAX_NICK_LEN: usize = 10;
    /// Movables rebuilt for every level strip
    pub const STRIP_MOVABLES: usize = 16;

    pub const DEFAULT_FONT: &str = "Commodore 64 Rounded";
}
