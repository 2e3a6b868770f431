//! Board and mode state enums, paint dispatch and the drawing seam

use serde::{Deserialize, Serialize};

use crate::sim::assets::Sprite;
use crate::sim::rect::Rect;

/// Top-level screen of the application shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Board {
    /// Before the first board change
    None,
    Welcome,
    Menu,
    Game,
    Options,
    HiScores,
    Setup,
    Help,
    About,
    Quit,
    NewScore,
    Player,
}

impl Board {
    /// Menu position -> board
    pub const MENU: [Board; 7] = [
        Board::Player,
        Board::Options,
        Board::HiScores,
        Board::Setup,
        Board::Help,
        Board::About,
        Board::Quit,
    ];
}

/// Play-session sub-state, only meaningful while the board is `Game`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// No session has started yet
    None,
    Init,
    /// Level setup and get-ready countdown
    Prepare,
    Play,
    Paused,
    /// Lost a life, waiting for acknowledgement
    Killed,
    Gameover,
    /// Boss defeated
    Congrats,
}

/// Setup board sub-state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SetupMode {
    Display,
    /// Capturing new bindings
    Enter,
}

/// Paint routine the presentation layer runs for the current state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaintRoutine {
    Blank,
    Welcome,
    Menu,
    Player,
    Options,
    HiScores,
    SetupDisplay,
    SetupEnter,
    Help,
    About,
    NewScore,
    GameInit,
    GamePrepare,
    GamePlay,
    GamePaused,
    GameKilled,
    GameOver,
    GameCongrats,
}

impl PaintRoutine {
    /// Total over every (board, mode, setup mode) combination
    pub fn select(board: Board, mode: Mode, setup: SetupMode) -> Self {
        match board {
            Board::None | Board::Quit => PaintRoutine::Blank,
            Board::Welcome => PaintRoutine::Welcome,
            Board::Menu => PaintRoutine::Menu,
            Board::Player => PaintRoutine::Player,
            Board::Options => PaintRoutine::Options,
            Board::HiScores => PaintRoutine::HiScores,
            Board::Setup => match setup {
                SetupMode::Display => PaintRoutine::SetupDisplay,
                SetupMode::Enter => PaintRoutine::SetupEnter,
            },
            Board::Help => PaintRoutine::Help,
            Board::About => PaintRoutine::About,
            Board::NewScore => PaintRoutine::NewScore,
            Board::Game => match mode {
                Mode::None | Mode::Init => PaintRoutine::GameInit,
                Mode::Prepare => PaintRoutine::GamePrepare,
                Mode::Play => PaintRoutine::GamePlay,
                Mode::Paused => PaintRoutine::GamePaused,
                Mode::Killed => PaintRoutine::GameKilled,
                Mode::Gameover => PaintRoutine::GameOver,
                Mode::Congrats => PaintRoutine::GameCongrats,
            },
        }
    }

    /// Routines that show the scrolling terrain behind their overlay
    pub fn shows_terrain(&self) -> bool {
        matches!(
            self,
            PaintRoutine::GamePrepare
                | PaintRoutine::GamePlay
                | PaintRoutine::GamePaused
                | PaintRoutine::GameKilled
        )
    }
}

/// Drawing target implemented by the presentation layer
pub trait Canvas {
    /// Blit `sprite` with its top-left corner at (x, y)
    fn draw_sprite(&mut self, sprite: Sprite, x: i32, y: i32);

    /// Translucent shield bubble around the player
    fn draw_shield(&mut self, _rect: Rect) {}
}
