//! Session layer
//!
//! Board navigation, the in-game mode sub-machine, logical timers and the
//! input vocabulary. Rendering and device input stay outside: the
//! presentation layer feeds keys, clicks and elapsed time in, and pulls the
//! paint routine and draw calls out.

pub mod board;
pub mod input;
pub mod layout;
pub mod session;
pub mod timers;

pub use board::{Board, Canvas, Mode, PaintRoutine, SetupMode};
pub use input::{Action, Key};
pub use layout::{Layout, PlayerRects};
pub use session::Game;
pub use timers::{TimerId, Timers};
