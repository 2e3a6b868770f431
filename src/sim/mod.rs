//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Scenario tokens replay from fixed tables
//! - Seeded RNG only, confined to spawn coordinates
//! - Fixed collection and check order every tick
//! - No rendering or platform dependencies

pub mod assets;
pub mod collision;
pub mod director;
pub mod enemy;
pub mod entity;
pub mod rect;
pub mod scenario;
pub mod spawner;
pub mod tick;
pub mod world;

pub use assets::{Assets, Sprite, StaticAssets};
pub use collision::{PowerUp, Resolution, resolve};
pub use director::Director;
pub use enemy::{Boss, Enemy};
pub use entity::{FlyingObject, Motion, Movable, Player, Star};
pub use rect::Rect;
pub use scenario::{Formation, GameEvent, Scenario};
pub use spawner::Spawner;
pub use tick::update;
pub use world::{LifeEvent, World};
