//! Asset provider seam
//!
//! The core never decodes pixels. Images are referenced by a `Sprite` key and
//! the only thing the simulation asks of them is their size, which sizes the
//! entity rectangles. The presentation layer maps the same keys to real images.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::entity::{MissileKind, MovableKind, PickupKind};

/// Logical image handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sprite {
    /// Player ship, by selected index (0..=MAX_PLAYER_INDEX)
    Player(usize),
    /// Enemy ship, by variant index
    Enemy(usize),
    Boss,
    Missile(MissileKind),
    Pickup(PickupKind),
    Drop,
    Bomb,
    /// Fire missile ball (shares the light-ball image)
    Fireball,
    Meteorite,
    Movable(MovableKind),
    Star,
    /// Explosion animation frame
    Explosion(u32),
}

/// Size lookup the simulation needs from the asset layer
pub trait Assets {
    /// Width/height of the image behind `sprite`
    fn size(&self, sprite: Sprite) -> IVec2;

    /// Number of frames in the explosion animation
    fn explosion_frames(&self) -> u32;

    /// Number of distinct enemy images, cycled per wave
    fn enemy_variants(&self) -> usize;
}

/// Built-in size table, matching the shipped sprite sheet dimensions
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticAssets;

impl Assets for StaticAssets {
    fn size(&self, sprite: Sprite) -> IVec2 {
        let (w, h) = match sprite {
            Sprite::Player(_) => (120, 60),
            Sprite::Enemy(_) => (80, 60),
            Sprite::Boss => (300, 200),
            Sprite::Missile(kind) => match kind {
                MissileKind::From | MissileKind::To => (40, 12),
                MissileKind::ToNww | MissileKind::ToSww => (40, 20),
                _ => (30, 30),
            },
            Sprite::Pickup(_) => (64, 64),
            Sprite::Drop => (30, 40),
            Sprite::Bomb => (20, 30),
            Sprite::Fireball => (32, 32),
            Sprite::Meteorite => (60, 60),
            Sprite::Movable(kind) => match kind {
                MovableKind::Gun => (120, 90),
                MovableKind::House1 | MovableKind::House2 | MovableKind::House3 => (200, 150),
                MovableKind::Factory1 | MovableKind::Factory2 | MovableKind::Factory3 => {
                    (260, 200)
                }
                MovableKind::Tower1 | MovableKind::Tower2 | MovableKind::Tower3 => (140, 400),
            },
            Sprite::Star => (4, 4),
            Sprite::Explosion(_) => (96, 96),
        };
        IVec2::new(w, h)
    }

    fn explosion_frames(&self) -> u32 {
        8
    }

    fn enemy_variants(&self) -> usize {
        6
    }
}
