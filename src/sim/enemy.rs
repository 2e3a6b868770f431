//! Enemy ships, formation layouts and the boss
//!
//! Each `Formation` has one layout factory (`spawn_wave`) and one motion
//! policy (`step_wave`). Every enemy in a wave shares the policy; `odd`
//! mirrors it for alternating members.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::assets::{Assets, Sprite};
use super::entity::{FlyingObject, MissileKind};
use super::rect::Rect;
use super::scenario::Formation;
use crate::consts::*;

/// Members per formation
pub const WAVE_SIZE: usize = 8;

/// Enemy ship inside a wave
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub rect: Rect,
    pub valid: bool,
    pub sprite: Sprite,
    /// Formation parity, `i % 2 == 0`
    pub odd: bool,
    /// Anchor for relative motion (initial position)
    pub spot: IVec2,
    /// Phase counter for patrol formations
    pub moved: u32,
    /// Direction multipliers for patrol formations
    pub dx: i32,
    pub dy: i32,
    /// Degrees, circle formation only
    pub angle: i32,
    pub radius: f64,
    pub speed_x: i32,
    pub speed_y: i32,
}

impl Enemy {
    pub fn new(x: i32, y: i32, odd: bool, sprite: Sprite, assets: &dyn Assets) -> Self {
        Self {
            rect: Rect::sized(x, y, assets.size(sprite)),
            valid: true,
            sprite,
            odd,
            spot: IVec2::new(x, y),
            moved: 0,
            dx: 1,
            dy: 1,
            angle: 0,
            radius: 0.0,
            speed_x: 0,
            speed_y: 0,
        }
    }

    fn with_speed(mut self, speed_x: i32, speed_y: i32) -> Self {
        self.speed_x = speed_x;
        self.speed_y = speed_y;
        self
    }

    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    // === Motion policies ===

    fn step_circle(&mut self) {
        self.angle = (self.angle + 2) % 360;
        let radians = f64::from(self.angle).to_radians();
        let dx = (self.radius * radians.cos()) as i32;
        let dy = (self.radius * radians.sin()) as i32;
        self.rect.x = self.spot.x + dx + self.speed_x;
        self.rect.y = self.spot.y + dy;
        self.spot.x += self.speed_x;
    }

    fn step_square(&mut self) {
        self.rect.x += self.speed_x * self.dx;
        self.rect.y += self.speed_y * self.dy;
        let flip = if self.odd { 1 } else { -1 };
        match self.moved {
            0 => {
                self.dy = 0;
                self.dx = flip;
            }
            40 => {
                self.dy = 0;
                self.dx = -flip;
            }
            20 => {
                self.dx = 0;
                self.dy = flip;
            }
            60 => {
                self.dx = 0;
                self.dy = -flip;
            }
            _ => {}
        }
        self.moved = (self.moved + 1) % 80;
        self.rect.x -= 2;
    }

    fn step_front_back(&mut self) {
        self.rect.x += self.speed_x * self.dx;
        self.rect.y += self.speed_y * self.dy;
        match self.moved {
            0 | 30 => self.dy = -self.dy,
            15 | 45 => self.dx = -self.dx,
            _ => {}
        }
        self.moved = (self.moved + 1) % 60;
        self.rect.x -= 2;
    }

    fn step_up_down(&mut self) {
        self.rect.y += self.speed_y;
        self.rect.x += self.speed_x;
        if self.rect.y < UPDOWN_TOP || self.rect.y > UPDOWN_BOTTOM {
            self.speed_y = -self.speed_y;
        }
    }

    fn step_sine(&mut self) {
        let radians = (self.rect.x as f64).to_radians();
        self.rect.y = if self.odd {
            self.spot.y - (100.0 * radians.sin()) as i32
        } else {
            self.spot.y + (100.0 * radians.cos()) as i32
        };
        self.rect.x += self.speed_x;
    }

    fn step_wave(&mut self) {
        self.rect.x += self.speed_x;
        let even_sector = self.rect.x.div_euclid(150).rem_euclid(2) == 0;
        if even_sector == self.odd {
            self.rect.y += self.speed_y;
        } else {
            self.rect.y -= self.speed_y;
        }
    }

    /// Advance one tick under `formation`; dies past the left edge
    pub fn step(&mut self, formation: Formation) {
        match formation {
            Formation::Circle => self.step_circle(),
            Formation::Square => self.step_square(),
            Formation::FrontBack => self.step_front_back(),
            Formation::UpDown => self.step_up_down(),
            Formation::Sine => self.step_sine(),
            Formation::Wave => self.step_wave(),
        }
        if self.rect.right() < 0 {
            self.valid = false;
        }
    }
}

/// Up-down formation bounce band (10% and 70% of the arena height)
const UPDOWN_TOP: i32 = ARENA_HEIGHT / 10;
const UPDOWN_BOTTOM: i32 = ARENA_HEIGHT * 7 / 10;

/// Circle formation radius
pub fn circle_radius() -> f64 {
    (f64::from(ARENA_HEIGHT) * 2.0 / 3.0 - 100.0) / 2.0
}

/// Build an 8-enemy wave laid out for `formation`
pub fn spawn_wave(formation: Formation, sprite: Sprite, assets: &dyn Assets) -> Vec<Enemy> {
    let w = ARENA_WIDTH;
    let h = ARENA_HEIGHT;
    let mut wave: Vec<Enemy> = (0..WAVE_SIZE as i32)
        .map(|i| {
            let odd = i % 2 == 0;
            match formation {
                Formation::FrontBack => {
                    let x = w - 650 + if odd { 400 } else { 0 };
                    let y = 150 + i * 80 - if odd { 0 } else { 60 };
                    Enemy::new(x, y, odd, sprite, assets).with_speed(-10, 2)
                }
                Formation::Circle => {
                    let radius = circle_radius();
                    let spot_x = w / 2 + radius as i32;
                    let spot_y = 100 + radius as i32;
                    let mut enemy = Enemy::new(spot_x, spot_y, odd, sprite, assets).with_speed(-5, 0);
                    enemy.angle = i * 45;
                    enemy.radius = radius;
                    enemy
                }
                Formation::Square => {
                    let x = w - 550 + if odd { 250 } else { 0 };
                    Enemy::new(x, 150 + i * 80, odd, sprite, assets).with_speed(-8, 8)
                }
                Formation::UpDown => {
                    let x = w * 45 / 100 + 130 * i;
                    let y = if odd { h / 10 } else { h * 6 / 10 };
                    let speed_y = if odd { 13 } else { -13 };
                    Enemy::new(x, y, odd, sprite, assets).with_speed(-3, speed_y)
                }
                Formation::Sine => {
                    let x = w * 9 / 10 - if odd { 250 } else { 0 };
                    Enemy::new(x, (i + 2) * 80, odd, sprite, assets).with_speed(-5, 10)
                }
                Formation::Wave => {
                    let x = if odd { w * 8 / 10 } else { w * 9 / 10 };
                    Enemy::new(x, 250 + 70 * i, odd, sprite, assets).with_speed(-8, 15)
                }
            }
        })
        .collect();

    // The ring is positioned by its policy, not by the factory
    if formation == Formation::Circle {
        step_wave(formation, &mut wave);
    }
    wave
}

/// Move a whole wave and drop the members that left the arena
pub fn step_wave(formation: Formation, wave: &mut Vec<Enemy>) {
    for enemy in wave.iter_mut() {
        enemy.step(formation);
    }
    wave.retain(|e| e.valid);
}

/// Final-level boss: bounces vertically and fires volleys
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boss {
    pub rect: Rect,
    pub valid: bool,
    /// Remaining hit points
    pub indicators: u32,
    pub dy: i32,
    pub speed_y: i32,
}

impl Boss {
    pub fn new(x: i32, y: i32, assets: &dyn Assets) -> Self {
        Self {
            rect: Rect::sized(x, y, assets.size(Sprite::Boss)),
            valid: true,
            indicators: BOSS_HP,
            dy: 1,
            speed_y: 20,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.indicators > 0
    }

    pub fn decrease_hp(&mut self) {
        self.indicators = self.indicators.saturating_sub(1);
        if self.indicators == 0 {
            self.valid = false;
        }
    }

    pub fn step(&mut self) {
        if self.rect.y >= STAGE_HEIGHT - 50 {
            self.dy = -1;
        }
        if self.rect.y <= 0 {
            self.dy = 1;
        }
        self.rect.y += self.dy * self.speed_y;
    }

    /// Three missiles (straight, low and high) launched from the boss nose
    pub fn volley(&self, assets: &dyn Assets) -> Vec<FlyingObject> {
        const NOSE_HEIGHT: i32 = 32;
        [MissileKind::To, MissileKind::ToSww, MissileKind::ToNww]
            .into_iter()
            .map(|kind| {
                let size = assets.size(Sprite::Missile(kind));
                FlyingObject::missile(
                    self.rect.x - size.x,
                    self.rect.y + NOSE_HEIGHT - size.y / 2,
                    kind,
                    assets,
                )
            })
            .collect()
    }
}
