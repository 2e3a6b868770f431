//! Flying objects, the player, scenery movables and background stars
//!
//! Per-kind motion is a closed sum type (`Motion`) matched in one `step`
//! function. Entities die by being marked invalid; owners compact them out.

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::assets::{Assets, Sprite};
use super::rect::Rect;
use crate::consts::*;

/// Missile headings (FROM = fired by the player, TO = fired at the player)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MissileKind {
    From,
    To,
    FromNe,
    FromSe,
    ToNw,
    ToSw,
    ToNww,
    ToSww,
}

impl MissileKind {
    /// Fired by the player (moves right)
    pub fn is_outbound(&self) -> bool {
        matches!(self, MissileKind::From | MissileKind::FromNe | MissileKind::FromSe)
    }

    /// Kinds that can hurt the player
    pub fn is_hostile(&self) -> bool {
        matches!(
            self,
            MissileKind::To | MissileKind::ToNww | MissileKind::ToSww | MissileKind::ToNw
        )
    }

    /// Per-tick displacement
    pub fn velocity(&self) -> IVec2 {
        const FULL: i32 = 12;
        const HALF: i32 = 6;
        match self {
            MissileKind::From => IVec2::new(FULL, 0),
            MissileKind::To => IVec2::new(-FULL, 0),
            MissileKind::ToNw => IVec2::new(-FULL, -FULL),
            MissileKind::ToSw => IVec2::new(-FULL, FULL),
            MissileKind::FromNe => IVec2::new(FULL, -FULL),
            MissileKind::FromSe => IVec2::new(FULL, FULL),
            MissileKind::ToNww => IVec2::new(-FULL, -HALF),
            MissileKind::ToSww => IVec2::new(-FULL, HALF),
        }
    }
}

/// Fire missile spread directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FireballDirection {
    Up,
    Straight,
    Down,
}

impl FireballDirection {
    pub const ALL: [FireballDirection; 3] = [
        FireballDirection::Up,
        FireballDirection::Straight,
        FireballDirection::Down,
    ];

    pub fn velocity(&self) -> IVec2 {
        match self {
            FireballDirection::Up => IVec2::new(30, -15),
            FireballDirection::Straight => IVec2::new(30, 0),
            FireballDirection::Down => IVec2::new(30, 15),
        }
    }
}

/// Collectible power-ups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    Medkit,
    Shield,
    Tnt,
    LightBall,
    FreezeBox,
}

/// Background scenery types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovableKind {
    /// Gun emplacement, fires at the player and can be shot down
    Gun,
    House1,
    House2,
    House3,
    Factory1,
    Factory2,
    Factory3,
    Tower1,
    Tower2,
    Tower3,
}

/// Motion policy of a flying object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Motion {
    Missile(MissileKind),
    Fireball(FireballDirection),
    /// Falls slowly while drifting left
    Bomb { speed: IVec2 },
    /// Pickups: Y follows a sine of X around `base_y`
    Sine { base_y: i32, speed_x: i32 },
    /// Drops and meteorites: straight diagonal
    Linear { speed: IVec2 },
    /// Animation only, no displacement
    Explosion { frame: u32, frames: u32 },
}

/// Anything that flies around the arena and dies at its edges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlyingObject {
    pub rect: Rect,
    pub valid: bool,
    pub sprite: Sprite,
    pub motion: Motion,
}

impl FlyingObject {
    fn with(x: i32, y: i32, sprite: Sprite, motion: Motion, assets: &dyn Assets) -> Self {
        Self {
            rect: Rect::sized(x, y, assets.size(sprite)),
            valid: true,
            sprite,
            motion,
        }
    }

    pub fn missile(x: i32, y: i32, kind: MissileKind, assets: &dyn Assets) -> Self {
        Self::with(x, y, Sprite::Missile(kind), Motion::Missile(kind), assets)
    }

    pub fn fireball(x: i32, y: i32, direction: FireballDirection, assets: &dyn Assets) -> Self {
        Self::with(x, y, Sprite::Fireball, Motion::Fireball(direction), assets)
    }

    pub fn bomb(x: i32, y: i32, assets: &dyn Assets) -> Self {
        let speed = IVec2::new(SPEEDX_BOMB, 3);
        Self::with(x, y, Sprite::Bomb, Motion::Bomb { speed }, assets)
    }

    pub fn pickup(kind: PickupKind, x: i32, y: i32, assets: &dyn Assets) -> Self {
        let motion = Motion::Sine {
            base_y: y,
            speed_x: -8,
        };
        Self::with(x, y, Sprite::Pickup(kind), motion, assets)
    }

    pub fn drop(x: i32, y: i32, assets: &dyn Assets) -> Self {
        let motion = Motion::Linear {
            speed: IVec2::new(-8, 8),
        };
        Self::with(x, y, Sprite::Drop, motion, assets)
    }

    pub fn meteorite(x: i32, y: i32, assets: &dyn Assets) -> Self {
        let motion = Motion::Linear {
            speed: IVec2::new(1, 2),
        };
        Self::with(x, y, Sprite::Meteorite, motion, assets)
    }

    /// Explosion anchored at its center point
    pub fn explosion(center: IVec2, frames: u32) -> Self {
        Self {
            rect: Rect::new(center.x, center.y, 0, 0),
            valid: frames > 0,
            sprite: Sprite::Explosion(0),
            motion: Motion::Explosion { frame: 0, frames },
        }
    }

    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn missile_kind(&self) -> Option<MissileKind> {
        match self.motion {
            Motion::Missile(kind) => Some(kind),
            _ => None,
        }
    }

    /// Advance one tick according to the motion policy
    pub fn step(&mut self) {
        let r = &mut self.rect;
        match &mut self.motion {
            Motion::Missile(kind) => {
                let v = kind.velocity();
                r.move_by(v.x, v.y);
                if r.x > ARENA_WIDTH || r.right() < 0 || r.y > STAGE_HEIGHT || r.bottom() < 0 {
                    self.valid = false;
                }
            }
            Motion::Fireball(direction) => {
                let v = direction.velocity();
                r.move_by(v.x, v.y);
                if r.x > ARENA_WIDTH || r.y > ARENA_HEIGHT || r.y < 0 {
                    self.valid = false;
                }
            }
            Motion::Bomb { speed } => {
                r.move_by(speed.x, speed.y);
                if r.y >= ARENA_HEIGHT || r.x <= 0 {
                    self.valid = false;
                }
            }
            Motion::Sine { base_y, speed_x } => {
                let dy = (100.0 * (r.x as f64 / 100.0).sin()) as i32;
                r.x += *speed_x;
                r.y = *base_y + dy;
                if r.right() <= 0 {
                    self.valid = false;
                }
            }
            Motion::Linear { speed } => {
                r.move_by(speed.x, speed.y);
                if r.right() <= 0 || r.y >= ARENA_HEIGHT {
                    self.valid = false;
                }
            }
            Motion::Explosion { frame, frames } => {
                if *frame + 1 < *frames {
                    *frame += 1;
                    self.sprite = Sprite::Explosion(*frame);
                } else {
                    self.valid = false;
                }
            }
        }
    }
}

/// Margin of the shield rectangle around the player
pub const SHIELD_OFFSET: i32 = 20;
/// Distance covered by one movement key press
pub const PLAYER_STEP: i32 = 20;

/// Player ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub rect: Rect,
    /// Recomputed on every move
    pub shield: Rect,
    pub sprite: Sprite,
}

impl Player {
    pub fn new(x: i32, y: i32, index: usize, assets: &dyn Assets) -> Self {
        let sprite = Sprite::Player(index);
        let rect = Rect::sized(x, y, assets.size(sprite));
        Self {
            rect,
            shield: rect.inflated(SHIELD_OFFSET),
            sprite,
        }
    }

    fn move_by(&mut self, dx: i32, dy: i32) {
        self.rect.move_by(dx, dy);
        self.shield = self.rect.inflated(SHIELD_OFFSET);
    }

    pub fn go_left(&mut self) {
        if self.rect.x > PLAYER_STEP {
            self.move_by(-PLAYER_STEP, 0);
        }
    }

    pub fn go_right(&mut self) {
        if self.rect.x < ARENA_WIDTH - self.rect.w - PLAYER_STEP {
            self.move_by(PLAYER_STEP, 0);
        }
    }

    pub fn go_up(&mut self) {
        if self.rect.y > PLAYER_STEP {
            self.move_by(0, -PLAYER_STEP);
        }
    }

    pub fn go_down(&mut self) {
        if self.rect.y < STAGE_HEIGHT - self.rect.h - PLAYER_STEP {
            self.move_by(0, PLAYER_STEP);
        }
    }

    pub fn center(&self) -> IVec2 {
        self.rect.center()
    }

    /// Launch point for missiles (right edge, vertical middle)
    pub fn muzzle(&self) -> IVec2 {
        IVec2::new(self.rect.right(), self.rect.y + self.rect.h / 2)
    }

    /// Release point for bombs
    pub fn bomb_bay(&self) -> IVec2 {
        IVec2::new(self.rect.x + self.rect.w / 4, self.rect.bottom())
    }
}

/// Scenery object scrolling with the terrain, aligned to the stage bottom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movable {
    pub rect: Rect,
    pub valid: bool,
    pub kind: MovableKind,
    pub speed: i32,
}

impl Movable {
    pub fn new(x: i32, kind: MovableKind, assets: &dyn Assets) -> Self {
        let size = assets.size(Sprite::Movable(kind));
        Self {
            rect: Rect::sized(x, STAGE_HEIGHT - size.y, size),
            valid: true,
            kind,
            speed: MOVABLE_SPEED,
        }
    }

    pub fn is_gun(&self) -> bool {
        self.kind == MovableKind::Gun
    }

    pub fn sprite(&self) -> Sprite {
        Sprite::Movable(self.kind)
    }

    pub fn step(&mut self) {
        self.rect.x -= self.speed;
        if self.rect.right() < 0 {
            self.valid = false;
        }
    }
}

/// Lay movables edge to edge from x=0 until `2 * width` is covered,
/// cycling over `kinds`
pub fn build_strip(kinds: &[MovableKind], width: i32, assets: &dyn Assets) -> Vec<Movable> {
    let mut strip = Vec::new();
    if kinds.is_empty() {
        return strip;
    }
    let mut x = 0;
    for &kind in kinds.iter().cycle() {
        if x >= 2 * width {
            break;
        }
        let movable = Movable::new(x, kind, assets);
        x += movable.rect.w.max(1);
        strip.push(movable);
    }
    strip
}

/// Background star, wraps around to the right edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub rect: Rect,
    pub speed: i32,
}

impl Star {
    pub fn step(&mut self) {
        self.rect.x -= self.speed;
        if self.rect.right() < 0 {
            self.rect.x = STAGE_WIDTH;
        }
    }

    /// One star per set cell of `matrix`, jittered horizontally within its cell
    pub fn from_matrix<R: Rng>(matrix: &[&[u8]], rng: &mut R, assets: &dyn Assets) -> Vec<Star> {
        let rows = matrix.len() as i32;
        let columns = matrix.first().map(|r| r.len()).unwrap_or(0) as i32;
        if rows == 0 || columns == 0 {
            return Vec::new();
        }
        let cell_w = STAGE_WIDTH / columns;
        let cell_h = STAGE_HEIGHT / rows;
        let size = assets.size(Sprite::Star);

        let mut stars = Vec::new();
        for (i, row) in matrix.iter().enumerate() {
            for (j, &cell) in row.iter().enumerate() {
                if cell == 1 {
                    let x = j as i32 * cell_w + rng.random_range(0..=cell_w);
                    let y = i as i32 * cell_h + cell_h / 2;
                    stars.push(Star {
                        rect: Rect::sized(x, y, size),
                        speed: STAR_SPEED,
                    });
                }
            }
        }
        stars
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::assets::StaticAssets;

    #[test]
    fn test_missile_leaves_arena() {
        let mut m = FlyingObject::missile(ARENA_WIDTH - 5, 100, MissileKind::From, &StaticAssets);
        assert!(m.is_valid());
        m.step();
        assert!(!m.is_valid());
    }

    #[test]
    fn test_hostile_missile_diagonal() {
        let mut m = FlyingObject::missile(500, 500, MissileKind::ToSww, &StaticAssets);
        m.step();
        assert_eq!(m.rect.top_left(), IVec2::new(488, 506));
        assert!(MissileKind::ToSww.is_hostile());
        assert!(!MissileKind::From.is_hostile());
    }

    #[test]
    fn test_sine_pickup_follows_base() {
        let mut p = FlyingObject::pickup(PickupKind::Medkit, 0, 300, &StaticAssets);
        p.step();
        // sin(0) == 0, so the first step keeps base_y
        assert_eq!(p.rect.y, 300);
        assert_eq!(p.rect.x, -8);
        // Right edge still on screen
        assert!(p.is_valid());
    }

    #[test]
    fn test_explosion_runs_all_frames() {
        let mut e = FlyingObject::explosion(IVec2::new(10, 10), 3);
        e.step();
        e.step();
        assert!(e.is_valid());
        assert_eq!(e.sprite, Sprite::Explosion(2));
        e.step();
        assert!(!e.is_valid());
    }

    #[test]
    fn test_double_invalidate_is_noop() {
        let mut d = FlyingObject::drop(100, 0, &StaticAssets);
        d.invalidate();
        d.invalidate();
        assert!(!d.is_valid());
    }

    #[test]
    fn test_player_shield_follows_moves() {
        let mut p = Player::new(200, 400, 0, &StaticAssets);
        p.go_right();
        assert_eq!(p.rect.x, 220);
        assert_eq!(p.shield, p.rect.inflated(SHIELD_OFFSET));
    }

    #[test]
    fn test_player_bounds() {
        let mut p = Player::new(20, 20, 0, &StaticAssets);
        p.go_left();
        p.go_up();
        assert_eq!(p.rect.top_left(), IVec2::new(20, 20));
    }

    #[test]
    fn test_strip_has_no_gaps() {
        let kinds = [MovableKind::House1, MovableKind::Gun, MovableKind::Tower1];
        let strip = build_strip(&kinds, ARENA_WIDTH, &StaticAssets);
        for pair in strip.windows(2) {
            assert_eq!(pair[0].rect.right(), pair[1].rect.x);
        }
        let last = strip.last().expect("strip is not empty");
        assert!(last.rect.right() >= 2 * ARENA_WIDTH);
        assert!(strip.iter().all(|m| m.rect.bottom() == STAGE_HEIGHT));
    }

    #[test]
    fn test_star_wraps() {
        let mut star = Star {
            rect: Rect::new(-4, 10, 4, 4),
            speed: 1,
        };
        star.step();
        assert_eq!(star.rect.x, STAGE_WIDTH);
    }
}
