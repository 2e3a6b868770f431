//! Scripted spawner
//!
//! Replays the level's world-event table and turns each token into pickups,
//! drops or missile volleys. Append-only: it never removes or resolves
//! entities.

use rand::Rng;

use super::assets::{Assets, Sprite};
use super::enemy::Enemy;
use super::entity::{FlyingObject, MissileKind, PickupKind};
use super::scenario::{GameEvent, Scenario, event_table};
use super::world::World;
use crate::consts::*;
use crate::settings::Difficulty;

/// Number of scenario passes queued for a level
pub fn iterations(level: i32, difficulty: Difficulty) -> usize {
    12 + level.max(0) as usize + difficulty.index()
}

#[derive(Debug, Clone, Default)]
pub struct Spawner {
    queue: Scenario<GameEvent>,
    level: i32,
}

impl Spawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the token queue for `level`
    pub fn set_level(&mut self, level: i32, difficulty: Difficulty) {
        self.level = level;
        let len = iterations(level, difficulty) * EVENTS_FACTOR;
        self.queue = Scenario::new(event_table(level), len);
        log::debug!("Spawner queue for level {}: {} tokens", level, len);
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    pub fn pop(&mut self) -> Option<GameEvent> {
        self.queue.pop()
    }

    pub fn remaining(&self) -> usize {
        self.queue.remaining()
    }

    /// Cadence tick. Returns false once the queue is exhausted.
    pub fn run<R: Rng>(
        &mut self,
        world: &mut World,
        enemies: &[Enemy],
        rng: &mut R,
        assets: &dyn Assets,
    ) -> bool {
        self.run_token(world, enemies, rng, assets).is_some()
    }

    /// Pop one token and spawn what it names. Returns the token, or None
    /// once the queue is exhausted.
    pub fn run_token<R: Rng>(
        &mut self,
        world: &mut World,
        enemies: &[Enemy],
        rng: &mut R,
        assets: &dyn Assets,
    ) -> Option<GameEvent> {
        let event = self.pop()?;
        spawn(event, world, enemies, rng, assets);
        Some(event)
    }
}

fn pickup_y<R: Rng>(rng: &mut R, top: i32) -> i32 {
    rng.random_range(top..=3 * ARENA_HEIGHT / 4)
}

fn enemy_volley(world: &mut World, enemies: &[Enemy], assets: &dyn Assets, filter: fn(&Enemy) -> bool) {
    if enemies.is_empty() || world.is_frozen() {
        return;
    }
    let size = assets.size(Sprite::Missile(MissileKind::To));
    for enemy in enemies.iter().filter(|e| filter(e)) {
        world.missiles.push(FlyingObject::missile(
            enemy.rect.x - size.x,
            enemy.rect.y - size.y / 2,
            MissileKind::To,
            assets,
        ));
    }
}

/// Instantiate the entities for one world event
pub fn spawn<R: Rng>(
    event: GameEvent,
    world: &mut World,
    enemies: &[Enemy],
    rng: &mut R,
    assets: &dyn Assets,
) {
    let w = ARENA_WIDTH;
    match event {
        GameEvent::None => {}
        GameEvent::Tnt => {
            let y = pickup_y(rng, 150);
            world.tnts.push(FlyingObject::pickup(PickupKind::Tnt, w, y, assets));
        }
        GameEvent::Medkit => {
            let y = pickup_y(rng, 250);
            world.medkits.push(FlyingObject::pickup(PickupKind::Medkit, w, y, assets));
        }
        GameEvent::Freeze => {
            let y = pickup_y(rng, 150);
            world.ice_boxes.push(FlyingObject::pickup(PickupKind::FreezeBox, w, y, assets));
        }
        GameEvent::LightBall => {
            let y = pickup_y(rng, 150);
            world.light_balls.push(FlyingObject::pickup(PickupKind::LightBall, w, y, assets));
        }
        GameEvent::Shield => {
            let y = pickup_y(rng, 150);
            world.shields.push(FlyingObject::pickup(PickupKind::Shield, w, y, assets));
        }
        GameEvent::Drop => {
            let x = rng.random_range(w / 3..=w);
            world.drops.push(FlyingObject::drop(x, 0, assets));
        }
        GameEvent::Drops => {
            let left = rng.random_range(w / 3..=2 * w / 3);
            let right = rng.random_range(2 * w / 3..=w);
            world.drops.push(FlyingObject::drop(left, 0, assets));
            world.drops.push(FlyingObject::drop(right, 0, assets));
        }
        GameEvent::GunMissile => {
            if world.is_frozen() {
                return;
            }
            let size = assets.size(Sprite::Missile(MissileKind::ToNw));
            let launches: Vec<FlyingObject> = world
                .movables
                .iter()
                .filter(|m| m.valid && m.is_gun())
                .map(|m| {
                    FlyingObject::missile(m.rect.x - size.x, m.rect.y - size.y, MissileKind::ToNw, assets)
                })
                .collect();
            world.missiles.extend(launches);
        }
        GameEvent::Missiles => enemy_volley(world, enemies, assets, |_| true),
        GameEvent::MissilesEven => enemy_volley(world, enemies, assets, |e| !e.odd),
        GameEvent::MissilesOdd => enemy_volley(world, enemies, assets, |e| e.odd),
    }
    if event != GameEvent::None {
        log::debug!("Spawned {:?}", event);
    }
}
