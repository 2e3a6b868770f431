//! Collision detection and resolution
//!
//! One ordered pass per tick: pickups, drops, missiles, enemy contact,
//! scenery contact, bombs. Every check compacts the collections it touched
//! before the next one runs, so no dead entity triggers twice. Once a check
//! costs a life the remaining checks are skipped for this tick.

use glam::IVec2;

use super::assets::Assets;
use super::director::Director;
use super::enemy::Enemy;
use super::entity::{FlyingObject, Movable};
use super::rect::Rect;
use super::world::{LifeEvent, World};
use crate::consts::*;
use crate::settings::Difficulty;

/// Timed power-up caught this tick (the caller starts its countdown)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUp {
    Shield,
    Freeze,
    LightBall,
}

/// What a resolution pass asks the session to do
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub power_ups: Vec<PowerUp>,
    /// Set when the health bar emptied; no damage follows in the same pass
    pub life: Option<LifeEvent>,
}

impl Resolution {
    fn is_final(&self) -> bool {
        self.life.is_some()
    }
}

/// Run every check in order
pub fn resolve(world: &mut World, director: &mut Director, assets: &dyn Assets) -> Resolution {
    let mut res = Resolution::default();
    let body = world.player.as_ref().map(|p| p.rect);

    if let Some(body) = body {
        collect_pickups(world, body, &mut res);
        check_drops(world, body, assets, &mut res);
    }
    if !res.is_final() {
        check_missiles(world, director, body, assets, &mut res);
    }
    if let Some(body) = body {
        if !res.is_final() {
            check_enemies(world, director, body, assets, &mut res);
        }
        if !res.is_final() {
            check_movables(world, body, assets, &mut res);
        }
    }
    if !res.is_final() {
        check_bombs(world, director, assets);
    }

    if res.life == Some(LifeEvent::Killed) {
        director.clear();
    }
    res
}

/// Apply `hits` damage units, stopping at the first lost life
fn apply_damage(world: &mut World, hits: usize, res: &mut Resolution) {
    for _ in 0..hits {
        if res.is_final() {
            return;
        }
        res.life = world.decrease_hp();
    }
}

fn caught(items: &mut [FlyingObject], body: Rect) -> usize {
    let mut count = 0;
    for item in items.iter_mut().filter(|i| i.valid && i.rect.overlaps(&body)) {
        item.invalidate();
        count += 1;
    }
    count
}

// === Pickups ===

fn collect_pickups(world: &mut World, body: Rect, res: &mut Resolution) {
    if caught(&mut world.shields, body) > 0 {
        world.shield_timer = SHIELD_TIMER;
        world.shields.clear();
        res.power_ups.push(PowerUp::Shield);
    }

    for _ in 0..caught(&mut world.medkits, body) {
        world.increase_hp();
    }
    world.medkits.retain(|m| m.valid);

    world.tnt += caught(&mut world.tnts, body) as u32;
    world.tnts.retain(|t| t.valid);

    if caught(&mut world.light_balls, body) > 0 {
        world.lightball_timer = LIGHTBALL_TIMER;
        world.light_balls.clear();
        res.power_ups.push(PowerUp::LightBall);
    }

    if caught(&mut world.ice_boxes, body) > 0 {
        world.frozen_timer = FROZEN_TIMER;
        world.ice_boxes.clear();
        // Nothing keeps flying while frozen
        world.missiles.clear();
        res.power_ups.push(PowerUp::Freeze);
    }
}

// === Hazards ===

fn check_drops(world: &mut World, body: Rect, assets: &dyn Assets, res: &mut Resolution) {
    let harmless = matches!(world.difficulty, Difficulty::Easy | Difficulty::Unlimited);
    if world.is_shielded() || harmless {
        return;
    }
    let hits = caught(&mut world.drops, body);
    world.drops.retain(|d| d.valid);
    for _ in 0..hits {
        world.explode(body.center(), assets);
    }
    apply_damage(world, hits, res);
}

/// Outbound projectile against the wave and gun emplacements.
/// A projectile destroys at most one target.
fn strike(
    shot: &mut FlyingObject,
    enemies: &mut [Enemy],
    movables: &mut [Movable],
    points: &mut u32,
    blasts: &mut Vec<IVec2>,
) -> bool {
    for enemy in enemies.iter_mut().filter(|e| e.valid) {
        if shot.rect.overlaps(&enemy.rect) {
            enemy.invalidate();
            shot.invalidate();
            blasts.push(enemy.rect.center());
            *points += 1;
            return false;
        }
    }
    for gun in movables.iter_mut().filter(|m| m.valid && m.is_gun()) {
        if shot.rect.overlaps(&gun.rect) {
            gun.valid = false;
            shot.invalidate();
            blasts.push(gun.rect.center());
            *points += 1;
            return true;
        }
    }
    false
}

fn check_missiles(
    world: &mut World,
    director: &mut Director,
    body: Option<Rect>,
    assets: &dyn Assets,
    res: &mut Resolution,
) {
    let vulnerable = !world.is_shielded() && world.difficulty != Difficulty::Unlimited;
    let mut blasts = Vec::new();
    let mut replaced = 0;
    let mut hits = 0;

    for missile in world.missiles.iter_mut() {
        let Some(kind) = missile.missile_kind().filter(|_| missile.valid) else {
            continue;
        };
        if kind.is_outbound() {
            if strike(
                missile,
                &mut director.enemies,
                &mut world.movables,
                &mut world.points,
                &mut blasts,
            ) {
                replaced += 1;
            }
        } else if kind.is_hostile() && vulnerable {
            if let Some(body) = body.filter(|b| missile.rect.overlaps(b)) {
                missile.invalidate();
                blasts.push(body.center());
                hits += 1;
            }
        }
    }

    for fireball in world.fire_missiles.iter_mut().filter(|f| f.valid) {
        if strike(
            fireball,
            &mut director.enemies,
            &mut world.movables,
            &mut world.points,
            &mut blasts,
        ) {
            replaced += 1;
        }
    }

    if let Some(boss) = director.boss.as_mut() {
        for missile in world.missiles.iter_mut() {
            let outbound = missile.missile_kind().is_some_and(|k| k.is_outbound());
            if boss.is_alive() && missile.valid && outbound && boss.rect.overlaps(&missile.rect) {
                boss.decrease_hp();
                missile.invalidate();
            }
        }
    }

    director.enemies.retain(|e| e.valid);
    world.missiles.retain(|m| m.valid);
    world.fire_missiles.retain(|f| f.valid);
    world.movables.retain(|m| m.valid);
    for _ in 0..replaced {
        world.add_movable(assets);
    }
    for center in blasts {
        world.explode(center, assets);
    }
    apply_damage(world, hits, res);
}

// === Body contact ===

fn check_enemies(
    world: &mut World,
    director: &mut Director,
    body: Rect,
    assets: &dyn Assets,
    res: &mut Resolution,
) {
    let vulnerable = !world.is_shielded()
        && !world.is_frozen()
        && world.difficulty != Difficulty::Unlimited;
    let mut blasts = Vec::new();
    for enemy in director.enemies.iter_mut() {
        if enemy.valid && enemy.rect.overlaps(&body) {
            enemy.invalidate();
            blasts.push(enemy.rect.center());
        }
    }
    director.enemies.retain(|e| e.valid);

    world.points += blasts.len() as u32;
    let hits = if vulnerable { blasts.len() } else { 0 };
    for center in blasts {
        world.explode(center, assets);
    }
    apply_damage(world, hits, res);
}

fn check_movables(world: &mut World, body: Rect, assets: &dyn Assets, res: &mut Resolution) {
    if world.difficulty != Difficulty::Hard {
        return;
    }
    let mut blasts = Vec::new();
    for movable in world.movables.iter_mut() {
        if movable.valid && movable.rect.overlaps(&body) {
            movable.valid = false;
            blasts.push(movable.rect.center());
        }
    }
    world.movables.retain(|m| m.valid);

    world.points += blasts.len() as u32;
    let hits = if world.is_shielded() { 0 } else { blasts.len() };
    for center in blasts {
        world.explode(center, assets);
        world.add_movable(assets);
    }
    apply_damage(world, hits, res);
}

// === Bombs ===

fn check_bombs(world: &mut World, director: &mut Director, assets: &dyn Assets) {
    let mut blasts = Vec::new();
    let mut replaced = 0;
    for bomb in world.bombs.iter_mut().filter(|b| b.valid) {
        if let Some(target) = world
            .movables
            .iter_mut()
            .find(|m| m.valid && m.rect.overlaps(&bomb.rect))
        {
            target.valid = false;
            bomb.invalidate();
            blasts.push(target.rect.center());
            replaced += 1;
            continue;
        }
        if let Some(target) = director
            .enemies
            .iter_mut()
            .find(|e| e.valid && e.rect.overlaps(&bomb.rect))
        {
            target.invalidate();
            bomb.invalidate();
            blasts.push(target.rect.center());
        }
    }
    world.bombs.retain(|b| b.valid);
    world.movables.retain(|m| m.valid);
    director.enemies.retain(|e| e.valid);

    world.points += blasts.len() as u32;
    for _ in 0..replaced {
        world.add_movable(assets);
    }
    for center in blasts {
        world.explode(center, assets);
    }
}
