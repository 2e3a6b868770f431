//! Fixed timestep simulation tick
//!
//! One Play-mode update: every live collection moves in a fixed order, dead
//! entities are compacted out, then the collision pass runs.

use super::assets::Assets;
use super::collision::{Resolution, resolve};
use super::director::Director;
use super::entity::FlyingObject;
use super::world::World;

fn advance(objects: &mut Vec<FlyingObject>) {
    for object in objects.iter_mut() {
        object.step();
    }
    objects.retain(|o| o.valid);
}

/// Advance the world by one update tick
pub fn update(world: &mut World, director: &mut Director, assets: &dyn Assets) -> Resolution {
    advance(&mut world.missiles);
    advance(&mut world.fire_missiles);
    advance(&mut world.ice_boxes);
    advance(&mut world.bombs);
    advance(&mut world.medkits);
    advance(&mut world.light_balls);
    advance(&mut world.tnts);
    advance(&mut world.shields);
    // Frozen enemies hold position
    if !world.is_frozen() {
        director.step();
    }
    advance(&mut world.meteorites);
    advance(&mut world.drops);
    advance(&mut world.explosions);

    resolve(world, director, assets)
}
