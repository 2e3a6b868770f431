//! Enemy director
//!
//! Replays the formation table one wave at a time. A new wave is only
//! populated once the previous one is cleared. On the final level the
//! exhausted queue is followed by the boss fight.

use rand::Rng;

use super::assets::{Assets, Sprite};
use super::enemy::{Boss, Enemy, spawn_wave, step_wave};
use super::scenario::{Formation, Scenario, formation_table};
use super::spawner::iterations;
use super::world::World;
use crate::consts::*;
use crate::settings::Difficulty;

#[derive(Debug, Clone, Default)]
pub struct Director {
    /// Current wave
    pub enemies: Vec<Enemy>,
    pub boss: Option<Boss>,
    /// Motion policy of the current wave
    pub formation: Option<Formation>,
    level: i32,
    queue: Scenario<Formation>,
    /// Enemy sprite rotation, advances once per wave
    sprite_cycle: usize,
}

impl Director {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the formation queue for `level` and drop the current wave
    pub fn set_level(&mut self, level: i32, difficulty: Difficulty) {
        self.level = level;
        self.queue = Scenario::new(formation_table(level), iterations(level, difficulty));
        self.clear();
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    /// Remove all enemies and the boss
    pub fn clear(&mut self) {
        self.enemies.clear();
        self.boss = None;
    }

    pub fn pop(&mut self) -> Option<Formation> {
        self.queue.pop()
    }

    pub fn remaining(&self) -> usize {
        self.queue.remaining()
    }

    /// Spawn a wave laid out for `formation`
    pub fn populate(&mut self, formation: Formation, assets: &dyn Assets) {
        let variants = assets.enemy_variants().max(1);
        let sprite = Sprite::Enemy(self.sprite_cycle % variants);
        self.sprite_cycle = self.sprite_cycle.wrapping_add(1);
        self.formation = Some(formation);
        self.enemies.extend(spawn_wave(formation, sprite, assets));
        log::debug!("Populated {:?} wave ({} enemies)", formation, self.enemies.len());
    }

    /// Move the boss, or the wave under its formation policy
    pub fn step(&mut self) {
        if let Some(boss) = self.boss.as_mut() {
            boss.step();
        } else if let Some(formation) = self.formation {
            step_wave(formation, &mut self.enemies);
        }
    }

    /// Cadence tick. Returns false when the level (or, on the final level,
    /// the boss) is done.
    pub fn run<R: Rng>(&mut self, world: &mut World, rng: &mut R, assets: &dyn Assets) -> bool {
        if !self.enemies.is_empty() {
            return true;
        }
        if let Some(formation) = self.pop() {
            self.populate(formation, assets);
            return true;
        }
        if self.level < MAX_LEVEL {
            return false;
        }
        match self.boss.as_ref().map(Boss::is_alive) {
            None => {
                world.missiles.clear();
                world.light_balls.clear();
                world.tnts.clear();
                world.clear_power_ups();
                let x = 2 * ARENA_WIDTH / 3;
                let y = rng.random_range(5..=STAGE_HEIGHT - 100);
                self.boss = Some(Boss::new(x, y, assets));
                log::info!("Boss spawned at ({}, {})", x, y);
                true
            }
            Some(true) => {
                if let Some(boss) = self.boss.as_ref() {
                    world.missiles.extend(boss.volley(assets));
                }
                true
            }
            Some(false) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::assets::StaticAssets;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup(level: i32) -> (Director, World, Pcg32) {
        let mut world = World::new(Difficulty::Easy);
        world.level = level;
        let mut director = Director::new();
        director.set_level(level, Difficulty::Easy);
        (director, world, Pcg32::seed_from_u64(11))
    }

    #[test]
    fn test_queue_length() {
        let (director, _, _) = setup(1);
        assert_eq!(director.remaining(), 13);
    }

    #[test]
    fn test_run_populates_only_when_clear() {
        let (mut d, mut w, mut rng) = setup(0);
        assert!(d.run(&mut w, &mut rng, &StaticAssets));
        assert_eq!(d.enemies.len(), 8);
        assert_eq!(d.formation, Some(Formation::Circle));
        assert!(d.run(&mut w, &mut rng, &StaticAssets));
        assert_eq!(d.remaining(), 11);
    }

    #[test]
    fn test_level_done_below_max() {
        let (mut d, mut w, mut rng) = setup(0);
        for _ in 0..12 {
            assert!(d.run(&mut w, &mut rng, &StaticAssets));
            d.enemies.clear();
        }
        assert_eq!(d.remaining(), 0);
        assert!(!d.run(&mut w, &mut rng, &StaticAssets));
        assert!(d.boss.is_none());
    }

    #[test]
    fn test_not_done_while_enemies_alive() {
        let (mut d, mut w, mut rng) = setup(0);
        for _ in 0..12 {
            d.run(&mut w, &mut rng, &StaticAssets);
            d.enemies.clear();
        }
        d.populate(Formation::Wave, &StaticAssets);
        assert!(d.run(&mut w, &mut rng, &StaticAssets));
    }

    #[test]
    fn test_boss_phase() {
        let (mut d, mut w, mut rng) = setup(MAX_LEVEL);
        while d.remaining() > 0 {
            d.run(&mut w, &mut rng, &StaticAssets);
            d.enemies.clear();
        }
        w.shield_timer = 4;
        w.missiles.push(crate::sim::entity::FlyingObject::missile(
            10,
            10,
            crate::sim::entity::MissileKind::From,
            &StaticAssets,
        ));

        // Spawn
        assert!(d.run(&mut w, &mut rng, &StaticAssets));
        assert!(d.boss.is_some());
        assert!(w.missiles.is_empty());
        assert_eq!(w.shield_timer, 0);

        // Volley
        assert!(d.run(&mut w, &mut rng, &StaticAssets));
        assert_eq!(w.missiles.len(), 3);

        // Defeated
        if let Some(boss) = d.boss.as_mut() {
            for _ in 0..BOSS_HP {
                boss.decrease_hp();
            }
        }
        assert!(!d.run(&mut w, &mut rng, &StaticAssets));
    }

    #[test]
    fn test_sprite_rotates_per_wave() {
        let (mut d, _, _) = setup(0);
        d.populate(Formation::Sine, &StaticAssets);
        let first = d.enemies[0].sprite;
        d.clear();
        d.populate(Formation::Sine, &StaticAssets);
        assert_ne!(d.enemies[0].sprite, first);
    }

    #[test]
    fn test_step_moves_boss_not_wave() {
        let (mut d, _, _) = setup(MAX_LEVEL);
        d.populate(Formation::Wave, &StaticAssets);
        let before = d.enemies[0].rect;
        d.boss = Some(Boss::new(1280, 400, &StaticAssets));
        d.step();
        assert_eq!(d.enemies[0].rect, before);
        assert_eq!(d.boss.as_ref().map(|b| b.rect.y), Some(420));
    }
}
