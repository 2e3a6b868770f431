//! Simulation context
//!
//! Every live entity collection and every session counter the managers and
//! the collision pass read and write. Passed by `&mut` to each component so
//! they can be exercised against a hand-built world in tests.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::assets::Assets;
use super::entity::{FlyingObject, Movable, MovableKind, Player, build_strip};
use super::scenario::{Cycle, movable_table};
use crate::consts::*;
use crate::settings::Difficulty;

/// Outcome of a damage that emptied the health bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifeEvent {
    /// A life was lost, more remain
    Killed,
    /// The last life was lost
    GameOver,
}

/// All session state mutated by the tick, the managers and the collision pass
#[derive(Debug, Clone)]
pub struct World {
    pub player: Option<Player>,

    // === Flying objects ===
    pub missiles: Vec<FlyingObject>,
    pub fire_missiles: Vec<FlyingObject>,
    pub bombs: Vec<FlyingObject>,
    pub medkits: Vec<FlyingObject>,
    pub light_balls: Vec<FlyingObject>,
    pub tnts: Vec<FlyingObject>,
    pub shields: Vec<FlyingObject>,
    pub ice_boxes: Vec<FlyingObject>,
    pub meteorites: Vec<FlyingObject>,
    pub drops: Vec<FlyingObject>,
    pub explosions: Vec<FlyingObject>,

    // === Scenery ===
    pub movables: Vec<Movable>,
    movable_factory: Cycle<MovableKind>,

    // === Counters ===
    pub points: u32,
    pub lives: u32,
    /// Health units, 0..=MAX_INDICATORS
    pub indicators: u32,
    /// TNT charges held by the player
    pub tnt: u32,
    /// Power-up countdowns in whole seconds
    pub shield_timer: u32,
    pub frozen_timer: u32,
    pub lightball_timer: u32,

    pub difficulty: Difficulty,
    /// -1 until the first Prepare
    pub level: i32,
}

impl World {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            player: None,
            missiles: Vec::new(),
            fire_missiles: Vec::new(),
            bombs: Vec::new(),
            medkits: Vec::new(),
            light_balls: Vec::new(),
            tnts: Vec::new(),
            shields: Vec::new(),
            ice_boxes: Vec::new(),
            meteorites: Vec::new(),
            drops: Vec::new(),
            explosions: Vec::new(),
            movables: Vec::new(),
            movable_factory: Cycle::new(movable_table(0)),
            points: 0,
            lives: START_LIVES,
            indicators: MAX_INDICATORS,
            tnt: START_TNT,
            shield_timer: 0,
            frozen_timer: 0,
            lightball_timer: 0,
            difficulty,
            level: -1,
        }
    }

    /// Fresh session counters
    pub fn start_session(&mut self) {
        self.points = 0;
        self.level = -1;
        self.lives = START_LIVES;
        self.indicators = MAX_INDICATORS;
        self.tnt = START_TNT;
    }

    pub fn is_shielded(&self) -> bool {
        self.shield_timer > 0
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen_timer > 0
    }

    pub fn clear_power_ups(&mut self) {
        self.shield_timer = 0;
        self.frozen_timer = 0;
        self.lightball_timer = 0;
    }

    /// Empty every pickup and hazard collection
    pub fn clear_transient(&mut self) {
        self.missiles.clear();
        self.fire_missiles.clear();
        self.bombs.clear();
        self.medkits.clear();
        self.light_balls.clear();
        self.tnts.clear();
        self.shields.clear();
        self.ice_boxes.clear();
        self.drops.clear();
    }

    /// Level setup: transient state cleared, new movable strip, player created once
    pub fn prepare_level(&mut self, player_index: usize, assets: &dyn Assets) {
        self.clear_transient();
        self.clear_power_ups();

        self.movable_factory = Cycle::new(movable_table(self.level));
        let picks = self.movable_factory.take_n(STRIP_MOVABLES);
        self.movables = build_strip(&picks, ARENA_WIDTH, assets);

        if self.player.is_none() {
            self.player = Some(Player::new(200, 400, player_index, assets));
        }
    }

    /// Post-death cleanup, also run again when the player acknowledges
    pub fn process_killed(&mut self) {
        if self.lives > 0 {
            self.indicators = MAX_INDICATORS;
        }
        self.clear_transient();
        self.explosions.clear();
        self.clear_power_ups();
    }

    /// Take one health unit; an empty bar costs a life
    pub fn decrease_hp(&mut self) -> Option<LifeEvent> {
        self.indicators = self.indicators.saturating_sub(1);
        if self.indicators > 0 {
            return None;
        }
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            Some(LifeEvent::GameOver)
        } else {
            self.process_killed();
            Some(LifeEvent::Killed)
        }
    }

    pub fn increase_hp(&mut self) {
        if self.indicators < MAX_INDICATORS {
            self.indicators += 1;
        }
    }

    pub fn explode(&mut self, center: IVec2, assets: &dyn Assets) {
        self.explosions
            .push(FlyingObject::explosion(center, assets.explosion_frames()));
    }

    /// Append the next strip movable right after the last one
    pub fn add_movable(&mut self, assets: &dyn Assets) {
        let x = self.movables.last().map(|m| m.rect.right()).unwrap_or(0);
        if let Some(kind) = self.movable_factory.next_item() {
            self.movables.push(Movable::new(x, kind, assets));
        }
    }

    /// Scroll the strip; every movable that left the screen is replaced at the end
    pub fn scroll_movables(&mut self, assets: &dyn Assets) {
        for movable in self.movables.iter_mut() {
            movable.step();
        }
        let before = self.movables.len();
        self.movables.retain(|m| m.valid);
        for _ in self.movables.len()..before {
            self.add_movable(assets);
        }
    }
}
