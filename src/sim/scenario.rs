//! Scenario tables and replay cursor
//!
//! Tables are immutable; a `Scenario` reads `table[i % table.len()]` for a
//! bounded number of pops. Two cursors built with the same arguments always
//! yield the same tokens.

use serde::{Deserialize, Serialize};

use super::entity::MovableKind;
use crate::consts::MAX_LEVEL;

/// World event tokens replayed by the spawner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameEvent {
    None,
    Drop,
    Drops,
    Missiles,
    MissilesEven,
    MissilesOdd,
    Medkit,
    Tnt,
    Freeze,
    LightBall,
    Shield,
    GunMissile,
}

/// Enemy formation tokens replayed by the director
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Formation {
    Circle,
    Square,
    FrontBack,
    UpDown,
    Sine,
    Wave,
}

// === Event tables ===

use self::GameEvent as E;

const EVENTS_LEVEL_1: &[GameEvent] = &[
    E::None, E::Drop, E::MissilesOdd, E::None, E::LightBall, E::None, E::MissilesEven,
    E::None, E::Freeze, E::None, E::Shield, E::GunMissile, E::Medkit, E::None,
    E::Tnt, E::Missiles, E::Drop, E::LightBall, E::None, E::MissilesEven, E::None,
    E::Medkit, E::MissilesOdd, E::Drop, E::Tnt, E::None, E::GunMissile, E::None,
];

const EVENTS_LEVEL_2: &[GameEvent] = &[
    E::Drop, E::None, E::Missiles, E::None, E::Drop, E::Tnt, E::GunMissile, E::None,
    E::Drop, E::LightBall, E::MissilesEven, E::Drop, E::Shield, E::None, E::Medkit,
    E::GunMissile, E::Drops, E::None, E::Missiles, E::None, E::Drop, E::Freeze,
    E::MissilesOdd, E::Medkit, E::Drops, E::None, E::Missiles, E::Drops, E::None,
    E::LightBall, E::GunMissile, E::Medkit, E::None, E::Drop, E::Shield, E::Missiles,
    E::Drops, E::None, E::LightBall,
];

const EVENTS_LEVEL_3: &[GameEvent] = &[
    E::MissilesOdd, E::Drops, E::None, E::GunMissile, E::Drops, E::Medkit,
    E::MissilesEven, E::Tnt, E::Drops, E::Missiles, E::Freeze, E::Drop, E::GunMissile,
    E::Drops, E::Medkit, E::Missiles, E::LightBall, E::Drops, E::GunMissile, E::Shield,
    E::Drops, E::Missiles, E::Tnt, E::Drop, E::GunMissile, E::Drop, E::Medkit,
    E::Missiles, E::Shield, E::Drops, E::GunMissile, E::Tnt, E::Drop, E::MissilesEven,
    E::Drops, E::LightBall, E::Missiles, E::Drops,
];

const EVENTS_LEVEL_4: &[GameEvent] = &[
    E::MissilesEven, E::Drop, E::MissilesOdd, E::LightBall, E::GunMissile, E::Tnt,
    E::Missiles, E::Drop, E::MissilesEven, E::Medkit, E::MissilesOdd, E::Freeze,
    E::GunMissile, E::Shield, E::Missiles, E::Drop, E::GunMissile, E::Medkit,
    E::MissilesEven, E::Drop, E::MissilesOdd, E::LightBall, E::GunMissile, E::Tnt,
    E::Missiles, E::Freeze, E::GunMissile, E::Shield, E::MissilesEven, E::Tnt,
    E::GunMissile, E::Drops, E::MissilesOdd, E::Drop, E::GunMissile, E::Medkit,
    E::Missiles, E::Tnt, E::Missiles, E::Drops, E::GunMissile, E::LightBall,
];

const EVENTS_LEVEL_5: &[GameEvent] = &[
    E::Missiles, E::Drops, E::GunMissile, E::GunMissile, E::LightBall, E::Missiles,
    E::Drops, E::GunMissile, E::GunMissile, E::Shield, E::Missiles, E::Drops,
    E::Missiles, E::Missiles, E::LightBall, E::GunMissile, E::Medkit, E::Missiles,
    E::Missiles, E::Drops, E::GunMissile, E::GunMissile, E::Drops, E::Missiles,
    E::Missiles, E::Tnt, E::GunMissile, E::GunMissile, E::Freeze, E::Missiles,
    E::Missiles, E::Medkit, E::GunMissile, E::GunMissile, E::Drops, E::MissilesEven,
    E::MissilesOdd, E::Drops, E::GunMissile, E::GunMissile, E::Tnt, E::Missiles,
    E::LightBall, E::GunMissile, E::Shield, E::MissilesEven, E::MissilesOdd, E::Medkit,
];

const EVENT_TABLES: [&[GameEvent]; 5] = [
    EVENTS_LEVEL_1,
    EVENTS_LEVEL_2,
    EVENTS_LEVEL_3,
    EVENTS_LEVEL_4,
    EVENTS_LEVEL_5,
];

/// Every level uses the same formation rotation
const FORMATIONS: &[Formation] = &[
    Formation::Circle,
    Formation::Square,
    Formation::FrontBack,
    Formation::UpDown,
    Formation::Sine,
    Formation::Wave,
];

// === Movable strips ===

use super::entity::MovableKind as M;

const MOVABLES_LEVEL_1: &[MovableKind] = &[
    M::House1, M::Factory1, M::Tower1, M::House2, M::Factory2, M::Gun, M::Tower2,
    M::House3, M::Factory3, M::Tower3, M::Gun,
];

const MOVABLES_LEVEL_2: &[MovableKind] = &[
    M::House1, M::Factory1, M::Tower1, M::Gun, M::House2, M::Factory2, M::Tower3,
    M::Gun, M::House3, M::Tower3, M::Factory3, M::Gun,
];

const MOVABLES_LEVEL_3: &[MovableKind] = &[
    M::House1, M::Factory1, M::Tower1, M::Gun, M::Gun, M::House2, M::Factory2,
    M::Tower2, M::Gun, M::Gun, M::House3, M::Factory3, M::Tower3, M::Gun, M::Gun,
];

const MOVABLES_LEVEL_4: &[MovableKind] = &[
    M::House1, M::Tower1, M::Gun, M::Factory1, M::House2, M::Gun, M::Tower2,
    M::Factory2, M::Gun, M::House3, M::Factory3, M::Gun, M::Tower3, M::House2, M::Gun,
];

const MOVABLES_LEVEL_5: &[MovableKind] = &[
    M::House1, M::Tower1, M::Gun, M::Gun, M::Factory1, M::House2, M::Gun, M::Gun,
    M::Tower2, M::Factory2, M::Gun, M::Gun, M::House3, M::Factory3, M::Gun, M::Gun,
    M::Tower3, M::House2, M::Gun, M::Gun,
];

const MOVABLE_TABLES: [&[MovableKind]; 5] = [
    MOVABLES_LEVEL_1,
    MOVABLES_LEVEL_2,
    MOVABLES_LEVEL_3,
    MOVABLES_LEVEL_4,
    MOVABLES_LEVEL_5,
];

/// Background star layout, 1 marks a star cell
pub const STAR_MATRIX: [&[u8]; 11] = [
    &[0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 1],
    &[1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0],
    &[0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 1],
    &[0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0],
    &[0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 1, 0],
    &[0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0],
    &[1, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 1, 0],
    &[0, 0, 1, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1],
    &[1, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 0, 0],
    &[0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    &[0, 1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 0, 0, 1],
];

/// Clamp a level number into table range
pub fn level_index(level: i32) -> usize {
    level.clamp(0, MAX_LEVEL) as usize
}

pub fn event_table(level: i32) -> &'static [GameEvent] {
    EVENT_TABLES[level_index(level)]
}

pub fn formation_table(_level: i32) -> &'static [Formation] {
    FORMATIONS
}

pub fn movable_table(level: i32) -> &'static [MovableKind] {
    MOVABLE_TABLES[level_index(level)]
}

/// Bounded cyclic read over a static table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario<T: Copy + 'static> {
    table: &'static [T],
    len: usize,
    pos: usize,
}

impl<T: Copy + 'static> Scenario<T> {
    /// Cursor yielding `len` tokens from `table`, wrapping around
    pub fn new(table: &'static [T], len: usize) -> Self {
        let len = if table.is_empty() { 0 } else { len };
        Self { table, len, pos: 0 }
    }

    /// An exhausted cursor
    pub fn empty() -> Self {
        Self {
            table: &[],
            len: 0,
            pos: 0,
        }
    }

    pub fn pop(&mut self) -> Option<T> {
        if self.pos >= self.len {
            return None;
        }
        let token = self.table[self.pos % self.table.len()];
        self.pos += 1;
        Some(token)
    }

    pub fn remaining(&self) -> usize {
        self.len - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}

impl<T: Copy + 'static> Default for Scenario<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Endless cursor used for the movable strip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle<T: Copy + 'static> {
    table: &'static [T],
    pos: usize,
}

impl<T: Copy + 'static> Cycle<T> {
    pub fn new(table: &'static [T]) -> Self {
        Self { table, pos: 0 }
    }

    pub fn next_item(&mut self) -> Option<T> {
        if self.table.is_empty() {
            return None;
        }
        let item = self.table[self.pos % self.table.len()];
        self.pos = (self.pos + 1) % self.table.len();
        Some(item)
    }

    /// Take `n` items as a Vec
    pub fn take_n(&mut self, n: usize) -> Vec<T> {
        (0..n).map_while(|_| self.next_item()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lengths() {
        let lens: Vec<usize> = EVENT_TABLES.iter().map(|t| t.len()).collect();
        assert_eq!(lens, vec![28, 39, 38, 42, 48]);
        assert_eq!(STAR_MATRIX.len(), 11);
        assert!(STAR_MATRIX.iter().all(|row| row.len() == 20));
    }

    #[test]
    fn test_level_clamped() {
        assert_eq!(level_index(-1), 0);
        assert_eq!(level_index(9), 4);
        assert_eq!(event_table(-3).len(), 28);
        assert_eq!(movable_table(99).len(), 20);
    }

    #[test]
    fn test_cursor_wraps_and_ends() {
        let mut s = Scenario::new(FORMATIONS, 8);
        let tokens: Vec<Formation> = std::iter::from_fn(|| s.pop()).collect();
        assert_eq!(tokens.len(), 8);
        assert_eq!(tokens[6], Formation::Circle);
        assert_eq!(tokens[7], Formation::Square);
        assert!(s.is_empty());
        assert_eq!(s.pop(), None);
    }

    #[test]
    fn test_same_arguments_same_tokens() {
        let mut a = Scenario::new(event_table(3), 500);
        let mut b = Scenario::new(event_table(3), 500);
        let ta: Vec<_> = std::iter::from_fn(|| a.pop()).collect();
        let tb: Vec<_> = std::iter::from_fn(|| b.pop()).collect();
        assert_eq!(ta, tb);
    }

    #[test]
    fn test_cycle_take() {
        let mut c = Cycle::new(movable_table(0));
        let picks = c.take_n(12);
        assert_eq!(picks[0], MovableKind::House1);
        assert_eq!(picks[10], MovableKind::Gun);
        assert_eq!(picks[11], MovableKind::House1);
    }
}
