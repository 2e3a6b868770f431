//! Logical timer service
//!
//! Each running timer accumulates elapsed milliseconds and fires once per
//! interval. The session drives it with `next_due`/`advance` so a handler
//! never runs concurrently with another.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Named timers. Declaration order is the firing order for timers due at
/// the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimerId {
    Paint,
    Welcome,
    StarsUpdate,
    MovableUpdate,
    GetReady,
    GameUpdate,
    GameCounter,
    GameEvents,
    EnemiesEvents,
    Shield,
    Freeze,
    Light,
    BombLock,
    MissileLock,
    SetupEnter,
    NewScore,
    Smoke,
}

impl TimerId {
    /// Gameplay timers stopped whenever a session is interrupted
    pub const GAMEPLAY: [TimerId; 11] = [
        TimerId::GameCounter,
        TimerId::MovableUpdate,
        TimerId::GetReady,
        TimerId::GameUpdate,
        TimerId::SetupEnter,
        TimerId::EnemiesEvents,
        TimerId::GameEvents,
        TimerId::Shield,
        TimerId::Freeze,
        TimerId::Light,
        TimerId::Smoke,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Running {
    interval: u32,
    elapsed: u32,
}

#[derive(Debug, Clone, Default)]
pub struct Timers {
    running: BTreeMap<TimerId, Running>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart from zero) with `interval_ms`
    pub fn start(&mut self, id: TimerId, interval_ms: u32) {
        let running = Running {
            interval: interval_ms.max(1),
            elapsed: 0,
        };
        self.running.insert(id, running);
    }

    pub fn stop(&mut self, id: TimerId) {
        self.running.remove(&id);
    }

    pub fn stop_all(&mut self, ids: &[TimerId]) {
        for id in ids {
            self.stop(*id);
        }
    }

    pub fn is_running(&self, id: TimerId) -> bool {
        self.running.contains_key(&id)
    }

    pub fn interval(&self, id: TimerId) -> Option<u32> {
        self.running.get(&id).map(|r| r.interval)
    }

    /// Milliseconds until the next timer fires
    pub fn next_due(&self) -> Option<u32> {
        self.running.values().map(|r| r.interval - r.elapsed).min()
    }

    /// Accumulate `elapsed_ms` on every running timer and return the ones
    /// that fired, in `TimerId` order. A timer overdue by several intervals
    /// appears once per interval.
    pub fn advance(&mut self, elapsed_ms: u32) -> Vec<TimerId> {
        let mut fired = Vec::new();
        for (id, running) in self.running.iter_mut() {
            running.elapsed += elapsed_ms;
            while running.elapsed >= running.interval {
                running.elapsed -= running.interval;
                fired.push(*id);
            }
        }
        fired
    }
}
