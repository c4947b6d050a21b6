//! Obstacle spawn cadence
//!
//! The interval shrinks with level and bottoms out at one second. The clock is
//! driven by the same fixed step as the simulation, so spawning is as
//! deterministic as ticking.

use serde::{Deserialize, Serialize};

use crate::consts::{SPAWN_INTERVAL_BASE_MS, SPAWN_INTERVAL_MIN_MS, SPAWN_INTERVAL_PER_LEVEL_MS};

/// Milliseconds between spawns at `level`
pub fn spawn_interval_ms(level: u32) -> u32 {
    SPAWN_INTERVAL_BASE_MS
        .saturating_sub(level.saturating_mul(SPAWN_INTERVAL_PER_LEVEL_MS))
        .max(SPAWN_INTERVAL_MIN_MS)
}

/// Repeating timer that fires once per spawn interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnClock {
    pub interval_ms: u32,
    /// Time accumulated toward the next spawn
    pub elapsed_ms: f32,
}

impl SpawnClock {
    pub fn new(level: u32) -> Self {
        Self {
            interval_ms: spawn_interval_ms(level),
            elapsed_ms: 0.0,
        }
    }

    /// Recompute the interval for `level` and start a fresh period
    pub fn rearm(&mut self, level: u32) {
        self.interval_ms = spawn_interval_ms(level);
        self.elapsed_ms = 0.0;
    }

    /// Advance by `dt_ms` and return how many spawns came due
    pub fn advance(&mut self, dt_ms: f32) -> u32 {
        self.elapsed_ms += dt_ms.max(0.0);
        let interval = self.interval_ms as f32;
        let mut due = 0;
        while self.elapsed_ms >= interval {
            self.elapsed_ms -= interval;
            due += 1;
        }
        due
    }
}
