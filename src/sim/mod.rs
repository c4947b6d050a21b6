//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (or an injected one)
//! - No rendering or platform dependencies

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Rect, find_collision};
pub use spawn::{SpawnClock, spawn_interval_ms};
pub use state::{GamePhase, GameState, Obstacle, Vehicle};
pub use tick::{Command, TickInput, TickReport, apply_command, autopilot, step, tick};
