//! Platform abstraction layer
//!
//! Browser-facing pieces that do not touch the DOM directly, so they can be
//! tested natively:
//! - Keyboard mapping to simulation commands
//! - HUD view model (score, level, pause label, game-over banner)
//! - Host start-up errors

pub mod error;
pub mod hud;
pub mod input;

pub use error::HostError;
pub use hud::HudView;
pub use input::{KeyAction, key_action};
