//! Keyboard mapping

use crate::settings::Settings;
use crate::sim::Command;

/// What a key press asks the host to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Forward to the simulation
    Sim(Command),
    /// Host-side demo mode switch
    ToggleAutopilot,
    /// Show/hide the FPS counter (persisted)
    ToggleFps,
}

/// Map a `KeyboardEvent.key` value to an action. Restart is deliberately not
/// bound; it is only offered by the game-over button.
pub fn key_action(key: &str, settings: &Settings) -> Option<KeyAction> {
    let action = match key {
        "ArrowLeft" => KeyAction::Sim(Command::MoveLeft),
        "ArrowRight" => KeyAction::Sim(Command::MoveRight),
        "a" | "A" if settings.wasd_controls => KeyAction::Sim(Command::MoveLeft),
        "d" | "D" if settings.wasd_controls => KeyAction::Sim(Command::MoveRight),
        "Escape" | "p" | "P" => KeyAction::Sim(Command::TogglePause),
        "i" | "I" => KeyAction::ToggleAutopilot,
        "f" | "F" => KeyAction::ToggleFps,
        _ => return None,
    };
    Some(action)
}
