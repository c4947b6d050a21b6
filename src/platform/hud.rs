//! HUD view model
//!
//! Everything the page shows as text, derived from the state each frame.

use crate::sim::GameState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudView {
    pub score: String,
    pub level: String,
    /// Label for the pause/resume button
    pub pause_label: &'static str,
    pub show_game_over: bool,
    /// Restart is only offered once the run has ended
    pub restart_enabled: bool,
}

impl HudView {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            score: format!("Score: {}", state.score),
            level: format!("Level: {}", state.level),
            pause_label: if state.is_paused() { "Resume" } else { "Pause" },
            show_game_over: state.is_game_over(),
            restart_enabled: state.is_game_over(),
        }
    }
}
