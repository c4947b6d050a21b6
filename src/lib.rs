//! Road Racer - A lane-dodging arcade driving game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, spawning, scoring, collisions)
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser input mapping, HUD view model, host errors
//! - `settings`: Player preferences

pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per 60 Hz display refresh)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Drawable surface, in pixels (origin top-left, y down)
    pub const CANVAS_WIDTH: f32 = 400.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Road band
    pub const ROAD_LEFT: f32 = 50.0;
    pub const ROAD_WIDTH: f32 = 300.0;

    /// Vehicle
    pub const VEHICLE_WIDTH: f32 = 50.0;
    pub const VEHICLE_HEIGHT: f32 = 80.0;
    pub const VEHICLE_BOTTOM_MARGIN: f32 = 20.0;
    /// Top edge of the vehicle; it never moves vertically
    pub const VEHICLE_Y: f32 = CANVAS_HEIGHT - VEHICLE_HEIGHT - VEHICLE_BOTTOM_MARGIN;
    pub const VEHICLE_START_X: f32 = 150.0;
    pub const VEHICLE_STEP: f32 = 20.0;
    pub const VEHICLE_MIN_X: f32 = ROAD_LEFT;
    pub const VEHICLE_MAX_X: f32 = 250.0;

    /// Obstacles
    pub const OBSTACLE_WIDTH: f32 = 50.0;
    pub const OBSTACLE_HEIGHT: f32 = 80.0;
    pub const OBSTACLE_SPAWN_Y: f32 = -OBSTACLE_HEIGHT;
    /// Horizontal spread of spawn positions, starting at `ROAD_LEFT`
    pub const OBSTACLE_SPAWN_SPAN: f32 = ROAD_WIDTH - 50.0;

    /// Fall speed in pixels/tick is `BASE + level * PER_LEVEL`
    pub const FALL_SPEED_BASE: f32 = 2.0;
    pub const FALL_SPEED_PER_LEVEL: f32 = 0.3;

    /// Points needed per level
    pub const POINTS_PER_LEVEL: u32 = 5;

    /// Spawn interval is `BASE - level * PER_LEVEL`, never below `MIN`
    pub const SPAWN_INTERVAL_BASE_MS: u32 = 2000;
    pub const SPAWN_INTERVAL_PER_LEVEL_MS: u32 = 300;
    pub const SPAWN_INTERVAL_MIN_MS: u32 = 1000;
}
