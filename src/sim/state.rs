//! Game state and core simulation types
//!
//! Everything the simulation mutates lives in [`GameState`]; the host only
//! reads it for drawing and feeds it commands.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::spawn::SpawnClock;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Obstacles fall, the vehicle steers
    Running,
    /// Frozen until toggled back or restarted
    Paused,
    /// Vehicle hit an obstacle; only `restart` leaves this phase
    GameOver,
}

/// The player's vehicle. Only its lateral position changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Left edge, in pixels
    pub x: f32,
}

impl Default for Vehicle {
    fn default() -> Self {
        Self { x: VEHICLE_START_X }
    }
}

impl Vehicle {
    pub fn rect(&self) -> Rect {
        Rect::new(
            Vec2::new(self.x, VEHICLE_Y),
            Vec2::new(VEHICLE_WIDTH, VEHICLE_HEIGHT),
        )
    }

    fn step_left(&mut self) {
        if self.x > VEHICLE_MIN_X {
            self.x = (self.x - VEHICLE_STEP).max(VEHICLE_MIN_X);
        }
    }

    fn step_right(&mut self) {
        if self.x < VEHICLE_MAX_X {
            self.x = (self.x + VEHICLE_STEP).min(VEHICLE_MAX_X);
        }
    }
}

/// A falling obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Top-left corner, in pixels
    pub pos: Vec2,
}

impl Obstacle {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::new(OBSTACLE_WIDTH, OBSTACLE_HEIGHT))
    }

    /// Fully scrolled past the bottom of the canvas
    pub fn is_off_screen(&self) -> bool {
        self.pos.y >= CANVAS_HEIGHT
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Spawn-position RNG, advanced only when an obstacle actually spawns
    rng: Pcg32,
    pub vehicle: Vehicle,
    /// Active obstacles, in spawn order
    pub obstacles: Vec<Obstacle>,
    pub score: u32,
    /// Difficulty level, starts at 1
    pub level: u32,
    /// Score at which the most recent level-up happened
    pub last_level_up_score: u32,
    pub phase: GamePhase,
    /// Obstacle spawn cadence; frozen unless running, re-armed on every phase or level change
    pub spawn_clock: SpawnClock,
    /// Simulation tick counter (ticks that actually advanced the world)
    pub time_ticks: u64,
}

impl GameState {
    /// Create a new running game with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            vehicle: Vehicle::default(),
            obstacles: Vec::new(),
            score: 0,
            level: 1,
            last_level_up_score: 0,
            phase: GamePhase::Running,
            spawn_clock: SpawnClock::new(1),
            time_ticks: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Steer one step left; silently clamped at the road edge
    pub fn move_left(&mut self) {
        if self.is_running() {
            self.vehicle.step_left();
        }
    }

    /// Steer one step right; silently clamped at the road edge
    pub fn move_right(&mut self) {
        if self.is_running() {
            self.vehicle.step_right();
        }
    }

    /// Flip between Running and Paused. Game over stays game over.
    /// Resuming starts a fresh spawn period.
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Running => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Running,
            GamePhase::GameOver => return,
        };
        self.spawn_clock.rearm(self.level);
        log::debug!("Pause toggled: {:?}", self.phase);
    }

    /// Reset the run in place. The RNG stream continues so consecutive runs differ.
    pub fn restart(&mut self) {
        self.vehicle = Vehicle::default();
        self.obstacles.clear();
        self.score = 0;
        self.level = 1;
        self.last_level_up_score = 0;
        self.phase = GamePhase::Running;
        self.spawn_clock.rearm(self.level);
        self.time_ticks = 0;
    }

    /// Spawn an obstacle at a position drawn from the state's seeded RNG.
    /// Returns false (and draws nothing) unless running.
    pub fn spawn_obstacle(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        let roll: f32 = self.rng.random();
        self.push_obstacle(roll);
        true
    }

    /// Spawn an obstacle using an injected random source
    pub fn spawn_obstacle_with<R: Rng>(&mut self, rng: &mut R) -> bool {
        if !self.is_running() {
            return false;
        }
        let roll: f32 = rng.random();
        self.push_obstacle(roll);
        true
    }

    /// `roll` in [0, 1) picks the lateral spawn position
    fn push_obstacle(&mut self, roll: f32) {
        // f32 rounding can land a roll just under 1.0 on the right bound itself
        let limit = ROAD_LEFT + OBSTACLE_SPAWN_SPAN;
        let x = (ROAD_LEFT + roll * OBSTACLE_SPAWN_SPAN).min(f32::from_bits(limit.to_bits() - 1));
        self.obstacles.push(Obstacle::new(x, OBSTACLE_SPAWN_Y));
    }

    /// Current fall speed in pixels per tick
    pub fn fall_speed(&self) -> f32 {
        FALL_SPEED_BASE + self.level as f32 * FALL_SPEED_PER_LEVEL
    }

    /// Raise the level once for every full `POINTS_PER_LEVEL` gained since the
    /// last level-up. Returns true if the level changed.
    pub(crate) fn apply_level_ups(&mut self) -> bool {
        let mut leveled = false;
        while self.score >= self.last_level_up_score + POINTS_PER_LEVEL {
            self.last_level_up_score += POINTS_PER_LEVEL;
            self.level += 1;
            leveled = true;
        }
        if leveled {
            self.spawn_clock.rearm(self.level);
        }
        leveled
    }

    /// End the run
    pub(crate) fn crash(&mut self) {
        self.phase = GamePhase::GameOver;
        self.spawn_clock.rearm(self.level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::RngCore;

    /// Returns the same word forever
    struct FixedRng(u32);

    impl RngCore for FixedRng {
        fn next_u32(&mut self) -> u32 {
            self.0
        }

        fn next_u64(&mut self) -> u64 {
            ((self.0 as u64) << 32) | self.0 as u64
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            for chunk in dst.chunks_mut(4) {
                let bytes = self.0.to_le_bytes();
                chunk.copy_from_slice(&bytes[..chunk.len()]);
            }
        }
    }

    #[test]
    fn test_new_state() {
        let state = GameState::new(7);
        assert!(state.is_running());
        assert_eq!(state.vehicle.x, VEHICLE_START_X);
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_moves_clamp_at_road_edges() {
        let mut state = GameState::new(1);
        for _ in 0..20 {
            state.move_left();
        }
        assert_eq!(state.vehicle.x, VEHICLE_MIN_X);

        for _ in 0..20 {
            state.move_right();
        }
        assert_eq!(state.vehicle.x, VEHICLE_MAX_X);
    }

    #[test]
    fn test_moves_ignored_when_paused_or_over() {
        let mut state = GameState::new(1);
        state.toggle_pause();
        state.move_left();
        state.move_right();
        assert_eq!(state.vehicle.x, VEHICLE_START_X);

        state.toggle_pause();
        state.crash();
        state.move_left();
        assert_eq!(state.vehicle.x, VEHICLE_START_X);
    }

    #[test]
    fn test_spawn_only_while_running() {
        let mut state = GameState::new(3);
        assert!(state.spawn_obstacle());
        assert_eq!(state.obstacles.len(), 1);

        state.toggle_pause();
        assert!(!state.spawn_obstacle());
        state.toggle_pause();
        state.crash();
        assert!(!state.spawn_obstacle());
        assert_eq!(state.obstacles.len(), 1);
    }

    #[test]
    fn test_spawn_with_injected_rng() {
        let mut state = GameState::new(0);
        // All-zero bits roll 0.0, the leftmost spawn position
        assert!(state.spawn_obstacle_with(&mut FixedRng(0)));
        assert_eq!(state.obstacles[0], Obstacle::new(ROAD_LEFT, OBSTACLE_SPAWN_Y));

        // All-one bits roll just under 1.0
        assert!(state.spawn_obstacle_with(&mut FixedRng(u32::MAX)));
        let x = state.obstacles[1].pos.x;
        assert!(x < ROAD_LEFT + OBSTACLE_SPAWN_SPAN);
        assert!(x > ROAD_LEFT + OBSTACLE_SPAWN_SPAN - 0.01);
    }

    #[test]
    fn test_spawn_positions_stay_on_road() {
        let mut state = GameState::new(42);
        for _ in 0..200 {
            state.spawn_obstacle();
        }
        for obstacle in &state.obstacles {
            assert!(obstacle.pos.x >= ROAD_LEFT);
            assert!(obstacle.pos.x < ROAD_LEFT + OBSTACLE_SPAWN_SPAN);
            assert!(obstacle.pos.x + OBSTACLE_WIDTH <= ROAD_LEFT + ROAD_WIDTH);
            assert_eq!(obstacle.pos.y, OBSTACLE_SPAWN_Y);
        }
    }

    #[test]
    fn test_same_seed_same_spawns() {
        let mut a = GameState::new(99);
        let mut b = GameState::new(99);
        for _ in 0..10 {
            a.spawn_obstacle();
            b.spawn_obstacle();
        }
        assert_eq!(a.obstacles, b.obstacles);
    }

    #[test]
    fn test_toggle_pause_twice_is_identity() {
        let mut state = GameState::new(5);
        state.spawn_obstacle();
        state.move_left();
        state.spawn_clock.elapsed_ms = 800.0;

        // Everything but the spawn period's progress survives a pause round trip
        let mut expected = state.clone();
        expected.spawn_clock.elapsed_ms = 0.0;
        let expected = serde_json::to_string(&expected).unwrap();

        state.toggle_pause();
        assert!(state.is_paused());
        state.toggle_pause();
        assert!(state.is_running());
        assert_eq!(serde_json::to_string(&state).unwrap(), expected);
    }

    #[test]
    fn test_pause_and_resume_rearm_spawn_clock() {
        let mut state = GameState::new(5);
        state.spawn_clock.elapsed_ms = 1600.0;
        state.toggle_pause();
        assert_eq!(state.spawn_clock, SpawnClock::new(1));

        state.spawn_clock.elapsed_ms = 1600.0;
        state.toggle_pause();
        assert!(state.is_running());
        assert_eq!(state.spawn_clock, SpawnClock::new(1));
    }

    #[test]
    fn test_crash_rearms_spawn_clock() {
        let mut state = GameState::new(5);
        state.spawn_clock.elapsed_ms = 1200.0;
        state.crash();
        assert_eq!(state.spawn_clock.elapsed_ms, 0.0);
    }

    #[test]
    fn test_toggle_pause_ignored_after_game_over() {
        let mut state = GameState::new(5);
        state.crash();
        state.toggle_pause();
        assert!(state.is_game_over());
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut state = GameState::new(11);
        state.move_right();
        state.spawn_obstacle();
        state.score = 12;
        state.level = 3;
        state.last_level_up_score = 10;
        state.crash();
        state.spawn_clock.elapsed_ms = 700.0;

        state.restart();
        assert_eq!(state.spawn_clock, SpawnClock::new(1));
        assert_eq!(state.vehicle.x, VEHICLE_START_X);
        assert!(state.obstacles.is_empty());
        assert!(state.is_running());
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.last_level_up_score, 0);
    }

    #[test]
    fn test_restart_from_pause() {
        let mut state = GameState::new(11);
        state.toggle_pause();
        state.restart();
        assert!(state.is_running());
    }

    #[test]
    fn test_level_up_once_per_crossing() {
        let mut state = GameState::new(0);
        state.score = 5;
        assert!(state.apply_level_ups());
        assert_eq!(state.level, 2);
        assert!(!state.apply_level_ups());
        assert_eq!(state.level, 2);

        // Jumping over a multiple still counts it
        state.score = 11;
        assert!(state.apply_level_ups());
        assert_eq!(state.level, 3);
    }

    proptest! {
        #[test]
        fn prop_moves_stay_in_range(
            start in 0u32..=10,
            moves in proptest::collection::vec(any::<bool>(), 0..64),
        ) {
            let mut state = GameState::new(0);
            state.vehicle.x = VEHICLE_MIN_X + start as f32 * VEHICLE_STEP;
            for left in moves {
                if left {
                    state.move_left();
                } else {
                    state.move_right();
                }
                prop_assert!(state.vehicle.x >= VEHICLE_MIN_X);
                prop_assert!(state.vehicle.x <= VEHICLE_MAX_X);
            }
        }

        #[test]
        fn prop_off_grid_moves_stay_in_range(start in 50.0f32..=250.0, left in any::<bool>()) {
            let mut state = GameState::new(0);
            state.vehicle.x = start;
            if left {
                state.move_left();
            } else {
                state.move_right();
            }
            prop_assert!(state.vehicle.x >= VEHICLE_MIN_X);
            prop_assert!(state.vehicle.x <= VEHICLE_MAX_X);
        }
    }
}
