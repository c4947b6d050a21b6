//! Fixed timestep simulation tick
//!
//! `tick` is the per-frame world advance. `step` is what the host calls once per
//! fixed timestep: it applies queued commands, ticks, then runs the spawn clock.

use super::collision::find_collision;
use super::state::GameState;
use crate::consts::*;

/// Discrete player intents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    TogglePause,
    Restart,
}

/// Input for a single step (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Commands received since the last step, in arrival order
    pub commands: Vec<Command>,
    /// Idle/demo mode - the autopilot steers
    pub idle_mode: bool,
}

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Obstacles that scrolled off the bottom and scored
    pub cleared: u32,
    /// New level, if one was reached this tick
    pub level_up: Option<u32>,
    pub crashed: bool,
    /// Obstacles spawned by the spawn clock during this step
    pub spawned: u32,
}

/// Autopilot re-evaluates every this many ticks
const AUTOPILOT_PERIOD: u64 = 6;
/// How far above the vehicle the autopilot looks for trouble
const AUTOPILOT_LOOKAHEAD: f32 = 220.0;

/// Apply one command to the state
pub fn apply_command(state: &mut GameState, command: Command) {
    match command {
        Command::MoveLeft => state.move_left(),
        Command::MoveRight => state.move_right(),
        Command::TogglePause => state.toggle_pause(),
        Command::Restart => {
            state.restart();
            log::info!("Run restarted");
        }
    }
}

/// Advance the world by one frame. No-op unless running.
pub fn tick(state: &mut GameState) -> TickReport {
    let mut report = TickReport::default();
    if !state.is_running() {
        return report;
    }
    state.time_ticks += 1;

    let fall = state.fall_speed();
    for obstacle in &mut state.obstacles {
        obstacle.pos.y += fall;
    }

    // Each obstacle scores exactly once, as it leaves
    let before = state.obstacles.len();
    state.obstacles.retain(|o| !o.is_off_screen());
    let cleared = (before - state.obstacles.len()) as u32;
    state.score += cleared;
    report.cleared = cleared;

    if state.apply_level_ups() {
        log::info!(
            "Level {} reached at score {} (spawn every {} ms)",
            state.level,
            state.score,
            state.spawn_clock.interval_ms
        );
        report.level_up = Some(state.level);
    }

    if let Some(index) = find_collision(&state.vehicle, &state.obstacles) {
        log::info!(
            "Crash into obstacle at {:?}: score {}, level {}",
            state.obstacles[index].pos,
            state.score,
            state.level
        );
        state.crash();
        report.crashed = true;
    }

    report
}

/// Advance the game state by one fixed timestep of `dt` seconds
pub fn step(state: &mut GameState, input: &TickInput, dt: f32) -> TickReport {
    for &command in &input.commands {
        apply_command(state, command);
    }

    if input.idle_mode && state.time_ticks % AUTOPILOT_PERIOD == 0 {
        if let Some(command) = autopilot(state) {
            apply_command(state, command);
        }
    }

    let mut report = tick(state);

    if state.is_running() {
        let due = state.spawn_clock.advance(dt * 1000.0);
        for _ in 0..due {
            if state.spawn_obstacle() {
                report.spawned += 1;
            }
        }
    }

    report
}

/// Pick a steering command that dodges the closest obstacle bearing down on
/// the vehicle's column
pub fn autopilot(state: &GameState) -> Option<Command> {
    if !state.is_running() {
        return None;
    }

    let car = state.vehicle.rect();
    let car_max = car.max();
    let threat = state
        .obstacles
        .iter()
        .filter(|o| {
            o.pos.y + OBSTACLE_HEIGHT > car.min.y - AUTOPILOT_LOOKAHEAD && o.pos.y < car_max.y
        })
        .filter(|o| {
            o.pos.x < car_max.x + VEHICLE_STEP
                && o.pos.x + OBSTACLE_WIDTH > car.min.x - VEHICLE_STEP
        })
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))?;

    let car_center = car.min.x + VEHICLE_WIDTH / 2.0;
    let threat_center = threat.pos.x + OBSTACLE_WIDTH / 2.0;

    // Swerve away from the obstacle's center unless pinned against the edge
    let go_left = if threat_center >= car_center {
        state.vehicle.x > VEHICLE_MIN_X
    } else {
        state.vehicle.x >= VEHICLE_MAX_X
    };

    Some(if go_left {
        Command::MoveLeft
    } else {
        Command::MoveRight
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Obstacle;

    /// An obstacle one tick away from scoring, out of the vehicle's lane
    fn about_to_clear() -> Obstacle {
        Obstacle::new(300.0, CANVAS_HEIGHT - 1.0)
    }

    #[test]
    fn test_tick_moves_obstacles_by_fall_speed() {
        let mut state = GameState::new(1);
        state.obstacles.push(Obstacle::new(300.0, 0.0));
        tick(&mut state);
        assert!((state.obstacles[0].pos.y - 2.3).abs() < 1e-5);

        state.level = 4;
        tick(&mut state);
        assert!((state.obstacles[0].pos.y - 5.5).abs() < 1e-5);
    }

    #[test]
    fn test_five_clears_level_up_exactly_once() {
        let mut state = GameState::new(1);
        for expected in 1..=5 {
            state.obstacles.push(about_to_clear());
            let report = tick(&mut state);
            assert_eq!(report.cleared, 1);
            assert_eq!(state.score, expected);
            assert!(state.obstacles.is_empty());
        }
        assert_eq!(state.level, 2);

        // Score stays at a multiple of five; the level must not keep climbing
        for _ in 0..30 {
            let report = tick(&mut state);
            assert_eq!(report.level_up, None);
        }
        assert_eq!(state.score, 5);
        assert_eq!(state.level, 2);
    }

    #[test]
    fn test_level_up_rearms_spawn_clock() {
        let mut state = GameState::new(1);
        state.spawn_clock.elapsed_ms = 900.0;
        state.score = 4;
        state.obstacles.push(about_to_clear());
        let report = tick(&mut state);
        assert_eq!(report.level_up, Some(2));
        assert_eq!(state.spawn_clock.interval_ms, 1400);
        assert_eq!(state.spawn_clock.elapsed_ms, 0.0);
    }

    #[test]
    fn test_cleared_obstacles_scored_once() {
        let mut state = GameState::new(1);
        state.obstacles.push(about_to_clear());
        state.obstacles.push(Obstacle::new(60.0, CANVAS_HEIGHT));
        state.obstacles.push(Obstacle::new(300.0, 100.0));
        let report = tick(&mut state);
        assert_eq!(report.cleared, 2);
        assert_eq!(state.score, 2);
        assert_eq!(state.obstacles.len(), 1);
        assert!(state.obstacles.iter().all(|o| o.pos.y < CANVAS_HEIGHT));

        tick(&mut state);
        assert_eq!(state.score, 2);
    }

    #[test]
    fn test_collision_ends_game() {
        let mut state = GameState::new(1);
        state.obstacles.push(Obstacle::new(150.0, 418.0));
        let report = tick(&mut state);
        assert!(report.crashed);
        assert!(state.is_game_over());

        // Frozen from here on
        let frozen = state.obstacles.clone();
        let report = tick(&mut state);
        assert_eq!(report, TickReport::default());
        assert_eq!(state.obstacles, frozen);
    }

    #[test]
    fn test_tick_is_noop_when_paused() {
        let mut state = GameState::new(1);
        state.obstacles.push(Obstacle::new(300.0, 10.0));
        state.toggle_pause();
        let before = serde_json::to_string(&state).unwrap();
        tick(&mut state);
        let input = TickInput {
            commands: vec![Command::MoveLeft, Command::MoveRight],
            ..Default::default()
        };
        step(&mut state, &input, 10.0);
        assert_eq!(serde_json::to_string(&state).unwrap(), before);
    }

    #[test]
    fn test_step_spawns_on_interval() {
        let mut state = GameState::new(1);
        let input = TickInput::default();
        for _ in 0..100 {
            step(&mut state, &input, SIM_DT);
        }
        assert!(state.obstacles.is_empty());

        for _ in 0..10 {
            step(&mut state, &input, SIM_DT);
        }
        assert_eq!(state.obstacles.len(), 1);
    }

    #[test]
    fn test_spawn_clock_frozen_while_paused() {
        let mut state = GameState::new(1);
        let pause = TickInput {
            commands: vec![Command::TogglePause],
            ..Default::default()
        };
        step(&mut state, &pause, SIM_DT);
        let idle = TickInput::default();
        for _ in 0..1000 {
            step(&mut state, &idle, SIM_DT);
        }
        assert!(state.obstacles.is_empty());
        assert!(state.is_paused());
    }

    #[test]
    fn test_resume_starts_fresh_spawn_period() {
        let mut state = GameState::new(1);
        state.spawn_clock.elapsed_ms = 1600.0;
        let toggle = TickInput {
            commands: vec![Command::TogglePause],
            ..Default::default()
        };
        step(&mut state, &toggle, SIM_DT);
        assert!(state.is_paused());
        step(&mut state, &toggle, 0.2);
        assert!(state.is_running());

        // 1600 ms of progress was discarded; 200 ms into a 1700 ms period
        assert!(state.obstacles.is_empty());
        assert!((state.spawn_clock.elapsed_ms - 200.0).abs() < 1e-3);
        assert_eq!(state.spawn_clock.interval_ms, 1700);
    }

    #[test]
    fn test_restart_command() {
        let mut state = GameState::new(1);
        state.obstacles.push(Obstacle::new(150.0, 418.0));
        step(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.is_game_over());

        let restart = TickInput {
            commands: vec![Command::Restart],
            ..Default::default()
        };
        step(&mut state, &restart, SIM_DT);
        assert!(state.is_running());
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
    }

    #[test]
    fn test_commands_apply_in_order() {
        let mut state = GameState::new(1);
        let input = TickInput {
            commands: vec![
                Command::MoveLeft,
                Command::MoveLeft,
                Command::TogglePause,
                Command::MoveLeft,
            ],
            ..Default::default()
        };
        step(&mut state, &input, SIM_DT);
        assert_eq!(state.vehicle.x, VEHICLE_START_X - 2.0 * VEHICLE_STEP);
        assert!(state.is_paused());
    }

    #[test]
    fn test_autopilot_swerves_away() {
        let mut state = GameState::new(1);
        assert_eq!(autopilot(&state), None);

        // Threat slightly right of the vehicle's center
        state.obstacles.push(Obstacle::new(160.0, 380.0));
        assert_eq!(autopilot(&state), Some(Command::MoveLeft));

        // Pinned at the left edge, go right instead
        state.vehicle.x = VEHICLE_MIN_X;
        state.obstacles[0] = Obstacle::new(60.0, 380.0);
        assert_eq!(autopilot(&state), Some(Command::MoveRight));

        // Far away obstacles are ignored
        state.obstacles[0] = Obstacle::new(60.0, 0.0);
        assert_eq!(autopilot(&state), None);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);

        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..3000 {
            step(&mut state1, &input, SIM_DT);
            step(&mut state2, &input, SIM_DT);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(
            serde_json::to_string(&state1).unwrap(),
            serde_json::to_string(&state2).unwrap()
        );
    }
}
