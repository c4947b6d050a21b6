//! Shape generation for the road scene
//!
//! All positions are canvas pixels; the pipeline maps them to clip space.

use glam::Vec2;

use super::vertex::{Vertex, colors};
use crate::consts::*;
use crate::sim::{GameState, Rect};

/// Road edge line width
const EDGE_WIDTH: f32 = 4.0;
/// Lane divider dash geometry
const DASH_WIDTH: f32 = 4.0;
const DASH_LENGTH: f32 = 40.0;
const DASH_PERIOD: f32 = 80.0;
/// Road is split into three lanes
const LANE_COUNT: u32 = 3;

/// Push two triangles covering `rect`
pub fn quad(out: &mut Vec<Vertex>, rect: &Rect, color: [f32; 4]) {
    let min = rect.min;
    let max = rect.max();

    out.push(Vertex::new(min.x, min.y, color));
    out.push(Vertex::new(max.x, min.y, color));
    out.push(Vertex::new(min.x, max.y, color));

    out.push(Vertex::new(min.x, max.y, color));
    out.push(Vertex::new(max.x, min.y, color));
    out.push(Vertex::new(max.x, max.y, color));
}

fn quad_at(out: &mut Vec<Vertex>, x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) {
    quad(out, &Rect::new(Vec2::new(x, y), Vec2::new(w, h)), color);
}

/// Road surface, edge lines and scrolling lane dashes
fn road(out: &mut Vec<Vertex>, scroll: f32) {
    quad_at(out, ROAD_LEFT, 0.0, ROAD_WIDTH, CANVAS_HEIGHT, colors::ROAD);
    quad_at(out, ROAD_LEFT, 0.0, EDGE_WIDTH, CANVAS_HEIGHT, colors::ROAD_EDGE);
    quad_at(
        out,
        ROAD_LEFT + ROAD_WIDTH - EDGE_WIDTH,
        0.0,
        EDGE_WIDTH,
        CANVAS_HEIGHT,
        colors::ROAD_EDGE,
    );

    let lane_width = ROAD_WIDTH / LANE_COUNT as f32;
    let offset = scroll.rem_euclid(DASH_PERIOD);
    for lane in 1..LANE_COUNT {
        let x = ROAD_LEFT + lane as f32 * lane_width - DASH_WIDTH / 2.0;
        let mut y = offset - DASH_PERIOD;
        while y < CANVAS_HEIGHT {
            quad_at(out, x, y, DASH_WIDTH, DASH_LENGTH, colors::LANE_MARK);
            y += DASH_PERIOD;
        }
    }
}

/// Build the full frame for `state`
pub fn scene(state: &GameState, dim_overlay: bool) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(64 * 6 + state.obstacles.len() * 12);

    // Dashes move with the traffic so the road appears to scroll
    let scroll = state.time_ticks as f32 * state.fall_speed();
    road(&mut vertices, scroll);

    for obstacle in &state.obstacles {
        let body = obstacle.rect();
        quad(&mut vertices, &body, colors::OBSTACLE);
        quad_at(
            &mut vertices,
            body.min.x,
            body.min.y + OBSTACLE_HEIGHT / 2.0 - 5.0,
            OBSTACLE_WIDTH,
            10.0,
            colors::OBSTACLE_STRIPE,
        );
    }

    let car = state.vehicle.rect();
    quad(&mut vertices, &car, colors::VEHICLE);
    quad_at(
        &mut vertices,
        car.min.x + 8.0,
        car.min.y + 14.0,
        VEHICLE_WIDTH - 16.0,
        16.0,
        colors::WINDSHIELD,
    );

    if dim_overlay && !state.is_running() {
        quad_at(&mut vertices, 0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT, colors::OVERLAY);
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Obstacle;

    #[test]
    fn test_quad_covers_rect() {
        let mut out = Vec::new();
        quad_at(&mut out, 10.0, 20.0, 30.0, 40.0, colors::ROAD);
        assert_eq!(out.len(), 6);
        assert_eq!(out[0].position, [10.0, 20.0]);
        assert_eq!(out[5].position, [40.0, 60.0]);
    }

    #[test]
    fn test_each_obstacle_adds_two_quads() {
        let mut state = GameState::new(1);
        let empty = scene(&state, true).len();
        state.obstacles.push(Obstacle::new(100.0, 100.0));
        state.obstacles.push(Obstacle::new(250.0, 300.0));
        assert_eq!(scene(&state, true).len(), empty + 24);
    }

    #[test]
    fn test_overlay_only_when_stopped_and_enabled() {
        let mut state = GameState::new(1);
        let running = scene(&state, true).len();

        state.toggle_pause();
        assert_eq!(scene(&state, true).len(), running + 6);
        assert_eq!(scene(&state, false).len(), running);
        assert_eq!(scene(&state, true).last().unwrap().color, colors::OVERLAY);
    }

    #[test]
    fn test_vehicle_drawn_at_its_position() {
        let mut state = GameState::new(1);
        state.move_left();
        let vertices = scene(&state, true);
        let x = state.vehicle.x;
        assert!(vertices.iter().any(|v| v.position == [x, VEHICLE_Y] && v.color == colors::VEHICLE));
    }
}
