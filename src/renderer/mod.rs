//! Drawing collaborator
//!
//! The renderer only ever reads simulation state. `draw_board` walks a
//! `SimState` and issues primitive draw calls; the backend decides how.

use glam::Vec2;

use crate::consts::{BALL_RADIUS, DROPPER_RADIUS};
use crate::sim::SimState;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

/// A 2D drawing surface
pub trait Renderer {
    /// Drawable size in px
    fn size(&self) -> Vec2;

    /// Wipe the surface
    fn clear(&mut self);

    /// A segment with small markers on both endpoints
    fn draw_line(&mut self, from: Vec2, to: Vec2);

    /// A circle, outlined if `stroke` else filled
    fn draw_circle(&mut self, centre: Vec2, radius: f32, stroke: bool);

    /// Client (page) coordinates to canvas coordinates
    fn translate_pointer(&self, client_x: f32, client_y: f32) -> Vec2;
}

/// Draw one frame: draft line, lines, droppers (outlined), balls (filled)
pub fn draw_board(state: &SimState, renderer: &mut dyn Renderer) {
    renderer.clear();

    if let Some((from, to)) = state.current_line {
        renderer.draw_line(from, to);
    }

    for line in &state.board.lines {
        renderer.draw_line(line.from(), line.to());
    }

    for dropper in &state.board.droppers {
        renderer.draw_circle(dropper.pos, DROPPER_RADIUS, true);
    }

    for ball in &state.board.balls {
        renderer.draw_circle(ball.pos, BALL_RADIUS, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Ball, Dropper, LineSegment};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Clear,
        Line(Vec2, Vec2),
        Circle(Vec2, f32, bool),
    }

    /// Renderer double that records draw calls
    struct RecordingRenderer {
        size: Vec2,
        offset: Vec2,
        calls: Vec<Call>,
    }

    impl RecordingRenderer {
        fn new() -> Self {
            Self {
                size: Vec2::new(400.0, 700.0),
                offset: Vec2::new(8.0, 16.0),
                calls: Vec::new(),
            }
        }
    }

    impl Renderer for RecordingRenderer {
        fn size(&self) -> Vec2 {
            self.size
        }

        fn clear(&mut self) {
            self.calls.push(Call::Clear);
        }

        fn draw_line(&mut self, from: Vec2, to: Vec2) {
            self.calls.push(Call::Line(from, to));
        }

        fn draw_circle(&mut self, centre: Vec2, radius: f32, stroke: bool) {
            self.calls.push(Call::Circle(centre, radius, stroke));
        }

        fn translate_pointer(&self, client_x: f32, client_y: f32) -> Vec2 {
            Vec2::new(client_x, client_y) - self.offset
        }
    }

    #[test]
    fn test_draws_everything_in_order() {
        let mut renderer = RecordingRenderer::new();
        let mut state = SimState::new(renderer.size());
        state.board.droppers = vec![Dropper::at(Vec2::new(10.0, 10.0))];
        state
            .board
            .lines
            .push(LineSegment::new(Vec2::new(10.0, 10.0), Vec2::new(20.0, 20.0)));
        state.board.balls.push(Ball::at(Vec2::new(10.0, 0.0)));
        state.current_line = Some((Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0)));

        draw_board(&state, &mut renderer);

        assert_eq!(
            renderer.calls,
            vec![
                Call::Clear,
                Call::Line(Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0)),
                Call::Line(Vec2::new(10.0, 10.0), Vec2::new(20.0, 20.0)),
                Call::Circle(Vec2::new(10.0, 10.0), 4.0, true),
                Call::Circle(Vec2::new(10.0, 0.0), 4.0, false),
            ]
        );
    }

    #[test]
    fn test_drawing_does_not_touch_state() {
        let mut renderer = RecordingRenderer::new();
        let state = SimState::new(renderer.size());
        let before = state.board.clone();
        draw_board(&state, &mut renderer);
        assert_eq!(state.board, before);
    }
}
