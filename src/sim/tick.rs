//! Fixed timestep simulation tick
//!
//! Advances the board by one step: droppers, integration, segment
//! collisions, bounds, then queued edits.

use glam::Vec2;

use super::state::{Ball, SimState};
use super::vector::VecExt;
use crate::audio::Sampler;

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Balls created by droppers
    pub spawned: usize,
    /// Reflections (one per ball per segment hit)
    pub bounces: usize,
    /// Balls that left the canvas
    pub removed: usize,
}

impl std::ops::AddAssign for TickStats {
    fn add_assign(&mut self, other: Self) {
        self.spawned += other.spawned;
        self.bounces += other.bounces;
        self.removed += other.removed;
    }
}

/// Advance the simulation by `dt` milliseconds.
///
/// Every reflection is reported to `sampler` as it happens. Edits queued
/// with [`SimState::submit`] are applied last, once every ball has moved,
/// so the collision loop never sees a half-edited board.
pub fn tick(state: &mut SimState, sampler: &mut dyn Sampler, dt: f32) -> TickStats {
    let mut stats = TickStats::default();

    // Droppers
    let interval = state.params.dropper_timeout;
    for dropper in &mut state.board.droppers {
        dropper.timeout -= dt;
        if dropper.timeout > 0.0 {
            continue;
        }
        dropper.timeout = interval;
        state.board.balls.push(Ball::at(dropper.pos));
        stats.spawned += 1;
    }

    // px/s² -> px/ms²
    let gravity = state.params.gravity_per_ms2();
    let voice = state.voice;
    let bounds = state.canvas;
    let lines = &state.board.lines;
    let before = state.board.balls.len();

    state.board.balls.retain_mut(|ball| {
        // Semi-implicit Euler
        ball.acc = Vec2::new(0.0, gravity);
        ball.vel += ball.acc * dt;
        let mut next = ball.pos + ball.vel * dt;

        // No break after a hit: the corrected path may still cross another segment
        for line in lines {
            if line.is_hit(ball.pos, next) {
                ball.vel = line.bounce(ball.vel);
                next = ball.pos + ball.vel * dt;
                let speed = ball.vel.length();
                log::trace!("Bounce at {:?}, speed {:.3}", ball.pos, speed);
                sampler.play(speed, voice);
                stats.bounces += 1;
            }
        }

        if next.is_outside(Vec2::ZERO, bounds) {
            return false;
        }
        ball.pos = next;
        true
    });
    stats.removed = before - state.board.balls.len();

    state.apply_pending();

    stats
}
