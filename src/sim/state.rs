//! Board entities and the simulation context
//!
//! `SimState` owns everything the simulation mutates. Collaborators
//! (renderer, sampler) are not stored here; they are passed in by the host.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::history::{History, UndoPoint};
use super::segment::LineSegment;
use super::vector::{Vec2Def, VecExt};
use crate::settings::{SimParams, Voice};

/// A falling ball. Units are px, px/ms and px/ms².
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub acc: Vec2,
}

impl Ball {
    /// A ball at rest at `pos`
    pub fn at(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            acc: Vec2::ZERO,
        }
    }
}

/// A fixed emitter that drops a ball whenever its timer runs out
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dropper {
    pub pos: Vec2,
    /// Milliseconds until the next drop; non-positive means drop now
    pub timeout: f32,
}

impl Dropper {
    /// A dropper that fires on the next update
    pub fn at(pos: Vec2) -> Self {
        Self { pos, timeout: 0.0 }
    }

    pub fn serialize(&self) -> SerializedDropper {
        SerializedDropper {
            pos: self.pos.into(),
            timeout: self.timeout,
        }
    }

    pub fn deserialize(d: &SerializedDropper) -> Self {
        Self {
            pos: d.pos.into(),
            timeout: d.timeout,
        }
    }
}

/// Wire form of a dropper
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SerializedDropper {
    pub pos: Vec2Def,
    pub timeout: f32,
}

/// Live board geometry and particles
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Board {
    pub lines: Vec<LineSegment>,
    pub droppers: Vec<Dropper>,
    pub balls: Vec<Ball>,
}

impl Board {
    /// A fresh board: one dropper centred horizontally, a quarter of the way down
    pub fn with_default_dropper(canvas: Vec2) -> Self {
        Self {
            lines: Vec::new(),
            droppers: vec![Dropper::at(default_dropper_pos(canvas))],
            balls: Vec::new(),
        }
    }
}

/// Where a new or cleared board puts its dropper
pub fn default_dropper_pos(canvas: Vec2) -> Vec2 {
    Vec2::new(canvas.x / 2.0, canvas.y / 4.0)
}

/// A user edit, queued and applied at the end of the next tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Edit {
    /// Commit a line; `to` is clamped to the canvas
    AddLine { from: Vec2, to: Vec2 },
    /// Place a dropper
    AddDropper(Vec2),
    /// Remove everything and start over with the default dropper
    Clear,
    /// Restore the geometry from before the most recent edit
    Undo,
}

/// Complete simulation context
#[derive(Debug, Clone)]
pub struct SimState {
    /// Gravity and drop interval
    pub params: SimParams,
    /// Instrument and scale used for bounce notes
    pub voice: Voice,
    /// Canvas size; balls outside `[0, canvas]` are removed
    pub canvas: Vec2,
    /// Lines, droppers and balls
    pub board: Board,
    /// Line being dragged out, not yet part of the board
    pub current_line: Option<(Vec2, Vec2)>,
    /// Undo points, most recent last
    pub(crate) history: History,
    /// Edits waiting for the end of the next tick
    pub(crate) pending: VecDeque<Edit>,
}

impl SimState {
    /// A new board for a canvas of the given size
    pub fn new(canvas: Vec2) -> Self {
        Self {
            params: SimParams::default(),
            voice: Voice::default(),
            canvas,
            board: Board::with_default_dropper(canvas),
            current_line: None,
            history: History::default(),
            pending: VecDeque::new(),
        }
    }

    /// Queue an edit. It is applied after the next tick has advanced every ball.
    pub fn submit(&mut self, edit: Edit) {
        log::debug!("Queued edit: {:?}", edit);
        self.pending.push_back(edit);
    }

    /// Queue an undo of the most recent edit
    pub fn request_undo(&mut self) {
        self.submit(Edit::Undo);
    }

    /// Edits not applied yet
    pub fn pending_edits(&self) -> usize {
        self.pending.len()
    }

    /// Undo points available
    pub fn undo_depth(&self) -> usize {
        self.history.len()
    }

    /// Canvas resized by the host
    pub fn resize(&mut self, canvas: Vec2) {
        self.canvas = canvas;
    }

    /// Deep copy of the current geometry
    pub fn capture_snapshot(&self) -> UndoPoint {
        UndoPoint::capture(&self.board)
    }

    /// Replace lines and droppers wholesale with copies from `point`.
    /// Balls, parameters and voice are left alone.
    pub fn restore(&mut self, point: &UndoPoint) {
        self.board.lines = point.lines.iter().map(LineSegment::deserialize).collect();
        self.board.droppers = point.droppers.iter().map(Dropper::deserialize).collect();
    }

    /// Apply all queued edits in order
    pub(crate) fn apply_pending(&mut self) {
        while let Some(edit) = self.pending.pop_front() {
            self.apply(edit);
        }
    }

    fn apply(&mut self, edit: Edit) {
        match edit {
            Edit::AddLine { from, to } => {
                let line = LineSegment::new(from, to.clamp_to_bounds(self.canvas));
                if line.is_degenerate() {
                    log::debug!("Ignoring zero-length line at {:?}", from);
                    return;
                }
                let point = self.capture_snapshot();
                self.history.push(point);
                self.board.lines.push(line);
            }
            Edit::AddDropper(pos) => {
                let point = self.capture_snapshot();
                self.history.push(point);
                self.board.droppers.push(Dropper::at(pos));
            }
            Edit::Clear => {
                let point = self.capture_snapshot();
                self.history.push(point);
                self.board = Board::with_default_dropper(self.canvas);
            }
            Edit::Undo => match self.history.pop() {
                Some(point) => {
                    self.restore(&point);
                    log::debug!("Undo: {} undo points left", self.history.len());
                }
                None => log::debug!("Undo with empty history ignored"),
            },
        }
    }
}
