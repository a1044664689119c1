//! Undo points
//!
//! An undo point is the board geometry in wire form, so it shares nothing
//! with the live board once captured.

use serde::{Deserialize, Serialize};

use super::segment::SerializedLine;
use super::state::{Board, SerializedDropper};

/// Lines and droppers captured before an edit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UndoPoint {
    pub lines: Vec<SerializedLine>,
    pub droppers: Vec<SerializedDropper>,
}

impl UndoPoint {
    pub fn capture(board: &Board) -> Self {
        Self {
            lines: board.lines.iter().map(|l| l.serialize()).collect(),
            droppers: board.droppers.iter().map(|d| d.serialize()).collect(),
        }
    }
}

/// Unbounded LIFO of undo points. No redo.
#[derive(Debug, Clone, Default)]
pub struct History {
    stack: Vec<UndoPoint>,
}

impl History {
    pub fn push(&mut self, point: UndoPoint) {
        self.stack.push(point);
    }

    /// Most recent point, or `None` when there is nothing to undo
    pub fn pop(&mut self) -> Option<UndoPoint> {
        self.stack.pop()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}
