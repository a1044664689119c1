//! Simulation module
//!
//! Board physics and edit history. Pure and single-threaded:
//! - Fixed timestep only
//! - No rendering or platform dependencies
//! - Collaborators are passed in, never owned

pub mod history;
pub mod segment;
pub mod state;
pub mod tick;
pub mod vector;

pub use history::{History, UndoPoint};
pub use segment::{LineSegment, SerializedLine};
pub use state::{Ball, Board, Dropper, Edit, SerializedDropper, SimState, default_dropper_pos};
pub use tick::{TickStats, tick};
pub use vector::{Vec2Def, VecExt};
