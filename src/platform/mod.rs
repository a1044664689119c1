//! Host loop helpers
//!
//! Shared by the browser and native hosts:
//! - Fixed timestep accumulator
//! - Pointer input and edit tools

pub mod input;
pub mod time;

pub use input::{Command, Editor, PointerEvent, Tool};
pub use time::FixedTimestep;
