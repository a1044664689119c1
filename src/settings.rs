//! User-tunable parameters
//!
//! Simulation parameters and voice selection survive undo; they change only
//! through the settings keys, a reset, or loading a share token.

use serde::{Deserialize, Serialize};

use crate::audio::{Instrument, Note, ScaleType};

/// Physics knobs the user can tune
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimParams {
    /// Gravity in px/s²
    pub gravity: f32,
    /// Milliseconds between drops for every dropper
    pub dropper_timeout: f32,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            gravity: 1.5,
            dropper_timeout: 800.0,
        }
    }
}

impl SimParams {
    /// Slider range for gravity (px/s²)
    pub const GRAVITY_RANGE: (f32, f32) = (0.01, 3.0);
    /// Slider range for the dropper delay (ms)
    pub const DROPPER_TIMEOUT_RANGE: (f32, f32) = (100.0, 2000.0);

    /// Restore the defaults
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Copy with each knob pulled into its slider range
    pub fn clamped(&self) -> Self {
        let (g_min, g_max) = Self::GRAVITY_RANGE;
        let (t_min, t_max) = Self::DROPPER_TIMEOUT_RANGE;
        Self {
            gravity: self.gravity.clamp(g_min, g_max),
            dropper_timeout: self.dropper_timeout.clamp(t_min, t_max),
        }
    }

    /// Copy shifted by the given deltas, kept inside the slider ranges
    pub fn adjusted(&self, gravity: f32, dropper_timeout: f32) -> Self {
        Self {
            gravity: self.gravity + gravity,
            dropper_timeout: self.dropper_timeout + dropper_timeout,
        }
        .clamped()
    }

    /// Gravity converted to px/ms²
    #[inline]
    pub fn gravity_per_ms2(&self) -> f32 {
        self.gravity / 1000.0
    }
}

/// Which instrument plays and in what key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Voice {
    pub instrument: Instrument,
    pub root: Note,
    pub scale: ScaleType,
}
