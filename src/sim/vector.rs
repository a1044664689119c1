//! 2D vector helpers on top of `glam::Vec2`
//!
//! glam already provides the arithmetic (`+`, `-`, `* k`, `dot`, `length`,
//! `distance`). This module adds the few operations the board needs with
//! exact semantics, and a serde proxy so vectors go over the wire as
//! `{ "x": .., "y": .. }` rather than glam's tuple form.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Board-specific vector operations. All of them return new values.
pub trait VecExt: Sized {
    /// Unit vector in the same direction, or zero when the magnitude is
    /// exactly zero.
    fn normalized(self) -> Self;

    /// Clamp each axis independently to `[0, max.axis]`.
    fn clamp_to_bounds(self, max: Self) -> Self;

    /// True if either axis lies strictly outside `[lower.axis, upper.axis]`.
    fn is_outside(self, lower: Self, upper: Self) -> bool;
}

impl VecExt for Vec2 {
    fn normalized(self) -> Self {
        let mag = self.length();
        if mag == 0.0 {
            return Vec2::ZERO;
        }
        self / mag
    }

    fn clamp_to_bounds(self, max: Self) -> Self {
        Vec2::new(self.x.min(max.x).max(0.0), self.y.min(max.y).max(0.0))
    }

    fn is_outside(self, lower: Self, upper: Self) -> bool {
        let x_out = self.x < lower.x || self.x > upper.x;
        let y_out = self.y < lower.y || self.y > upper.y;
        x_out || y_out
    }
}

/// Three-way sign: -1, 0 or 1. Both zeroes map to 0.
#[inline]
pub fn sign(v: f32) -> i8 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

/// Serde proxy for Vec2
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2Def {
    pub x: f32,
    pub y: f32,
}

impl From<Vec2> for Vec2Def {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<Vec2Def> for Vec2 {
    fn from(def: Vec2Def) -> Self {
        Vec2::new(def.x, def.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_magnitude_and_distance() {
        assert_eq!(Vec2::new(3.0, 4.0).length(), 5.0);
        assert_eq!(Vec2::ZERO.distance(Vec2::new(3.0, 4.0)), 5.0);
    }

    #[test]
    fn test_normalized_zero_is_zero() {
        assert_eq!(Vec2::ZERO.normalized(), Vec2::ZERO);
        let n = Vec2::new(0.0, -7.0).normalized();
        assert_eq!(n, Vec2::new(0.0, -1.0));
    }

    #[test]
    fn test_clamp_to_bounds() {
        let max = Vec2::new(400.0, 700.0);
        assert_eq!(Vec2::new(-5.0, 900.0).clamp_to_bounds(max), Vec2::new(0.0, 700.0));
        assert_eq!(Vec2::new(10.0, 20.0).clamp_to_bounds(max), Vec2::new(10.0, 20.0));
    }

    #[test]
    fn test_is_outside() {
        let p = Vec2::new(10.0, 10.0);
        assert!(p.is_outside(Vec2::new(20.0, 20.0), Vec2::new(30.0, 30.0)));
        assert!(!p.is_outside(Vec2::ZERO, Vec2::new(30.0, 30.0)));
        // Boundary-equal is inside
        assert!(!p.is_outside(p, p));
    }

    #[test]
    fn test_sign_treats_negative_zero_as_zero() {
        assert_eq!(sign(-0.0), 0);
        assert_eq!(sign(0.0), 0);
        assert_eq!(sign(1e-30), 1);
        assert_eq!(sign(-3.0), -1);
    }

    #[test]
    fn test_vec2_wire_format() {
        let json = serde_json::to_string(&Vec2Def::from(Vec2::new(1.5, -2.0))).unwrap();
        assert_eq!(json, r#"{"x":1.5,"y":-2.0}"#);
    }

    proptest! {
        #[test]
        fn prop_is_outside_matches_closed_interval(
            x in -50.0f32..150.0,
            y in -50.0f32..150.0,
        ) {
            let lower = Vec2::ZERO;
            let upper = Vec2::new(100.0, 100.0);
            let inside = (0.0..=100.0).contains(&x) && (0.0..=100.0).contains(&y);
            prop_assert_eq!(Vec2::new(x, y).is_outside(lower, upper), !inside);
        }

        #[test]
        fn prop_clamped_point_is_never_outside(x in -1e4f32..1e4, y in -1e4f32..1e4) {
            let max = Vec2::new(400.0, 700.0);
            prop_assert!(!Vec2::new(x, y).clamp_to_bounds(max).is_outside(Vec2::ZERO, max));
        }
    }
}
