//! Line segments and the moving-point collision test
//!
//! A segment stores its endpoints and a unit normal computed once at
//! construction. Collision is two sign tests against that normal and the
//! segment direction, so vertical and near-vertical segments need no
//! special casing and nothing is ever divided by a slope.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::vector::{VecExt, Vec2Def, sign};

/// Wire form of a segment: endpoints only, the normal is derived.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SerializedLine {
    pub from: Vec2Def,
    pub to: Vec2Def,
}

/// An immutable edge balls bounce off
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    from: Vec2,
    to: Vec2,
    /// `normalize(-dy, dx)` of `to - from`
    normal: Vec2,
}

impl LineSegment {
    pub fn new(from: Vec2, to: Vec2) -> Self {
        let dir = to - from;
        Self {
            from,
            to,
            normal: Vec2::new(-dir.y, dir.x).normalized(),
        }
    }

    #[inline]
    pub fn from(&self) -> Vec2 {
        self.from
    }

    #[inline]
    pub fn to(&self) -> Vec2 {
        self.to
    }

    #[inline]
    pub fn normal(&self) -> Vec2 {
        self.normal
    }

    /// Direction vector `to - from` (not normalized)
    #[inline]
    pub fn direction(&self) -> Vec2 {
        self.to - self.from
    }

    /// Zero-length segments have no normal and can never be hit
    pub fn is_degenerate(&self) -> bool {
        self.from == self.to
    }

    /// Specular reflection: keep the tangential component, invert the
    /// normal one. Speed is preserved.
    #[inline]
    pub fn bounce(&self, velocity: Vec2) -> Vec2 {
        let u = self.normal * velocity.dot(self.normal);
        velocity - u - u
    }

    /// Whether the perpendicular projection of `point` falls between the
    /// two endpoints.
    pub fn spans(&self, point: Vec2) -> bool {
        let dir = self.direction();
        let from_dot = (point - self.from).dot(dir);
        let to_dot = (point - self.to).dot(dir);
        sign(from_dot) != sign(to_dot)
    }

    /// Whether moving from `pos` to `next` changes side of the infinite line.
    pub fn crosses(&self, pos: Vec2, next: Vec2) -> bool {
        let this_side = (pos - self.from).dot(self.normal);
        let next_side = (next - self.from).dot(self.normal);
        sign(this_side) != sign(next_side)
    }

    /// A point travelling `pos -> next` hits this segment within the step.
    #[inline]
    pub fn is_hit(&self, pos: Vec2, next: Vec2) -> bool {
        self.spans(pos) && self.crosses(pos, next)
    }

    /// Same segment shifted along x
    pub fn shifted_x(&self, dx: f32) -> Self {
        let offset = Vec2::new(dx, 0.0);
        Self::new(self.from + offset, self.to + offset)
    }

    pub fn serialize(&self) -> SerializedLine {
        SerializedLine {
            from: self.from.into(),
            to: self.to.into(),
        }
    }

    pub fn deserialize(line: &SerializedLine) -> Self {
        Self::new(line.from.into(), line.to.into())
    }
}
