//! Axis-aligned collision predicates
//!
//! Everything the simulation tests is either a rectangle (player, platforms)
//! or a circle (coins), so two predicates cover all contact queries.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle. Y grows downward, canvas convention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strict AABB intersection on both axes (edge-touch is not overlap).
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Landing-contact predicate: does `platform` hold up `player`?
///
/// True when the horizontal extents overlap and the player's bottom edge lies
/// within the platform slab, `[top, top + h]`. Exact edge-touch
/// (`bottom == top`) counts as contact. The caller decides what contact means:
/// landing requires downward motion, spike contact does not.
pub fn supports(platform: &Rect, player: &Rect) -> bool {
    player.x < platform.right()
        && player.right() > platform.x
        && player.bottom() >= platform.top()
        && player.bottom() <= platform.bottom()
}

/// Rectangle/circle intersection via the closest point on the rectangle to
/// the circle's center; true iff the squared distance is within r².
pub fn rect_intersects_circle(rect: &Rect, center: Vec2, radius: f32) -> bool {
    let closest = Vec2::new(
        center.x.clamp(rect.left(), rect.right()),
        center.y.clamp(rect.top(), rect.bottom()),
    );
    (center - closest).length_squared() <= radius * radius
}
