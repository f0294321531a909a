//! Axis-aligned rectangle collision
//!
//! The only physics primitive the arcade needs: paddles, the ball and the
//! arena walls are all boxes aligned to the canvas axes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned box anchored at its top-left corner (canvas coordinates, y down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    pub fn left(&self) -> f32 {
        self.pos.x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Closed-interval overlap: touching edges count as contact
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() <= other.right()
            && other.left() <= self.right()
            && self.top() <= other.bottom()
            && other.top() <= self.bottom()
    }

    /// True when `other` lies entirely inside this box
    pub fn contains(&self, other: &Rect) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }
}

/// Result of a box-vs-box contact check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Whether the boxes touch
    pub hit: bool,
    /// Vertical offset of the mover's center from the target's center,
    /// normalized to [-1, 1] by the target's half height
    pub offset: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            offset: 0.0,
        }
    }
}

/// Check a moving box against a paddle-like target.
///
/// The returned offset drives angled returns: hitting the top edge of a
/// paddle yields -1, the bottom edge 1, dead center 0.
pub fn box_contact(mover: &Rect, target: &Rect) -> CollisionResult {
    if !mover.intersects(target) {
        return CollisionResult::miss();
    }
    let half = target.size.y * 0.5;
    let offset = if half > 0.0 {
        ((mover.center().y - target.center().y) / half).clamp(-1.0, 1.0)
    } else {
        0.0
    };
    CollisionResult { hit: true, offset }
}
