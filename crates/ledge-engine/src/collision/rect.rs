//! Collision geometry.
//!
//! World coordinates are pixels with +y pointing down, so `top` is the
//! smaller y value and a falling sprite has positive `vel.y`.

use glam::Vec2;

/// Axis-aligned collision rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl ColRect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            w: size.x,
            h: size.y,
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            x: self.x + delta.x,
            y: self.y + delta.y,
            ..*self
        }
    }

    /// Grow symmetrically around the center. Negative amounts shrink.
    pub fn grown(&self, grow_w: f32, grow_h: f32) -> Self {
        Self {
            x: self.x - grow_w / 2.0,
            y: self.y - grow_h / 2.0,
            w: self.w + grow_w,
            h: self.h + grow_h,
        }
    }

    /// Strict overlap test: rectangles that merely touch along an edge
    /// do not intersect. Degenerate (zero or negative size) rectangles
    /// never intersect anything.
    pub fn intersects(&self, other: &ColRect) -> bool {
        self.right() > other.left()
            && self.left() < other.right()
            && self.bottom() > other.top()
            && self.top() < other.bottom()
    }

    /// Overlap region. Width/height are zero or negative when the
    /// rectangles do not intersect.
    pub fn intersection(&self, other: &ColRect) -> ColRect {
        let x = self.left().max(other.left());
        let y = self.top().max(other.top());
        ColRect {
            x,
            y,
            w: self.right().min(other.right()) - x,
            h: self.bottom().min(other.bottom()) - y,
        }
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x < self.right() && p.y >= self.top() && p.y < self.bottom()
    }

    /// Whether `other` lies entirely inside this rectangle.
    pub fn contains_rect(&self, other: &ColRect) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }
}

/// Circle used by area-of-effect broad phase queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColCircle {
    pub center: Vec2,
    pub radius: f32,
}

impl ColCircle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn intersects_rect(&self, rect: &ColRect) -> bool {
        if rect.w <= 0.0 || rect.h <= 0.0 {
            return false;
        }
        let closest = Vec2::new(
            self.center.x.clamp(rect.left(), rect.right()),
            self.center.y.clamp(rect.top(), rect.bottom()),
        );
        self.center.distance_squared(closest) < self.radius * self.radius
    }

    pub fn intersects_circle(&self, other: &ColCircle) -> bool {
        let r = self.radius + other.radius;
        self.center.distance_squared(other.center) < r * r
    }
}

/// Which face of the struck sprite made contact, seen from the sprite the
/// direction is reported against. `Top` on a hit means the mover came down
/// onto the target; the mirrored event the target's counterpart receives
/// carries the opposite face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Top,
    Bottom,
    Left,
    Right,
    Undefined,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Top => Direction::Bottom,
            Direction::Bottom => Direction::Top,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Undefined => Direction::Undefined,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Top | Direction::Bottom)
    }
}

/// Resolve which face of `target` the moved rectangle struck.
///
/// A face counts when the mover straddles it (one edge past the face, the
/// opposite edge not yet through it) and the movement delta points into
/// it. When faces on both axes qualify, the axis with the deeper overlap
/// wins; an exact tie resolves vertically. Overlaps that straddle no face
/// (mover fully inside the target) and zero-area contacts come back
/// `Undefined`.
pub fn resolve_direction(moved: &ColRect, target: &ColRect, delta: Vec2) -> Direction {
    let inter = moved.intersection(target);
    if inter.w <= 0.0 || inter.h <= 0.0 {
        return Direction::Undefined;
    }

    let x_overlap = moved.right() > target.left() && moved.left() < target.right();
    let y_overlap = moved.bottom() > target.top() && moved.top() < target.bottom();

    // Straddle tests against each face, gated by approach direction.
    let top = x_overlap
        && delta.y >= 0.0
        && moved.bottom() > target.top()
        && moved.top() < target.top();
    let bottom = x_overlap
        && delta.y <= 0.0
        && moved.top() < target.bottom()
        && moved.bottom() > target.bottom();
    let left = y_overlap
        && delta.x >= 0.0
        && moved.right() > target.left()
        && moved.left() < target.left();
    let right = y_overlap
        && delta.x <= 0.0
        && moved.left() < target.right()
        && moved.right() > target.right();

    let vertical = match (top, bottom) {
        (true, false) => Some(Direction::Top),
        (false, true) => Some(Direction::Bottom),
        // Mover spans the target vertically; pick the face its center
        // sits beyond.
        (true, true) => {
            if moved.center().y <= target.center().y {
                Some(Direction::Top)
            } else {
                Some(Direction::Bottom)
            }
        }
        (false, false) => None,
    };
    let horizontal = match (left, right) {
        (true, false) => Some(Direction::Left),
        (false, true) => Some(Direction::Right),
        (true, true) => {
            if moved.center().x <= target.center().x {
                Some(Direction::Left)
            } else {
                Some(Direction::Right)
            }
        }
        (false, false) => None,
    };

    match (vertical, horizontal) {
        (Some(v), None) => v,
        (None, Some(h)) => h,
        (Some(v), Some(h)) => {
            if inter.h >= inter.w {
                v
            } else {
                h
            }
        }
        (None, None) => Direction::Undefined,
    }
}
