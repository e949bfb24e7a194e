#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Frames interpolate during transitions, so everything here is `f32`.
//! Coordinates are points with origin at the top-left, y growing downward.

use serde::{Deserialize, Serialize};

/// A point in container coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The origin (0, 0).
    pub const ZERO: Point = Point::new(0.0, 0.0);

    /// Translate by (dx, dy).
    #[inline]
    #[must_use]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Linear interpolation between two points. `t` is clamped to [0, 1].
    #[must_use]
    pub fn lerp(a: Point, b: Point, t: f32) -> Point {
        let t = t.clamp(0.0, 1.0);
        Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

/// A size in points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// Create a new size.
    #[inline]
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// The zero size.
    pub const ZERO: Size = Size::new(0.0, 0.0);

    /// Check if either dimension is zero or negative.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// A rectangle for card frames, container bounds, and hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner.
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// Create a rectangle at the origin with the given size.
    #[inline]
    #[must_use]
    pub const fn from_size(size: Size) -> Self {
        Self {
            origin: Point::ZERO,
            size,
        }
    }

    /// The zero rectangle.
    pub const ZERO: Rect = Rect::new(0.0, 0.0, 0.0, 0.0);

    #[inline]
    #[must_use]
    pub fn min_x(&self) -> f32 {
        self.origin.x
    }

    #[inline]
    #[must_use]
    pub fn min_y(&self) -> f32 {
        self.origin.y
    }

    /// Right edge.
    #[inline]
    #[must_use]
    pub fn max_x(&self) -> f32 {
        self.origin.x + self.size.width
    }

    /// Bottom edge.
    #[inline]
    #[must_use]
    pub fn max_y(&self) -> f32 {
        self.origin.y + self.size.height
    }

    /// Center point.
    #[inline]
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    /// The same rectangle repositioned so its center is `center`.
    #[must_use]
    pub fn with_center(&self, center: Point) -> Rect {
        Rect {
            origin: Point::new(
                center.x - self.size.width / 2.0,
                center.y - self.size.height / 2.0,
            ),
            size: self.size,
        }
    }

    /// Translate by (dx, dy).
    #[inline]
    #[must_use]
    pub fn offset(&self, dx: f32, dy: f32) -> Rect {
        Rect {
            origin: self.origin.offset(dx, dy),
            size: self.size,
        }
    }

    /// Shrink by the given edge insets. Width/height floor at zero.
    #[must_use]
    pub fn inset(&self, insets: EdgeInsets) -> Rect {
        Rect::new(
            self.origin.x + insets.left,
            self.origin.y + insets.top,
            (self.size.width - insets.left - insets.right).max(0.0),
            (self.size.height - insets.top - insets.bottom).max(0.0),
        )
    }

    /// Check if a point is inside the rectangle (edges inclusive on
    /// top/left, exclusive on bottom/right).
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x() && p.x < self.max_x() && p.y >= self.min_y() && p.y < self.max_y()
    }

    /// Check if the rectangle has zero area.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    /// Linear interpolation between two rectangles. `t` is clamped to [0, 1].
    #[must_use]
    pub fn lerp(a: Rect, b: Rect, t: f32) -> Rect {
        let t = t.clamp(0.0, 1.0);
        Rect::new(
            a.origin.x + (b.origin.x - a.origin.x) * t,
            a.origin.y + (b.origin.y - a.origin.y) * t,
            a.size.width + (b.size.width - a.size.width) * t,
            a.size.height + (b.size.height - a.size.height) * t,
        )
    }
}

/// Edge insets for frame shrinking.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgeInsets {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
}

impl EdgeInsets {
    /// Create new insets.
    #[inline]
    #[must_use]
    pub const fn new(top: f32, left: f32, bottom: f32, right: f32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Insets with only a top component.
    #[inline]
    #[must_use]
    pub const fn top_only(top: f32) -> Self {
        Self::new(top, 0.0, 0.0, 0.0)
    }

    /// Zero on all edges.
    pub const ZERO: EdgeInsets = EdgeInsets::new(0.0, 0.0, 0.0, 0.0);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
