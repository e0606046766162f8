//! Plain rectangle math shared by the selector and the resolver.
//!
//! Nothing here knows which coordinate space a [`Rect`] lives in; callers
//! are responsible for never comparing rectangles from different spaces.

use serde::{Deserialize, Serialize};

/// Largest per-field difference at which two frames still describe the
/// same window. Relayout and repaint shift frames by a few points.
pub const FRAME_TOLERANCE: f64 = 8.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self { Self { x, y } }

    pub fn distance_squared(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn min_x(&self) -> f64 { self.x }

    pub fn max_x(&self) -> f64 { self.x + self.width }

    pub fn min_y(&self) -> f64 { self.y }

    pub fn max_y(&self) -> f64 { self.y + self.height }

    pub fn is_empty(&self) -> bool { self.width <= 0.0 || self.height <= 0.0 }

    /// True when every field of `self` is within `tolerance` of `other`,
    /// bounds included.
    pub fn approx_eq(&self, other: &Rect, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance
            && (self.y - other.y).abs() <= tolerance
            && (self.width - other.width).abs() <= tolerance
            && (self.height - other.height).abs() <= tolerance
    }
}

fn overlap(a_min: f64, a_max: f64, b_min: f64, b_max: f64) -> f64 {
    (a_max.min(b_max) - a_min.max(b_min)).max(0.0)
}

/// Length of the shared y-range of `a` and `b`; `0.0` when disjoint.
pub fn vertical_overlap(a: &Rect, b: &Rect) -> f64 {
    overlap(a.min_y(), a.max_y(), b.min_y(), b.max_y())
}

/// Length of the shared x-range of `a` and `b`; `0.0` when disjoint.
pub fn horizontal_overlap(a: &Rect, b: &Rect) -> f64 {
    overlap(a.min_x(), a.max_x(), b.min_x(), b.max_x())
}
