//! Line and rectangle math in screen space.
//!
//! Screen space is y-down. Angles are measured clockwise (as seen on screen)
//! from the positive x-axis and fall in `[0, 2π)`. The "above" side of a
//! directed line is the side a point lands on when it is left of the
//! direction of travel as drawn; [`signed_offset`] is positive there and
//! [`translate_perpendicular`] with a positive distance moves toward it.
//!
//! Every function returns a new value. Zero-length lines are handled by
//! returning the input unchanged (or `0.0` for measurements).

use std::f64::consts::TAU;

use glam::{dvec2, DVec2};

/// A point in screen space.
pub type Point = DVec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub start: Point,
    pub end: Point,
}

impl Line {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        distance(self.start, self.end)
    }

    pub fn midpoint(&self) -> Point {
        (self.start + self.end) * 0.5
    }

    pub fn is_degenerate(&self) -> bool {
        self.length() <= f64::EPSILON
    }

    pub fn bounds(&self) -> Rect {
        Rect {
            min: self.start.min(self.end),
            max: self.start.max(self.end),
        }
    }

    /// Unit normal pointing to the "above" side, `None` for a zero-length line.
    fn unit_normal(&self) -> Option<DVec2> {
        let d = self.end - self.start;
        let len = d.length();
        if len <= f64::EPSILON {
            return None;
        }
        Some(dvec2(d.y, -d.x) / len)
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    pub fn new(min: Point, max: Point) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn from_origin_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(dvec2(x, y), dvec2(x + width, y + height))
    }

    pub fn from_center_size(center: Point, width: f64, height: f64) -> Self {
        let half = dvec2(width, height) * 0.5;
        Self::new(center - half, center + half)
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        (self.min + self.max) * 0.5
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Grows the rectangle by `amount` on every side.
    pub fn expand(&self, amount: f64) -> Rect {
        Rect::new(self.min - DVec2::splat(amount), self.max + DVec2::splat(amount))
    }

    /// Strict interior test; points on the boundary are outside.
    pub fn contains(&self, p: Point) -> bool {
        p.x > self.min.x && p.x < self.max.x && p.y > self.min.y && p.y < self.max.y
    }

    /// Closed containment of another rectangle.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.min.x >= self.min.x
            && other.min.y >= self.min.y
            && other.max.x <= self.max.x
            && other.max.y <= self.max.y
    }
}

pub fn distance(p1: Point, p2: Point) -> f64 {
    p1.distance(p2)
}

/// Direction of the segment `p1 → p2` in `[0, 2π)`; `0.0` when the points coincide.
pub fn angle(p1: Point, p2: Point) -> f64 {
    let d = p2 - p1;
    if d.x == 0.0 && d.y == 0.0 {
        return 0.0;
    }
    let a = d.y.atan2(d.x);
    let a = if a < 0.0 { a + TAU } else { a };
    if a >= TAU {
        0.0
    } else {
        a
    }
}

/// Signed perpendicular distance from `point` to the infinite extension of `line`.
pub fn signed_offset(line: &Line, point: Point) -> f64 {
    match line.unit_normal() {
        Some(n) => (point - line.start).dot(n),
        None => 0.0,
    }
}

/// Parallel copy of `line`, `distance` away along its normal.
pub fn translate_perpendicular(line: &Line, distance: f64) -> Line {
    match line.unit_normal() {
        Some(n) => {
            let offset = n * distance;
            Line::new(line.start + offset, line.end + offset)
        }
        None => *line,
    }
}

/// Moves each endpoint toward the midpoint by `fraction / 2` of the length.
pub fn shorten_toward_center(line: &Line, fraction: f64) -> Line {
    let d = line.end - line.start;
    Line::new(
        line.start + d * (0.5 * fraction),
        line.end - d * (0.5 * fraction),
    )
}

/// Clips the endpoint lying inside `rect` to the rectangle's boundary.
///
/// Lines with both or neither endpoint strictly inside `rect` come back
/// unchanged, which makes trimming idempotent.
pub fn trim_to_rect(line: &Line, rect: &Rect) -> Line {
    let containment = (rect.contains(line.start), rect.contains(line.end));
    let (inside, outside, start_inside) = match containment {
        (true, false) => (line.start, line.end, true),
        (false, true) => (line.end, line.start, false),
        _ => return *line,
    };

    let d = outside - inside;
    let theta = angle(inside, outside);
    let right_top = angle(inside, dvec2(rect.max.x, rect.min.y));
    let right_bottom = angle(inside, dvec2(rect.max.x, rect.max.y));
    let left_bottom = angle(inside, dvec2(rect.min.x, rect.max.y));
    let left_top = angle(inside, dvec2(rect.min.x, rect.min.y));

    let crossing = if theta >= right_top || theta <= right_bottom {
        vertical_edge_crossing(inside, d, rect.max.x)
    } else if theta < left_bottom {
        horizontal_edge_crossing(inside, d, rect.max.y)
    } else if theta <= left_top {
        vertical_edge_crossing(inside, d, rect.min.x)
    } else {
        horizontal_edge_crossing(inside, d, rect.min.y)
    };

    let Some(crossing) = crossing else {
        return *line;
    };
    if start_inside {
        Line::new(crossing, line.end)
    } else {
        Line::new(line.start, crossing)
    }
}

fn vertical_edge_crossing(from: Point, d: DVec2, x: f64) -> Option<Point> {
    if d.x.abs() <= f64::EPSILON {
        return None;
    }
    Some(dvec2(x, from.y + (x - from.x) * d.y / d.x))
}

fn horizontal_edge_crossing(from: Point, d: DVec2, y: f64) -> Option<Point> {
    if d.y.abs() <= f64::EPSILON {
        return None;
    }
    Some(dvec2(from.x + (y - from.y) * d.x / d.y, y))
}
