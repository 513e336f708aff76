//! Geometric primitives for text regions and skew estimation.
//!
//! This module provides the point and quadrilateral types used to describe
//! detected text regions, plus the minimum-area-rectangle computation that
//! skew estimation is built on (convex hull followed by rotating calipers).

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use std::f32::consts::PI;

/// A 2D point with floating-point coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X-coordinate of the point.
    pub x: f32,
    /// Y-coordinate of the point.
    pub y: f32,
}

impl Point {
    /// Creates a new point with the given coordinates.
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// The four corners of a detected text region, in reading-corner order:
/// top-left, top-right, bottom-right, bottom-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quad {
    /// The corner points of the quadrilateral.
    pub points: [Point; 4],
}

impl Quad {
    /// Creates a quadrilateral from four corner points.
    pub fn new(points: [Point; 4]) -> Self {
        Self { points }
    }

    /// Creates an axis-aligned quadrilateral from opposite corners.
    pub fn from_coords(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            points: [
                Point::new(x1, y1),
                Point::new(x2, y1),
                Point::new(x2, y2),
                Point::new(x1, y2),
            ],
        }
    }

    /// Returns the first corner point (top-left in reading order).
    ///
    /// Overlay labels are anchored relative to this point.
    pub fn anchor(&self) -> Point {
        self.points[0]
    }

    /// Returns true if every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.points
            .iter()
            .all(|p| p.x.is_finite() && p.y.is_finite())
    }
}

/// A rectangle of minimal area enclosing a point set, possibly rotated.
#[derive(Debug, Clone, Copy)]
pub struct MinAreaRect {
    /// Center of the rectangle.
    pub center: Point,
    /// Extent along the rectangle's own first axis.
    pub width: f32,
    /// Extent along the rectangle's own second axis.
    pub height: f32,
    /// Orientation of the first axis in degrees.
    pub angle: f32,
}

impl MinAreaRect {
    fn degenerate() -> Self {
        Self {
            center: Point::new(0.0, 0.0),
            width: 0.0,
            height: 0.0,
            angle: 0.0,
        }
    }

    /// Returns the rectangle's orientation folded into the range [-45°, 45°].
    ///
    /// A min-area rectangle is invariant under 90° rotations of its axes, so
    /// any reported angle has an equivalent representative in this range.
    /// Skew correction uses the folded angle so the applied rotation never
    /// exceeds ±45°.
    pub fn normalized_angle(&self) -> f32 {
        let mut angle = self.angle % 90.0;
        if angle > 45.0 {
            angle -= 90.0;
        } else if angle < -45.0 {
            angle += 90.0;
        }
        angle
    }
}

/// Computes the minimum-area rectangle enclosing a set of points.
///
/// Uses rotating calipers over the convex hull of the point set. Returns a
/// zero-sized rectangle when fewer than 3 points are given or the points are
/// collinear enough that no hull can be formed.
pub fn min_area_rect(points: &[Point]) -> MinAreaRect {
    if points.len() < 3 {
        return MinAreaRect::degenerate();
    }

    let hull = convex_hull(points);
    if hull.len() < 3 {
        // Degenerate input, fall back to the axis-aligned extent.
        let Some((min_x, max_x)) = points.iter().map(|p| p.x).minmax().into_option() else {
            return MinAreaRect::degenerate();
        };
        let Some((min_y, max_y)) = points.iter().map(|p| p.y).minmax().into_option() else {
            return MinAreaRect::degenerate();
        };
        return MinAreaRect {
            center: Point::new((min_x + max_x) / 2.0, (min_y + max_y) / 2.0),
            width: max_x - min_x,
            height: max_y - min_y,
            angle: 0.0,
        };
    }

    let mut min_area = f32::MAX;
    let mut min_rect = MinAreaRect::degenerate();

    let n = hull.len();
    for i in 0..n {
        let j = (i + 1) % n;

        let edge_x = hull[j].x - hull[i].x;
        let edge_y = hull[j].y - hull[i].y;
        let edge_length = (edge_x * edge_x + edge_y * edge_y).sqrt();
        if edge_length < f32::EPSILON {
            continue;
        }

        // Unit vector along the edge and its perpendicular.
        let nx = edge_x / edge_length;
        let ny = edge_y / edge_length;
        let px = -ny;
        let py = nx;

        let mut min_n = f32::MAX;
        let mut max_n = f32::MIN;
        let mut min_p = f32::MAX;
        let mut max_p = f32::MIN;

        for point in &hull {
            let proj_n = nx * (point.x - hull[i].x) + ny * (point.y - hull[i].y);
            min_n = min_n.min(proj_n);
            max_n = max_n.max(proj_n);

            let proj_p = px * (point.x - hull[i].x) + py * (point.y - hull[i].y);
            min_p = min_p.min(proj_p);
            max_p = max_p.max(proj_p);
        }

        let width = max_n - min_n;
        let height = max_p - min_p;
        let area = width * height;

        if area < min_area {
            min_area = area;

            let center_n = (min_n + max_n) / 2.0;
            let center_p = (min_p + max_p) / 2.0;

            min_rect = MinAreaRect {
                center: Point::new(
                    hull[i].x + center_n * nx + center_p * px,
                    hull[i].y + center_n * ny + center_p * py,
                ),
                width,
                height,
                angle: f32::atan2(ny, nx) * 180.0 / PI,
            };
        }
    }

    min_rect
}

/// Computes the convex hull of a point set using the monotone chain
/// algorithm. Returns the hull vertices in counter-clockwise order.
fn convex_hull(points: &[Point]) -> Vec<Point> {
    let mut sorted: Vec<Point> = points.to_vec();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    sorted.dedup_by(|a, b| a.x == b.x && a.y == b.y);

    if sorted.len() < 3 {
        return sorted;
    }

    let mut hull: Vec<Point> = Vec::with_capacity(sorted.len() * 2);

    // Lower hull.
    for &p in &sorted {
        while hull.len() > 1 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }

    // Upper hull.
    let lower_len = hull.len() + 1;
    for &p in sorted.iter().rev().skip(1) {
        while hull.len() >= lower_len && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0
        {
            hull.pop();
        }
        hull.push(p);
    }

    hull.pop();
    hull
}

/// Cross product of the vectors (p1 -> p2) and (p1 -> p3).
///
/// Positive for a counter-clockwise turn, negative for clockwise, zero when
/// the three points are collinear.
fn cross(p1: Point, p2: Point, p3: Point) -> f32 {
    (p2.x - p1.x) * (p3.y - p1.y) - (p2.y - p1.y) * (p3.x - p1.x)
}
