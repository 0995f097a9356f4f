//! Segment, angle and bounding-box predicates.
//!
//! Every bounding-box predicate here is boundary-inclusive: touching counts
//! as intersecting or contained.

use crate::bounds::Bounds;
use crate::vector::distance;
use kurbo::{Point, Vec2};
use std::f64::consts::{PI, TAU};

/// Default tolerance for [`segments_intersect`] parallel detection.
pub const INTERSECTION_EPSILON: f64 = 1e-10;

/// 2D cross product `a.x * b.y - b.x * a.y`.
pub fn cross_product(a: Vec2, b: Vec2) -> f64 {
    a.x * b.y - b.x * a.y
}

/// Angle of `point` around `center` in degrees, within `(-180, 180]`.
pub fn angle_between(center: Point, point: Point) -> f64 {
    let radians = (point.y - center.y).atan2(point.x - center.x);
    let radians = if radians <= -PI { radians + TAU } else { radians };
    radians.to_degrees()
}

/// Map any angle in degrees into `[0, 360)`.
pub fn normalize_angle(degrees: f64) -> f64 {
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if normalized >= 360.0 { 0.0 } else { normalized }
}

/// Distance from `point` to the segment `start`–`end`.
pub fn point_to_segment_distance(point: Point, start: Point, end: Point) -> f64 {
    let seg = end - start;
    let len_sq = seg.hypot2();
    if len_sq == 0.0 {
        return distance(point, start);
    }
    let t = ((point - start).dot(seg) / len_sq).clamp(0.0, 1.0);
    distance(point, start + seg * t)
}

/// Whether segments `p1`–`p2` and `q1`–`q2` touch or cross.
///
/// When the direction vectors are parallel within `epsilon` the segments only
/// intersect if they are collinear and their projections overlap.
pub fn segments_intersect(p1: Point, p2: Point, q1: Point, q2: Point, epsilon: f64) -> bool {
    let r = p2 - p1;
    let s = q2 - q1;
    let qp = q1 - p1;
    let denom = cross_product(r, s);

    if denom.abs() < epsilon {
        if cross_product(qp, r).abs() >= epsilon {
            return false;
        }
        let rr = r.hypot2();
        if rr < epsilon {
            // p is a single point
            return point_to_segment_distance(p1, q1, q2) < epsilon.max(f64::EPSILON);
        }
        let t0 = qp.dot(r) / rr;
        let t1 = t0 + s.dot(r) / rr;
        let (lo, hi) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };
        return lo <= 1.0 && hi >= 0.0;
    }

    let t = cross_product(qp, s) / denom;
    let u = cross_product(qp, r) / denom;
    (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)
}

pub fn bounding_boxes_intersect(a: &Bounds, b: &Bounds) -> bool {
    a.min_x <= b.max_x && a.max_x >= b.min_x && a.min_y <= b.max_y && a.max_y >= b.min_y
}

pub fn point_in_bounds(point: Point, bounds: &Bounds) -> bool {
    point.x >= bounds.min_x && point.x <= bounds.max_x && point.y >= bounds.min_y && point.y <= bounds.max_y
}

pub fn bounds_center(bounds: &Bounds) -> Point {
    bounds.center()
}

/// Whether the segment `start`–`end` touches `bounds` grown by `margin`.
pub fn line_intersects_bounds_with_margin(start: Point, end: Point, bounds: &Bounds, margin: f64) -> bool {
    let grown = bounds.inflate(margin);
    if point_in_bounds(start, &grown) || point_in_bounds(end, &grown) {
        return true;
    }
    grown
        .edges()
        .iter()
        .any(|&(a, b)| segments_intersect(start, end, a, b, INTERSECTION_EPSILON))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_product() {
        assert!((cross_product(Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)) - 1.0).abs() < f64::EPSILON);
        assert!((cross_product(Vec2::new(2.0, 3.0), Vec2::new(4.0, 5.0)) + 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_angle_between_range() {
        let c = Point::ZERO;
        assert!((angle_between(c, Point::new(1.0, 0.0))).abs() < 1e-12);
        assert!((angle_between(c, Point::new(0.0, 1.0)) - 90.0).abs() < 1e-12);
        assert!((angle_between(c, Point::new(-1.0, 0.0)) - 180.0).abs() < 1e-12);
        assert!((angle_between(c, Point::new(-1.0, -0.0)) - 180.0).abs() < 1e-12);
        assert!((angle_between(c, Point::new(0.0, -1.0)) + 90.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(-90.0) - 270.0).abs() < 1e-12);
        assert!((normalize_angle(720.0)).abs() < 1e-12);
        assert!((normalize_angle(45.0) - 45.0).abs() < 1e-12);
        assert!(normalize_angle(-1e-20) < 360.0);
    }

    #[test]
    fn test_point_to_segment_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!((point_to_segment_distance(Point::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-12);
        // Beyond the end clamps to the endpoint
        assert!((point_to_segment_distance(Point::new(13.0, 4.0), a, b) - 5.0).abs() < 1e-12);
        // Degenerate segment
        assert!((point_to_segment_distance(Point::new(3.0, 4.0), a, a) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_segments_cross() {
        assert!(segments_intersect(
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 0.0),
            INTERSECTION_EPSILON
        ));
        assert!(!segments_intersect(
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(5.0, 0.0),
            Point::new(6.0, -3.0),
            INTERSECTION_EPSILON
        ));
    }

    #[test]
    fn test_segments_touching_endpoint() {
        assert!(segments_intersect(
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(5.0, 5.0),
            INTERSECTION_EPSILON
        ));
    }

    #[test]
    fn test_segments_collinear() {
        let eps = INTERSECTION_EPSILON;
        assert!(segments_intersect(
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(3.0, 0.0),
            Point::new(8.0, 0.0),
            eps
        ));
        assert!(!segments_intersect(
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(3.0, 0.0),
            Point::new(8.0, 0.0),
            eps
        ));
        // Parallel but offset
        assert!(!segments_intersect(
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(5.0, 1.0),
            eps
        ));
    }

    #[test]
    fn test_bounding_box_predicates() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let touching = Bounds::new(10.0, 0.0, 20.0, 10.0);
        let apart = Bounds::new(11.0, 0.0, 20.0, 10.0);
        assert!(bounding_boxes_intersect(&a, &touching));
        assert!(!bounding_boxes_intersect(&a, &apart));
        assert!(point_in_bounds(Point::new(10.0, 10.0), &a));
        assert!(!point_in_bounds(Point::new(10.1, 10.0), &a));
        assert_eq!(bounds_center(&a), Point::new(5.0, 5.0));
    }

    #[test]
    fn test_line_with_margin() {
        let b = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let start = Point::new(-5.0, 12.0);
        let end = Point::new(15.0, 12.0);
        assert!(!line_intersects_bounds_with_margin(start, end, &b, 1.0));
        assert!(line_intersects_bounds_with_margin(start, end, &b, 2.0));
        // Fully inside counts
        assert!(line_intersects_bounds_with_margin(Point::new(2.0, 2.0), Point::new(3.0, 3.0), &b, 0.0));
    }
}
