//! Probe-segment hit tests used by the eraser and the lasso selector.
//!
//! Each test takes the segment swept by the pointer between two samples
//! (`a` → `b`) and decides whether it touches an element outline.

use crate::bounds::Bounds;
use crate::geometry::{point_to_segment_distance, segments_intersect, INTERSECTION_EPSILON};
use crate::vector::distance;
use kurbo::Point;

/// Whether the probe segment crosses any edge of `bounds`.
///
/// A probe entirely inside the box does not hit: only the outline counts.
pub fn hit_test_bounding_box(bounds: &Bounds, a: Point, b: Point) -> bool {
    bounds
        .edges()
        .iter()
        .any(|&(start, end)| segments_intersect(a, b, start, end, INTERSECTION_EPSILON))
}

/// Coarse ellipse test: the probe must come within the larger radius (plus
/// `threshold`) of the center. The ellipse is treated as its bounding circle.
pub fn hit_test_ellipse(center: Point, rx: f64, ry: f64, a: Point, b: Point, threshold: f64) -> bool {
    point_to_segment_distance(center, a, b) <= rx.max(ry) + threshold
}

/// Whether either probe endpoint lies within `threshold` of the segment.
pub fn hit_test_line(start: Point, end: Point, a: Point, b: Point, threshold: f64) -> bool {
    point_to_segment_distance(a, start, end) <= threshold || point_to_segment_distance(b, start, end) <= threshold
}

/// Whether either probe endpoint lies within `threshold` of the polyline.
pub fn hit_test_freehand(points: &[Point], a: Point, b: Point, threshold: f64) -> bool {
    match points {
        [] => false,
        [single] => distance(a, *single) <= threshold || distance(b, *single) <= threshold,
        _ => points
            .windows(2)
            .any(|w| hit_test_line(w[0], w[1], a, b, threshold)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Bounds {
        Bounds::new(0.0, 0.0, 10.0, 10.0)
    }

    #[test]
    fn test_box_miss() {
        assert!(!hit_test_bounding_box(&unit_box(), Point::new(20.0, 0.0), Point::new(20.0, 10.0)));
        assert!(!hit_test_bounding_box(&unit_box(), Point::new(-5.0, -5.0), Point::new(-1.0, 20.0)));
    }

    #[test]
    fn test_box_crossing() {
        assert!(hit_test_bounding_box(&unit_box(), Point::new(-5.0, 5.0), Point::new(15.0, 5.0)));
        assert!(hit_test_bounding_box(&unit_box(), Point::new(5.0, 5.0), Point::new(5.0, 15.0)));
    }

    #[test]
    fn test_box_touching_edge() {
        assert!(hit_test_bounding_box(&unit_box(), Point::new(0.0, -5.0), Point::new(0.0, 15.0)));
        assert!(hit_test_bounding_box(&unit_box(), Point::new(0.0, 2.0), Point::new(0.0, 8.0)));
    }

    #[test]
    fn test_box_inside_does_not_hit() {
        assert!(!hit_test_bounding_box(&unit_box(), Point::new(2.0, 2.0), Point::new(8.0, 8.0)));
    }

    #[test]
    fn test_ellipse_uses_larger_radius() {
        let c = Point::new(0.0, 0.0);
        // 18 units above the center: outside ry but inside rx
        assert!(hit_test_ellipse(c, 20.0, 5.0, Point::new(-30.0, 18.0), Point::new(30.0, 18.0), 0.0));
        assert!(!hit_test_ellipse(c, 20.0, 5.0, Point::new(-30.0, 25.0), Point::new(30.0, 25.0), 2.0));
        assert!(hit_test_ellipse(c, 20.0, 5.0, Point::new(-30.0, 25.0), Point::new(30.0, 25.0), 5.0));
    }

    #[test]
    fn test_line_endpoints_only() {
        let start = Point::new(0.0, 0.0);
        let end = Point::new(100.0, 0.0);
        assert!(hit_test_line(start, end, Point::new(50.0, 3.0), Point::new(50.0, 40.0), 5.0));
        // Probe crosses the line, but neither endpoint is near it
        assert!(!hit_test_line(start, end, Point::new(50.0, -40.0), Point::new(50.0, 40.0), 5.0));
    }

    #[test]
    fn test_freehand() {
        let pts = [Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)];
        assert!(hit_test_freehand(&pts, Point::new(12.0, 5.0), Point::new(30.0, 5.0), 3.0));
        assert!(!hit_test_freehand(&pts, Point::new(20.0, 5.0), Point::new(30.0, 5.0), 3.0));
        assert!(!hit_test_freehand(&[], Point::ZERO, Point::ZERO, 100.0));
        assert!(hit_test_freehand(&[Point::new(1.0, 1.0)], Point::ZERO, Point::new(50.0, 50.0), 2.0));
    }
}
