//! Quadratic-spline path synthesis.

use kurbo::Point;

/// Serialize points as a smooth SVG path through segment midpoints.
///
/// Produces `M x0,y0 Q x1,y1 mid T mid mid ...`, with `Z` appended when
/// `closed`. Coordinates use two decimal places. Fewer than four points give
/// an empty string, which is the normal result while a stroke is starting.
pub fn svg_path_from_stroke<P>(points: &[P], closed: bool) -> String
where
    P: Into<Point> + Copy,
{
    if points.len() < 4 {
        return String::new();
    }

    let pts: Vec<Point> = points.iter().map(|&p| p.into()).collect();
    let (a, b, c) = (pts[0], pts[1], pts[2]);

    let mut path = String::with_capacity(pts.len() * 14 + 32);
    path.push_str(&format!(
        "M{},{} Q{},{} {},{} T",
        fixed(a.x),
        fixed(a.y),
        fixed(b.x),
        fixed(b.y),
        fixed(average(b.x, c.x)),
        fixed(average(b.y, c.y)),
    ));

    for pair in pts[2..].windows(2) {
        let (p, q) = (pair[0], pair[1]);
        path.push_str(&format!("{},{} ", fixed(average(p.x, q.x)), fixed(average(p.y, q.y))));
    }

    if closed {
        path.push('Z');
    }
    path
}

fn average(a: f64, b: f64) -> f64 {
    (a + b) / 2.0
}

/// Two-decimal formatting without a negative zero. Values exactly halfway
/// between two hundredths round away from zero.
fn fixed(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    // Exact ties are the odd multiples of 1/8; `value * 100` is exact for them
    let eighths = value * 8.0;
    if eighths.fract() == 0.0 && eighths.rem_euclid(2.0) == 1.0 {
        return format!("{:.2}", (value * 100.0).round() / 100.0);
    }
    format!("{value:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::PressurePoint;

    #[test]
    fn test_too_few_points() {
        assert_eq!(svg_path_from_stroke::<Point>(&[], true), "");
        let three = [(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)];
        assert_eq!(svg_path_from_stroke(&three, true), "");
    }

    #[test]
    fn test_open_path() {
        let points = [(0.0, 0.0), (2.0, 2.0), (4.0, 4.0), (6.0, 6.0)];
        assert_eq!(
            svg_path_from_stroke(&points, false),
            "M0.00,0.00 Q2.00,2.00 3.00,3.00 T5.00,5.00 "
        );
    }

    #[test]
    fn test_closed_path() {
        let points = [(0.0, 0.0), (2.0, 2.0), (4.0, 4.0), (6.0, 6.0)];
        assert_eq!(
            svg_path_from_stroke(&points, true),
            "M0.00,0.00 Q2.00,2.00 3.00,3.00 T5.00,5.00 Z"
        );
    }

    #[test]
    fn test_more_points() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
            Point::new(-0.001, 0.0),
        ];
        assert_eq!(
            svg_path_from_stroke(&points, false),
            "M0.00,0.00 Q10.00,0.00 10.00,5.00 T5.00,10.00 -0.00,5.00 "
        );
    }

    #[test]
    fn test_pressure_points_accepted() {
        let points: Vec<PressurePoint> = (0..4).map(|i| PressurePoint::new(i as f64, 0.0, 0.5)).collect();
        assert_eq!(
            svg_path_from_stroke(&points, false),
            "M0.00,0.00 Q1.00,0.00 1.50,0.00 T2.50,0.00 "
        );
    }

    #[test]
    fn test_negative_zero_is_printed_as_zero() {
        assert_eq!(fixed(-0.0), "0.00");
    }

    #[test]
    fn test_exact_ties_round_away_from_zero() {
        assert_eq!(fixed(0.125), "0.13");
        assert_eq!(fixed(0.375), "0.38");
        assert_eq!(fixed(12.625), "12.63");
        assert_eq!(fixed(-0.125), "-0.13");
        assert_eq!(fixed(0.25), "0.25");
        // Not ties: the stored binary values sit just below the midpoint
        assert_eq!(fixed(1.005), "1.00");
        assert_eq!(fixed(2.675), "2.67");
    }

    #[test]
    fn test_quarter_pixel_midpoints() {
        let points = [(0.0, 0.0), (0.25, 0.0), (0.0, 0.0), (0.25, 0.0)].map(|(x, y)| Point::new(x, y));
        assert_eq!(
            svg_path_from_stroke(&points, false),
            "M0.00,0.00 Q0.25,0.00 0.13,0.00 T0.13,0.00 "
        );
    }
}
