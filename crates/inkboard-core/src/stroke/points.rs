//! Raw pointer samples → filtered, smoothed stroke points.

use super::StrokeOptions;
use crate::vector::{PressurePoint, approx_equals, distance, lerp, squared_distance, to_point};

/// Leading samples below this pressure are dropped.
const MIN_START_PRESSURE: f64 = 0.025;
/// Trailing samples below this pressure are dropped.
const MIN_END_PRESSURE: f64 = 0.01;
/// Number of leading candidates subject to jitter suppression.
const JITTER_CANDIDATES: usize = 3;

/// Convert raw `[x, y]` / `[x, y, pressure]` samples into stroke points.
///
/// Samples with a non-finite coordinate or pressure are dropped. The first
/// output point is always the (possibly collapsed) first finite sample. An
/// input without finite samples produces an empty output.
pub fn stroke_points<P: AsRef<[f64]>>(samples: &[P], options: &StrokeOptions) -> Vec<PressurePoint> {
    let mut pts: Vec<PressurePoint> = samples
        .iter()
        .map(|s| to_point(s.as_ref()))
        .filter(PressurePoint::is_finite)
        .collect();
    let Some(&first) = pts.first() else {
        return Vec::new();
    };

    let t = 0.15 + (1.0 - options.streamline) * 0.85;

    if !options.simulate_pressure {
        let start = pts
            .iter()
            .position(|p| p.pressure >= MIN_START_PRESSURE)
            .unwrap_or(pts.len());
        let end = pts
            .iter()
            .rposition(|p| p.pressure >= MIN_END_PRESSURE)
            .map_or(0, |i| i + 1);
        pts = if start < end { pts[start..end].to_vec() } else { Vec::new() };
    }

    if pts.is_empty() {
        return vec![first];
    }

    let trailing_removed = collapse_near_duplicates(&mut pts, (options.size / 3.0).powi(2));

    let n = pts.len();
    let is_complete = options.last
        || !options.simulate_pressure
        || (n >= 2 && squared_distance(pts[n - 1].point(), pts[n - 2].point()) < options.size * options.size)
        || trailing_removed > 0;

    if n == 2 && options.simulate_pressure {
        let (a, b) = (pts[0], pts[1]);
        pts = std::iter::once(a)
            .chain((1..4).map(|i| a.lerp(&b, i as f64 / 4.0)))
            .chain(std::iter::once(b))
            .collect();
    }

    if is_complete && options.streamline > 0.0 {
        if let Some(&last) = pts.last() {
            pts.push(last);
        }
    }

    let last_index = pts.len() - 1;
    let mut out = Vec::with_capacity(pts.len());
    out.push(pts[0]);
    let mut prev = pts[0].point();
    let mut running_length = 0.0;

    for (i, raw) in pts.iter().enumerate().skip(1) {
        let point = if options.last && i == last_index {
            raw.point()
        } else {
            lerp(raw.point(), prev, 1.0 - t)
        };

        if approx_equals(point, prev) {
            continue;
        }

        running_length += distance(point, prev);
        if i <= JITTER_CANDIDATES && running_length < options.size {
            continue;
        }

        out.push(PressurePoint::new(point.x, point.y, raw.pressure));
        prev = point;
    }

    log::trace!("stroke points: {} samples -> {} points", samples.len(), out.len());
    out
}

/// Fold points lying within `min_dist_sq` of either end into that end,
/// keeping the highest pressure seen. Returns how many trailing points were
/// removed.
fn collapse_near_duplicates(pts: &mut Vec<PressurePoint>, min_dist_sq: f64) -> usize {
    let first = pts[0].point();
    let leading = pts
        .iter()
        .skip(1)
        .take_while(|p| squared_distance(p.point(), first) <= min_dist_sq)
        .count();
    if leading > 0 {
        let max_pressure = pts[1..=leading].iter().fold(pts[0].pressure, |acc, p| acc.max(p.pressure));
        pts[0].pressure = max_pressure;
        pts.drain(1..=leading);
    }

    let n = pts.len();
    if n < 3 {
        return 0;
    }
    let last = pts[n - 1].point();
    let trailing = pts[1..n - 1]
        .iter()
        .rev()
        .take_while(|p| squared_distance(p.point(), last) <= min_dist_sq)
        .count();
    if trailing > 0 {
        let removed = n - 1 - trailing..n - 1;
        let max_pressure = pts[removed.clone()].iter().fold(pts[n - 1].pressure, |acc, p| acc.max(p.pressure));
        pts[n - 1].pressure = max_pressure;
        pts.drain(removed);
    }
    trailing
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn xs(points: &[PressurePoint]) -> Vec<f64> {
        points.iter().map(|p| p.x).collect()
    }

    #[test]
    fn test_empty_input() {
        let samples: Vec<Vec<f64>> = Vec::new();
        assert!(stroke_points(&samples, &StrokeOptions::default()).is_empty());
    }

    #[test]
    fn test_single_point_gets_full_pressure() {
        let points = stroke_points(&[[5.0, 7.0]], &StrokeOptions::default());
        assert_eq!(points, vec![PressurePoint::new(5.0, 7.0, 1.0)]);
    }

    #[test]
    fn test_two_points_streamlined() {
        let points = stroke_points(&[[0.0, 0.0], [100.0, 0.0]], &StrokeOptions::default());
        let x = xs(&points);
        assert_eq!(x.len(), 3);
        assert!(x[0].abs() < EPS);
        assert!((x[1] - 57.5).abs() < EPS);
        assert!((x[2] - 81.9375).abs() < EPS);
    }

    #[test]
    fn test_last_point_passes_through() {
        let options = StrokeOptions::default().finished();
        let points = stroke_points(&[[0.0, 0.0], [100.0, 0.0]], &options);
        let x = xs(&points);
        assert_eq!(x.len(), 3);
        assert!((x[1] - 57.5).abs() < EPS);
        assert!((x[2] - 100.0).abs() < EPS);
    }

    #[test]
    fn test_start_jitter_suppressed() {
        let samples = [[0.0, 0.0], [5.0, 0.0], [10.0, 0.0], [50.0, 0.0]];
        let x = xs(&stroke_points(&samples, &StrokeOptions::default()));
        assert_eq!(x.len(), 3);
        assert!(x[0].abs() < EPS);
        assert!((x[1] - 28.75).abs() < EPS);
        assert!((x[2] - 40.96875).abs() < EPS);
    }

    #[test]
    fn test_pressure_trimming() {
        let samples = [[0.0, 0.0, 0.01], [10.0, 0.0, 0.5], [20.0, 0.0, 0.5], [30.0, 0.0, 0.005]];
        let points = stroke_points(&samples, &StrokeOptions::default());
        assert_eq!(points[0], PressurePoint::new(10.0, 0.0, 0.5));
        assert!(points.iter().all(|p| p.x >= 10.0 && p.x <= 20.0));
    }

    #[test]
    fn test_all_points_trimmed() {
        let samples = [[3.0, 4.0, 0.0], [5.0, 6.0, 0.0]];
        let points = stroke_points(&samples, &StrokeOptions::default());
        assert_eq!(points, vec![PressurePoint::new(3.0, 4.0, 0.0)]);
    }

    #[test]
    fn test_all_trimmed_non_finite() {
        let samples = [[f64::NAN, 4.0, 0.0]];
        assert!(stroke_points(&samples, &StrokeOptions::default()).is_empty());
    }

    #[test]
    fn test_non_finite_samples_dropped() {
        let samples = [
            [f64::NAN, 0.0, 0.5],
            [0.0, 0.0, 0.5],
            [30.0, f64::INFINITY, 0.5],
            [30.0, 0.0, f64::NAN],
            [60.0, 0.0, 0.5],
        ];
        let points = stroke_points(&samples, &StrokeOptions::default());
        assert_eq!(points[0], PressurePoint::new(0.0, 0.0, 0.5));
        assert!(points.iter().all(PressurePoint::is_finite));
    }

    #[test]
    fn test_simulated_pressure_ignores_trimming() {
        let options = StrokeOptions {
            simulate_pressure: true,
            streamline: 0.0,
            ..StrokeOptions::default()
        };
        let points = stroke_points(&[[0.0, 0.0, 0.0], [100.0, 0.0, 0.0]], &options);
        assert_eq!(points.len(), 5);
    }

    #[test]
    fn test_two_point_interpolation() {
        let options = StrokeOptions {
            simulate_pressure: true,
            streamline: 0.0,
            ..StrokeOptions::default()
        };
        let points = stroke_points(&[[0.0, 0.0, 0.2], [100.0, 0.0, 0.6]], &options);
        let x = xs(&points);
        let expected = [0.0, 25.0, 50.0, 75.0, 100.0];
        assert_eq!(x.len(), expected.len());
        for (got, want) in x.iter().zip(expected) {
            assert!((got - want).abs() < EPS);
        }
        assert!((points[2].pressure - 0.4).abs() < EPS);
        assert!((points[4].pressure - 0.6).abs() < EPS);
    }

    #[test]
    fn test_collapse_keeps_max_pressure() {
        let samples = [[0.0, 0.0, 0.3], [1.0, 1.0, 0.9], [50.0, 50.0, 0.5]];
        let points = stroke_points(&samples, &StrokeOptions::default());
        assert_eq!(points[0], PressurePoint::new(0.0, 0.0, 0.9));
    }

    #[test]
    fn test_collapse_trailing_points() {
        let mut pts = vec![
            PressurePoint::new(0.0, 0.0, 1.0),
            PressurePoint::new(50.0, 0.0, 1.0),
            PressurePoint::new(99.0, 0.0, 0.8),
            PressurePoint::new(100.0, 0.0, 0.4),
        ];
        let removed = collapse_near_duplicates(&mut pts, 4.0);
        assert_eq!(removed, 1);
        assert_eq!(pts.len(), 3);
        assert!((pts[2].pressure - 0.8).abs() < EPS);
    }

    #[test]
    fn test_output_never_repeats_points() {
        let samples: Vec<[f64; 2]> = (0..40).map(|i| [(i / 4) as f64 * 20.0, 0.0]).collect();
        let points = stroke_points(&samples, &StrokeOptions::default().finished());
        for w in points.windows(2) {
            assert!(!approx_equals(w[0].point(), w[1].point()));
        }
    }
}
