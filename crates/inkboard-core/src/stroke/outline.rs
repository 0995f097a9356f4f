//! Stroke points → closed outline polygon with pressure-dependent width.

use super::StrokeOptions;
use crate::vector::{PressurePoint, distance, squared_distance};
use kurbo::{Point, Vec2};
use std::f64::consts::{PI, TAU};

/// Segments used for round caps (half circle).
const CAP_SEGMENTS: usize = 8;
/// Segments used for the dot drawn for single-point strokes.
const DOT_SEGMENTS: usize = 16;
/// Strokes shorter than this are drawn as a dot.
const MIN_STROKE_LENGTH: f64 = 1e-3;
/// How quickly simulated pressure follows pointer velocity.
const RATE_OF_PRESSURE_CHANGE: f64 = 0.275;

/// Build the outline polygon around a stroke.
///
/// The polygon runs along the left side, around the end cap, back along the
/// right side and around the start cap. Feed it to
/// [`svg_path_from_stroke`](super::svg_path_from_stroke) with `closed = true`.
pub fn stroke_outline(points: &[PressurePoint], options: &StrokeOptions) -> Vec<Point> {
    if points.is_empty() || options.size <= 0.0 {
        return Vec::new();
    }

    let mut lengths = Vec::with_capacity(points.len());
    let mut total_length = 0.0;
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            total_length += distance(points[i - 1].point(), p.point());
        }
        lengths.push(total_length);
    }

    let pressures = if options.simulate_pressure {
        simulated_pressures(points, options.size)
    } else {
        points.iter().map(|p| p.pressure.clamp(0.0, 1.0)).collect()
    };

    if points.len() == 1 || total_length < MIN_STROKE_LENGTH {
        let radius = stroke_radius(options, pressures[0]).max(options.size * 0.05);
        return dot(points[0].point(), radius);
    }

    let min_spacing_sq = (options.size * options.smoothing).powi(2);
    let last_index = points.len() - 1;
    let mut left: Vec<Point> = Vec::with_capacity(points.len());
    let mut right: Vec<Point> = Vec::with_capacity(points.len());
    let mut first_frame: Option<(Vec2, f64)> = None;
    let mut last_frame: Option<(Vec2, f64)> = None;
    let mut prev_direction = Vec2::new(1.0, 0.0);

    for (i, p) in points.iter().enumerate() {
        let direction = direction_at(points, i).unwrap_or(prev_direction);
        prev_direction = direction;

        let taper = taper_factor(options, lengths[i], total_length);
        let radius = stroke_radius(options, pressures[i]) * taper;
        let normal = Vec2::new(-direction.y, direction.x) * radius;
        let center = p.point();
        let l = center + normal;
        let r = center - normal;

        let is_end = i == 0 || i == last_index;
        if is_end || left.last().is_none_or(|&prev| squared_distance(prev, l) >= min_spacing_sq) {
            left.push(l);
        }
        if is_end || right.last().is_none_or(|&prev| squared_distance(prev, r) >= min_spacing_sq) {
            right.push(r);
        }

        if i == 0 {
            first_frame = Some((direction, radius));
        }
        last_frame = Some((direction, radius));
    }

    let mut outline = left;
    if options.cap_end && options.taper_end <= 0.0 {
        if let Some((direction, radius)) = last_frame {
            let normal = Vec2::new(-direction.y, direction.x);
            outline.extend(half_circle(points[last_index].point(), normal, radius));
        }
    }
    outline.extend(right.into_iter().rev());
    if options.cap_start && options.taper_start <= 0.0 {
        if let Some((direction, radius)) = first_frame {
            let normal = Vec2::new(-direction.y, direction.x);
            outline.extend(half_circle(points[0].point(), -normal, radius));
        }
    }
    outline
}

/// Outline radius for a pressure value.
fn stroke_radius(options: &StrokeOptions, pressure: f64) -> f64 {
    (options.size * (0.5 - options.thinning * (0.5 - pressure))).max(0.0)
}

/// Ease-out scale applied near tapered ends.
fn taper_factor(options: &StrokeOptions, length: f64, total_length: f64) -> f64 {
    let ease = |t: f64| t * (2.0 - t);
    let start = if options.taper_start > 0.0 {
        ease((length / options.taper_start).min(1.0))
    } else {
        1.0
    };
    let end = if options.taper_end > 0.0 {
        ease(((total_length - length) / options.taper_end).min(1.0))
    } else {
        1.0
    };
    start.min(end)
}

/// Unit direction of travel at point `i`, averaging the incoming and outgoing
/// segments. `None` when both neighbours coincide with the point.
fn direction_at(points: &[PressurePoint], i: usize) -> Option<Vec2> {
    let here = points[i].point();
    let unit = |v: Vec2| {
        let len = v.hypot();
        (len > f64::EPSILON).then(|| v / len)
    };
    let incoming = i.checked_sub(1).and_then(|j| unit(here - points[j].point()));
    let outgoing = points.get(i + 1).and_then(|next| unit(next.point() - here));
    match (incoming, outgoing) {
        (Some(a), Some(b)) => unit(a + b).or(Some(b)),
        (a, b) => a.or(b),
    }
}

/// Velocity-derived pressure: fast movement thins the line.
fn simulated_pressures(points: &[PressurePoint], size: f64) -> Vec<f64> {
    let mut prev = 0.5;
    let mut out = Vec::with_capacity(points.len());
    for (i, p) in points.iter().enumerate() {
        let step = if i == 0 { 0.0 } else { distance(points[i - 1].point(), p.point()) };
        let speed = (step / size).min(1.0);
        let rest = 1.0 - speed;
        let pressure = (prev + (rest - prev) * (speed * RATE_OF_PRESSURE_CHANGE)).min(1.0);
        out.push(pressure);
        prev = pressure;
    }
    out
}

/// Points strictly between `center + from * radius` and its opposite, turning
/// clockwise in screen space (through the direction of travel for end caps).
fn half_circle(center: Point, from: Vec2, radius: f64) -> impl Iterator<Item = Point> {
    (1..CAP_SEGMENTS).map(move |k| {
        let angle = PI * k as f64 / CAP_SEGMENTS as f64;
        let (sin, cos) = angle.sin_cos();
        let rotated = Vec2::new(from.x * cos + from.y * sin, -from.x * sin + from.y * cos);
        center + rotated * radius
    })
}

fn dot(center: Point, radius: f64) -> Vec<Point> {
    (0..DOT_SEGMENTS)
        .map(|k| {
            let angle = TAU * k as f64 / DOT_SEGMENTS as f64;
            Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_options() -> StrokeOptions {
        StrokeOptions {
            thinning: 0.0,
            ..StrokeOptions::default()
        }
    }

    fn horizontal() -> Vec<PressurePoint> {
        (0..4).map(|i| PressurePoint::new(i as f64 * 10.0, 0.0, 0.5)).collect()
    }

    #[test]
    fn test_empty() {
        assert!(stroke_outline(&[], &StrokeOptions::default()).is_empty());
    }

    #[test]
    fn test_dot_for_single_point() {
        let outline = stroke_outline(&[PressurePoint::new(5.0, 5.0, 0.5)], &flat_options());
        assert_eq!(outline.len(), DOT_SEGMENTS);
        for p in outline {
            assert!((distance(p, Point::new(5.0, 5.0)) - 8.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_outline_width_follows_size() {
        let outline = stroke_outline(&horizontal(), &flat_options());
        assert!(!outline.is_empty());
        assert!((outline[0].x).abs() < 1e-9);
        assert!((outline[0].y - 8.0).abs() < 1e-9);
        for p in &outline {
            assert!(p.y.abs() <= 8.0 + 1e-9);
            assert!(p.x >= -8.0 - 1e-9 && p.x <= 38.0 + 1e-9);
        }
        // End cap reaches the tip in front of the last point
        assert!(outline.iter().any(|p| (p.x - 38.0).abs() < 1e-9 && p.y.abs() < 1e-9));
        // Start cap reaches behind the first point
        assert!(outline.iter().any(|p| (p.x + 8.0).abs() < 1e-9 && p.y.abs() < 1e-9));
    }

    #[test]
    fn test_thinning_scales_with_pressure() {
        let light: Vec<PressurePoint> = horizontal().into_iter().map(|p| p.with_pressure(0.0)).collect();
        let options = StrokeOptions {
            thinning: 1.0,
            cap_start: false,
            cap_end: false,
            ..StrokeOptions::default()
        };
        let outline = stroke_outline(&light, &options);
        assert!(outline.iter().all(|p| p.y.abs() < 1e-9));
    }

    #[test]
    fn test_taper_narrows_ends() {
        let options = StrokeOptions {
            thinning: 0.0,
            taper_start: 30.0,
            taper_end: 30.0,
            ..StrokeOptions::default()
        };
        let outline = stroke_outline(&horizontal(), &options);
        assert!(outline[0].y.abs() < 1e-9);
    }

    #[test]
    fn test_simulated_pressure_slows_down_to_thick() {
        let pressures = simulated_pressures(&horizontal(), 16.0);
        assert!((pressures[0] - 0.5).abs() < 1e-12);
        assert!(pressures.iter().all(|p| (0.0..=1.0).contains(p)));
    }
}
