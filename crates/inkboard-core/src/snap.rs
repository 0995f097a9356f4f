//! Snapping to the grid, to angles and to element anchor points.

use crate::bounds::Bounds;
use crate::geometry::{angle_between, normalize_angle};
use crate::vector::{distance, squared_distance};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Default grid cell size.
pub const GRID_SIZE: f64 = 20.0;

/// Candidate angles (degrees) for constrained drawing.
pub const SNAP_ANGLES: [f64; 9] = [0.0, 45.0, 90.0, 135.0, 180.0, 225.0, 270.0, 315.0, 360.0];

/// Default tolerance in degrees for [`nearest_snap_angle`].
pub const ANGLE_SNAP_THRESHOLD: f64 = 5.0;

/// Distance within which a point snaps to an element anchor.
pub const ELEMENT_SNAP_THRESHOLD: f64 = 10.0;

/// What a point may snap to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SnapMode {
    #[default]
    None,
    Grid,
    Elements,
    All,
}

impl SnapMode {
    /// Cycle to the next snap mode.
    pub fn next(self) -> Self {
        match self {
            SnapMode::None => SnapMode::Grid,
            SnapMode::Grid => SnapMode::Elements,
            SnapMode::Elements => SnapMode::All,
            SnapMode::All => SnapMode::None,
        }
    }

    pub fn snaps_to_grid(self) -> bool {
        matches!(self, SnapMode::Grid | SnapMode::All)
    }

    pub fn snaps_to_elements(self) -> bool {
        matches!(self, SnapMode::Elements | SnapMode::All)
    }
}

/// Result of a snap operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// The snapped point.
    pub point: Point,
    pub snapped_x: bool,
    pub snapped_y: bool,
}

impl SnapResult {
    /// A result that leaves the point untouched.
    pub fn none(point: Point) -> Self {
        Self {
            point,
            snapped_x: false,
            snapped_y: false,
        }
    }

    pub fn is_snapped(&self) -> bool {
        self.snapped_x || self.snapped_y
    }
}

/// Snap a scalar to the nearest multiple of `grid_size`.
///
/// Exact halves round toward positive infinity. A non-positive grid size
/// leaves the value unchanged.
pub fn snap_to_grid(value: f64, grid_size: f64) -> f64 {
    if grid_size <= 0.0 {
        return value;
    }
    (value / grid_size + 0.5).floor() * grid_size
}

/// Snap both coordinates of a point to the grid.
pub fn snap_point_to_grid(point: Point, grid_size: f64) -> SnapResult {
    if grid_size <= 0.0 {
        return SnapResult::none(point);
    }
    SnapResult {
        point: Point::new(snap_to_grid(point.x, grid_size), snap_to_grid(point.y, grid_size)),
        snapped_x: true,
        snapped_y: true,
    }
}

/// Closest candidate within `threshold` degrees of `angle`, otherwise `angle`.
///
/// Differences are plain absolute differences; the first candidate with the
/// smallest difference wins.
pub fn nearest_snap_angle(angle: f64, candidates: &[f64], threshold: f64) -> f64 {
    let mut best: Option<(f64, f64)> = None;
    for &candidate in candidates {
        let diff = (angle - candidate).abs();
        if diff <= threshold && best.is_none_or(|(_, d)| diff < d) {
            best = Some((candidate, diff));
        }
    }
    best.map_or(angle, |(candidate, _)| candidate)
}

/// Constrain a drag delta to its dominant axis. Ties snap vertical.
pub fn axis_snap(dx: f64, dy: f64) -> Vec2 {
    if dx.abs() > dy.abs() {
        Vec2::new(dx, 0.0)
    } else {
        Vec2::new(0.0, dy)
    }
}

/// Result of snapping a line endpoint to an angle.
#[derive(Debug, Clone, Copy)]
pub struct AngleSnapResult {
    /// The (possibly moved) endpoint.
    pub point: Point,
    /// Angle of the returned endpoint in degrees, `[0, 360)`.
    pub angle_degrees: f64,
    pub snapped: bool,
    /// Distance from the start point, preserved by snapping.
    pub distance: f64,
}

/// Rotate `end` around `start` onto the nearest snap angle, keeping its length.
pub fn snap_line_endpoint(start: Point, end: Point, candidates: &[f64], threshold: f64) -> AngleSnapResult {
    let length = distance(start, end);
    if length < 1e-3 {
        return AngleSnapResult {
            point: end,
            angle_degrees: 0.0,
            snapped: false,
            distance: length,
        };
    }

    let angle = normalize_angle(angle_between(start, end));
    let snapped_angle = nearest_snap_angle(angle, candidates, threshold);
    if snapped_angle == angle {
        return AngleSnapResult {
            point: end,
            angle_degrees: angle,
            snapped: false,
            distance: length,
        };
    }

    let radians = snapped_angle.to_radians();
    AngleSnapResult {
        point: Point::new(start.x + length * radians.cos(), start.y + length * radians.sin()),
        angle_degrees: normalize_angle(snapped_angle),
        snapped: true,
        distance: length,
    }
}

/// Anchor points of a bounding box: corners, edge midpoints and center.
pub fn snap_targets_from_bounds(bounds: &Bounds) -> Vec<Point> {
    let mut targets = Vec::with_capacity(9);
    targets.extend(bounds.corners());
    let c = bounds.center();
    targets.push(Point::new(c.x, bounds.min_y));
    targets.push(Point::new(bounds.max_x, c.y));
    targets.push(Point::new(c.x, bounds.max_y));
    targets.push(Point::new(bounds.min_x, c.y));
    targets.push(c);
    targets
}

/// Snap to the closest target strictly within `threshold`.
pub fn snap_to_targets(point: Point, targets: &[Point], threshold: f64) -> SnapResult {
    let mut best: Option<Point> = None;
    let mut best_dist_sq = threshold * threshold;
    for &target in targets {
        let dist_sq = squared_distance(point, target);
        if dist_sq < best_dist_sq {
            best_dist_sq = dist_sq;
            best = Some(target);
        }
    }
    match best {
        Some(target) => SnapResult {
            point: target,
            snapped_x: true,
            snapped_y: true,
        },
        None => SnapResult::none(point),
    }
}

/// Snap according to `mode`. Element anchors take priority over the grid.
pub fn snap_point(point: Point, mode: SnapMode, grid_size: f64, targets: &[Point]) -> SnapResult {
    if mode.snaps_to_elements() {
        let result = snap_to_targets(point, targets, ELEMENT_SNAP_THRESHOLD);
        if result.is_snapped() {
            return result;
        }
    }
    if mode.snaps_to_grid() {
        return snap_point_to_grid(point, grid_size);
    }
    SnapResult::none(point)
}
