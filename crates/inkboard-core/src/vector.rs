//! 2D vector helpers and the pressure-carrying point type.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Per-axis tolerance used by [`approx_equals`].
pub const APPROX_EPSILON: f64 = 1e-4;

/// A sample with an associated pressure value in `[0, 1]`.
///
/// Serialized as a `[x, y, pressure]` triple. Deserializes from `[x, y]`
/// too, with full pressure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[f64; 3]")]
pub struct PressurePoint {
    pub x: f64,
    pub y: f64,
    pub pressure: f64,
}

impl PressurePoint {
    pub fn new(x: f64, y: f64, pressure: f64) -> Self {
        Self { x, y, pressure }
    }

    /// Position without pressure.
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Interpolate position and pressure.
    pub fn lerp(&self, other: &PressurePoint, t: f64) -> PressurePoint {
        let p = lerp(self.point(), other.point(), t);
        PressurePoint::new(p.x, p.y, self.pressure + (other.pressure - self.pressure) * t)
    }

    /// Same position, different pressure.
    pub fn with_pressure(self, pressure: f64) -> Self {
        Self { pressure, ..self }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.pressure.is_finite()
    }
}

impl From<[f64; 3]> for PressurePoint {
    fn from([x, y, pressure]: [f64; 3]) -> Self {
        Self::new(x, y, pressure)
    }
}

impl TryFrom<Vec<f64>> for PressurePoint {
    type Error = String;

    fn try_from(raw: Vec<f64>) -> Result<Self, Self::Error> {
        match raw.len() {
            2 | 3 => Ok(to_point(&raw)),
            n => Err(format!("expected [x, y] or [x, y, pressure], got {n} values")),
        }
    }
}

impl From<PressurePoint> for [f64; 3] {
    fn from(p: PressurePoint) -> Self {
        [p.x, p.y, p.pressure]
    }
}

impl From<PressurePoint> for Point {
    fn from(p: PressurePoint) -> Self {
        p.point()
    }
}

pub fn add(a: Point, b: Point) -> Point {
    Point::new(a.x + b.x, a.y + b.y)
}

pub fn sub(a: Point, b: Point) -> Point {
    Point::new(a.x - b.x, a.y - b.y)
}

pub fn scale(a: Point, n: f64) -> Point {
    Point::new(a.x * n, a.y * n)
}

pub fn divide(a: Point, n: f64) -> Point {
    Point::new(a.x / n, a.y / n)
}

pub fn squared_distance(a: Point, b: Point) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

/// Euclidean distance, computed with `hypot` to avoid intermediate overflow.
pub fn distance(a: Point, b: Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Linear interpolation: `a` at `t = 0`, `b` at `t = 1`.
pub fn lerp(a: Point, b: Point, t: f64) -> Point {
    add(a, scale(sub(b, a), t))
}

/// Coerce a raw `[x, y]` or `[x, y, pressure]` sample.
/// Missing coordinates become 0 and a missing pressure becomes 1.
pub fn to_point(raw: &[f64]) -> PressurePoint {
    PressurePoint::new(
        raw.first().copied().unwrap_or(0.0),
        raw.get(1).copied().unwrap_or(0.0),
        raw.get(2).copied().unwrap_or(1.0),
    )
}

/// Equality within [`APPROX_EPSILON`] on each axis independently.
pub fn approx_equals(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < APPROX_EPSILON && (a.y - b.y).abs() < APPROX_EPSILON
}
