//! Axis-aligned bounding boxes.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box.
///
/// `width == max_x - min_x` and `height == max_y - min_y` always hold for
/// values built through the constructors in this module.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    /// Create bounds from two corners given in any order.
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        let (min_x, max_x) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        let (min_y, max_y) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
            width: max_x - min_x,
            height: max_y - min_y,
        }
    }

    /// Create bounds from an origin and a size.
    pub fn from_origin_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Tight bounds of a point set, `None` when empty.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let init = (first.x, first.y, first.x, first.y);
        let (min_x, min_y, max_x, max_y) = points.iter().skip(1).fold(init, |acc, p| {
            (acc.0.min(p.x), acc.1.min(p.y), acc.2.max(p.x), acc.3.max(p.y))
        });
        Some(Self::new(min_x, min_y, max_x, max_y))
    }

    /// Smallest bounds containing both.
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }

    /// Grow (or shrink, for negative margins) on every side.
    pub fn inflate(&self, margin: f64) -> Bounds {
        Bounds::new(
            self.min_x - margin,
            self.min_y - margin,
            self.max_x + margin,
            self.max_y + margin,
        )
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Bounds {
        Bounds::new(self.min_x + dx, self.min_y + dy, self.max_x + dx, self.max_y + dy)
    }

    pub fn center(&self) -> Point {
        Point::new(self.min_x + self.width / 2.0, self.min_y + self.height / 2.0)
    }

    /// Corners clockwise from the top-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.min_x, self.min_y),
            Point::new(self.max_x, self.min_y),
            Point::new(self.max_x, self.max_y),
            Point::new(self.min_x, self.max_y),
        ]
    }

    /// The four edges as segments, clockwise from the top edge.
    pub fn edges(&self) -> [(Point, Point); 4] {
        let [tl, tr, br, bl] = self.corners();
        [(tl, tr), (tr, br), (br, bl), (bl, tl)]
    }

    pub fn to_rect(&self) -> Rect {
        Rect::new(self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

impl From<Rect> for Bounds {
    fn from(rect: Rect) -> Self {
        Bounds::new(rect.x0, rect.y0, rect.x1, rect.y1)
    }
}

impl From<Bounds> for Rect {
    fn from(bounds: Bounds) -> Self {
        bounds.to_rect()
    }
}

/// Streaming min/max tracker for points arriving one at a time.
///
/// Until two points have been seen the reported bounds are floored to a
/// 1×1 rectangle so a live stroke never produces a degenerate box.
#[derive(Debug, Clone, Default)]
pub struct BoundsAccumulator {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
    count: usize,
}

impl BoundsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, point: Point) {
        if self.count == 0 {
            self.min_x = point.x;
            self.max_x = point.x;
            self.min_y = point.y;
            self.max_y = point.y;
        } else {
            self.min_x = self.min_x.min(point.x);
            self.min_y = self.min_y.min(point.y);
            self.max_x = self.max_x.max(point.x);
            self.max_y = self.max_y.max(point.y);
        }
        self.count += 1;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Current bounds, `None` before any point was pushed.
    pub fn bounds(&self) -> Option<Bounds> {
        match self.count {
            0 => None,
            1 => Some(Bounds::new(self.min_x, self.min_y, self.min_x + 1.0, self.min_y + 1.0)),
            _ => Some(Bounds::new(self.min_x, self.min_y, self.max_x, self.max_y)),
        }
    }
}

impl Extend<Point> for BoundsAccumulator {
    fn extend<I: IntoIterator<Item = Point>>(&mut self, iter: I) {
        for point in iter {
            self.push(point);
        }
    }
}
