//! Kind-specific element geometry.
//!
//! All coordinates are relative to the owning element's `(x, y)` origin.

use crate::bounds::{Bounds, BoundsAccumulator};
use crate::hit_test::{hit_test_bounding_box, hit_test_ellipse, hit_test_freehand, hit_test_line};
use crate::vector::PressurePoint;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Average glyph advance as a fraction of the font size, used for text extents.
const AVERAGE_CHAR_WIDTH: f64 = 0.6;

/// Freehand stroke: processed points plus the rendered outline path.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PenGeometry {
    pub points: Vec<PressurePoint>,
    /// SVG path data of the stroke outline, in element-local coordinates.
    #[serde(default)]
    pub path: String,
}

impl PenGeometry {
    pub fn new(points: Vec<PressurePoint>, path: String) -> Self {
        Self { points, path }
    }

    fn world_points(&self, origin: Vec2) -> Vec<Point> {
        self.points.iter().map(|p| p.point() + origin).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RectangleGeometry {
    pub width: f64,
    pub height: f64,
    /// Corner radius (0 = sharp corners).
    #[serde(default)]
    pub corner_radius: f64,
}

impl Default for RectangleGeometry {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 100.0,
            corner_radius: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EllipseGeometry {
    pub cx: f64,
    pub cy: f64,
    pub rx: f64,
    pub ry: f64,
}

impl Default for EllipseGeometry {
    fn default() -> Self {
        Self {
            cx: 50.0,
            cy: 50.0,
            rx: 50.0,
            ry: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineGeometry {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Default for LineGeometry {
    fn default() -> Self {
        Self {
            x1: 0.0,
            y1: 0.0,
            x2: 100.0,
            y2: 0.0,
        }
    }
}

impl LineGeometry {
    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    pub fn length(&self) -> f64 {
        (self.end() - self.start()).hypot()
    }
}

/// A line with optional arrow heads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrowGeometry {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    #[serde(default)]
    pub head_start: bool,
    #[serde(default = "default_true")]
    pub head_end: bool,
}

impl Default for ArrowGeometry {
    fn default() -> Self {
        Self {
            x1: 0.0,
            y1: 0.0,
            x2: 100.0,
            y2: 0.0,
            head_start: false,
            head_end: true,
        }
    }
}

impl ArrowGeometry {
    pub fn line(&self) -> LineGeometry {
        LineGeometry {
            x1: self.x1,
            y1: self.y1,
            x2: self.x2,
            y2: self.y2,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Font weight options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FontWeight {
    Light,
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextGeometry {
    pub text: String,
    pub font_size: f64,
    pub font_family: String,
    #[serde(default)]
    pub font_weight: FontWeight,
    /// Line height as a multiple of the font size.
    #[serde(default = "default_line_height")]
    pub line_height: f64,
}

fn default_line_height() -> f64 {
    1.2
}

impl Default for TextGeometry {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_size: 24.0,
            font_family: "sans-serif".to_string(),
            font_weight: FontWeight::default(),
            line_height: default_line_height(),
        }
    }
}

impl TextGeometry {
    /// Approximate layout size. Real glyph metrics belong to the renderer.
    pub fn approximate_size(&self) -> (f64, f64) {
        let lines = self.text.split('\n').count().max(1);
        let longest = self.text.split('\n').map(|l| l.chars().count()).max().unwrap_or(0);
        let width = longest as f64 * self.font_size * AVERAGE_CHAR_WIDTH;
        let height = lines as f64 * self.font_size * self.line_height;
        (width, height)
    }
}

/// A reference to an image owned by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageGeometry {
    /// Source reference (URL or data URI); the engine never loads it.
    pub src: String,
    pub width: f64,
    pub height: f64,
}

impl Default for ImageGeometry {
    fn default() -> Self {
        Self {
            src: String::new(),
            width: 100.0,
            height: 100.0,
        }
    }
}

/// Kind-specific geometry, tagged by `type` in serialized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ElementGeometry {
    Pen(PenGeometry),
    Rectangle(RectangleGeometry),
    Ellipse(EllipseGeometry),
    Line(LineGeometry),
    Arrow(ArrowGeometry),
    Text(TextGeometry),
    Image(ImageGeometry),
}

impl ElementGeometry {
    /// Unrotated bounds with the geometry placed at `origin`.
    pub fn bounds_at(&self, origin: Point) -> Bounds {
        let offset = origin.to_vec2();
        match self {
            ElementGeometry::Pen(pen) => {
                let mut acc = BoundsAccumulator::new();
                acc.extend(pen.world_points(offset));
                acc.bounds().unwrap_or_else(|| Bounds::new(origin.x, origin.y, origin.x, origin.y))
            }
            ElementGeometry::Rectangle(r) => Bounds::from_origin_size(origin.x, origin.y, r.width, r.height),
            ElementGeometry::Ellipse(e) => {
                let center = Point::new(e.cx, e.cy) + offset;
                Bounds::new(center.x - e.rx, center.y - e.ry, center.x + e.rx, center.y + e.ry)
            }
            ElementGeometry::Line(l) => {
                let (a, b) = (l.start() + offset, l.end() + offset);
                Bounds::new(a.x, a.y, b.x, b.y)
            }
            ElementGeometry::Arrow(arrow) => ElementGeometry::Line(arrow.line()).bounds_at(origin),
            ElementGeometry::Text(t) => {
                let (width, height) = t.approximate_size();
                Bounds::from_origin_size(origin.x, origin.y, width, height)
            }
            ElementGeometry::Image(i) => Bounds::from_origin_size(origin.x, origin.y, i.width, i.height),
        }
    }

    /// Probe-segment hit test in the geometry's unrotated frame.
    pub fn hit_by_segment_at(&self, origin: Point, a: Point, b: Point, threshold: f64) -> bool {
        let offset = origin.to_vec2();
        match self {
            ElementGeometry::Pen(pen) => hit_test_freehand(&pen.world_points(offset), a, b, threshold),
            ElementGeometry::Ellipse(e) => hit_test_ellipse(Point::new(e.cx, e.cy) + offset, e.rx, e.ry, a, b, threshold),
            ElementGeometry::Line(l) => hit_test_line(l.start() + offset, l.end() + offset, a, b, threshold),
            ElementGeometry::Arrow(arrow) => {
                let l = arrow.line();
                hit_test_line(l.start() + offset, l.end() + offset, a, b, threshold)
            }
            ElementGeometry::Rectangle(_) | ElementGeometry::Text(_) | ElementGeometry::Image(_) => {
                hit_test_bounding_box(&self.bounds_at(origin), a, b)
            }
        }
    }
}
