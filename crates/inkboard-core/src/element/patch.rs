//! Partial element updates.

use super::Element;
use super::geometry::{ElementGeometry, FontWeight};
use super::style::{ElementStyle, LineCap, LineJoin, SerializableColor, deserialize_fill};
use crate::vector::PressurePoint;
use serde::{Deserialize, Deserializer};

/// A set of optional element fields.
///
/// Used both as the override set for element creation and as an update.
/// Fields that do not apply to an element's kind are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    /// Rotation in degrees.
    pub rotation: Option<f64>,
    /// Opacity in `[0, 1]`; out-of-range values are clamped.
    pub opacity: Option<f64>,
    pub locked: Option<bool>,
    pub visible: Option<bool>,
    pub style: Option<StylePatch>,

    pub points: Option<Vec<PressurePoint>>,
    pub path: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub corner_radius: Option<f64>,
    pub cx: Option<f64>,
    pub cy: Option<f64>,
    pub rx: Option<f64>,
    pub ry: Option<f64>,
    pub x1: Option<f64>,
    pub y1: Option<f64>,
    pub x2: Option<f64>,
    pub y2: Option<f64>,
    pub head_start: Option<bool>,
    pub head_end: Option<bool>,
    pub text: Option<String>,
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
    pub font_weight: Option<FontWeight>,
    pub line_height: Option<f64>,
    pub src: Option<String>,
}

/// Optional style fields. `fill: Some(None)` removes the fill.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StylePatch {
    pub stroke_color: Option<SerializableColor>,
    pub stroke_width: Option<f64>,
    #[serde(deserialize_with = "present_fill")]
    pub fill: Option<Option<SerializableColor>>,
    pub line_cap: Option<LineCap>,
    pub line_join: Option<LineJoin>,
    pub dash_array: Option<Vec<f64>>,
}

/// Distinguishes an explicit `null` from an absent field.
fn present_fill<'de, D>(deserializer: D) -> Result<Option<Option<SerializableColor>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_fill(deserializer).map(Some)
}

fn assign<T: Clone>(target: &mut T, value: &Option<T>) {
    if let Some(v) = value {
        *target = v.clone();
    }
}

impl StylePatch {
    pub fn is_empty(&self) -> bool {
        *self == StylePatch::default()
    }

    pub(crate) fn apply_to(&self, style: &mut ElementStyle) {
        assign(&mut style.stroke_color, &self.stroke_color);
        assign(&mut style.stroke_width, &self.stroke_width);
        assign(&mut style.fill, &self.fill);
        assign(&mut style.line_cap, &self.line_cap);
        assign(&mut style.line_join, &self.line_join);
        assign(&mut style.dash_array, &self.dash_array);
    }
}

impl ElementPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == ElementPatch::default()
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = Some(degrees);
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = Some(locked);
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    pub fn with_style(mut self, style: StylePatch) -> Self {
        self.style = Some(style);
        self
    }

    pub fn with_radii(mut self, rx: f64, ry: f64) -> Self {
        self.rx = Some(rx);
        self.ry = Some(ry);
        self
    }

    pub fn with_endpoints(mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        self.x1 = Some(x1);
        self.y1 = Some(y1);
        self.x2 = Some(x2);
        self.y2 = Some(y2);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_points(mut self, points: Vec<PressurePoint>) -> Self {
        self.points = Some(points);
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_src(mut self, src: impl Into<String>) -> Self {
        self.src = Some(src.into());
        self
    }

    /// Write every present field into `element`.
    pub(crate) fn apply_to(&self, element: &mut Element) {
        assign(&mut element.x, &self.x);
        assign(&mut element.y, &self.y);
        assign(&mut element.rotation, &self.rotation);
        if let Some(opacity) = self.opacity {
            element.opacity = opacity.clamp(0.0, 1.0);
        }
        assign(&mut element.locked, &self.locked);
        assign(&mut element.visible, &self.visible);
        if let Some(style) = &self.style {
            style.apply_to(&mut element.style);
        }

        match &mut element.geometry {
            ElementGeometry::Pen(pen) => {
                assign(&mut pen.points, &self.points);
                assign(&mut pen.path, &self.path);
            }
            ElementGeometry::Rectangle(rect) => {
                assign(&mut rect.width, &self.width);
                assign(&mut rect.height, &self.height);
                assign(&mut rect.corner_radius, &self.corner_radius);
            }
            ElementGeometry::Ellipse(ellipse) => {
                assign(&mut ellipse.cx, &self.cx);
                assign(&mut ellipse.cy, &self.cy);
                assign(&mut ellipse.rx, &self.rx);
                assign(&mut ellipse.ry, &self.ry);
            }
            ElementGeometry::Line(line) => {
                assign(&mut line.x1, &self.x1);
                assign(&mut line.y1, &self.y1);
                assign(&mut line.x2, &self.x2);
                assign(&mut line.y2, &self.y2);
            }
            ElementGeometry::Arrow(arrow) => {
                assign(&mut arrow.x1, &self.x1);
                assign(&mut arrow.y1, &self.y1);
                assign(&mut arrow.x2, &self.x2);
                assign(&mut arrow.y2, &self.y2);
                assign(&mut arrow.head_start, &self.head_start);
                assign(&mut arrow.head_end, &self.head_end);
            }
            ElementGeometry::Text(text) => {
                assign(&mut text.text, &self.text);
                assign(&mut text.font_size, &self.font_size);
                assign(&mut text.font_family, &self.font_family);
                assign(&mut text.font_weight, &self.font_weight);
                assign(&mut text.line_height, &self.line_height);
            }
            ElementGeometry::Image(image) => {
                assign(&mut image.src, &self.src);
                assign(&mut image.width, &self.width);
                assign(&mut image.height, &self.height);
            }
        }
    }
}
