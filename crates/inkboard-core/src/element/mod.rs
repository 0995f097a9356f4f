//! Element definitions for the whiteboard.

mod geometry;
mod patch;
mod style;

pub use geometry::{
    ArrowGeometry, ElementGeometry, EllipseGeometry, FontWeight, ImageGeometry, LineGeometry, PenGeometry,
    RectangleGeometry, TextGeometry,
};
pub use patch::{ElementPatch, StylePatch};
pub use style::{ElementStyle, LineCap, LineJoin, ParseColorError, SerializableColor};

use crate::bounds::Bounds;
use crate::error::{Result, WhiteboardError};
use kurbo::{Affine, Point};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementId = String;

/// Rotations smaller than this (degrees) are treated as none.
const ROTATION_EPSILON: f64 = 1e-6;

/// The kinds of element a whiteboard can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementKind {
    Pen,
    Rectangle,
    Ellipse,
    Line,
    Arrow,
    Text,
    Image,
}

impl ElementKind {
    pub fn all() -> &'static [ElementKind] {
        &[
            ElementKind::Pen,
            ElementKind::Rectangle,
            ElementKind::Ellipse,
            ElementKind::Line,
            ElementKind::Arrow,
            ElementKind::Text,
            ElementKind::Image,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Pen => "pen",
            ElementKind::Rectangle => "rectangle",
            ElementKind::Ellipse => "ellipse",
            ElementKind::Line => "line",
            ElementKind::Arrow => "arrow",
            ElementKind::Text => "text",
            ElementKind::Image => "image",
        }
    }

    /// Default geometry for a freshly created element of this kind.
    fn default_geometry(self) -> ElementGeometry {
        match self {
            ElementKind::Pen => ElementGeometry::Pen(PenGeometry::default()),
            ElementKind::Rectangle => ElementGeometry::Rectangle(RectangleGeometry::default()),
            ElementKind::Ellipse => ElementGeometry::Ellipse(EllipseGeometry::default()),
            ElementKind::Line => ElementGeometry::Line(LineGeometry::default()),
            ElementKind::Arrow => ElementGeometry::Arrow(ArrowGeometry::default()),
            ElementKind::Text => ElementGeometry::Text(TextGeometry::default()),
            ElementKind::Image => ElementGeometry::Image(ImageGeometry::default()),
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementKind {
    type Err = WhiteboardError;

    fn from_str(s: &str) -> Result<Self> {
        ElementKind::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| WhiteboardError::UnknownKind(s.to_string()))
    }
}

fn default_opacity() -> f64 {
    1.0
}

fn default_visible() -> bool {
    true
}

/// A drawable object on the whiteboard.
///
/// Elements are values: every change produces a new element through
/// [`Element::patched`], and the id never changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub(crate) id: ElementId,
    pub x: f64,
    pub y: f64,
    /// Rotation in degrees, around the center of the unrotated bounds.
    #[serde(default)]
    pub rotation: f64,
    /// Opacity in `[0, 1]`.
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub style: ElementStyle,
    #[serde(default)]
    pub locked: bool,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(flatten)]
    pub geometry: ElementGeometry,
}

impl Element {
    /// Create an element with kind defaults at the origin.
    pub fn new(kind: ElementKind) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            opacity: default_opacity(),
            style: ElementStyle::default(),
            locked: false,
            visible: true,
            geometry: kind.default_geometry(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> ElementKind {
        match self.geometry {
            ElementGeometry::Pen(_) => ElementKind::Pen,
            ElementGeometry::Rectangle(_) => ElementKind::Rectangle,
            ElementGeometry::Ellipse(_) => ElementKind::Ellipse,
            ElementGeometry::Line(_) => ElementKind::Line,
            ElementGeometry::Arrow(_) => ElementKind::Arrow,
            ElementGeometry::Text(_) => ElementKind::Text,
            ElementGeometry::Image(_) => ElementKind::Image,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// A new element with the patch applied. `self` is left untouched.
    pub fn patched(&self, patch: &ElementPatch) -> Element {
        let mut next = self.clone();
        patch.apply_to(&mut next);
        next
    }

    /// A copy moved by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Element {
        Element {
            x: self.x + dx,
            y: self.y + dy,
            ..self.clone()
        }
    }

    /// A copy with a fresh id, for duplicate and paste.
    pub fn duplicated(&self) -> Element {
        Element {
            id: Uuid::new_v4().to_string(),
            ..self.clone()
        }
    }

    fn is_rotated(&self) -> bool {
        self.rotation.abs() > ROTATION_EPSILON
    }

    /// Transform from the unrotated frame to world space.
    fn rotation_transform(&self, unrotated: &Bounds) -> Affine {
        Affine::rotate_about(self.rotation.to_radians(), unrotated.center())
    }

    /// Bounds ignoring rotation.
    pub fn unrotated_bounds(&self) -> Bounds {
        self.geometry.bounds_at(self.origin())
    }

    /// Axis-aligned bounds in world coordinates, accounting for rotation.
    pub fn bounds(&self) -> Bounds {
        let unrotated = self.unrotated_bounds();
        if !self.is_rotated() {
            return unrotated;
        }
        let transform = self.rotation_transform(&unrotated);
        let corners = unrotated.corners().map(|c| transform * c);
        Bounds::from_points(&corners).unwrap_or(unrotated)
    }

    /// Whether the probe segment `a → b` touches this element.
    pub fn hit_by_segment(&self, a: Point, b: Point, threshold: f64) -> bool {
        let origin = self.origin();
        if !self.is_rotated() {
            return self.geometry.hit_by_segment_at(origin, a, b, threshold);
        }
        let inverse = self.rotation_transform(&self.unrotated_bounds()).inverse();
        self.geometry.hit_by_segment_at(origin, inverse * a, inverse * b, threshold)
    }
}

/// Lets id-taking operations accept elements directly.
impl AsRef<str> for Element {
    fn as_ref(&self) -> &str {
        &self.id
    }
}

/// Creates elements from a kind and an override patch.
///
/// Holds the defaults applied before the overrides, usually taken from the
/// whiteboard configuration.
#[derive(Debug, Clone, Default)]
pub struct ElementFactory {
    pub style: ElementStyle,
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
}

impl ElementFactory {
    pub fn new(style: ElementStyle) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    /// Kind defaults merged under `patch`, with a fresh id.
    pub fn create(&self, kind: ElementKind, patch: &ElementPatch) -> Element {
        let mut element = Element::new(kind);
        element.style = self.style.clone();
        if let ElementGeometry::Text(text) = &mut element.geometry {
            if let Some(size) = self.font_size {
                text.font_size = size;
            }
            if let Some(family) = &self.font_family {
                text.font_family = family.clone();
            }
        }
        element.patched(patch)
    }

    /// Like [`create`](Self::create), with the kind given by name.
    pub fn create_named(&self, kind: &str, patch: &ElementPatch) -> Result<Element> {
        Ok(self.create(kind.parse()?, patch))
    }
}
