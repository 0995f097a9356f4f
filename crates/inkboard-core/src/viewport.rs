//! Pan/zoom transform between screen and canvas coordinates.

use crate::bounds::Bounds;
use crate::error::{Result, WhiteboardError};
use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Zoom level that shows the canvas at 100%.
pub const DEFAULT_ZOOM: f64 = 1.0;

/// The host's view onto the canvas.
///
/// `x`/`y` are the pan offset in screen pixels, `width`/`height` the size of
/// the host's viewport. A canvas point `p` is drawn at `p * zoom + (x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Viewport {
    pub zoom: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            x: 0.0,
            y: 0.0,
            width: 800.0,
            height: 600.0,
            min_zoom: 0.1,
            max_zoom: 10.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Canvas → screen transform, for rendering.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset()) * Affine::scale(self.zoom)
    }

    /// Screen → canvas transform, for input handling.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset())
    }

    pub fn screen_to_canvas(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    pub fn canvas_to_screen(&self, canvas_point: Point) -> Point {
        self.transform() * canvas_point
    }

    /// Pan by a delta in screen pixels.
    pub fn pan(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Set the zoom directly, clamped to the allowed range.
    pub fn set_zoom(&mut self, zoom: f64) -> Result<()> {
        if !zoom.is_finite() || zoom <= 0.0 {
            return Err(WhiteboardError::InvalidConfig(format!("zoom must be positive, got {zoom}")));
        }
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        Ok(())
    }

    /// Zoom by `factor`, keeping the given screen point fixed.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        let new_zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        if !new_zoom.is_finite() || (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        let canvas_point = self.screen_to_canvas(screen_point);
        self.zoom = new_zoom;

        let moved = self.canvas_to_screen(canvas_point);
        self.pan(screen_point - moved);
    }

    /// Zoom and pan so `bounds` fills the viewport, minus `padding` pixels.
    pub fn fit_to_bounds(&mut self, bounds: &Bounds, padding: f64) {
        if bounds.width <= 0.0 && bounds.height <= 0.0 {
            self.reset();
            return;
        }

        let available_w = (self.width - padding * 2.0).max(1.0);
        let available_h = (self.height - padding * 2.0).max(1.0);
        let scale_x = if bounds.width > 0.0 { available_w / bounds.width } else { f64::INFINITY };
        let scale_y = if bounds.height > 0.0 { available_h / bounds.height } else { f64::INFINITY };
        self.zoom = scale_x.min(scale_y).clamp(self.min_zoom, self.max_zoom);

        let center = bounds.center();
        self.x = self.width / 2.0 - center.x * self.zoom;
        self.y = self.height / 2.0 - center.y * self.zoom;
    }

    /// Back to 100% with no pan.
    pub fn reset(&mut self) {
        self.zoom = DEFAULT_ZOOM;
        self.x = 0.0;
        self.y = 0.0;
    }

    /// The canvas area currently on screen.
    pub fn visible_bounds(&self) -> Bounds {
        let top_left = self.screen_to_canvas(Point::ZERO);
        let bottom_right = self.screen_to_canvas(Point::new(self.width, self.height));
        Bounds::new(top_left.x, top_left.y, bottom_right.x, bottom_right.y)
    }

    /// Reject zero or negative zoom and viewport sizes.
    pub fn validate(&self) -> Result<()> {
        if !(self.zoom.is_finite() && self.zoom > 0.0) {
            return Err(WhiteboardError::InvalidConfig(format!("zoom must be positive, got {}", self.zoom)));
        }
        if !(self.min_zoom > 0.0 && self.min_zoom <= self.max_zoom) {
            return Err(WhiteboardError::InvalidConfig(format!(
                "zoom range {}..{} is empty",
                self.min_zoom, self.max_zoom
            )));
        }
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(WhiteboardError::InvalidConfig(format!(
                "viewport size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}
