//! Whiteboard configuration.
//!
//! Sections mirror the export document: canvas, viewport, grid, text, the
//! default element style and editor settings. Every field has a default, so a
//! partial JSON object is a valid configuration.

use crate::element::{ElementFactory, ElementStyle, SerializableColor};
use crate::error::{Result, WhiteboardError};
use crate::history::DEFAULT_HISTORY_DEPTH;
use crate::snap::{ANGLE_SNAP_THRESHOLD, GRID_SIZE, SnapMode};
use crate::stroke::StrokeOptions;
use crate::viewport::Viewport;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Canvas (drawing surface) settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CanvasSettings {
    pub width: f64,
    pub height: f64,
    pub background_color: SerializableColor,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
            background_color: SerializableColor::white(),
        }
    }
}

/// Grid display and snapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridSettings {
    pub enabled: bool,
    pub size: f64,
    pub snap: SnapMode,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            size: GRID_SIZE,
            snap: SnapMode::None,
        }
    }
}

/// Undo depth and the quiet period for deferred snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistorySettings {
    pub max_depth: usize,
    pub debounce_ms: u64,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_HISTORY_DEPTH,
            debounce_ms: 300,
        }
    }
}

impl HistorySettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Defaults for new text elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextSettings {
    pub font_size: f64,
    pub font_family: String,
}

impl Default for TextSettings {
    fn default() -> Self {
        Self {
            font_size: 24.0,
            font_family: "sans-serif".to_string(),
        }
    }
}

/// Editor behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorSettings {
    /// Probe distance used by the eraser.
    pub eraser_threshold: f64,
    /// Tolerance in degrees for angle snapping.
    pub angle_snap_threshold: f64,
    pub stroke: StrokeOptions,
    pub history: HistorySettings,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            eraser_threshold: 5.0,
            angle_snap_threshold: ANGLE_SNAP_THRESHOLD,
            stroke: StrokeOptions::default(),
            history: HistorySettings::default(),
        }
    }
}

/// Complete whiteboard configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WhiteboardConfig {
    pub canvas: CanvasSettings,
    pub viewport: Viewport,
    pub grid: GridSettings,
    pub text: TextSettings,
    pub style: ElementStyle,
    pub settings: EditorSettings,
}

fn invalid(message: impl Into<String>) -> WhiteboardError {
    WhiteboardError::InvalidConfig(message.into())
}

impl CanvasSettings {
    pub fn validate(&self) -> Result<()> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(invalid(format!(
                "canvas size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

impl GridSettings {
    pub fn validate(&self) -> Result<()> {
        if !(self.size > 0.0) {
            return Err(invalid(format!("grid size must be positive, got {}", self.size)));
        }
        Ok(())
    }
}

impl TextSettings {
    pub fn validate(&self) -> Result<()> {
        if !(self.font_size > 0.0) {
            return Err(invalid(format!("font size must be positive, got {}", self.font_size)));
        }
        Ok(())
    }
}

impl EditorSettings {
    pub fn validate(&self) -> Result<()> {
        if self.history.max_depth == 0 {
            return Err(invalid("history depth must be at least 1"));
        }
        if !(self.eraser_threshold >= 0.0) {
            return Err(invalid(format!(
                "eraser threshold must not be negative, got {}",
                self.eraser_threshold
            )));
        }
        if !(self.angle_snap_threshold >= 0.0) {
            return Err(invalid(format!(
                "angle snap threshold must not be negative, got {}",
                self.angle_snap_threshold
            )));
        }
        if !(self.stroke.size > 0.0) {
            return Err(invalid(format!("stroke size must be positive, got {}", self.stroke.size)));
        }
        Ok(())
    }
}

impl WhiteboardConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: WhiteboardConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        let result = self
            .canvas
            .validate()
            .and_then(|_| self.viewport.validate())
            .and_then(|_| self.grid.validate())
            .and_then(|_| self.text.validate())
            .and_then(|_| self.settings.validate());
        if let Err(err) = &result {
            log::warn!("rejected whiteboard config: {err}");
        }
        result
    }

    /// Factory that applies this configuration's style and text defaults.
    pub fn element_factory(&self) -> ElementFactory {
        ElementFactory {
            style: self.style.clone(),
            font_size: Some(self.text.font_size),
            font_family: Some(self.text.font_family.clone()),
        }
    }

    pub fn zoom(&self) -> f64 {
        self.viewport.zoom
    }

    pub fn set_zoom(&mut self, zoom: f64) -> Result<()> {
        self.viewport.set_zoom(zoom)
    }

    pub fn canvas_size(&self) -> (f64, f64) {
        (self.canvas.width, self.canvas.height)
    }

    pub fn set_canvas_size(&mut self, width: f64, height: f64) -> Result<()> {
        let canvas = CanvasSettings {
            width,
            height,
            ..self.canvas.clone()
        };
        canvas.validate()?;
        self.canvas = canvas;
        Ok(())
    }

    pub fn background_color(&self) -> SerializableColor {
        self.canvas.background_color
    }

    pub fn set_background_color(&mut self, color: SerializableColor) {
        self.canvas.background_color = color;
    }

    pub fn grid_enabled(&self) -> bool {
        self.grid.enabled
    }

    pub fn set_grid_enabled(&mut self, enabled: bool) {
        self.grid.enabled = enabled;
    }

    pub fn grid_size(&self) -> f64 {
        self.grid.size
    }

    pub fn set_grid_size(&mut self, size: f64) -> Result<()> {
        if !(size > 0.0) {
            return Err(invalid(format!("grid size must be positive, got {size}")));
        }
        self.grid.size = size;
        Ok(())
    }

    pub fn snap_mode(&self) -> SnapMode {
        self.grid.snap
    }

    pub fn set_snap_mode(&mut self, mode: SnapMode) {
        self.grid.snap = mode;
    }

    pub fn max_history_depth(&self) -> usize {
        self.settings.history.max_depth
    }

    pub fn set_max_history_depth(&mut self, depth: usize) -> Result<()> {
        if depth == 0 {
            return Err(invalid("history depth must be at least 1"));
        }
        self.settings.history.max_depth = depth;
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        self.settings.history.debounce()
    }

    pub fn set_debounce_ms(&mut self, millis: u64) {
        self.settings.history.debounce_ms = millis;
    }

    pub fn eraser_threshold(&self) -> f64 {
        self.settings.eraser_threshold
    }

    pub fn set_eraser_threshold(&mut self, threshold: f64) -> Result<()> {
        if !(threshold >= 0.0) {
            return Err(invalid(format!("eraser threshold must not be negative, got {threshold}")));
        }
        self.settings.eraser_threshold = threshold;
        Ok(())
    }

    pub fn stroke_options(&self) -> &StrokeOptions {
        &self.settings.stroke
    }

    pub fn set_stroke_options(&mut self, options: StrokeOptions) {
        self.settings.stroke = options;
    }

    pub fn default_style(&self) -> &ElementStyle {
        &self.style
    }

    pub fn set_default_style(&mut self, style: ElementStyle) {
        self.style = style;
    }
}
