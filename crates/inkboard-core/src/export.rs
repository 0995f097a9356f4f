//! The JSON export document and its validating import.

use crate::config::{CanvasSettings, EditorSettings, GridSettings, TextSettings, WhiteboardConfig};
use crate::document::Document;
use crate::element::{Element, ElementStyle};
use crate::error::{Result, WhiteboardError};
use crate::viewport::Viewport;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Format version written into exported documents.
pub const EXPORT_VERSION: &str = "1.0.0";

/// A complete whiteboard snapshot in its serialized shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub version: String,
    /// Export time, serialized as RFC 3339 / ISO-8601.
    pub timestamp: DateTime<Utc>,
    pub elements: Vec<Element>,
    pub canvas: CanvasSettings,
    pub viewport: Viewport,
    pub style: ElementStyle,
    pub grid: GridSettings,
    pub text: TextSettings,
    pub settings: EditorSettings,
}

impl ExportDocument {
    /// Capture `elements` and every configuration section, stamped now.
    pub fn new(config: &WhiteboardConfig, elements: &[Element]) -> Self {
        Self {
            version: EXPORT_VERSION.to_string(),
            timestamp: Utc::now(),
            elements: elements.to_vec(),
            canvas: config.canvas.clone(),
            viewport: config.viewport,
            style: config.style.clone(),
            grid: config.grid.clone(),
            text: config.text.clone(),
            settings: config.settings.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A validated import payload. Only `elements` is mandatory; every other
/// section is applied only when present.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportData {
    pub version: Option<String>,
    pub elements: Vec<Element>,
    pub canvas: Option<CanvasSettings>,
    pub viewport: Option<Viewport>,
    pub style: Option<ElementStyle>,
    pub grid: Option<GridSettings>,
    pub text: Option<TextSettings>,
    pub settings: Option<EditorSettings>,
}

impl ImportData {
    /// Parse and validate a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Validate a parsed payload.
    ///
    /// Fails with "Invalid data format" when `elements` is missing or not a
    /// list. Element opacities above 1 are read as percentages.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut root) = value else {
            return Err(WhiteboardError::invalid_format());
        };
        let Some(Value::Array(raw_elements)) = root.remove("elements") else {
            return Err(WhiteboardError::invalid_format());
        };

        let elements = raw_elements
            .into_iter()
            .map(|mut raw| {
                normalize_opacity_field(&mut raw);
                serde_json::from_value::<Element>(raw).map_err(WhiteboardError::from)
            })
            .collect::<Result<Vec<_>>>()?;
        // Rejects duplicate ids
        let elements = Document::from_elements(elements)?.elements().to_vec();

        let data = ImportData {
            version: root.get("version").and_then(Value::as_str).map(str::to_string),
            elements,
            canvas: section(&mut root, "canvas")?,
            viewport: section(&mut root, "viewport")?,
            style: section(&mut root, "style")?,
            grid: section(&mut root, "grid")?,
            text: section(&mut root, "text")?,
            settings: section(&mut root, "settings")?,
        };
        data.validate()?;
        Ok(data)
    }

    fn validate(&self) -> Result<()> {
        if let Some(canvas) = &self.canvas {
            canvas.validate()?;
        }
        if let Some(viewport) = &self.viewport {
            viewport.validate()?;
        }
        if let Some(grid) = &self.grid {
            grid.validate()?;
        }
        if let Some(text) = &self.text {
            text.validate()?;
        }
        if let Some(settings) = &self.settings {
            settings.validate()?;
        }
        Ok(())
    }

    /// Write the present sections into `config`.
    pub fn apply_config(&self, config: &mut WhiteboardConfig) {
        if let Some(canvas) = &self.canvas {
            config.canvas = canvas.clone();
        }
        if let Some(viewport) = self.viewport {
            config.viewport = viewport;
        }
        if let Some(style) = &self.style {
            config.style = style.clone();
        }
        if let Some(grid) = &self.grid {
            config.grid = grid.clone();
        }
        if let Some(text) = &self.text {
            config.text = text.clone();
        }
        if let Some(settings) = &self.settings {
            config.settings = settings.clone();
        }
    }
}

/// Deserialize an optional section; `null` counts as absent.
fn section<T: DeserializeOwned>(root: &mut Map<String, Value>, key: &str) -> Result<Option<T>> {
    match root.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
    }
}

/// Opacity stored as a 0–100 percentage becomes a 0–1 fraction.
pub fn normalize_opacity(value: f64) -> f64 {
    if value > 1.0 {
        (value / 100.0).min(1.0)
    } else {
        value.max(0.0)
    }
}

fn normalize_opacity_field(raw: &mut Value) {
    let Some(fields) = raw.as_object_mut() else {
        return;
    };
    if let Some(opacity) = fields.get("opacity").and_then(Value::as_f64) {
        fields.insert("opacity".to_string(), Value::from(normalize_opacity(opacity)));
    }
}
