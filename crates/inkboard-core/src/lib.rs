//! InkBoard Core Library
//!
//! Platform-agnostic document, history and stroke geometry engine for the
//! InkBoard whiteboard. Rendering and input capture live in the host.

pub mod bounds;
pub mod config;
pub mod document;
pub mod element;
pub mod error;
pub mod export;
pub mod geometry;
pub mod history;
pub mod hit_test;
pub mod registry;
pub mod selection;
pub mod snap;
pub mod stroke;
pub mod vector;
pub mod viewport;
pub mod whiteboard;

pub use bounds::{Bounds, BoundsAccumulator};
pub use config::{CanvasSettings, EditorSettings, GridSettings, HistorySettings, TextSettings, WhiteboardConfig};
pub use document::{Document, compute_bounds};
pub use element::{
    Element, ElementFactory, ElementGeometry, ElementId, ElementKind, ElementPatch, ElementStyle, SerializableColor,
    StylePatch,
};
pub use error::{Result, WhiteboardError};
pub use export::{EXPORT_VERSION, ExportDocument, ImportData};
pub use history::{DEFAULT_HISTORY_DEPTH, History, Snapshot};
pub use registry::WhiteboardRegistry;
pub use selection::Selection;
pub use snap::{GRID_SIZE, SnapMode, SnapResult, snap_point, snap_to_grid};
pub use stroke::{StrokeOptions, stroke_outline, stroke_points, stroke_to_svg_path, svg_path_from_stroke};
pub use vector::PressurePoint;
pub use viewport::Viewport;
pub use whiteboard::{HistoryMode, ListenerId, Whiteboard, WhiteboardEvent};
