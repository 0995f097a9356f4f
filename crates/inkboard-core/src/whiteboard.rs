//! The whiteboard session: document, selection, history and view in one
//! owned object.

use crate::bounds::Bounds;
use crate::config::WhiteboardConfig;
use crate::document::Document;
use crate::element::{Element, ElementId, ElementKind, ElementPatch};
use crate::error::Result;
use crate::export::{ExportDocument, ImportData};
use crate::history::History;
use crate::selection::Selection;
use crate::snap::{self, AngleSnapResult, SNAP_ANGLES, SnapMode, SnapResult};
use crate::stroke::{StrokeOptions, stroke_outline, stroke_points, stroke_to_svg_path, svg_path_from_stroke};
use crate::vector::PressurePoint;
use crate::viewport::Viewport;
use kurbo::{Point, Vec2};
use std::fmt;

// Use web_time for WASM compatibility
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Handle returned by [`Whiteboard::subscribe`].
pub type ListenerId = u64;

type Listener = Box<dyn FnMut(&WhiteboardEvent) + Send>;

/// Notifications delivered to observers after a change has been applied.
#[derive(Debug, Clone, PartialEq)]
pub enum WhiteboardEvent {
    ElementsAdded(Vec<ElementId>),
    ElementsUpdated(Vec<ElementId>),
    ElementsRemoved(Vec<ElementId>),
    /// Z-order changed without content changes.
    OrderChanged,
    /// The whole collection was replaced by undo, redo or import.
    DocumentRestored,
    SelectionChanged(Vec<ElementId>),
    HistoryChanged { can_undo: bool, can_redo: bool },
    ViewportChanged(Viewport),
    ConfigChanged,
}

/// How a mutation is recorded in the undo history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryMode {
    /// Push a snapshot right after the change.
    #[default]
    Record,
    /// Mark a snapshot as pending. It is pushed by [`Whiteboard::commit`],
    /// by [`Whiteboard::poll`] after the configured quiet period, or by the
    /// next recorded change. Use for drags and other high-frequency edits.
    Deferred,
}

/// A single whiteboard instance.
///
/// All state is owned here and changed only through `&mut self`, so an
/// observer can never re-enter a mutation in progress.
pub struct Whiteboard {
    config: WhiteboardConfig,
    document: Document,
    selection: Selection,
    history: History,
    /// Time of the most recent deferred change not yet in history.
    pending_since: Option<Instant>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener_id: ListenerId,
}

impl fmt::Debug for Whiteboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Whiteboard")
            .field("config", &self.config)
            .field("document", &self.document)
            .field("selection", &self.selection)
            .field("history", &self.history)
            .field("pending_since", &self.pending_since)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for Whiteboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Whiteboard {
    /// Create an empty whiteboard with the default configuration.
    pub fn new() -> Self {
        Self::build(WhiteboardConfig::default())
    }

    /// Create an empty whiteboard with a validated configuration.
    pub fn with_config(config: WhiteboardConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: WhiteboardConfig) -> Self {
        let history = History::new(config.max_history_depth());
        Self {
            config,
            document: Document::new(),
            selection: Selection::new(),
            history,
            pending_since: None,
            listeners: Vec::new(),
            next_listener_id: 1,
        }
    }

    // --- observers ---

    /// Register an observer. Events carry data only; observers cannot reach
    /// back into the whiteboard.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&WhiteboardEvent) + Send + 'static,
    {
        let id = self.next_listener_id;
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove an observer. Returns false for unknown ids.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    fn emit(&mut self, event: WhiteboardEvent) {
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }

    fn emit_selection(&mut self) {
        let ids = self.selection.ids(&self.document);
        self.emit(WhiteboardEvent::SelectionChanged(ids));
    }

    fn emit_history(&mut self) {
        let event = WhiteboardEvent::HistoryChanged {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        };
        self.emit(event);
    }

    // --- configuration ---

    pub fn config(&self) -> &WhiteboardConfig {
        &self.config
    }

    /// Replace the configuration. Invalid configurations are rejected
    /// without changing anything.
    pub fn set_config(&mut self, config: WhiteboardConfig) -> Result<()> {
        config.validate()?;
        self.history.set_capacity(config.max_history_depth());
        self.config = config;
        self.emit(WhiteboardEvent::ConfigChanged);
        Ok(())
    }

    // --- elements ---

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Elements in z-order (back to front).
    pub fn elements(&self) -> &[Element] {
        self.document.elements()
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.document.get(id)
    }

    /// Build an element with the configured defaults. Nothing is added.
    pub fn create_element(&self, kind: ElementKind, patch: &ElementPatch) -> Element {
        self.config.element_factory().create(kind, patch)
    }

    /// Like [`create_element`](Self::create_element), with the kind given by name.
    pub fn create_element_named(&self, kind: &str, patch: &ElementPatch) -> Result<Element> {
        self.config.element_factory().create_named(kind, patch)
    }

    /// Create an element and add it on top.
    pub fn insert_element(&mut self, kind: ElementKind, patch: &ElementPatch) -> Result<ElementId> {
        let element = self.create_element(kind, patch);
        let id = element.id().to_string();
        self.add_elements(vec![element])?;
        Ok(id)
    }

    /// Add elements on top. Fails without changes if any id is taken.
    pub fn add_elements(&mut self, elements: Vec<Element>) -> Result<Vec<ElementId>> {
        if elements.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<ElementId> = elements.iter().map(|e| e.id().to_string()).collect();
        self.document.add(elements)?;
        self.emit(WhiteboardEvent::ElementsAdded(ids.clone()));
        self.record(HistoryMode::Record);
        Ok(ids)
    }

    /// Merge one patch. Returns false for unknown ids.
    pub fn update_element(&mut self, id: &str, patch: &ElementPatch, mode: HistoryMode) -> bool {
        let updated = self.update_elements(&[(id.to_string(), patch.clone())], mode);
        !updated.is_empty()
    }

    /// Merge patches keyed by id. Unknown ids are skipped. Returns the ids
    /// that were updated.
    pub fn update_elements(&mut self, patches: &[(ElementId, ElementPatch)], mode: HistoryMode) -> Vec<ElementId> {
        let mut updated = Vec::new();
        for (id, patch) in patches {
            if self.document.update(id, patch) {
                updated.push(id.clone());
            }
        }
        if !updated.is_empty() {
            self.emit(WhiteboardEvent::ElementsUpdated(updated.clone()));
            self.record(mode);
        }
        updated
    }

    /// Translate unlocked elements. Returns the ids that moved.
    pub fn move_elements<S: AsRef<str>>(&mut self, ids: &[S], delta: Vec2, mode: HistoryMode) -> Vec<ElementId> {
        let moved: Vec<Element> = ids
            .iter()
            .filter_map(|id| self.document.get(id.as_ref()))
            .filter(|e| !e.locked)
            .map(|e| e.translated(delta.x, delta.y))
            .collect();
        let moved_ids: Vec<ElementId> = moved.iter().map(|e| e.id().to_string()).collect();
        for element in moved {
            self.document.replace(element);
        }
        if !moved_ids.is_empty() {
            self.emit(WhiteboardEvent::ElementsUpdated(moved_ids.clone()));
            self.record(mode);
        }
        moved_ids
    }

    /// Copy elements with fresh ids, offset by `delta`, and select the copies.
    pub fn duplicate_elements<S: AsRef<str>>(&mut self, ids: &[S], delta: Vec2) -> Result<Vec<ElementId>> {
        let copies: Vec<Element> = ids
            .iter()
            .filter_map(|id| self.document.get(id.as_ref()))
            .map(|e| e.duplicated().translated(delta.x, delta.y))
            .collect();
        let new_ids = self.add_elements(copies)?;
        if !new_ids.is_empty() {
            self.select(&new_ids, false);
        }
        Ok(new_ids)
    }

    /// Remove elements by id. Unknown ids are ignored.
    pub fn remove_elements<S: AsRef<str>>(&mut self, ids: &[S]) -> Vec<Element> {
        self.remove_with(ids, HistoryMode::Record)
    }

    fn remove_with<S: AsRef<str>>(&mut self, ids: &[S], mode: HistoryMode) -> Vec<Element> {
        let removed = self.document.remove(ids);
        if removed.is_empty() {
            return removed;
        }
        let removed_ids = removed.iter().map(|e| e.id().to_string()).collect();
        self.emit(WhiteboardEvent::ElementsRemoved(removed_ids));
        if self.selection.prune(&self.document) > 0 {
            self.emit_selection();
        }
        self.record(mode);
        removed
    }

    /// Remove the selected elements.
    pub fn remove_selected(&mut self) -> Vec<Element> {
        let ids = self.selection.ids(&self.document);
        self.remove_elements(&ids)
    }

    /// Remove every element. Returns false if there was nothing to remove.
    pub fn clear(&mut self) -> bool {
        let ids = self.document.ids();
        if !self.document.clear() {
            return false;
        }
        self.emit(WhiteboardEvent::ElementsRemoved(ids));
        if self.selection.clear() {
            self.emit_selection();
        }
        self.record(HistoryMode::Record);
        true
    }

    /// Bounds of every element, `None` when empty.
    pub fn content_bounds(&self) -> Option<Bounds> {
        self.document.bounds()
    }

    // --- z-order ---

    pub fn bring_to_front<S: AsRef<str>>(&mut self, ids: &[S]) -> bool {
        let changed = self.document.bring_to_front(ids);
        self.after_reorder(changed)
    }

    pub fn send_to_back<S: AsRef<str>>(&mut self, ids: &[S]) -> bool {
        let changed = self.document.send_to_back(ids);
        self.after_reorder(changed)
    }

    pub fn bring_forward<S: AsRef<str>>(&mut self, ids: &[S]) -> bool {
        let changed = self.document.bring_forward(ids);
        self.after_reorder(changed)
    }

    pub fn send_backward<S: AsRef<str>>(&mut self, ids: &[S]) -> bool {
        let changed = self.document.send_backward(ids);
        self.after_reorder(changed)
    }

    fn after_reorder(&mut self, changed: bool) -> bool {
        if changed {
            self.emit(WhiteboardEvent::OrderChanged);
            self.record(HistoryMode::Record);
        }
        changed
    }

    // --- selection ---

    /// Select elements, replacing the selection unless `append`.
    pub fn select<S: AsRef<str>>(&mut self, ids: &[S], append: bool) -> bool {
        let changed = self.selection.select(&self.document, ids, append);
        if changed {
            self.emit_selection();
        }
        changed
    }

    pub fn deselect<S: AsRef<str>>(&mut self, ids: &[S]) -> bool {
        let changed = self.selection.deselect(&self.document, ids);
        if changed {
            self.emit_selection();
        }
        changed
    }

    pub fn clear_selection(&mut self) -> bool {
        let changed = self.selection.clear();
        if changed {
            self.emit_selection();
        }
        changed
    }

    pub fn select_all(&mut self) -> bool {
        let changed = self.selection.select_all(&self.document);
        if changed {
            self.emit_selection();
        }
        changed
    }

    /// Select the visible elements intersecting `area`. Returns the new
    /// selection.
    pub fn select_in_bounds(&mut self, area: &Bounds, append: bool) -> Vec<ElementId> {
        let hits = self.document.elements_in_bounds(area);
        self.select(&hits, append);
        self.selected_ids()
    }

    /// Selected ids in document order.
    pub fn selected_ids(&self) -> Vec<ElementId> {
        self.selection.ids(&self.document)
    }

    /// Copies of the selected elements in document order.
    pub fn selected_elements(&self) -> Vec<Element> {
        self.selection.elements(&self.document)
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.contains(id) && self.document.contains(id)
    }

    /// Bounds of the selected elements, `None` when nothing is selected.
    pub fn selection_bounds(&self) -> Option<Bounds> {
        crate::document::compute_bounds(&self.selected_elements())
    }

    // --- history ---

    fn record(&mut self, mode: HistoryMode) {
        match mode {
            HistoryMode::Record => self.push_history(),
            HistoryMode::Deferred => self.pending_since = Some(Instant::now()),
        }
    }

    fn push_history(&mut self) {
        self.pending_since = None;
        self.history.push(self.document.elements().to_vec());
        self.emit_history();
    }

    /// Push the pending deferred snapshot now. Returns false if none was
    /// pending.
    pub fn commit(&mut self) -> bool {
        if self.pending_since.is_none() {
            return false;
        }
        log::debug!("committing deferred snapshot");
        self.push_history();
        true
    }

    /// Push the pending snapshot if the quiet period has elapsed at `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.pending_since {
            Some(since) if now.saturating_duration_since(since) >= self.config.debounce() => self.commit(),
            _ => false,
        }
    }

    /// [`poll`](Self::poll) with the current time.
    pub fn poll_now(&mut self) -> bool {
        self.poll(Instant::now())
    }

    pub fn has_pending_snapshot(&self) -> bool {
        self.pending_since.is_some()
    }

    /// Step back one recorded change. Clears the selection.
    pub fn undo(&mut self) -> bool {
        self.commit();
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        self.document.restore(snapshot);
        self.after_restore();
        true
    }

    /// Re-apply the last undone change. Clears the selection.
    pub fn redo(&mut self) -> bool {
        if self.pending_since.is_some() {
            // A pending change is a new forward edit; redo is no longer valid
            self.commit();
        }
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        self.document.restore(snapshot);
        self.after_restore();
        true
    }

    fn after_restore(&mut self) {
        self.selection.clear();
        self.emit(WhiteboardEvent::DocumentRestored);
        self.emit_selection();
        self.emit_history();
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo() || self.pending_since.is_some()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo() && self.pending_since.is_none()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    // --- drawing and erasing ---

    /// Turn raw `[x, y]` / `[x, y, pressure]` samples into a finished pen
    /// element. Returns `None` when the samples yield no points.
    pub fn draw_stroke<P: AsRef<[f64]>>(&mut self, samples: &[P], options: &StrokeOptions) -> Result<Option<ElementId>> {
        let options = options.finished();
        let points = stroke_points(samples, &options);
        let Some(origin) = Bounds::from_points(&points.iter().map(PressurePoint::point).collect::<Vec<_>>())
            .map(|b| Point::new(b.min_x, b.min_y))
        else {
            return Ok(None);
        };

        let local: Vec<PressurePoint> = points
            .iter()
            .map(|p| PressurePoint::new(p.x - origin.x, p.y - origin.y, p.pressure))
            .collect();
        let path = svg_path_from_stroke(&stroke_outline(&local, &options), true);

        let mut patch = ElementPatch::new()
            .with_position(origin.x, origin.y)
            .with_points(local)
            .with_path(path);
        patch.style = Some(crate::element::StylePatch {
            stroke_width: Some(options.size),
            ..Default::default()
        });
        let id = self.insert_element(ElementKind::Pen, &patch)?;
        Ok(Some(id))
    }

    /// Draw with the configured stroke options.
    pub fn draw_stroke_default<P: AsRef<[f64]>>(&mut self, samples: &[P]) -> Result<Option<ElementId>> {
        let options = *self.config.stroke_options();
        self.draw_stroke(samples, &options)
    }

    /// Outline path for a stroke still being drawn, in canvas coordinates.
    pub fn preview_stroke<P: AsRef<[f64]>>(&self, samples: &[P]) -> String {
        stroke_to_svg_path(samples, self.config.stroke_options())
    }

    /// Visible elements touched by the probe segment, front to back.
    pub fn elements_hit_by_segment(&self, a: Point, b: Point) -> Vec<ElementId> {
        self.document.elements_at_segment(a, b, self.config.eraser_threshold())
    }

    /// Erase unlocked elements touched by the probe segment.
    pub fn erase_along(&mut self, a: Point, b: Point, mode: HistoryMode) -> Vec<ElementId> {
        let targets: Vec<ElementId> = self
            .elements_hit_by_segment(a, b)
            .into_iter()
            .filter(|id| self.document.get(id).is_some_and(|e| !e.locked))
            .collect();
        self.remove_with(&targets, mode)
            .iter()
            .map(|e| e.id().to_string())
            .collect()
    }

    // --- snapping ---

    /// Snap a canvas point according to the grid settings.
    pub fn snap_point(&self, point: Point) -> SnapResult {
        let grid = &self.config.grid;
        let mode = match (grid.snap, grid.enabled) {
            (SnapMode::None, true) => SnapMode::Grid,
            (mode, _) => mode,
        };
        let targets: Vec<Point> = if mode.snaps_to_elements() {
            let selected = self.selected_ids();
            self.document
                .elements()
                .iter()
                .filter(|e| e.visible && !selected.iter().any(|id| id == e.id()))
                .flat_map(|e| snap::snap_targets_from_bounds(&e.bounds()))
                .collect()
        } else {
            Vec::new()
        };
        snap::snap_point(point, mode, grid.size, &targets)
    }

    /// Snap an angle (degrees) to the nearest 45° step within tolerance.
    pub fn snap_angle(&self, angle: f64) -> f64 {
        snap::nearest_snap_angle(angle, &SNAP_ANGLES, self.config.settings.angle_snap_threshold)
    }

    /// Rotate a line endpoint onto the nearest 45° step within tolerance.
    pub fn snap_line_endpoint(&self, start: Point, end: Point) -> AngleSnapResult {
        snap::snap_line_endpoint(start, end, &SNAP_ANGLES, self.config.settings.angle_snap_threshold)
    }

    // --- viewport ---

    pub fn viewport(&self) -> &Viewport {
        &self.config.viewport
    }

    pub fn screen_to_canvas(&self, point: Point) -> Point {
        self.config.viewport.screen_to_canvas(point)
    }

    pub fn canvas_to_screen(&self, point: Point) -> Point {
        self.config.viewport.canvas_to_screen(point)
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.config.viewport.pan(delta);
        self.emit(WhiteboardEvent::ViewportChanged(self.config.viewport));
    }

    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        self.config.viewport.zoom_at(screen_point, factor);
        self.emit(WhiteboardEvent::ViewportChanged(self.config.viewport));
    }

    pub fn set_zoom(&mut self, zoom: f64) -> Result<()> {
        self.config.viewport.set_zoom(zoom)?;
        self.emit(WhiteboardEvent::ViewportChanged(self.config.viewport));
        Ok(())
    }

    pub fn set_viewport_size(&mut self, width: f64, height: f64) -> Result<()> {
        let resized = Viewport {
            width,
            height,
            ..self.config.viewport
        };
        resized.validate()?;
        self.config.viewport = resized;
        self.emit(WhiteboardEvent::ViewportChanged(resized));
        Ok(())
    }

    /// Fit all content into the viewport, or reset the view when empty.
    pub fn fit_to_content(&mut self, padding: f64) {
        match self.document.bounds() {
            Some(bounds) => self.config.viewport.fit_to_bounds(&bounds, padding),
            None => self.config.viewport.reset(),
        }
        self.emit(WhiteboardEvent::ViewportChanged(self.config.viewport));
    }

    pub fn reset_view(&mut self) {
        self.config.viewport.reset();
        self.emit(WhiteboardEvent::ViewportChanged(self.config.viewport));
    }

    // --- import / export ---

    /// Snapshot the elements and configuration as an export document.
    pub fn export_data(&self) -> ExportDocument {
        ExportDocument::new(&self.config, self.document.elements())
    }

    pub fn export_json(&self) -> Result<String> {
        self.export_data().to_json()
    }

    /// Replace the document from an export payload.
    ///
    /// The whole payload is validated first; on error nothing changes. The
    /// imported elements become the new history baseline.
    pub fn import_data(&mut self, value: serde_json::Value) -> Result<()> {
        let data = ImportData::from_value(value).inspect_err(|err| log::warn!("rejected import: {err}"))?;
        self.apply_import(data);
        Ok(())
    }

    pub fn import_json(&mut self, json: &str) -> Result<()> {
        let data = ImportData::from_json(json).inspect_err(|err| log::warn!("rejected import: {err}"))?;
        self.apply_import(data);
        Ok(())
    }

    fn apply_import(&mut self, data: ImportData) {
        log::debug!(
            "importing {} elements (version {})",
            data.elements.len(),
            data.version.as_deref().unwrap_or("unknown")
        );
        data.apply_config(&mut self.config);
        self.history.set_capacity(self.config.max_history_depth());
        self.history.reset(data.elements.clone());
        self.document.restore(&data.elements);
        self.pending_since = None;
        self.selection.clear();

        self.emit(WhiteboardEvent::ConfigChanged);
        self.emit(WhiteboardEvent::DocumentRestored);
        self.emit_selection();
        self.emit_history();
    }
}
