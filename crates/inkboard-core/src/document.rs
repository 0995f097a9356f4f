//! The ordered element collection.

use crate::bounds::Bounds;
use crate::element::{Element, ElementId, ElementPatch};
use crate::error::{Result, WhiteboardError};
use crate::geometry::bounding_boxes_intersect;
use kurbo::Point;
use std::collections::HashSet;

/// Elements in z-order (back to front), unique by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    elements: Vec<Element>,
}

/// Reject batches that collide with `existing` or repeat an id internally.
fn check_unique<'a>(existing: &HashSet<&'a str>, incoming: impl IntoIterator<Item = &'a Element>) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::new();
    for element in incoming {
        let id = element.id();
        if existing.contains(id) || !seen.insert(id) {
            return Err(WhiteboardError::DuplicateId(id.to_string()));
        }
    }
    Ok(())
}

fn id_set<S: AsRef<str>>(ids: &[S]) -> HashSet<&str> {
    ids.iter().map(|id| id.as_ref()).collect()
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from elements, rejecting duplicate ids.
    pub fn from_elements(elements: Vec<Element>) -> Result<Self> {
        check_unique(&HashSet::new(), &elements)?;
        Ok(Self { elements })
    }

    /// Append elements on top. Nothing is added if any id is already taken.
    pub fn add(&mut self, elements: Vec<Element>) -> Result<()> {
        let existing: HashSet<&str> = self.elements.iter().map(Element::id).collect();
        check_unique(&existing, &elements)?;
        self.elements.extend(elements);
        Ok(())
    }

    /// Merge a patch into one element. Returns false for unknown ids.
    pub fn update(&mut self, id: &str, patch: &ElementPatch) -> bool {
        match self.elements.iter_mut().find(|e| e.id() == id) {
            Some(slot) => {
                *slot = slot.patched(patch);
                true
            }
            None => false,
        }
    }

    /// Merge several patches. Returns how many elements were updated.
    pub fn update_many(&mut self, patches: &[(ElementId, ElementPatch)]) -> usize {
        let mut updated = 0;
        for (id, patch) in patches {
            if self.update(id, patch) {
                updated += 1;
            }
        }
        updated
    }

    /// Swap in a whole new version of an element with the same id.
    pub fn replace(&mut self, element: Element) -> bool {
        match self.elements.iter_mut().find(|e| e.id == element.id) {
            Some(slot) => {
                *slot = element;
                true
            }
            None => false,
        }
    }

    /// Remove elements by id. Unknown ids are ignored.
    pub fn remove<S: AsRef<str>>(&mut self, ids: &[S]) -> Vec<Element> {
        let targets = id_set(ids);
        let (removed, kept): (Vec<Element>, Vec<Element>) =
            std::mem::take(&mut self.elements).into_iter().partition(|e| targets.contains(e.id()));
        self.elements = kept;
        removed
    }

    /// Remove everything. Returns false if the document was already empty.
    pub fn clear(&mut self) -> bool {
        let had_elements = !self.elements.is_empty();
        self.elements.clear();
        had_elements
    }

    /// Replace the whole collection, rejecting duplicate ids.
    pub fn replace_all(&mut self, elements: Vec<Element>) -> Result<()> {
        check_unique(&HashSet::new(), &elements)?;
        self.elements = elements;
        Ok(())
    }

    /// Restore a previously taken snapshot.
    pub(crate) fn restore(&mut self, elements: &[Element]) {
        self.elements = elements.to_vec();
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Elements in z-order (back to front).
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn ids(&self) -> Vec<ElementId> {
        self.elements.iter().map(|e| e.id.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Move elements above everything else, keeping their relative order.
    pub fn bring_to_front<S: AsRef<str>>(&mut self, ids: &[S]) -> bool {
        let targets = id_set(ids);
        let before = self.ids();
        let (mut moved, rest): (Vec<Element>, Vec<Element>) =
            std::mem::take(&mut self.elements).into_iter().partition(|e| targets.contains(e.id()));
        self.elements = rest;
        self.elements.append(&mut moved);
        self.order_changed(&before)
    }

    /// Move elements below everything else, keeping their relative order.
    pub fn send_to_back<S: AsRef<str>>(&mut self, ids: &[S]) -> bool {
        let targets = id_set(ids);
        let before = self.ids();
        let (mut moved, mut rest): (Vec<Element>, Vec<Element>) =
            std::mem::take(&mut self.elements).into_iter().partition(|e| targets.contains(e.id()));
        moved.append(&mut rest);
        self.elements = moved;
        self.order_changed(&before)
    }

    /// Move each element one layer towards the front.
    /// Returns true if anything moved.
    pub fn bring_forward<S: AsRef<str>>(&mut self, ids: &[S]) -> bool {
        let targets = id_set(ids);
        let mut moved = false;
        for i in (0..self.elements.len().saturating_sub(1)).rev() {
            if targets.contains(self.elements[i].id()) && !targets.contains(self.elements[i + 1].id()) {
                self.elements.swap(i, i + 1);
                moved = true;
            }
        }
        moved
    }

    /// Move each element one layer towards the back.
    /// Returns true if anything moved.
    pub fn send_backward<S: AsRef<str>>(&mut self, ids: &[S]) -> bool {
        let targets = id_set(ids);
        let mut moved = false;
        for i in 1..self.elements.len() {
            if targets.contains(self.elements[i].id()) && !targets.contains(self.elements[i - 1].id()) {
                self.elements.swap(i, i - 1);
                moved = true;
            }
        }
        moved
    }

    fn order_changed(&self, before: &[ElementId]) -> bool {
        self.elements.iter().map(|e| &e.id).ne(before.iter())
    }

    /// Visible elements touched by the probe segment, front to back.
    pub fn elements_at_segment(&self, a: Point, b: Point, threshold: f64) -> Vec<ElementId> {
        self.elements
            .iter()
            .rev()
            .filter(|e| e.visible && e.hit_by_segment(a, b, threshold))
            .map(|e| e.id.clone())
            .collect()
    }

    /// Visible elements whose bounds intersect `area`, back to front.
    pub fn elements_in_bounds(&self, area: &Bounds) -> Vec<ElementId> {
        self.elements
            .iter()
            .filter(|e| e.visible && bounding_boxes_intersect(&e.bounds(), area))
            .map(|e| e.id.clone())
            .collect()
    }

    /// Bounds of every element, `None` for an empty document.
    pub fn bounds(&self) -> Option<Bounds> {
        compute_bounds(&self.elements)
    }
}

/// Union of the bounds of `elements`, `None` for an empty slice.
pub fn compute_bounds(elements: &[Element]) -> Option<Bounds> {
    elements
        .iter()
        .map(Element::bounds)
        .reduce(|acc, b| acc.union(&b))
}
