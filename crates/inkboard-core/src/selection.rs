//! The set of selected elements.

use crate::document::Document;
use crate::element::{Element, ElementId};
use std::collections::HashSet;

/// Selected element ids, kept a subset of a document's ids.
///
/// Every selection-changing call first drops ids whose elements no longer
/// exist. Reads hand out copies in document (z) order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    ids: HashSet<ElementId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop ids that are not in `document`. Returns how many were dropped.
    pub fn prune(&mut self, document: &Document) -> usize {
        let before = self.ids.len();
        self.ids.retain(|id| document.contains(id));
        before - self.ids.len()
    }

    /// Select `ids`, replacing the current selection unless `append`.
    /// Ids that are not in the document are ignored. Returns whether the
    /// selection changed.
    pub fn select<S: AsRef<str>>(&mut self, document: &Document, ids: &[S], append: bool) -> bool {
        let before = self.ids.clone();
        self.prune(document);
        if !append {
            self.ids.clear();
        }
        for id in ids {
            let id = id.as_ref();
            if document.contains(id) {
                self.ids.insert(id.to_string());
            }
        }
        self.ids != before
    }

    /// Remove `ids` from the selection. Returns whether it changed.
    pub fn deselect<S: AsRef<str>>(&mut self, document: &Document, ids: &[S]) -> bool {
        let pruned = self.prune(document);
        let mut removed = false;
        for id in ids {
            removed |= self.ids.remove(id.as_ref());
        }
        removed || pruned > 0
    }

    /// Select every element in the document.
    pub fn select_all(&mut self, document: &Document) -> bool {
        let all: HashSet<ElementId> = document.elements().iter().map(|e| e.id().to_string()).collect();
        let changed = all != self.ids;
        self.ids = all;
        changed
    }

    /// Empty the selection. Returns false if it was already empty.
    pub fn clear(&mut self) -> bool {
        let had_any = !self.ids.is_empty();
        self.ids.clear();
        had_any
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Selected ids that still exist, in document order.
    pub fn ids(&self, document: &Document) -> Vec<ElementId> {
        document
            .elements()
            .iter()
            .filter(|e| self.ids.contains(e.id()))
            .map(|e| e.id().to_string())
            .collect()
    }

    /// Copies of the selected elements, in document order.
    pub fn elements(&self, document: &Document) -> Vec<Element> {
        document
            .elements()
            .iter()
            .filter(|e| self.ids.contains(e.id()))
            .cloned()
            .collect()
    }
}
