//! Bounded undo/redo history over element snapshots.

use crate::element::Element;
use std::collections::VecDeque;

/// Default number of undo states kept.
pub const DEFAULT_HISTORY_DEPTH: usize = 100;

/// A deep copy of the element collection at one point in time.
pub type Snapshot = Vec<Element>;

/// Linear undo/redo history.
///
/// The undo stack holds the state after each recorded change, newest last.
/// Below it sits the baseline: the state the history started from, or the
/// newest state evicted by the depth cap.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: VecDeque<Snapshot>,
    redo_stack: Vec<Snapshot>,
    baseline: Snapshot,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DEPTH)
    }
}

impl History {
    /// Create a history holding at most `capacity` undo states (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            baseline: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Record the state after a change. Clears the redo stack.
    pub fn push(&mut self, snapshot: Snapshot) {
        self.undo_stack.push_back(snapshot);
        self.redo_stack.clear();
        self.enforce_capacity();
        log::debug!("history push: {} undo states", self.undo_stack.len());
    }

    fn enforce_capacity(&mut self) {
        while self.undo_stack.len() > self.capacity {
            if let Some(evicted) = self.undo_stack.pop_front() {
                self.baseline = evicted;
            }
        }
    }

    /// Step back. Returns the state to restore, `None` if there is nothing
    /// to undo.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        let top = self.undo_stack.pop_back()?;
        self.redo_stack.push(top);
        log::debug!("undo: {} undo / {} redo states", self.undo_stack.len(), self.redo_stack.len());
        Some(self.current())
    }

    /// Step forward. Returns the state to restore, `None` if there is nothing
    /// to redo.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push_back(next);
        self.enforce_capacity();
        log::debug!("redo: {} undo / {} redo states", self.undo_stack.len(), self.redo_stack.len());
        Some(self.current())
    }

    /// The state the document should be in right now.
    pub fn current(&self) -> &Snapshot {
        self.undo_stack.back().unwrap_or(&self.baseline)
    }

    /// The state below the oldest undo entry.
    pub fn baseline(&self) -> &Snapshot {
        &self.baseline
    }

    /// Forget all states and start over from `baseline`.
    pub fn reset(&mut self, baseline: Snapshot) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.baseline = baseline;
    }

    /// Change the depth cap, evicting the oldest states if needed.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        self.enforce_capacity();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of undo states.
    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
