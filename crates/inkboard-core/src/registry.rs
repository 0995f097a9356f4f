//! Named, independent whiteboard instances.

use crate::config::WhiteboardConfig;
use crate::error::{Result, WhiteboardError};
use crate::whiteboard::Whiteboard;
use std::collections::HashMap;

/// Owns whiteboards by name. Boards share nothing with each other.
#[derive(Debug, Default)]
pub struct WhiteboardRegistry {
    boards: HashMap<String, Whiteboard>,
}

impl WhiteboardRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a board under `name`. Fails if the name is taken or the
    /// configuration is invalid.
    pub fn create(&mut self, name: &str, config: WhiteboardConfig) -> Result<&mut Whiteboard> {
        if self.boards.contains_key(name) {
            return Err(WhiteboardError::BoardExists(name.to_string()));
        }
        let board = Whiteboard::with_config(config)?;
        log::debug!("created whiteboard {name}");
        Ok(self.boards.entry(name.to_string()).or_insert(board))
    }

    /// Get a board, creating it with the default configuration if needed.
    pub fn get_or_create(&mut self, name: &str) -> &mut Whiteboard {
        self.boards.entry(name.to_string()).or_default()
    }

    pub fn get(&self, name: &str) -> Option<&Whiteboard> {
        self.boards.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Whiteboard> {
        self.boards.get_mut(name)
    }

    /// Remove a board, handing it back to the caller.
    pub fn remove(&mut self, name: &str) -> Option<Whiteboard> {
        let removed = self.boards.remove(name);
        if removed.is_some() {
            log::debug!("removed whiteboard {name}");
        }
        removed
    }

    /// Board names, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.boards.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn contains(&self, name: &str) -> bool {
        self.boards.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.boards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }
}
