//! Error type shared by the whiteboard engine.

use thiserror::Error;

/// Errors raised by whiteboard operations.
///
/// Routine no-ops (undo with an empty stack, removing an unknown id) are not
/// errors and never produce one of these.
#[derive(Debug, Error)]
pub enum WhiteboardError {
    #[error("Unknown element kind: {0}")]
    UnknownKind(String),
    #[error("{0}")]
    InvalidData(String),
    #[error("Duplicate element id: {0}")]
    DuplicateId(String),
    #[error("Whiteboard already exists: {0}")]
    BoardExists(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl WhiteboardError {
    /// The error returned when an import payload has no usable element list.
    pub(crate) fn invalid_format() -> Self {
        WhiteboardError::InvalidData("Invalid data format".to_string())
    }
}

/// Result type for whiteboard operations.
pub type Result<T> = std::result::Result<T, WhiteboardError>;
