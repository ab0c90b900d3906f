//! Error types for the editing engine.

use crate::shapes::ShapeId;
use thiserror::Error;

/// Errors from operations that can actually fail.
///
/// Missing ids and empty undo stacks are not errors; those operations are no-ops.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Failed to parse sketch: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("Duplicate shape id in sketch: {0}")]
    DuplicateId(ShapeId),
    #[error("Failed to serialize sketch: {0}")]
    Serialization(#[source] serde_json::Error),
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[source] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;
