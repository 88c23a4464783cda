//! Core error types for bizlogic-core.

use thiserror::Error;

/// Errors produced by the record model and the toolbox layer.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The requested id is absent from an already-populated collection.
    ///
    /// Refetching would not add the id, so callers must not retry.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// A toolbox fragment could not be generated from its descriptor data.
    #[error("malformed toolbox fragment: {reason}")]
    MalformedFragment { reason: String },
}
