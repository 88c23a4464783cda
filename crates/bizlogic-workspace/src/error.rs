//! Workspace error types.

use thiserror::Error;

/// Errors produced while moving program text in and out of a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkspaceError {
    /// Program or toolbox text is not a well-formed document.
    ///
    /// The workspace is left in its prior valid state.
    #[error("serialization error: {reason}")]
    Serialization { reason: String },

    /// An operation that needs a live workspace was called before injection.
    #[error("workspace is not initialized")]
    NotReady,

    /// Injection was requested while a workspace is already live.
    #[error("workspace is already initialized; tear it down first")]
    AlreadyInitialized,

    /// The workspace library rejected an operation.
    #[error("workspace library error: {reason}")]
    Library { reason: String },
}

impl From<roxmltree::Error> for WorkspaceError {
    fn from(err: roxmltree::Error) -> Self {
        WorkspaceError::Serialization {
            reason: err.to_string(),
        }
    }
}
