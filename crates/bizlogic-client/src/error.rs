//! Client error types.
//!
//! [`TransportError`] covers network and HTTP failures; [`ClientError`] is
//! what the cache and descriptor entry points return.

use bizlogic_core::CoreError;

/// Network or HTTP failure reported by a [`crate::Transport`].
///
/// Transports never retry; the error reaches the caller of the entry
/// point that issued the request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The request could not be sent or the response not read.
    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    /// The server answered with a non-success status.
    #[error("request to {url} failed ({status}): {body}")]
    Status { url: String, status: u16, body: String },

    /// The response body was not JSON.
    #[error("response from {url} is not JSON: {reason}")]
    Decode { url: String, reason: String },
}

/// Errors returned by the fetch cache and the descriptor client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The requested id is absent from an already-populated collection.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// The response JSON does not have the expected shape.
    #[error("unexpected {what} payload: {reason}")]
    Decode { what: &'static str, reason: String },

    #[error(transparent)]
    Core(CoreError),
}

impl From<CoreError> for ClientError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { kind, id } => ClientError::NotFound { kind, id },
            other => ClientError::Core(other),
        }
    }
}

impl ClientError {
    /// True for failures a later call may recover from.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound { .. })
    }
}
