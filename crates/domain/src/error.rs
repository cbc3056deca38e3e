//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`TodoError`]
//! via `From`. The HTTP adapter maps every variant to exactly one status code.

/// Top-level error returned by use-cases and repositories.
#[derive(Debug, thiserror::Error)]
pub enum TodoError {
    /// Malformed input from the client.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The client attempted an operation it is never allowed to perform.
    #[error("forbidden: {0}")]
    Forbidden(#[from] ForbiddenError),

    /// The addressed record does not exist.
    #[error("{0}")]
    NotFound(#[from] NotFoundError),

    /// Connectivity, throttling or (de)serialization failure against the store.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Input validation failures.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// No 24-character hexadecimal identifier could be extracted.
    #[error("invalid id")]
    InvalidId,

    /// The request body is not a valid todo payload.
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
}

/// Operations that are rejected regardless of the record state.
#[derive(Debug, thiserror::Error)]
pub enum ForbiddenError {
    /// An update payload carried a non-empty `id` field.
    #[error("updating the id field is forbidden")]
    IdMutation,
}

/// A record that was looked up does not exist.
#[derive(Debug, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}
