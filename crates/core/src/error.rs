use crate::types::JobId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// The `deleted` flag is monotonic; operating on an already-deleted
    /// asset is rejected rather than silently accepted.
    #[error("Asset already deleted for job {0}")]
    AlreadyDeleted(JobId),

    /// A required credential is absent from both the environment and the
    /// secret file. Fatal for the operation, never retried.
    #[error("{0}")]
    MissingCredential(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
