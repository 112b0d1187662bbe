use thiserror::Error;

use anamnesis_core::error::CoreError;
use anamnesis_storage::error::StorageError;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("malformed answer to '{question_id}': {reason}")]
    MalformedAnswer { question_id: String, reason: String },

    #[error("generator produced an invalid insight: {0}")]
    InvalidPayload(#[from] CoreError),

    #[error("generator unavailable: {0}")]
    Unavailable(String),
}

/// Never surfaced to callers of the pipeline; a failing cache is a miss.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("insight already exists for tenant '{tenant_id}', session '{session_id}'")]
    Conflict {
        tenant_id: String,
        session_id: String,
    },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("repository backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("insight generation failed: {0}")]
    Generator(#[from] GeneratorError),

    #[error("insight persistence failed: {0}")]
    Repository(#[from] RepositoryError),

    /// A create conflicted but the winning row could not be read back.
    #[error("insight for tenant '{tenant_id}', session '{session_id}' conflicted and could not be re-read")]
    UnresolvedConflict {
        tenant_id: String,
        session_id: String,
    },
}
