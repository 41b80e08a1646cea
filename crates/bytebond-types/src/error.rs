use thiserror::Error;

/// Errors produced by an embedding service.
///
/// Always recoverable at the turn level: the orchestrator skips retrieval
/// (or long-term persistence) instead of failing the turn.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("cannot embed empty text")]
    EmptyInput,

    #[error("embedding backend error: {0}")]
    Backend(String),

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Errors from repository operations (used by trait definitions in bytebond-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("storage connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors from a profile provider.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("profile not found for user '{user_id}'")]
    NotFound { user_id: String },

    #[error("profile backend error: {0}")]
    Backend(String),
}

/// Errors loading file-backed data (profiles, configuration).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}

/// The only errors a caller of the orchestrator can observe.
///
/// Everything else (embedding failures, retrieval misses, exhausted
/// generation, persistence failures) degrades inside the turn.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("profile not found for user '{user_id}'")]
    ProfileNotFound { user_id: String },

    #[error("user input is empty")]
    EmptyInput,

    #[error("turn cancelled before completion")]
    Cancelled,
}
