//! Long-term memory index trait.
//!
//! Defines the interface for semantic search over a user's past exchanges.
//! Every operation is namespaced by user id; no query ever crosses users.

use bytebond_types::error::RepositoryError;
use bytebond_types::memory::{MemoryRecord, RetrievalResult};

/// Trait for vector-indexed long-term memory.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
/// Implementations live in bytebond-infra.
pub trait LongTermMemoryIndex: Send + Sync {
    /// Insert an immutable record into the user's namespace.
    ///
    /// Fails with a `RepositoryError` when the backend is unavailable or
    /// the record belongs to a different user.
    fn upsert(
        &self,
        user_id: &str,
        record: &MemoryRecord,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Records most similar to `embedding`, descending by similarity.
    ///
    /// Returns an empty vec for a user with no records. Results are
    /// deterministic for identical inputs with no intervening writes.
    fn query(
        &self,
        user_id: &str,
        embedding: &[f32],
        top_k: usize,
        min_similarity: f32,
    ) -> impl std::future::Future<Output = Result<Vec<RetrievalResult>, RepositoryError>> + Send;

    /// Count records for a user.
    fn count(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// Delete every record for a user. Returns the count of deleted records.
    fn delete_all(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
