//! BoxMemoryIndex -- object-safe dynamic dispatch wrapper for LongTermMemoryIndex.

use std::future::Future;
use std::pin::Pin;

use bytebond_types::error::RepositoryError;
use bytebond_types::memory::{MemoryRecord, RetrievalResult};

use super::vector::LongTermMemoryIndex;

/// Object-safe version of [`LongTermMemoryIndex`] with boxed futures.
pub trait LongTermMemoryIndexDyn: Send + Sync {
    fn upsert_boxed<'a>(
        &'a self,
        user_id: &'a str,
        record: &'a MemoryRecord,
    ) -> Pin<Box<dyn Future<Output = Result<(), RepositoryError>> + Send + 'a>>;

    fn query_boxed<'a>(
        &'a self,
        user_id: &'a str,
        embedding: &'a [f32],
        top_k: usize,
        min_similarity: f32,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RetrievalResult>, RepositoryError>> + Send + 'a>>;

    fn count_boxed<'a>(
        &'a self,
        user_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<u64, RepositoryError>> + Send + 'a>>;

    fn delete_all_boxed<'a>(
        &'a self,
        user_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<u64, RepositoryError>> + Send + 'a>>;
}

impl<T: LongTermMemoryIndex> LongTermMemoryIndexDyn for T {
    fn upsert_boxed<'a>(
        &'a self,
        user_id: &'a str,
        record: &'a MemoryRecord,
    ) -> Pin<Box<dyn Future<Output = Result<(), RepositoryError>> + Send + 'a>> {
        Box::pin(self.upsert(user_id, record))
    }

    fn query_boxed<'a>(
        &'a self,
        user_id: &'a str,
        embedding: &'a [f32],
        top_k: usize,
        min_similarity: f32,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RetrievalResult>, RepositoryError>> + Send + 'a>>
    {
        Box::pin(self.query(user_id, embedding, top_k, min_similarity))
    }

    fn count_boxed<'a>(
        &'a self,
        user_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<u64, RepositoryError>> + Send + 'a>> {
        Box::pin(self.count(user_id))
    }

    fn delete_all_boxed<'a>(
        &'a self,
        user_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<u64, RepositoryError>> + Send + 'a>> {
        Box::pin(self.delete_all(user_id))
    }
}

/// Type-erased long-term memory index for runtime backend selection.
pub struct BoxMemoryIndex {
    inner: Box<dyn LongTermMemoryIndexDyn + Send + Sync>,
}

impl BoxMemoryIndex {
    pub fn new<T: LongTermMemoryIndex + 'static>(index: T) -> Self {
        Self {
            inner: Box::new(index),
        }
    }

    pub async fn upsert(&self, user_id: &str, record: &MemoryRecord) -> Result<(), RepositoryError> {
        self.inner.upsert_boxed(user_id, record).await
    }

    pub async fn query(
        &self,
        user_id: &str,
        embedding: &[f32],
        top_k: usize,
        min_similarity: f32,
    ) -> Result<Vec<RetrievalResult>, RepositoryError> {
        self.inner
            .query_boxed(user_id, embedding, top_k, min_similarity)
            .await
    }

    pub async fn count(&self, user_id: &str) -> Result<u64, RepositoryError> {
        self.inner.count_boxed(user_id).await
    }

    pub async fn delete_all(&self, user_id: &str) -> Result<u64, RepositoryError> {
        self.inner.delete_all_boxed(user_id).await
    }
}
