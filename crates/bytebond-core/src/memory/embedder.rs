//! Embedder trait for text-to-vector conversion.
//!
//! Implementations (Gemini embeddings, local feature hashing) live in
//! bytebond-infra.

use bytebond_types::error::EmbeddingError;

/// Trait for converting text into an embedding vector.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
/// No retries happen inside an embedder; a failure is reported once and
/// the caller decides how to degrade.
pub trait Embedder: Send + Sync {
    /// Embed a single text.
    fn embed(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<Vec<f32>, EmbeddingError>> + Send;

    /// The model name used for embeddings (e.g., "text-embedding-004").
    fn model_name(&self) -> &str;

    /// The dimensionality of the output vectors.
    fn dimension(&self) -> usize;
}
