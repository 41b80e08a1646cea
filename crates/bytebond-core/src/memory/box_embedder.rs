//! BoxEmbedder -- object-safe dynamic dispatch wrapper for Embedder.
//!
//! Same blanket-impl pattern as BoxGenerationBackend:
//! 1. Define an object-safe `EmbedderDyn` trait with boxed futures
//! 2. Blanket-impl `EmbedderDyn` for all `T: Embedder`
//! 3. `BoxEmbedder` wraps `Box<dyn EmbedderDyn>` and delegates
//!
//! The wrapper also enforces the embedding contract for every backend:
//! blank input is rejected before the backend is called, and vectors of
//! the wrong dimension are rejected after.

use std::future::Future;
use std::pin::Pin;

use bytebond_types::error::EmbeddingError;

use super::embedder::Embedder;

/// Object-safe version of [`Embedder`] with boxed futures.
pub trait EmbedderDyn: Send + Sync {
    fn embed_boxed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, EmbeddingError>> + Send + 'a>>;

    fn model_name_dyn(&self) -> &str;

    fn dimension_dyn(&self) -> usize;
}

impl<T: Embedder> EmbedderDyn for T {
    fn embed_boxed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, EmbeddingError>> + Send + 'a>> {
        Box::pin(self.embed(text))
    }

    fn model_name_dyn(&self) -> &str {
        self.model_name()
    }

    fn dimension_dyn(&self) -> usize {
        self.dimension()
    }
}

/// Type-erased embedder for runtime selection.
pub struct BoxEmbedder {
    inner: Box<dyn EmbedderDyn + Send + Sync>,
}

impl BoxEmbedder {
    /// Wrap a concrete `Embedder` in a type-erased box.
    pub fn new<T: Embedder + 'static>(embedder: T) -> Self {
        Self {
            inner: Box::new(embedder),
        }
    }

    /// Embed a text into a vector of [`dimension`](Self::dimension) floats.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }
        let vector = self.inner.embed_boxed(text).await?;
        let expected = self.inner.dimension_dyn();
        if vector.len() != expected {
            return Err(EmbeddingError::DimensionMismatch {
                expected,
                actual: vector.len(),
            });
        }
        Ok(vector)
    }

    /// The model name used for embeddings.
    pub fn model_name(&self) -> &str {
        self.inner.model_name_dyn()
    }

    /// The dimensionality of the output vectors.
    pub fn dimension(&self) -> usize {
        self.inner.dimension_dyn()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FixedEmbedder {
        output: Vec<f32>,
        dimension: usize,
        calls: Arc<AtomicUsize>,
    }

    impl Embedder for FixedEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.output.clone())
        }

        fn model_name(&self) -> &str {
            "fixed"
        }

        fn dimension(&self) -> usize {
            self.dimension
        }
    }

    fn boxed(output: Vec<f32>, dimension: usize) -> (BoxEmbedder, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let embedder = BoxEmbedder::new(FixedEmbedder {
            output,
            dimension,
            calls: calls.clone(),
        });
        (embedder, calls)
    }

    #[tokio::test]
    async fn test_embed_delegates() {
        let (embedder, calls) = boxed(vec![0.5, 0.5], 2);
        let v = embedder.embed("hello").await.unwrap();
        assert_eq!(v, vec![0.5, 0.5]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(embedder.model_name(), "fixed");
        assert_eq!(embedder.dimension(), 2);
    }

    #[tokio::test]
    async fn test_blank_input_rejected_without_backend_call() {
        let (embedder, calls) = boxed(vec![1.0], 1);
        let err = embedder.embed("   \n").await.unwrap_err();
        assert!(matches!(err, EmbeddingError::EmptyInput));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_wrong_dimension_rejected() {
        let (embedder, _) = boxed(vec![1.0, 2.0, 3.0], 4);
        let err = embedder.embed("hello").await.unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::DimensionMismatch {
                expected: 4,
                actual: 3
            }
        ));
    }
}
