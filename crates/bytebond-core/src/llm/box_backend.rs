//! BoxGenerationBackend -- object-safe dynamic dispatch wrapper for GenerationBackend.
//!
//! 1. Define an object-safe `GenerationBackendDyn` trait with boxed futures
//! 2. Blanket-impl `GenerationBackendDyn` for all `T: GenerationBackend`
//! 3. `BoxGenerationBackend` wraps `Box<dyn GenerationBackendDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use bytebond_types::llm::{GenerationEnvelope, LlmError};

use super::backend::GenerationBackend;

/// Object-safe version of [`GenerationBackend`] with boxed futures.
pub trait GenerationBackendDyn: Send + Sync {
    fn name(&self) -> &str;

    fn model(&self) -> &str;

    fn generate_boxed<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<GenerationEnvelope>, LlmError>> + Send + 'a>>;
}

impl<T: GenerationBackend> GenerationBackendDyn for T {
    fn name(&self) -> &str {
        GenerationBackend::name(self)
    }

    fn model(&self) -> &str {
        GenerationBackend::model(self)
    }

    fn generate_boxed<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<GenerationEnvelope>, LlmError>> + Send + 'a>>
    {
        Box::pin(self.generate(prompt))
    }
}

/// Type-erased generation backend for runtime provider selection.
pub struct BoxGenerationBackend {
    inner: Box<dyn GenerationBackendDyn + Send + Sync>,
}

impl BoxGenerationBackend {
    /// Wrap a concrete `GenerationBackend` in a type-erased box.
    pub fn new<T: GenerationBackend + 'static>(backend: T) -> Self {
        Self {
            inner: Box::new(backend),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn model(&self) -> &str {
        self.inner.model()
    }

    pub async fn generate(&self, prompt: &str) -> Result<Option<GenerationEnvelope>, LlmError> {
        self.inner.generate_boxed(prompt).await
    }
}
