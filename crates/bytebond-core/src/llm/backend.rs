//! GenerationBackend trait definition.
//!
//! A backend is an opaque text-in, envelope-out generator. It performs
//! exactly one call per `generate`; retrying and response validation are
//! the [`GenerationClient`](super::client::GenerationClient)'s job.

use bytebond_types::llm::{GenerationEnvelope, LlmError};

/// Trait for generative text backends (Gemini, test doubles, etc.).
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait GenerationBackend: Send + Sync {
    /// Provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Model identifier sent with each request.
    fn model(&self) -> &str;

    /// Send one prompt and return the raw envelope.
    ///
    /// `Ok(None)` means the backend answered without a response body.
    fn generate(
        &self,
        prompt: &str,
    ) -> impl std::future::Future<Output = Result<Option<GenerationEnvelope>, LlmError>> + Send;
}
