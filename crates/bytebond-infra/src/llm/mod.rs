//! Generation backend and embedder construction.
//!
//! [`create_backend`] and [`create_embedder`] pick the concrete adapter
//! from the loaded configuration and the resolved API key.

pub mod gemini;

use secrecy::SecretString;

use bytebond_core::llm::box_backend::BoxGenerationBackend;
use bytebond_core::memory::box_embedder::BoxEmbedder;
use bytebond_types::config::CompanionConfig;
use bytebond_types::error::EmbeddingError;
use bytebond_types::llm::LlmError;

use crate::memory::hashing::HashingEmbedder;

use self::gemini::{GeminiBackend, GeminiEmbedder};

/// Create the Gemini generation backend.
///
/// # Errors
///
/// Returns [`LlmError::AuthenticationFailed`] when no API key is available;
/// there is no offline generation backend.
pub fn create_backend(
    config: &CompanionConfig,
    api_key: Option<SecretString>,
) -> Result<BoxGenerationBackend, LlmError> {
    let key = api_key.ok_or(LlmError::AuthenticationFailed)?;
    let backend = GeminiBackend::new(
        key,
        config.generation.model.clone(),
        config.generation.temperature,
    )?;
    tracing::debug!(model = %config.generation.model, "gemini backend ready");
    Ok(BoxGenerationBackend::new(backend))
}

/// Create the embedder: Gemini when a key is present, otherwise the local
/// hashing embedder.
pub fn create_embedder(
    config: &CompanionConfig,
    api_key: Option<SecretString>,
) -> Result<BoxEmbedder, EmbeddingError> {
    let dimension = config.memory.embedding_dimension;
    match api_key {
        Some(key) => {
            let embedder =
                GeminiEmbedder::new(key, config.generation.embedding_model.clone(), dimension)?;
            Ok(BoxEmbedder::new(embedder))
        }
        None => {
            tracing::warn!("No Gemini API key, using local hashing embedder");
            Ok(BoxEmbedder::new(HashingEmbedder::new(dimension)))
        }
    }
}
