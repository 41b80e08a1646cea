//! Application state wiring the orchestrator together.
//!
//! The orchestrator is generic over its profile provider and short-term
//! store; AppState pins it to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use bytebond_core::llm::client::GenerationClient;
use bytebond_core::memory::box_vector::BoxMemoryIndex;
use bytebond_core::orchestrator::hook::LogExhaustionHook;
use bytebond_core::orchestrator::service::ResponseOrchestrator;
use bytebond_infra::filesystem::{memory_journal_path, profiles_path};
use bytebond_infra::llm::{create_backend, create_embedder};
use bytebond_infra::memory::short_term::InMemoryShortTermStore;
use bytebond_infra::memory::vector::InMemoryMemoryIndex;
use bytebond_infra::profile::FileProfileProvider;
use bytebond_infra::secret::env::{EnvSecretProvider, GEMINI_API_KEY};
use bytebond_types::config::CompanionConfig;

/// Orchestrator pinned to the file profile provider and in-memory window.
pub type ConcreteOrchestrator = ResponseOrchestrator<FileProfileProvider, InMemoryShortTermStore>;

/// Shared application state for all commands.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ConcreteOrchestrator>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Load profiles, open the memory journal, and wire the orchestrator.
    ///
    /// Fails when no Gemini API key is configured: generation has no
    /// offline fallback.
    pub async fn init(data_dir: PathBuf, config: CompanionConfig) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let api_key = EnvSecretProvider::new().get(GEMINI_API_KEY);

        let embedder = create_embedder(&config, api_key.clone())?;
        let backend = create_backend(&config, api_key).map_err(|_| {
            anyhow::anyhow!(
                "generation is unavailable: set {GEMINI_API_KEY} (or BYTEBOND_{GEMINI_API_KEY})"
            )
        })?;
        let generator = GenerationClient::from_config(backend, &config.generation);

        let profiles = FileProfileProvider::load(&profiles_path(&data_dir)).await?;
        let memory = InMemoryMemoryIndex::open(memory_journal_path(&data_dir)).await?;
        let short_term = InMemoryShortTermStore::new(config.memory.short_term_capacity);

        let hook = Arc::new(LogExhaustionHook::new(config.exhaustion_warn_threshold));
        let orchestrator = ResponseOrchestrator::new(
            profiles,
            short_term,
            embedder,
            BoxMemoryIndex::new(memory),
            generator,
            config,
        )
        .with_exhaustion_hook(hook);

        Ok(Self {
            orchestrator: Arc::new(orchestrator),
            data_dir,
        })
    }
}
