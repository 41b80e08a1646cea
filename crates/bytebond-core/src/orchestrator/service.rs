//! ResponseOrchestrator -- one memory-augmented turn, end to end.
//!
//! ```text
//! FETCHING_CONTEXT -> EMBEDDING_INPUT -> RETRIEVING_MEMORY -> ASSEMBLING_PROMPT
//!     -> GENERATING -> PERSISTING -> DONE          (FAILED from any stage)
//! ```
//!
//! Only a missing profile, empty input, or cancellation fail a turn. An
//! embedding or retrieval failure drops the memory section, an exhausted
//! generation sends the apology, and a persistence failure is logged
//! without touching the reply.

use std::sync::Arc;

use dashmap::DashMap;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

use bytebond_types::config::CompanionConfig;
use bytebond_types::conversation::{ConversationTurn, Speaker};
use bytebond_types::error::{ProfileError, RepositoryError, TurnError};
use bytebond_types::memory::{MemoryRecord, RetrievalResult};
use bytebond_types::profile::{Concern, PersonaMode, Profile};

use crate::llm::client::{GenerationClient, GenerationOutcome};
use crate::memory::box_embedder::BoxEmbedder;
use crate::memory::box_vector::BoxMemoryIndex;
use crate::memory::short_term::ShortTermStore;
use crate::profile::provider::ProfileProvider;
use crate::prompt::assembler::PromptAssembler;

use super::hook::{ExhaustionHook, NoopExhaustionHook};
use super::locks::UserLocks;
use super::stage::{
    Degradation, PersistenceReport, Reply, TurnReport, TurnStage, WriteStatus,
};

/// Context gathered in FETCHING_CONTEXT.
struct TurnContext {
    profile: Profile,
    concerns: Vec<Concern>,
    history: Vec<ConversationTurn>,
}

/// Coordinates profile lookup, memory retrieval, generation and persistence.
///
/// Generic over `ProfileProvider` and `ShortTermStore`; the embedder,
/// long-term index and generation backend are boxed for runtime selection.
pub struct ResponseOrchestrator<P: ProfileProvider, S: ShortTermStore> {
    profiles: P,
    short_term: S,
    embedder: BoxEmbedder,
    memory: BoxMemoryIndex,
    generator: GenerationClient,
    assembler: PromptAssembler,
    config: CompanionConfig,
    locks: UserLocks,
    exhausted_streaks: DashMap<String, u32>,
    exhaustion_hook: Arc<dyn ExhaustionHook>,
}

impl<P: ProfileProvider, S: ShortTermStore> ResponseOrchestrator<P, S> {
    pub fn new(
        profiles: P,
        short_term: S,
        embedder: BoxEmbedder,
        memory: BoxMemoryIndex,
        generator: GenerationClient,
        config: CompanionConfig,
    ) -> Self {
        let assembler =
            PromptAssembler::new(config.persona.mode, config.persona.assistant_name.clone());
        Self {
            profiles,
            short_term,
            embedder,
            memory,
            generator,
            assembler,
            config,
            locks: UserLocks::new(),
            exhausted_streaks: DashMap::new(),
            exhaustion_hook: Arc::new(NoopExhaustionHook),
        }
    }

    /// Replace the exhaustion hook.
    pub fn with_exhaustion_hook(mut self, hook: Arc<dyn ExhaustionHook>) -> Self {
        self.exhaustion_hook = hook;
        self
    }

    pub fn config(&self) -> &CompanionConfig {
        &self.config
    }

    pub fn profiles(&self) -> &P {
        &self.profiles
    }

    pub fn short_term(&self) -> &S {
        &self.short_term
    }

    pub fn memory(&self) -> &BoxMemoryIndex {
        &self.memory
    }

    /// Process one user message and return the reply with its report.
    ///
    /// Turns for the same user run one at a time, in arrival order. If
    /// `cancel` fires before generation completes, the turn returns
    /// [`TurnError::Cancelled`] and nothing is persisted.
    pub async fn process_turn(
        &self,
        user_id: &str,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<TurnReport, TurnError> {
        let input = text.trim();
        if input.is_empty() {
            return Err(TurnError::EmptyInput);
        }

        let turn_id = Uuid::now_v7();
        let span = info_span!(
            "turn",
            user_id,
            turn_id = %turn_id,
            mode = %self.assembler.mode(),
        );

        async {
            let result = self.run_turn(turn_id, user_id, input, cancel).await;
            match &result {
                Ok(report) => info!(
                    apology = report.reply.is_apology(),
                    retrieved = report.retrieved.len(),
                    degraded = report.degradations.len(),
                    "turn complete"
                ),
                Err(e) => warn!(stage = %TurnStage::Failed, error = %e, "turn failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run_turn(
        &self,
        turn_id: Uuid,
        user_id: &str,
        input: &str,
        cancel: &CancellationToken,
    ) -> Result<TurnReport, TurnError> {
        let _turn_guard = tokio::select! {
            guard = self.locks.acquire(user_id) => guard,
            _ = cancel.cancelled() => return Err(TurnError::Cancelled),
        };

        let mut stages = Vec::with_capacity(7);
        let mut degradations = Vec::new();

        // --- FETCHING_CONTEXT ---
        stages.push(TurnStage::FetchingContext);
        debug!(stage = %TurnStage::FetchingContext);
        let context = self.fetch_context(user_id).await?;

        // --- EMBEDDING_INPUT ---
        stages.push(TurnStage::EmbeddingInput);
        debug!(stage = %TurnStage::EmbeddingInput);
        let input_embedding = match self.embedder.embed(input).await {
            Ok(vector) => Some(vector),
            Err(e) => {
                warn!(error = %e, "input embedding failed, skipping retrieval");
                degradations.push(Degradation::EmbeddingFailure(e.to_string()));
                None
            }
        };

        // --- RETRIEVING_MEMORY ---
        let mut retrieved: Vec<RetrievalResult> = Vec::new();
        if let Some(embedding) = &input_embedding {
            stages.push(TurnStage::RetrievingMemory);
            debug!(stage = %TurnStage::RetrievingMemory);
            match self
                .memory
                .query(
                    user_id,
                    embedding,
                    self.config.memory.retrieval_top_k,
                    self.config.memory.min_similarity,
                )
                .await
            {
                Ok(results) if results.is_empty() => debug!("no relevant memory"),
                Ok(results) => {
                    debug!(
                        top_similarity = results[0].similarity,
                        count = results.len(),
                        "retrieved memory"
                    );
                    retrieved = results;
                }
                Err(e) => {
                    warn!(error = %e, "memory query failed, continuing without retrieval");
                    degradations.push(Degradation::RetrievalFailure(e.to_string()));
                }
            }
        }

        // --- ASSEMBLING_PROMPT ---
        stages.push(TurnStage::AssemblingPrompt);
        debug!(stage = %TurnStage::AssemblingPrompt);
        let prompt = self.assembler.assemble(
            &context.profile,
            &context.concerns,
            &context.history,
            &retrieved,
            input,
        );

        // --- GENERATING ---
        if cancel.is_cancelled() {
            return Err(TurnError::Cancelled);
        }
        stages.push(TurnStage::Generating);
        debug!(stage = %TurnStage::Generating);
        // An in-flight call always runs to completion; cancellation only
        // decides whether its result is used.
        let outcome = self
            .generator
            .generate(&prompt, self.config.generation.max_attempts)
            .await;
        if cancel.is_cancelled() {
            info!("turn cancelled during generation, discarding result");
            return Err(TurnError::Cancelled);
        }

        // --- PERSISTING ---
        stages.push(TurnStage::Persisting);
        debug!(stage = %TurnStage::Persisting);
        let user_turn = ConversationTurn::new(user_id, Speaker::User, input);
        let (reply, persistence) = match outcome {
            GenerationOutcome::Generated(text) => {
                self.exhausted_streaks.remove(user_id);
                let long_term = self
                    .persist_exchange(user_id, input, input_embedding, &text, &mut degradations)
                    .await;
                let short_term = self
                    .append_history(user_id, user_turn, &text, &mut degradations)
                    .await;
                (
                    Reply::Generated(text),
                    PersistenceReport {
                        long_term,
                        short_term,
                    },
                )
            }
            GenerationOutcome::Exhausted { attempts } => {
                error!(attempts, "generation exhausted, sending apology");
                degradations.push(Degradation::GenerationExhausted { attempts });
                self.record_exhaustion(user_id);
                let apology = self.config.apology.clone();
                let short_term = self
                    .append_history(user_id, user_turn, &apology, &mut degradations)
                    .await;
                (
                    Reply::Apology(apology),
                    PersistenceReport {
                        long_term: WriteStatus::Skipped,
                        short_term,
                    },
                )
            }
        };

        stages.push(TurnStage::Done);
        Ok(TurnReport {
            turn_id,
            reply,
            retrieved,
            prompt,
            persistence,
            degradations,
            stages,
        })
    }

    /// Fetch profile(s), concerns and recent history concurrently.
    ///
    /// Fails fast: any profile error aborts the turn as `ProfileNotFound`.
    async fn fetch_context(&self, user_id: &str) -> Result<TurnContext, TurnError> {
        let mode = self.assembler.mode();
        let concern_limit = self.config.persona.concern_limit;
        let history_window = self.config.memory.history_window;

        let user_fut = self.profiles.get_user_profile(user_id);
        let persona_fut = async {
            if mode.requires_persona() {
                self.profiles.get_persona_profile(user_id).await.map(Some)
            } else {
                Ok(None)
            }
        };
        let concerns_fut = async {
            if mode != PersonaMode::Supportive {
                return Ok::<_, ProfileError>(Vec::new());
            }
            match self.profiles.recent_concerns(user_id, concern_limit).await {
                Ok(concerns) => Ok(concerns),
                Err(e) => {
                    warn!(error = %e, "recent concerns unavailable");
                    Ok(Vec::new())
                }
            }
        };
        let history_fut = async {
            Ok::<_, ProfileError>(self.short_term.read_recent(user_id, history_window).await)
        };

        let (user, persona, concerns, history) =
            tokio::try_join!(user_fut, persona_fut, concerns_fut, history_fut).map_err(|e| {
                error!(stage = %TurnStage::FetchingContext, error = %e, "profile lookup failed");
                TurnError::ProfileNotFound {
                    user_id: user_id.to_string(),
                }
            })?;

        let profile = match persona {
            Some(persona) => Profile::WithPersona { user, persona },
            None => Profile::User(user),
        };

        Ok(TurnContext {
            profile,
            concerns,
            history,
        })
    }

    /// Embed both sides of the exchange and upsert it into long-term memory.
    async fn persist_exchange(
        &self,
        user_id: &str,
        input: &str,
        input_embedding: Option<Vec<f32>>,
        response: &str,
        degradations: &mut Vec<Degradation>,
    ) -> WriteStatus {
        let input_embedding = match input_embedding {
            Some(vector) => Ok(vector),
            None => self.embedder.embed(input).await,
        };
        let embeddings = match input_embedding {
            Ok(input_vec) => self
                .embedder
                .embed(response)
                .await
                .map(|response_vec| (input_vec, response_vec)),
            Err(e) => Err(e),
        };

        let (input_vec, response_vec) = match embeddings {
            Ok(pair) => pair,
            Err(e) => {
                warn!(error = %e, "embedding for long-term memory failed");
                degradations.push(Degradation::PersistenceFailure(e.to_string()));
                return WriteStatus::Failed(e.to_string());
            }
        };

        let record = MemoryRecord::new(
            user_id,
            input,
            response,
            input_vec,
            response_vec,
            self.embedder.model_name(),
        );
        match self.memory.upsert(user_id, &record).await {
            Ok(()) => {
                debug!(memory_id = %record.id, "exchange stored in long-term memory");
                WriteStatus::Written
            }
            Err(e) => {
                warn!(error = %e, "long-term memory upsert failed");
                degradations.push(Degradation::PersistenceFailure(e.to_string()));
                WriteStatus::Failed(e.to_string())
            }
        }
    }

    /// Append the user turn and the companion's reply as one ordered pair.
    async fn append_history(
        &self,
        user_id: &str,
        user_turn: ConversationTurn,
        reply: &str,
        degradations: &mut Vec<Degradation>,
    ) -> WriteStatus {
        let reply_turn = ConversationTurn::new(user_id, Speaker::Companion, reply);
        match self
            .short_term
            .append_pair(user_id, user_turn, reply_turn)
            .await
        {
            Ok(()) => WriteStatus::Written,
            Err(e) => {
                warn!(error = %e, "short-term history append failed");
                degradations.push(Degradation::PersistenceFailure(e.to_string()));
                WriteStatus::Failed(e.to_string())
            }
        }
    }

    fn record_exhaustion(&self, user_id: &str) {
        let consecutive = {
            let mut streak = self
                .exhausted_streaks
                .entry(user_id.to_string())
                .or_insert(0);
            *streak += 1;
            *streak
        };
        self.exhaustion_hook.on_exhausted(user_id, consecutive);
    }

    /// Drop a user's short-term window, returning how many turns went.
    pub async fn clear_history(&self, user_id: &str) -> Result<u64, RepositoryError> {
        let _turn_guard = self.locks.acquire(user_id).await;
        let removed = self.short_term.clear(user_id).await.inspect_err(|e| {
            warn!(user_id, error = %e, "failed to clear short-term history");
        })?;
        info!(user_id, removed, "short-term history cleared");
        Ok(removed)
    }
}
