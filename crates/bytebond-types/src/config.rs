//! Companion configuration types for ByteBond.
//!
//! `CompanionConfig` represents the `config.toml` in the data directory.
//! Every field has a serde default, so an empty or partial file is valid.

use serde::{Deserialize, Serialize};

use crate::profile::PersonaMode;

/// Top-level configuration for the companion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanionConfig {
    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub memory: MemoryConfig,

    #[serde(default)]
    pub persona: PersonaConfig,

    /// Fixed reply used when generation is exhausted.
    #[serde(default = "default_apology")]
    pub apology: String,

    /// Consecutive exhausted turns per user before the log hook warns.
    #[serde(default = "default_exhaustion_warn_threshold")]
    pub exhaustion_warn_threshold: u32,
}

fn default_apology() -> String {
    "Sorry, I am busy right now, will talk to you later!".to_string()
}

fn default_exhaustion_warn_threshold() -> u32 {
    3
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            generation: GenerationConfig::default(),
            memory: MemoryConfig::default(),
            persona: PersonaConfig::default(),
            apology: default_apology(),
            exhaustion_warn_threshold: default_exhaustion_warn_threshold(),
        }
    }
}

/// Generation backend and retry settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Wall-clock ceiling for a single backend call.
    #[serde(default = "default_attempt_timeout_ms")]
    pub attempt_timeout_ms: u64,

    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    #[serde(default = "default_multiplier")]
    pub multiplier: f64,

    /// Fraction of each delay randomized, in [0, 1].
    #[serde(default = "default_jitter")]
    pub jitter: f64,
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-004".to_string()
}

fn default_temperature() -> f64 {
    0.9
}

fn default_max_attempts() -> u32 {
    7
}

fn default_attempt_timeout_ms() -> u64 {
    30_000
}

fn default_initial_delay_ms() -> u64 {
    250
}

fn default_max_delay_ms() -> u64 {
    4_000
}

fn default_multiplier() -> f64 {
    2.0
}

fn default_jitter() -> f64 {
    0.2
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            embedding_model: default_embedding_model(),
            temperature: default_temperature(),
            max_attempts: default_max_attempts(),
            attempt_timeout_ms: default_attempt_timeout_ms(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            multiplier: default_multiplier(),
            jitter: default_jitter(),
        }
    }
}

/// Short-term window and long-term retrieval settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Turns kept per user before FIFO eviction.
    #[serde(default = "default_short_term_capacity")]
    pub short_term_capacity: usize,

    /// Turns rendered into the prompt's history section.
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    #[serde(default = "default_retrieval_top_k")]
    pub retrieval_top_k: usize,

    /// Matches below this cosine similarity are discarded.
    #[serde(default)]
    pub min_similarity: f32,

    /// Vector size for the local hashing embedder.
    #[serde(default = "default_embedding_dimension")]
    pub embedding_dimension: usize,
}

fn default_short_term_capacity() -> usize {
    50
}

fn default_history_window() -> usize {
    10
}

fn default_retrieval_top_k() -> usize {
    1
}

fn default_embedding_dimension() -> usize {
    256
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            short_term_capacity: default_short_term_capacity(),
            history_window: default_history_window(),
            retrieval_top_k: default_retrieval_top_k(),
            min_similarity: 0.0,
            embedding_dimension: default_embedding_dimension(),
        }
    }
}

/// Prompt framing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaConfig {
    #[serde(default)]
    pub mode: PersonaMode,

    /// Assistant name used when no persona profile supplies one.
    #[serde(default = "default_assistant_name")]
    pub assistant_name: String,

    /// Recent concerns fetched per turn in supportive mode.
    #[serde(default = "default_concern_limit")]
    pub concern_limit: usize,
}

fn default_assistant_name() -> String {
    "ByteBond".to_string()
}

fn default_concern_limit() -> usize {
    5
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            mode: PersonaMode::default(),
            assistant_name: default_assistant_name(),
            concern_limit: default_concern_limit(),
        }
    }
}
