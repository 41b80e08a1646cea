//! GenerationClient -- bounded-retry wrapper around a generation backend.
//!
//! Each attempt is one backend call under a wall-clock ceiling. An attempt
//! fails when the call errors or times out, or when the envelope carries no
//! usable text (no response, no candidates, no content, or blank text).
//! The first non-blank text wins. When every attempt fails the client
//! returns [`GenerationOutcome::Exhausted`]; it never touches memory.

use std::time::Duration;

use tracing::{Instrument, debug, info_span, warn};

use bytebond_types::config::GenerationConfig;
use bytebond_types::llm::{GenerationEnvelope, LlmError};

use super::box_backend::BoxGenerationBackend;
use super::retry::BackoffPolicy;

/// Result of a bounded generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Non-blank text from the backend.
    Generated(String),
    /// Every attempt failed. This is the blank sentinel.
    Exhausted { attempts: u32 },
}

impl GenerationOutcome {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, GenerationOutcome::Exhausted { .. })
    }

    /// The generated text, or `""` when exhausted.
    pub fn text_or_blank(&self) -> &str {
        match self {
            GenerationOutcome::Generated(text) => text,
            GenerationOutcome::Exhausted { .. } => "",
        }
    }
}

/// Why an attempt produced no usable text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    NoResponse,
    NoCandidates,
    NoContent,
    BlankText,
}

impl std::fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EmptyReason::NoResponse => "no response",
            EmptyReason::NoCandidates => "no candidates",
            EmptyReason::NoContent => "candidate has no content",
            EmptyReason::BlankText => "candidate text is blank",
        };
        f.write_str(s)
    }
}

/// Pull the text payload out of the first candidate.
///
/// Uses the first part that carries text; a string part and an object
/// part with a `text` field are treated alike.
pub fn extract_text(envelope: Option<&GenerationEnvelope>) -> Result<&str, EmptyReason> {
    let envelope = envelope.ok_or(EmptyReason::NoResponse)?;
    let candidate = envelope.candidates.first().ok_or(EmptyReason::NoCandidates)?;
    let content = candidate.content.as_ref().ok_or(EmptyReason::NoContent)?;
    let text = content
        .parts
        .iter()
        .find_map(|part| part.text())
        .ok_or(EmptyReason::NoContent)?;
    if text.trim().is_empty() {
        return Err(EmptyReason::BlankText);
    }
    Ok(text)
}

/// Retrying generation client.
pub struct GenerationClient {
    backend: BoxGenerationBackend,
    backoff: BackoffPolicy,
    attempt_timeout: Duration,
}

impl GenerationClient {
    pub fn new(backend: BoxGenerationBackend, backoff: BackoffPolicy, attempt_timeout: Duration) -> Self {
        Self {
            backend,
            backoff,
            attempt_timeout,
        }
    }

    pub fn from_config(backend: BoxGenerationBackend, config: &GenerationConfig) -> Self {
        Self::new(
            backend,
            BackoffPolicy::from_config(config),
            Duration::from_millis(config.attempt_timeout_ms),
        )
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Generate text for `prompt` with up to `max_attempts` backend calls.
    ///
    /// Sleeps between failed attempts according to the backoff policy, but
    /// never after the last one.
    pub async fn generate(&self, prompt: &str, max_attempts: u32) -> GenerationOutcome {
        for attempt in 1..=max_attempts {
            let span = info_span!(
                "gen_ai.generate",
                gen_ai.operation.name = "generate",
                gen_ai.provider.name = self.backend.name(),
                gen_ai.request.model = self.backend.model(),
                attempt,
                max_attempts,
            );

            match self.attempt(prompt).instrument(span).await {
                Ok(text) => {
                    debug!(attempt, chars = text.len(), "generation succeeded");
                    return GenerationOutcome::Generated(text);
                }
                Err(reason) => {
                    warn!(attempt, max_attempts, reason = %reason, "generation attempt failed");
                }
            }

            if attempt < max_attempts {
                let delay = self.backoff.delay(attempt - 1);
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }
        }

        GenerationOutcome::Exhausted {
            attempts: max_attempts,
        }
    }

    async fn attempt(&self, prompt: &str) -> Result<String, AttemptFailure> {
        let envelope = tokio::time::timeout(self.attempt_timeout, self.backend.generate(prompt))
            .await
            .map_err(|_| {
                AttemptFailure::Backend(LlmError::Timeout {
                    after_ms: self.attempt_timeout.as_millis() as u64,
                })
            })?
            .map_err(AttemptFailure::Backend)?;

        extract_text(envelope.as_ref())
            .map(str::to_owned)
            .map_err(AttemptFailure::Empty)
    }
}

#[derive(Debug)]
enum AttemptFailure {
    Backend(LlmError),
    Empty(EmptyReason),
}

impl std::fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttemptFailure::Backend(e) => write!(f, "{e}"),
            AttemptFailure::Empty(reason) => write!(f, "{reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    use bytebond_types::llm::{Candidate, CandidateContent, ContentPart};

    use crate::llm::backend::GenerationBackend;

    enum Step {
        Reply(Option<GenerationEnvelope>),
        Fail,
        Hang,
    }

    /// Backend that plays back scripted steps, then repeats the last one.
    struct ScriptedBackend {
        steps: Mutex<VecDeque<Step>>,
        fallback: fn() -> Step,
        calls: Arc<AtomicU32>,
    }

    impl ScriptedBackend {
        fn new(steps: Vec<Step>, fallback: fn() -> Step) -> (Self, Arc<AtomicU32>) {
            let calls = Arc::new(AtomicU32::new(0));
            (
                Self {
                    steps: Mutex::new(steps.into()),
                    fallback,
                    calls: calls.clone(),
                },
                calls,
            )
        }
    }

    impl GenerationBackend for ScriptedBackend {
        fn name(&self) -> &str {
            "scripted"
        }

        fn model(&self) -> &str {
            "scripted-1"
        }

        async fn generate(&self, _prompt: &str) -> Result<Option<GenerationEnvelope>, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let step = self
                .steps
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(self.fallback);
            match step {
                Step::Reply(envelope) => Ok(envelope),
                Step::Fail => Err(LlmError::Provider {
                    message: "boom".to_string(),
                }),
                Step::Hang => {
                    tokio::time::sleep(Duration::from_secs(3_600)).await;
                    Ok(None)
                }
            }
        }
    }

    fn client(backend: ScriptedBackend) -> GenerationClient {
        GenerationClient::new(
            BoxGenerationBackend::new(backend),
            BackoffPolicy {
                initial: Duration::from_millis(100),
                max: Duration::from_millis(1_000),
                multiplier: 2.0,
                jitter: 0.0,
            },
            Duration::from_secs(5),
        )
    }

    fn empty_candidates() -> Step {
        Step::Reply(Some(GenerationEnvelope::default()))
    }

    #[test]
    fn test_extract_text_shapes() {
        assert_eq!(extract_text(None), Err(EmptyReason::NoResponse));

        let env = GenerationEnvelope::default();
        assert_eq!(extract_text(Some(&env)), Err(EmptyReason::NoCandidates));

        let env = GenerationEnvelope {
            candidates: vec![Candidate::default()],
        };
        assert_eq!(extract_text(Some(&env)), Err(EmptyReason::NoContent));

        let env = GenerationEnvelope {
            candidates: vec![Candidate {
                content: Some(CandidateContent {
                    role: None,
                    parts: vec![ContentPart::Object { text: None }],
                }),
                finish_reason: None,
            }],
        };
        assert_eq!(extract_text(Some(&env)), Err(EmptyReason::NoContent));

        let env = GenerationEnvelope::from_text("  \n ");
        assert_eq!(extract_text(Some(&env)), Err(EmptyReason::BlankText));

        let env = GenerationEnvelope {
            candidates: vec![Candidate {
                content: Some(CandidateContent {
                    role: None,
                    parts: vec![ContentPart::Text("plain".to_string())],
                }),
                finish_reason: None,
            }],
        };
        assert_eq!(extract_text(Some(&env)), Ok("plain"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_returns_first_non_blank_text() {
        let (backend, calls) = ScriptedBackend::new(
            vec![
                Step::Reply(None),
                Step::Fail,
                Step::Reply(Some(GenerationEnvelope::from_text("hello there"))),
            ],
            empty_candidates,
        );
        let outcome = client(backend).generate("prompt", 7).await;
        assert_eq!(outcome, GenerationOutcome::Generated("hello there".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_empty_backend_exhausts_exactly_max_attempts() {
        let (backend, calls) = ScriptedBackend::new(vec![], empty_candidates);
        let outcome = client(backend).generate("prompt", 7).await;
        assert_eq!(outcome, GenerationOutcome::Exhausted { attempts: 7 });
        assert_eq!(outcome.text_or_blank(), "");
        assert_eq!(calls.load(Ordering::SeqCst), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_sleeps_between_attempts_only() {
        let (backend, _) = ScriptedBackend::new(vec![], || Step::Fail);
        let start = tokio::time::Instant::now();
        let outcome = client(backend).generate("prompt", 3).await;
        assert!(outcome.is_exhausted());
        // 100ms + 200ms between three attempts, no sleep after the last.
        assert_eq!(start.elapsed(), Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_attempt_counts_as_failure() {
        let (backend, calls) = ScriptedBackend::new(
            vec![Step::Hang],
            || Step::Reply(Some(GenerationEnvelope::from_text("recovered"))),
        );
        let outcome = client(backend).generate("prompt", 2).await;
        assert_eq!(outcome, GenerationOutcome::Generated("recovered".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_zero_attempts_is_exhausted_without_calls() {
        let (backend, calls) = ScriptedBackend::new(vec![], empty_candidates);
        let outcome = client(backend).generate("prompt", 0).await;
        assert_eq!(outcome, GenerationOutcome::Exhausted { attempts: 0 });
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
