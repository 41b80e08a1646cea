//! Turn stages and the typed turn result.

use std::fmt;

use serde_json::json;
use uuid::Uuid;

use bytebond_types::memory::RetrievalResult;

/// Stages a turn moves through, in order. `Failed` is reachable from any stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStage {
    FetchingContext,
    EmbeddingInput,
    RetrievingMemory,
    AssemblingPrompt,
    Generating,
    Persisting,
    Done,
    Failed,
}

impl fmt::Display for TurnStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TurnStage::FetchingContext => "fetching_context",
            TurnStage::EmbeddingInput => "embedding_input",
            TurnStage::RetrievingMemory => "retrieving_memory",
            TurnStage::AssemblingPrompt => "assembling_prompt",
            TurnStage::Generating => "generating",
            TurnStage::Persisting => "persisting",
            TurnStage::Done => "done",
            TurnStage::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// The companion's reply for a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Generated(String),
    /// Fixed apology substituted after generation was exhausted.
    Apology(String),
}

impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Reply::Generated(text) | Reply::Apology(text) => text,
        }
    }

    pub fn is_apology(&self) -> bool {
        matches!(self, Reply::Apology(_))
    }
}

/// A recoverable problem the turn absorbed instead of failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Degradation {
    /// Input could not be embedded; retrieval was skipped.
    EmbeddingFailure(String),
    /// The long-term index query failed; retrieval was treated as empty.
    RetrievalFailure(String),
    /// Every generation attempt failed; the apology was sent.
    GenerationExhausted { attempts: u32 },
    /// A memory write failed after the reply was decided.
    PersistenceFailure(String),
}

/// Outcome of one memory write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteStatus {
    Written,
    Skipped,
    Failed(String),
}

/// Outcome of the PERSISTING stage for both memory tiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistenceReport {
    pub long_term: WriteStatus,
    pub short_term: WriteStatus,
}

/// Everything a caller may want to know about a completed turn.
#[derive(Debug, Clone)]
pub struct TurnReport {
    pub turn_id: Uuid,
    pub reply: Reply,
    pub retrieved: Vec<RetrievalResult>,
    pub prompt: String,
    pub persistence: PersistenceReport,
    pub degradations: Vec<Degradation>,
    pub stages: Vec<TurnStage>,
}

impl TurnReport {
    /// JSON summary for machine-readable output. Omits the prompt.
    pub fn summary_json(&self) -> serde_json::Value {
        json!({
            "turn_id": self.turn_id.to_string(),
            "reply": self.reply.text(),
            "apology": self.reply.is_apology(),
            "retrieved": self
                .retrieved
                .iter()
                .map(|r| json!({
                    "memory_id": r.record.id.to_string(),
                    "similarity": r.similarity,
                }))
                .collect::<Vec<_>>(),
            "degradations": self.degradations.iter().map(|d| format!("{d:?}")).collect::<Vec<_>>(),
            "stages": self.stages.iter().map(ToString::to_string).collect::<Vec<_>>(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_accessors() {
        let r = Reply::Apology("busy".to_string());
        assert!(r.is_apology());
        assert_eq!(r.text(), "busy");
        assert!(!Reply::Generated("hi".to_string()).is_apology());
    }

    #[test]
    fn test_summary_json_shape() {
        let report = TurnReport {
            turn_id: Uuid::nil(),
            reply: Reply::Generated("hello".to_string()),
            retrieved: vec![],
            prompt: "secret prompt".to_string(),
            persistence: PersistenceReport {
                long_term: WriteStatus::Written,
                short_term: WriteStatus::Written,
            },
            degradations: vec![],
            stages: vec![TurnStage::FetchingContext, TurnStage::Done],
        };
        let json = report.summary_json();
        assert_eq!(json["reply"], "hello");
        assert_eq!(json["apology"], false);
        assert_eq!(json["stages"][0], "fetching_context");
        assert!(json.get("prompt").is_none());
    }
}
