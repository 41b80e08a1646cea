//! Generation backend types for ByteBond.
//!
//! The envelope types mirror the candidate-based response shape returned
//! by Gemini-style `generateContent` endpoints. Every level is optional:
//! the generation client treats any missing piece as a failed attempt.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw response envelope from a generation backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationEnvelope {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerationEnvelope {
    /// Envelope with a single candidate holding one text part.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            candidates: vec![Candidate {
                content: Some(CandidateContent {
                    role: Some("model".to_string()),
                    parts: vec![ContentPart::Object {
                        text: Some(text.into()),
                    }],
                }),
                finish_reason: Some("STOP".to_string()),
            }],
        }
    }
}

/// One generated candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Content block of a candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<ContentPart>,
}

/// A content part: either a bare string or an object that may carry text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentPart {
    Text(String),
    Object {
        #[serde(default)]
        text: Option<String>,
    },
}

impl ContentPart {
    /// The textual payload of this part, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            ContentPart::Text(s) => Some(s),
            ContentPart::Object { text } => text.as_deref(),
        }
    }
}

/// Errors from generation or embedding backends.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("attempt timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_parses_object_parts() {
        let json = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"hello"}]},"finishReason":"STOP"}]}"#;
        let env: GenerationEnvelope = serde_json::from_str(json).unwrap();
        let part = &env.candidates[0].content.as_ref().unwrap().parts[0];
        assert_eq!(part.text(), Some("hello"));
        assert_eq!(env.candidates[0].finish_reason.as_deref(), Some("STOP"));
    }

    #[test]
    fn test_envelope_parses_string_parts() {
        let json = r#"{"candidates":[{"content":{"parts":["plain"]}}]}"#;
        let env: GenerationEnvelope = serde_json::from_str(json).unwrap();
        let part = &env.candidates[0].content.as_ref().unwrap().parts[0];
        assert_eq!(part.text(), Some("plain"));
    }

    #[test]
    fn test_envelope_tolerates_missing_pieces() {
        let env: GenerationEnvelope = serde_json::from_str("{}").unwrap();
        assert!(env.candidates.is_empty());

        let env: GenerationEnvelope =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert!(env.candidates[0].content.is_none());

        let env: GenerationEnvelope =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[{"inlineData":{}}]}}]}"#)
                .unwrap();
        let part = &env.candidates[0].content.as_ref().unwrap().parts[0];
        assert_eq!(part.text(), None);
    }
}
