//! Long-term memory types for ByteBond.
//!
//! A [`MemoryRecord`] is one complete exchange (user input plus the
//! companion's response) together with the embeddings computed from
//! exactly that text. Records are immutable once written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted exchange in a user's long-term semantic memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub id: Uuid,
    pub user_id: String,
    pub user_text: String,
    pub response_text: String,
    pub input_embedding: Vec<f32>,
    pub response_embedding: Vec<f32>,
    /// Name of the embedding model that produced both vectors.
    pub embedding_model: String,
    pub created_at: DateTime<Utc>,
}

impl MemoryRecord {
    /// Build a new record with a fresh time-sortable id.
    pub fn new(
        user_id: impl Into<String>,
        user_text: impl Into<String>,
        response_text: impl Into<String>,
        input_embedding: Vec<f32>,
        response_embedding: Vec<f32>,
        embedding_model: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id: user_id.into(),
            user_text: user_text.into(),
            response_text: response_text.into(),
            input_embedding,
            response_embedding,
            embedding_model: embedding_model.into(),
            created_at: Utc::now(),
        }
    }
}

/// A memory matched by a similarity query, scoped to one turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub record: MemoryRecord,
    /// Cosine similarity in [-1, 1]; higher is more relevant.
    pub similarity: f32,
}

impl RetrievalResult {
    /// Render the matched exchange as a prompt snippet.
    pub fn snippet(&self) -> String {
        format!(
            "User said: {}\nYou replied: {}",
            self.record.user_text, self.record.response_text
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_records_get_distinct_ids() {
        let a = MemoryRecord::new("u", "a", "b", vec![1.0], vec![1.0], "test");
        let b = MemoryRecord::new("u", "a", "b", vec![1.0], vec![1.0], "test");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_snippet_contains_both_sides() {
        let result = RetrievalResult {
            record: MemoryRecord::new(
                "alex",
                "I'm stressed about exams",
                "That sounds hard.",
                vec![],
                vec![],
                "test",
            ),
            similarity: 0.9,
        };
        let snippet = result.snippet();
        assert!(snippet.contains("I'm stressed about exams"));
        assert!(snippet.contains("That sounds hard."));
    }
}
