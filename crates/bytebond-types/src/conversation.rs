//! Conversation turn types for ByteBond.
//!
//! A turn is one message in the rolling short-term window. Turns are
//! append-only and never mutated after creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Who authored a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Companion,
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Speaker::User => write!(f, "user"),
            Speaker::Companion => write!(f, "companion"),
        }
    }
}

impl FromStr for Speaker {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Speaker::User),
            // Legacy chat logs label the companion side "chatbot".
            "companion" | "chatbot" => Ok(Speaker::Companion),
            other => Err(format!("invalid speaker: '{other}'")),
        }
    }
}

/// A single message in a user's short-term conversation window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub user_id: String,
    pub speaker: Speaker,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    /// Create a turn stamped with the current time.
    pub fn new(user_id: impl Into<String>, speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            speaker,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a turn with an explicit timestamp.
    pub fn at(
        user_id: impl Into<String>,
        speaker: Speaker,
        text: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            speaker,
            text: text.into(),
            timestamp,
        }
    }
}
