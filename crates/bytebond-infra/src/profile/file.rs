//! TOML-file profile provider.
//!
//! Reads `profiles.toml` once at startup:
//!
//! ```toml
//! [users.alex]
//! name = "Alex"
//! hobbies = ["chess"]
//!
//! [personas.alex]          # optional, per user
//! name = "Mira"
//!
//! [default_persona]        # optional, for users without their own
//! name = "ByteBond"
//!
//! [[concerns.alex]]
//! text = "exams next week"
//! recorded_at = "2026-10-01T10:00:00Z"
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use bytebond_core::profile::provider::ProfileProvider;
use bytebond_types::error::{ConfigError, ProfileError};
use bytebond_types::profile::{Concern, PersonaProfile, UserProfile};

#[derive(Debug, Default, Deserialize)]
struct ProfilesFile {
    #[serde(default)]
    users: HashMap<String, UserProfile>,
    #[serde(default)]
    personas: HashMap<String, PersonaProfile>,
    #[serde(default)]
    default_persona: Option<PersonaProfile>,
    #[serde(default)]
    concerns: HashMap<String, Vec<Concern>>,
}

/// Read-only profiles loaded from a TOML file.
#[derive(Debug, Default)]
pub struct FileProfileProvider {
    users: HashMap<String, UserProfile>,
    personas: HashMap<String, PersonaProfile>,
    default_persona: Option<PersonaProfile>,
    concerns: HashMap<String, Vec<Concern>>,
}

impl FileProfileProvider {
    /// Load profiles from `path`. A missing file yields an empty provider.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("No profiles file at {}, no users known", path.display());
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(ConfigError::Read {
                    path: path.display().to_string(),
                    message: err.to_string(),
                });
            }
        };

        let provider = Self::parse(&content, &path.display().to_string())?;
        tracing::debug!(users = provider.users.len(), "profiles loaded");
        Ok(provider)
    }

    /// Parse profiles from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, "<inline>")
    }

    fn parse(content: &str, source: &str) -> Result<Self, ConfigError> {
        let file: ProfilesFile = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: source.to_string(),
            message: e.to_string(),
        })?;

        let users = file
            .users
            .into_iter()
            .map(|(id, mut profile)| {
                profile.user_id = id.clone();
                (id, profile)
            })
            .collect();

        let concerns = file
            .concerns
            .into_iter()
            .map(|(id, mut list)| {
                list.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
                (id, list)
            })
            .collect();

        Ok(Self {
            users,
            personas: file.personas,
            default_persona: file.default_persona,
            concerns,
        })
    }

    /// Known user ids, sorted.
    pub fn user_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.users.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl ProfileProvider for FileProfileProvider {
    async fn get_user_profile(&self, user_id: &str) -> Result<UserProfile, ProfileError> {
        self.users
            .get(user_id)
            .cloned()
            .ok_or_else(|| ProfileError::NotFound {
                user_id: user_id.to_string(),
            })
    }

    async fn get_persona_profile(&self, user_id: &str) -> Result<PersonaProfile, ProfileError> {
        self.personas
            .get(user_id)
            .or(self.default_persona.as_ref())
            .cloned()
            .ok_or_else(|| ProfileError::NotFound {
                user_id: user_id.to_string(),
            })
    }

    async fn recent_concerns(&self, user_id: &str, limit: usize) -> Result<Vec<Concern>, ProfileError> {
        Ok(self
            .concerns
            .get(user_id)
            .map(|list| list.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}
