//! User and persona profile types for ByteBond.
//!
//! Profiles are read-only snapshots fetched once per turn from a
//! `ProfileProvider`.
//! Only `name` is required; every other attribute is optional and is
//! omitted from prompts when absent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// How much profile detail the prompt framing uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonaMode {
    /// Name-only framing.
    Minimal,
    /// Empathetic emotional-support framing with recent concerns.
    #[default]
    Supportive,
    /// Companion persona with rich user and persona attributes.
    FullPersona,
}

impl PersonaMode {
    /// Whether this mode needs a [`PersonaProfile`] in addition to the user profile.
    pub fn requires_persona(&self) -> bool {
        matches!(self, PersonaMode::FullPersona)
    }
}

impl fmt::Display for PersonaMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersonaMode::Minimal => write!(f, "minimal"),
            PersonaMode::Supportive => write!(f, "supportive"),
            PersonaMode::FullPersona => write!(f, "full_persona"),
        }
    }
}

impl FromStr for PersonaMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "minimal" => Ok(PersonaMode::Minimal),
            "supportive" => Ok(PersonaMode::Supportive),
            "full_persona" | "full" => Ok(PersonaMode::FullPersona),
            other => Err(format!("invalid persona mode: '{other}'")),
        }
    }
}

/// What the companion knows about the person it is talking to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub hobbies: Vec<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub company_location: Option<String>,
    #[serde(default)]
    pub is_studying: Option<bool>,
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub relationship_status: Option<String>,
    #[serde(default)]
    pub favorite_topics: Vec<String>,
    #[serde(default)]
    pub daily_routine: Option<String>,
    #[serde(default)]
    pub wellbeing: Option<String>,
    #[serde(default)]
    pub goals: Option<String>,
    #[serde(default)]
    pub preferred_times: Option<String>,
    #[serde(default)]
    pub special_dates: Vec<String>,
}

impl UserProfile {
    /// Minimal profile carrying only a display name.
    pub fn named(user_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Labelled attribute lines for the attributes that are present.
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        push_opt(&mut out, "Age", self.age.map(|a| a.to_string()));
        push_opt(&mut out, "Gender", self.gender.clone());
        push_list(&mut out, "Hobbies", &self.hobbies);
        push_opt(&mut out, "Works at", self.company_name.clone());
        push_opt(&mut out, "Work location", self.company_location.clone());
        push_study(&mut out, self.is_studying, &self.degree, &self.institution);
        push_opt(&mut out, "Relationship status", self.relationship_status.clone());
        push_list(&mut out, "Favorite topics", &self.favorite_topics);
        push_opt(&mut out, "Daily routine", self.daily_routine.clone());
        push_opt(&mut out, "Health and wellbeing", self.wellbeing.clone());
        push_opt(&mut out, "Goals", self.goals.clone());
        push_opt(&mut out, "Prefers to talk", self.preferred_times.clone());
        push_list(&mut out, "Special dates", &self.special_dates);
        out
    }
}

/// The companion's own character, used in full-persona mode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonaProfile {
    pub name: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub is_studying: Option<bool>,
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub hobbies: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub personality: Option<String>,
}

impl PersonaProfile {
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        push_opt(&mut out, "Gender", self.gender.clone());
        push_opt(&mut out, "Age", self.age.map(|a| a.to_string()));
        push_opt(&mut out, "From", self.country.clone());
        push_study(&mut out, self.is_studying, &self.degree, &self.institution);
        push_opt(&mut out, "Works at", self.company_name.clone());
        push_list(&mut out, "Hobbies", &self.hobbies);
        push_list(&mut out, "Skills", &self.skills);
        push_opt(&mut out, "Personality", self.personality.clone());
        out
    }
}

/// Profile snapshot for one turn.
#[derive(Debug, Clone, PartialEq)]
pub enum Profile {
    User(UserProfile),
    WithPersona {
        user: UserProfile,
        persona: PersonaProfile,
    },
}

impl Profile {
    pub fn user(&self) -> &UserProfile {
        match self {
            Profile::User(user) => user,
            Profile::WithPersona { user, .. } => user,
        }
    }

    pub fn persona(&self) -> Option<&PersonaProfile> {
        match self {
            Profile::User(_) => None,
            Profile::WithPersona { persona, .. } => Some(persona),
        }
    }
}

/// A recent topic the user has been worried about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concern {
    pub text: String,
    pub recorded_at: DateTime<Utc>,
}

fn push_opt(out: &mut Vec<(&'static str, String)>, label: &'static str, value: Option<String>) {
    if let Some(v) = value.filter(|v| !v.trim().is_empty()) {
        out.push((label, v));
    }
}

fn push_list(out: &mut Vec<(&'static str, String)>, label: &'static str, values: &[String]) {
    if !values.is_empty() {
        out.push((label, values.join(", ")));
    }
}

fn push_study(
    out: &mut Vec<(&'static str, String)>,
    is_studying: Option<bool>,
    degree: &Option<String>,
    institution: &Option<String>,
) {
    match (is_studying, degree, institution) {
        (Some(true), Some(d), Some(i)) => out.push(("Studying", format!("{d} at {i}"))),
        (Some(true), Some(d), None) => out.push(("Studying", d.clone())),
        (Some(true), None, Some(i)) => out.push(("Studying at", i.clone())),
        (Some(true), None, None) => out.push(("Studying", "yes".to_string())),
        (_, Some(d), _) => out.push(("Degree", d.clone())),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persona_mode_parse() {
        assert_eq!("minimal".parse::<PersonaMode>().unwrap(), PersonaMode::Minimal);
        assert_eq!(
            "full-persona".parse::<PersonaMode>().unwrap(),
            PersonaMode::FullPersona
        );
        assert!("chatty".parse::<PersonaMode>().is_err());
        assert_eq!(PersonaMode::default(), PersonaMode::Supportive);
    }

    #[test]
    fn test_named_profile_has_no_attributes() {
        let profile = UserProfile::named("u1", "Alex");
        assert!(profile.attributes().is_empty());
    }

    #[test]
    fn test_attributes_skip_blank_values() {
        let profile = UserProfile {
            name: "Alex".to_string(),
            age: Some(21),
            gender: Some("  ".to_string()),
            hobbies: vec!["chess".to_string(), "running".to_string()],
            is_studying: Some(true),
            degree: Some("BSc Physics".to_string()),
            institution: Some("MIT".to_string()),
            ..Default::default()
        };
        let attrs = profile.attributes();
        assert_eq!(
            attrs,
            vec![
                ("Age", "21".to_string()),
                ("Hobbies", "chess, running".to_string()),
                ("Studying", "BSc Physics at MIT".to_string()),
            ]
        );
    }

    #[test]
    fn test_profile_accessors() {
        let profile = Profile::WithPersona {
            user: UserProfile::named("u1", "Alex"),
            persona: PersonaProfile {
                name: "Mira".to_string(),
                ..Default::default()
            },
        };
        assert_eq!(profile.user().name, "Alex");
        assert_eq!(profile.persona().map(|p| p.name.as_str()), Some("Mira"));
        assert!(Profile::User(UserProfile::named("u2", "Sam")).persona().is_none());
    }
}
