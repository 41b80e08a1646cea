//! Prompt assembler for ByteBond companion turns.
//!
//! Composes profile, recalled memory, recent history and the current
//! message into one prompt. Pure: no I/O, same inputs give the same text.
//!
//! Layout (section order is fixed for every mode):
//! ```text
//! <persona>framing for the configured PersonaMode</persona>
//! <user_message>{current input}</user_message>
//! <relevant_memory>best matching earlier exchange, or "not specified"</relevant_memory>
//! <recent_history>rolling window, or "not specified"</recent_history>
//! <instructions>closing instruction for the mode</instructions>
//! ```

use bytebond_types::conversation::{ConversationTurn, Speaker};
use bytebond_types::memory::RetrievalResult;
use bytebond_types::profile::{Concern, PersonaMode, Profile};

/// Rendered for any empty context section.
pub const NOT_SPECIFIED: &str = "not specified";

/// Builds prompts for one configured persona mode.
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    mode: PersonaMode,
    assistant_name: String,
}

impl PromptAssembler {
    pub fn new(mode: PersonaMode, assistant_name: impl Into<String>) -> Self {
        Self {
            mode,
            assistant_name: assistant_name.into(),
        }
    }

    pub fn mode(&self) -> PersonaMode {
        self.mode
    }

    /// Assemble the full prompt.
    ///
    /// `concerns` only affects supportive framing; the persona profile only
    /// affects full-persona framing.
    pub fn assemble(
        &self,
        profile: &Profile,
        concerns: &[Concern],
        history: &[ConversationTurn],
        memory: &[RetrievalResult],
        user_input: &str,
    ) -> String {
        let assistant = self.assistant_name(profile);
        let user_name = profile.user().name.as_str();

        let sections = [
            format!(
                "<persona>\n{}\n</persona>",
                self.framing(profile, concerns, assistant)
            ),
            format!("<user_message>\n{}\n</user_message>", user_input.trim()),
            format!(
                "<relevant_memory>\n\
                Most relevant earlier exchange with {user_name} (use as context, do not copy it verbatim):\n\
                {}\n\
                </relevant_memory>",
                Self::render_memory(memory)
            ),
            format!(
                "<recent_history>\n\
                Recent conversation (use as context, do not copy it verbatim):\n\
                {}\n\
                </recent_history>",
                Self::render_history(history, user_name, assistant)
            ),
            format!(
                "<instructions>\n{}\n</instructions>",
                self.closing(user_name, assistant)
            ),
        ];

        sections.join("\n\n")
    }

    fn assistant_name<'a>(&'a self, profile: &'a Profile) -> &'a str {
        match (self.mode, profile.persona()) {
            (PersonaMode::FullPersona, Some(persona)) if !persona.name.trim().is_empty() => {
                &persona.name
            }
            _ => &self.assistant_name,
        }
    }

    fn framing(&self, profile: &Profile, concerns: &[Concern], assistant: &str) -> String {
        let user = profile.user();
        match self.mode {
            PersonaMode::Minimal => format!(
                "You are {assistant}, a friendly companion. You are talking to {}.",
                user.name
            ),
            PersonaMode::Supportive => {
                let topics = if concerns.is_empty() {
                    NOT_SPECIFIED.to_string()
                } else {
                    concerns
                        .iter()
                        .map(|c| c.text.trim())
                        .collect::<Vec<_>>()
                        .join("; ")
                };
                format!(
                    "You are {assistant}, an empathetic companion dedicated to emotional support and guidance. \
                    Your goal is to listen and respond with care to the feelings and concerns of the user, \
                    and to make it safe for them to talk openly.\n\
                    \n\
                    You are talking to {name}. What you know about them:\n\
                    - Name: {name}\n\
                    - Recent topics of concern: {topics}\n\
                    \n\
                    Validate their feelings, encourage them, and offer helpful insights or coping strategies. \
                    Ask open-ended questions when it helps them share more.",
                    name = user.name,
                )
            }
            PersonaMode::FullPersona => {
                let mut out = format!(
                    "You are {assistant}, a close companion to {}. Stay in character at all times.",
                    user.name
                );
                if let Some(persona) = profile.persona() {
                    let about_you = Self::render_attributes(&persona.attributes());
                    if !about_you.is_empty() {
                        out.push_str(&format!("\n\nAbout you:\n{about_you}"));
                    }
                }
                let about_user = Self::render_attributes(&user.attributes());
                out.push_str(&format!("\n\nAbout {}:\n", user.name));
                if about_user.is_empty() {
                    out.push_str(NOT_SPECIFIED);
                } else {
                    out.push_str(&about_user);
                }
                out
            }
        }
    }

    fn closing(&self, user_name: &str, assistant: &str) -> String {
        let tone = match self.mode {
            PersonaMode::Minimal => {
                format!("Reply to {user_name} naturally and warmly as {assistant}.")
            }
            PersonaMode::Supportive => "Respond to the user in a supportive manner, validating their \
                feelings and offering encouragement."
                .to_string(),
            PersonaMode::FullPersona => format!(
                "Reply to {user_name} the way {assistant} would, in character and conversational."
            ),
        };
        format!("{tone}\nDo not repeat phrasing from your earlier replies.")
    }

    fn render_attributes(attributes: &[(&'static str, String)]) -> String {
        attributes
            .iter()
            .map(|(label, value)| format!("- {label}: {value}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render_memory(memory: &[RetrievalResult]) -> String {
        if memory.is_empty() {
            return NOT_SPECIFIED.to_string();
        }
        memory
            .iter()
            .map(RetrievalResult::snippet)
            .collect::<Vec<_>>()
            .join("\n---\n")
    }

    fn render_history(history: &[ConversationTurn], user_name: &str, assistant: &str) -> String {
        if history.is_empty() {
            return NOT_SPECIFIED.to_string();
        }
        history
            .iter()
            .map(|turn| {
                let speaker = match turn.speaker {
                    Speaker::User => user_name,
                    Speaker::Companion => assistant,
                };
                format!("{speaker}: {}", turn.text)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Utc;

    use bytebond_types::memory::MemoryRecord;
    use bytebond_types::profile::{PersonaProfile, UserProfile};

    fn alex() -> Profile {
        Profile::User(UserProfile::named("alex", "Alex"))
    }

    fn section<'a>(prompt: &'a str, tag: &str) -> &'a str {
        let open = format!("<{tag}>\n");
        let close = format!("\n</{tag}>");
        let start = prompt.find(&open).expect("missing open tag") + open.len();
        let end = prompt[start..].find(&close).expect("missing close tag") + start;
        &prompt[start..end]
    }

    #[test]
    fn test_section_order_is_fixed() {
        for mode in [PersonaMode::Minimal, PersonaMode::Supportive, PersonaMode::FullPersona] {
            let prompt = PromptAssembler::new(mode, "ByteBond").assemble(&alex(), &[], &[], &[], "hi");
            let positions: Vec<usize> = [
                "<persona>",
                "<user_message>",
                "<relevant_memory>",
                "<recent_history>",
                "<instructions>",
            ]
            .iter()
            .map(|tag| prompt.find(tag).expect("tag present"))
            .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]), "mode {mode}: {positions:?}");
        }
    }

    #[test]
    fn test_empty_context_renders_placeholders() {
        let prompt = PromptAssembler::new(PersonaMode::Supportive, "ByteBond").assemble(
            &alex(),
            &[],
            &[],
            &[],
            "I'm stressed about exams",
        );
        assert!(section(&prompt, "relevant_memory").ends_with(NOT_SPECIFIED));
        assert!(section(&prompt, "recent_history").ends_with(NOT_SPECIFIED));
        assert!(section(&prompt, "persona").contains("Recent topics of concern: not specified"));
        assert_eq!(section(&prompt, "user_message"), "I'm stressed about exams");
    }

    #[test]
    fn test_memory_and_history_are_rendered() {
        let record = MemoryRecord::new(
            "alex",
            "I'm stressed about exams",
            "Exams are tough, you've got this.",
            vec![],
            vec![],
            "test",
        );
        let memory = vec![RetrievalResult {
            record,
            similarity: 0.8,
        }];
        let history = vec![
            ConversationTurn::new("alex", Speaker::User, "hello"),
            ConversationTurn::new("alex", Speaker::Companion, "hey Alex!"),
        ];
        let prompt = PromptAssembler::new(PersonaMode::Minimal, "ByteBond").assemble(
            &alex(),
            &[],
            &history,
            &memory,
            "still stressed",
        );

        let mem = section(&prompt, "relevant_memory");
        assert!(mem.contains("User said: I'm stressed about exams"));
        assert!(!mem.contains(NOT_SPECIFIED));

        let hist = section(&prompt, "recent_history");
        assert!(hist.ends_with("Alex: hello\nByteBond: hey Alex!"));
    }

    #[test]
    fn test_minimal_framing_uses_names_only() {
        let profile = Profile::User(UserProfile {
            age: Some(30),
            ..UserProfile::named("alex", "Alex")
        });
        let prompt = PromptAssembler::new(PersonaMode::Minimal, "Byte").assemble(&profile, &[], &[], &[], "hi");
        let persona = section(&prompt, "persona");
        assert!(persona.contains("You are Byte"));
        assert!(persona.contains("talking to Alex"));
        assert!(!persona.contains("Age"));
    }

    #[test]
    fn test_supportive_framing_lists_concerns() {
        let concerns = vec![
            Concern {
                text: "exams".to_string(),
                recorded_at: Utc::now(),
            },
            Concern {
                text: "sleep".to_string(),
                recorded_at: Utc::now(),
            },
        ];
        let prompt = PromptAssembler::new(PersonaMode::Supportive, "ByteBond").assemble(
            &alex(),
            &concerns,
            &[],
            &[],
            "hi",
        );
        assert!(section(&prompt, "persona").contains("Recent topics of concern: exams; sleep"));
        assert!(section(&prompt, "instructions").contains("supportive manner"));
    }

    #[test]
    fn test_full_persona_framing_interpolates_attributes() {
        let profile = Profile::WithPersona {
            user: UserProfile {
                hobbies: vec!["chess".to_string()],
                ..UserProfile::named("alex", "Alex")
            },
            persona: PersonaProfile {
                name: "Mira".to_string(),
                country: Some("Portugal".to_string()),
                personality: Some("playful and curious".to_string()),
                ..Default::default()
            },
        };
        let prompt = PromptAssembler::new(PersonaMode::FullPersona, "ByteBond").assemble(
            &profile,
            &[],
            &[],
            &[],
            "hi",
        );
        let persona = section(&prompt, "persona");
        assert!(persona.starts_with("You are Mira"));
        assert!(persona.contains("- From: Portugal"));
        assert!(persona.contains("- Personality: playful and curious"));
        assert!(persona.contains("About Alex:\n- Hobbies: chess"));
        assert!(section(&prompt, "instructions").contains("the way Mira would"));
    }

    #[test]
    fn test_full_persona_without_persona_profile_falls_back() {
        let prompt = PromptAssembler::new(PersonaMode::FullPersona, "ByteBond").assemble(
            &alex(),
            &[],
            &[],
            &[],
            "hi",
        );
        let persona = section(&prompt, "persona");
        assert!(persona.starts_with("You are ByteBond"));
        assert!(persona.contains("About Alex:\nnot specified"));
        assert!(!persona.contains("About you"));
    }

    #[test]
    fn test_assemble_is_pure() {
        let assembler = PromptAssembler::new(PersonaMode::Supportive, "ByteBond");
        let a = assembler.assemble(&alex(), &[], &[], &[], "same");
        let b = assembler.assemble(&alex(), &[], &[], &[], "same");
        assert_eq!(a, b);
    }
}
