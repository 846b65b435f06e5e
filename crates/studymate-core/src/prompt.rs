//! Prompt texts used to seed and steer a conversation.

use crate::subject::Subject;
use serde::{Deserialize, Serialize};

const SUBJECT_PLACEHOLDER: &str = "{subject}";

/// The set of prompts a conversation is seeded with.
///
/// Loaded from the `[prompts]` table of `config.toml`; every field falls back
/// to the built-in text when omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptBook {
    /// System prompt when no subject applies.
    pub default_system: String,
    /// System prompt for a named subject; `{subject}` is replaced by its label.
    pub subject_system: String,
    /// System prompt for the translate flow.
    pub translate_system: String,
    /// First visible assistant message; `{subject}` is replaced by the label.
    pub welcome: String,
    /// Welcome message when no subject applies.
    pub default_welcome: String,
    /// Hidden prompt sent when the user asks for a deeper explanation.
    pub explain_further: String,
}

impl Default for PromptBook {
    fn default() -> Self {
        Self {
            default_system: "You are a patient homework tutor. Explain step by step, check the \
                             student's reasoning, and write every formula in LaTeX wrapped in \
                             \\( \\) for inline math or \\[ \\] for display math."
                .to_string(),
            subject_system: "You are a patient {subject} tutor. Stay on {subject} unless the \
                             student asks otherwise. Explain step by step and write every \
                             formula in LaTeX wrapped in \\( \\) for inline math or \\[ \\] for \
                             display math."
                .to_string(),
            translate_system: "You are a translator. Reply with the translation only, keeping \
                               formulas and numbers unchanged."
                .to_string(),
            welcome: "Hi! I'm your {subject} helper. Send me a question or a photo of the task."
                .to_string(),
            default_welcome: "Hi! Send me any homework question or a photo of the task."
                .to_string(),
            explain_further: "Explain your previous answer in more detail, one step at a time, \
                              as if to a student seeing it for the first time."
                .to_string(),
        }
    }
}

impl PromptBook {
    /// System prompt for a conversation about `subject`.
    pub fn system_prompt(&self, subject: Option<&Subject>) -> String {
        match subject {
            Some(Subject::Topic(label)) => self.subject_system.replace(SUBJECT_PLACEHOLDER, label),
            Some(Subject::Translate) => self.translate_system.clone(),
            Some(Subject::OpenTopic) | None => self.default_system.clone(),
        }
    }

    /// Visible welcome message for a conversation about `subject`.
    pub fn welcome_message(&self, subject: Option<&Subject>) -> String {
        match subject {
            Some(subject @ Subject::Topic(_)) | Some(subject @ Subject::Translate) => {
                self.welcome.replace(SUBJECT_PLACEHOLDER, subject.label())
            }
            Some(Subject::OpenTopic) | None => self.default_welcome.clone(),
        }
    }

    /// User-side prompt asking to translate `text` between two languages.
    pub fn translate_request(&self, text: &str, from: &str, to: &str) -> String {
        format!("Translate the following text from {from} to {to}:\n\n{text}")
    }
}
