//! Dialogue patterns - authored dialogue whose text and choices depend on
//! the state of a scheme.
//!
//! Content and titles may carry template directives; each choice may carry
//! gate directives (in its own text or in a separate condition) deciding
//! whether the player can pick it.

use serde::{Deserialize, Serialize};

use crate::condition::ConditionEngine;
use crate::error::ConfigError;
use crate::scope::ScopeProvider;

fn default_true() -> bool {
    true
}

/// One selectable answer of a dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueChoice {
    pub text: String,

    /// Gate directives deciding availability. When absent, gate directives
    /// in `text` are used instead.
    #[serde(default)]
    pub condition: Option<String>,

    /// Drop the choice entirely when its gate fails, instead of showing it disabled.
    #[serde(default = "default_true")]
    pub hide_if_failed: bool,
}

impl DialogueChoice {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            condition: None,
            hide_if_failed: true,
        }
    }

    /// Set a separate gate condition.
    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// Keep the choice visible (but disabled) when its gate fails.
    pub fn show_disabled(mut self) -> Self {
        self.hide_if_failed = false;
        self
    }

    fn gate(&self) -> &str {
        self.condition.as_deref().unwrap_or(&self.text)
    }
}

/// An authored dialogue: title, body and choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialoguePattern {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub choices: Vec<DialogueChoice>,
}

impl DialoguePattern {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            choices: Vec::new(),
        }
    }

    /// Add a choice.
    pub fn with_choice(mut self, choice: DialogueChoice) -> Self {
        self.choices.push(choice);
        self
    }

    /// Load a pattern from TOML.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Evaluate the pattern for display.
    ///
    /// Title and content are rendered. Each choice's gate is checked; text
    /// without directives skips evaluation. Choices that fail are dropped or
    /// disabled according to [`DialogueChoice::hide_if_failed`], and the
    /// remaining gate directives are stripped from the displayed text.
    pub fn present<P: ScopeProvider + ?Sized>(
        &self,
        engine: &ConditionEngine,
        context: &P,
    ) -> PresentedDialogue {
        let choices = self
            .choices
            .iter()
            .enumerate()
            .filter_map(|(index, choice)| {
                let gate = choice.gate();
                let enabled = !engine.has_directives(gate) || engine.passes(gate, context);
                if !enabled && choice.hide_if_failed {
                    tracing::debug!(index, "choice hidden");
                    return None;
                }
                Some(PresentedChoice {
                    index,
                    text: display_text(engine, &choice.text, context),
                    enabled,
                })
            })
            .collect();

        PresentedDialogue {
            title: display_text(engine, &self.title, context),
            content: display_text(engine, &self.content, context),
            choices,
        }
    }
}

fn display_text<P: ScopeProvider + ?Sized>(
    engine: &ConditionEngine,
    text: &str,
    context: &P,
) -> String {
    if !engine.has_directives(text) {
        return text.to_string();
    }
    let rendered = engine.render(text, context);
    engine.strip_directives(&rendered)
}

/// A choice as shown to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentedChoice {
    /// Position of the choice in [`DialoguePattern::choices`].
    pub index: usize,
    pub text: String,
    pub enabled: bool,
}

/// A dialogue ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentedDialogue {
    pub title: String,
    pub content: String,
    pub choices: Vec<PresentedChoice>,
}

impl PresentedDialogue {
    /// Choices the player can currently pick.
    pub fn enabled_choices(&self) -> impl Iterator<Item = &PresentedChoice> {
        self.choices.iter().filter(|c| c.enabled)
    }
}
