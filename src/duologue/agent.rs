//! Agents
//!
//! An [`Agent`] is one of the two voices of a chat or debate: a display name bound to a
//! provider ([`ClientWrapper`]) together with the persona, model and temperature it speaks
//! with. Agents are cheap to build and are assembled fresh for every request; they hold
//! no conversation state. Histories belong to the operation driving them
//! ([`Debate`](crate::debate::Debate) or [`dual_chat`](crate::dual_chat::dual_chat)).
//!
//! A call through an agent never fails outright. [`Agent::respond`] returns a
//! [`TurnOutcome`] and turning a failure into display text is a separate step,
//! [`TurnOutcome::render`].
//!
//! # Example
//!
//! ```rust
//! use duologue::Agent;
//! use duologue::clients::openai::OpenAIClient;
//! use duologue::persona::PEACH_STYLE;
//! use std::sync::Arc;
//!
//! let peach = Agent::new("Peach", Arc::new(OpenAIClient::new_with_model_string("", "gpt-4.1")))
//!     .with_style(PEACH_STYLE)
//!     .with_persona("punk_riot_grrrl")
//!     .with_temperature(3.0);
//!
//! assert_eq!(peach.temperature(), 1.5);
//! assert!(peach.debate_system_prompt().starts_with("You are Peach, a sharp feminist debater."));
//! ```

use std::fmt;
use std::sync::Arc;

use crate::client_wrapper::{clamp_temperature, ClientWrapper, Message, ProviderError, DEFAULT_TEMPERATURE};
use crate::duologue::language::Language;
use crate::duologue::persona::resolve_persona;

/// Result of one agent call.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// Trimmed reply text.
    Success(String),
    /// The provider call failed.
    Failure(ProviderError),
}

impl TurnOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TurnOutcome::Success(_))
    }

    /// Display text of this outcome.
    ///
    /// Replies are returned as-is; failures become `"<agent_name> error: <description>"`.
    ///
    /// ```rust
    /// use duologue::{ProviderError, TurnOutcome};
    ///
    /// let failed = TurnOutcome::Failure(ProviderError::MissingCredential {
    ///     provider: "openai".into(),
    ///     env_var: "OPENAI_API_KEY".into(),
    /// });
    /// assert_eq!(failed.render("Peach"), "Peach error: OPENAI_API_KEY missing on server.");
    /// ```
    pub fn render(&self, agent_name: &str) -> String {
        match self {
            TurnOutcome::Success(text) => text.clone(),
            TurnOutcome::Failure(err) => format!("{} error: {}", agent_name, err),
        }
    }

    pub fn error(&self) -> Option<&ProviderError> {
        match self {
            TurnOutcome::Success(_) => None,
            TurnOutcome::Failure(err) => Some(err),
        }
    }
}

/// One voice: a name, a provider and how it speaks.
#[derive(Clone)]
pub struct Agent {
    /// Display identity, e.g. `"Peach"`. Used in prompts, transcripts and error text.
    pub name: String,
    client: Arc<dyn ClientWrapper>,
    /// Resolved persona descriptor, see [`resolve_persona`].
    persona: Option<String>,
    /// Chat-mode voice, e.g. [`PEACH_STYLE`](crate::persona::PEACH_STYLE).
    style: Option<String>,
    /// Model override; `None` means the provider's default.
    model: Option<String>,
    temperature: f32,
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("provider", &self.client.provider_name())
            .field("model", &self.model())
            .field("temperature", &self.temperature)
            .field("persona", &self.persona.is_some())
            .finish()
    }
}

impl Agent {
    pub fn new(name: impl Into<String>, client: Arc<dyn ClientWrapper>) -> Self {
        Agent {
            name: name.into(),
            client,
            persona: None,
            style: None,
            model: None,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Set the persona from a selector: a built-in persona id or name, or free text.
    /// A blank selector clears the persona.
    pub fn with_persona(mut self, selector: &str) -> Self {
        self.persona = resolve_persona(selector);
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    /// Override the provider's default model. A blank name keeps the default.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        let model = model.into();
        self.model = if model.trim().is_empty() {
            None
        } else {
            Some(model.trim().to_string())
        };
        self
    }

    /// Sampling temperature, clamped into `[0.0, 1.5]`.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = clamp_temperature(temperature);
        self
    }

    pub fn persona(&self) -> Option<&str> {
        self.persona.as_deref()
    }

    /// Model this agent will ask for.
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.client.default_model())
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn client(&self) -> &Arc<dyn ClientWrapper> {
        &self.client
    }

    /// System prompt seeding this agent's debate history.
    pub fn debate_system_prompt(&self) -> String {
        let mut prompt = format!(
            "You are {}, a sharp feminist debater. Argue with conviction, answer the opponent's \
             actual points and never concede the frame. Keep every reply ≤180 words; end with a \
             punchy line or provocative question.",
            self.name
        );
        if let Some(persona) = &self.persona {
            prompt.push_str(&format!("\nPersona: {}.", persona.trim_end_matches('.')));
        }
        prompt
    }

    /// System prompt prepended to the caller's history in a dual chat.
    ///
    /// Made of the agent's style (or a plain identity line), its persona, and a reply
    /// language instruction when `language` is not English.
    pub fn chat_system_prompt(&self, language: Language) -> String {
        let mut prompt = match &self.style {
            Some(style) => style.clone(),
            None => format!("You are {}.", self.name),
        };
        if let Some(persona) = &self.persona {
            prompt.push_str(&format!("\nPersona: {}.", persona.trim_end_matches('.')));
        }
        if language != Language::En {
            prompt.push_str(&format!("\nReply in {}.", language.name()));
        }
        prompt
    }

    /// Ask the provider for the next reply to `history`.
    ///
    /// The history is borrowed; nothing is appended to it here.
    pub async fn respond(&self, history: &[Message]) -> TurnOutcome {
        match self
            .client
            .complete(history, self.model.as_deref(), self.temperature)
            .await
        {
            Ok(text) => TurnOutcome::Success(text),
            Err(err) => {
                log::error!(
                    "Agent::respond(...): {} ({}) failed: {}",
                    self.name,
                    err.provider(),
                    err
                );
                TurnOutcome::Failure(err)
            }
        }
    }
}
