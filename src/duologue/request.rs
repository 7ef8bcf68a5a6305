//! Wire types of the HTTP surface and request validation.
//!
//! Request bodies are deserialized into the structs below, defaults filled in by serde,
//! then checked with `validate()` before any provider is called. A failed check is a
//! [`ValidationError`] and rejects the whole request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::client_wrapper::{Message, Role, DEFAULT_TEMPERATURE};
use crate::duologue::debate::{Transcript, Turn};
use crate::duologue::persona::{DEFAULT_PERSONA_A, DEFAULT_PERSONA_B};
use crate::duologue::validation::{validate_history, validate_temperature, validate_topic};

pub use crate::duologue::validation::{ValidationError, MIN_TOPIC_CHARS};

pub const DEFAULT_DEBATE_ROUNDS: i64 = 2;
pub const DEFAULT_DEBATE_TEMPERATURE: f32 = 0.8;

/// A message as sent by callers. The role stays a string until validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Body of `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub persona_peach: Option<String>,
    #[serde(default)]
    pub persona_dragon: Option<String>,
    #[serde(default)]
    pub model_peach: Option<String>,
    #[serde(default)]
    pub model_dragon: Option<String>,
    #[serde(default = "default_chat_temperature")]
    pub temperature: f32,
}

fn default_chat_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

impl ChatRequest {
    /// Check the request and convert its messages into a history.
    pub fn validate(&self) -> Result<Vec<Message>, ValidationError> {
        validate_temperature(self.temperature)?;
        let history = self
            .messages
            .iter()
            .enumerate()
            .map(|(index, m)| match Role::parse(&m.role) {
                Some(role) => Ok(Message::new(role, m.content.clone())),
                None => Err(ValidationError::UnknownRole {
                    index,
                    role: m.role.clone(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        validate_history(&history)?;
        Ok(history)
    }
}

/// Body of `POST /debate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateRequest {
    pub prompt: String,
    #[serde(default = "default_rounds")]
    pub rounds: i64,
    #[serde(default = "default_persona_peach")]
    pub persona_peach: String,
    #[serde(default = "default_persona_dragon")]
    pub persona_dragon: String,
    #[serde(default)]
    pub model_peach: Option<String>,
    #[serde(default)]
    pub model_dragon: Option<String>,
    #[serde(default = "default_debate_temperature")]
    pub temperature: f32,
    /// Ask both agents for a closing line after the last round.
    #[serde(default)]
    pub closing: bool,
}

fn default_rounds() -> i64 {
    DEFAULT_DEBATE_ROUNDS
}

fn default_persona_peach() -> String {
    DEFAULT_PERSONA_A.to_string()
}

fn default_persona_dragon() -> String {
    DEFAULT_PERSONA_B.to_string()
}

fn default_debate_temperature() -> f32 {
    DEFAULT_DEBATE_TEMPERATURE
}

impl DebateRequest {
    /// Check the request and return the trimmed topic.
    ///
    /// Round counts are not rejected here; the debate clamps them.
    pub fn validate(&self) -> Result<String, ValidationError> {
        let topic = validate_topic(&self.prompt)?;
        validate_temperature(self.temperature)?;
        Ok(topic.to_string())
    }
}

/// Body of a successful `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub timestamp: DateTime<Utc>,
    pub peach: String,
    pub dragon: String,
}

/// Closing lines keyed by agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosingResponse {
    pub peach: String,
    pub dragon: String,
}

/// Body of a successful `POST /debate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateResponse {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub topic: String,
    pub rounds: usize,
    pub transcript: Vec<TurnResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closing: Option<ClosingResponse>,
}

/// One transcript entry on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnResponse {
    pub agent: String,
    pub round: usize,
    pub content: String,
}

impl From<&Turn> for TurnResponse {
    fn from(turn: &Turn) -> Self {
        TurnResponse {
            agent: turn.agent.clone(),
            round: turn.round,
            content: turn.content.clone(),
        }
    }
}

impl From<&Transcript> for DebateResponse {
    fn from(transcript: &Transcript) -> Self {
        DebateResponse {
            id: transcript.id,
            timestamp: transcript.timestamp,
            topic: transcript.topic.clone(),
            rounds: transcript.rounds,
            transcript: transcript.turns.iter().map(TurnResponse::from).collect(),
            closing: transcript.closing.as_ref().map(|c| ClosingResponse {
                peach: c.agent_a.clone(),
                dragon: c.agent_b.clone(),
            }),
        }
    }
}

/// Body of `GET /health`. Only the last four characters of each key are exposed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub time: DateTime<Utc>,
    pub openai_key_suffix: Option<String>,
    pub deepseek_key_suffix: Option<String>,
}

/// Body of every rejected request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub detail: String,
}

impl From<&ValidationError> for ErrorResponse {
    fn from(err: &ValidationError) -> Self {
        ErrorResponse {
            error: "ValidationError".to_string(),
            detail: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn debate_defaults() {
        let req: DebateRequest = serde_json::from_value(json!({"prompt": "Is art work?"})).unwrap();
        assert_eq!(req.rounds, 2);
        assert_eq!(req.persona_peach, "Punk Riot Grrrl");
        assert_eq!(req.persona_dragon, "Philosophical Trickster");
        assert_eq!(req.temperature, 0.8);
        assert!(!req.closing);
        assert_eq!(req.validate().unwrap(), "Is art work?");
    }

    #[test]
    fn short_topic_rejected() {
        let req: DebateRequest = serde_json::from_value(json!({"prompt": "  ok  "})).unwrap();
        assert_eq!(
            req.validate().unwrap_err(),
            ValidationError::TopicTooShort { min: 3, actual: 2 }
        );
    }

    #[test]
    fn chat_roles_are_checked() {
        let req: ChatRequest = serde_json::from_value(json!({
            "messages": [{"role": "user", "content": "hi"}, {"role": "tool", "content": "x"}]
        }))
        .unwrap();
        assert_eq!(req.temperature, 0.7);
        assert_eq!(
            req.validate().unwrap_err(),
            ValidationError::UnknownRole { index: 1, role: "tool".into() }
        );
    }

    #[test]
    fn chat_without_messages_rejected() {
        let req: ChatRequest = serde_json::from_value(json!({"messages": []})).unwrap();
        assert_eq!(req.validate().unwrap_err(), ValidationError::EmptyMessages);
    }

    #[test]
    fn overflowing_temperature_is_accepted() {
        let req: ChatRequest = serde_json::from_value(json!({
            "messages": [{"role": "user", "content": "hi"}],
            "temperature": 1e300
        }))
        .unwrap();
        assert_eq!(req.validate().unwrap(), vec![Message::user("hi")]);
    }

    #[test]
    fn error_envelope() {
        let body = ErrorResponse::from(&ValidationError::EmptyMessages);
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            json!({"error": "ValidationError", "detail": "messages must contain at least one message"})
        );
    }
}
