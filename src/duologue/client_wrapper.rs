//! A ClientWrapper is a wrapper around a specific chat-completion provider.
//! It provides a common interface to interact with the LLMs.
//! It does not keep track of the conversation, for that the caller (a debate or a
//! dual chat) owns the message history and hands it over on every call.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::time::Duration;

/// Lowest temperature forwarded to a provider.
pub const MIN_TEMPERATURE: f32 = 0.0;
/// Highest temperature forwarded to a provider.
pub const MAX_TEMPERATURE: f32 = 1.5;
/// Temperature used when the caller does not pick one (or sends NaN).
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Represents the possible roles for a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    // set by the developer to steer the model's responses
    System,
    // a message sent by a human user (or app user)
    User,
    // lets the model know the content was generated as a response to a user message
    Assistant,
}

impl Role {
    /// Wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Parse a role name, ignoring case and surrounding whitespace.
    ///
    /// ```rust
    /// use duologue::Role;
    ///
    /// assert_eq!(Role::parse(" User "), Some(Role::User));
    /// assert_eq!(Role::parse("tool"), None);
    /// ```
    pub fn parse(raw: &str) -> Option<Role> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "system" => Some(Role::System),
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents a generic message to be sent to an LLM.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The role associated with the message.
    pub role: Role,
    /// The actual content of the message.
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Fully resolved per-call parameters handed to [`ClientWrapper::send_message`].
///
/// By the time a wrapper sees this struct the model has been defaulted and the
/// temperature clamped, see [`ClientWrapper::complete`].
#[derive(Clone, Debug, PartialEq)]
pub struct CompletionRequest {
    /// Model identifier sent to the provider.
    pub model: String,
    /// Sampling temperature, always inside `[MIN_TEMPERATURE, MAX_TEMPERATURE]`.
    pub temperature: f32,
}

/// Clamp a caller supplied temperature into the range every provider accepts.
///
/// ```rust
/// use duologue::client_wrapper::clamp_temperature;
///
/// assert_eq!(clamp_temperature(-1.0), 0.0);
/// assert_eq!(clamp_temperature(10.0), 1.5);
/// assert_eq!(clamp_temperature(0.8), 0.8);
/// ```
pub fn clamp_temperature(temperature: f32) -> f32 {
    if temperature.is_nan() {
        DEFAULT_TEMPERATURE
    } else {
        temperature.clamp(MIN_TEMPERATURE, MAX_TEMPERATURE)
    }
}

/// Failure of a single provider call.
///
/// [`ProviderError::kind`] maps each variant onto the three user-facing categories:
/// `ConfigurationError` (no credential), `ProviderError` (transport, timeout, status)
/// and `MalformedResponseError` (2xx with an unexpected body).
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// The provider's API key is absent or blank. Detected before any network call.
    MissingCredential { provider: String, env_var: String },
    /// The caller handed over an empty history.
    EmptyHistory { provider: String },
    /// The HTTP request could not be completed.
    Transport { provider: String, detail: String },
    /// The provider did not answer within the configured timeout.
    Timeout { provider: String, after: Duration },
    /// The provider answered with a non-success status code.
    Status {
        provider: String,
        status: u16,
        detail: String,
    },
    /// The provider answered 2xx but the body did not carry `choices[0].message.content`.
    MalformedResponse { provider: String, detail: String },
}

impl ProviderError {
    /// Name of the error category, as shown to end users.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::MissingCredential { .. } => "ConfigurationError",
            ProviderError::EmptyHistory { .. } => "ValidationError",
            ProviderError::Transport { .. }
            | ProviderError::Timeout { .. }
            | ProviderError::Status { .. } => "ProviderError",
            ProviderError::MalformedResponse { .. } => "MalformedResponseError",
        }
    }

    /// Name of the provider that failed.
    pub fn provider(&self) -> &str {
        match self {
            ProviderError::MissingCredential { provider, .. }
            | ProviderError::EmptyHistory { provider }
            | ProviderError::Transport { provider, .. }
            | ProviderError::Timeout { provider, .. }
            | ProviderError::Status { provider, .. }
            | ProviderError::MalformedResponse { provider, .. } => provider,
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::MissingCredential { env_var, .. } => {
                write!(f, "{} missing on server.", env_var)
            }
            ProviderError::EmptyHistory { provider } => write!(
                f,
                "{}: {} request needs at least one message",
                self.kind(),
                provider
            ),
            ProviderError::Transport { provider, detail } => {
                write!(f, "{}: {} transport failure: {}", self.kind(), provider, detail)
            }
            ProviderError::Timeout { provider, after } => write!(
                f,
                "{}: {} timed out after {}s",
                self.kind(),
                provider,
                after.as_secs()
            ),
            ProviderError::Status {
                provider,
                status,
                detail,
            } => write!(
                f,
                "{}: {} returned HTTP {}: {}",
                self.kind(),
                provider,
                status,
                detail
            ),
            ProviderError::MalformedResponse { provider, detail } => {
                write!(f, "{}: {} response {}", self.kind(), provider, detail)
            }
        }
    }
}

impl Error for ProviderError {}

/// Trait defining the interface to interact with the chat-completion providers.
#[async_trait]
pub trait ClientWrapper: Send + Sync {
    /// Short provider identifier used in logs and error messages (e.g. `"openai"`).
    fn provider_name(&self) -> &str;

    /// Model used when the caller does not override it.
    fn default_model(&self) -> &str;

    /// Last four characters of the configured credential, for health reporting.
    /// Wrappers without a credential return `None`.
    fn credential_suffix(&self) -> Option<String> {
        None
    }

    /// Send the messages to the provider with already resolved parameters and return the
    /// assistant reply.
    /// - `messages`: The messages to send in the request. Never empty.
    /// - `request`: Model and clamped temperature.
    async fn send_message(
        &self,
        messages: &[Message],
        request: &CompletionRequest,
    ) -> Result<Message, ProviderError>;

    /// Uniform completion contract shared by every provider.
    ///
    /// Rejects an empty history, falls back to [`ClientWrapper::default_model`] when
    /// `model` is absent or blank, clamps `temperature` into `[0.0, 1.5]` and returns the
    /// whitespace-trimmed reply text. The history is only borrowed, never mutated.
    async fn complete(
        &self,
        history: &[Message],
        model: Option<&str>,
        temperature: f32,
    ) -> Result<String, ProviderError> {
        if history.is_empty() {
            return Err(ProviderError::EmptyHistory {
                provider: self.provider_name().to_string(),
            });
        }

        let model = match model.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.default_model().to_string(),
        };
        let request = CompletionRequest {
            model,
            temperature: clamp_temperature(temperature),
        };

        let reply = self.send_message(history, &request).await?;
        Ok(reply.content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_keeps_values_in_range() {
        assert_eq!(clamp_temperature(-1.0), MIN_TEMPERATURE);
        assert_eq!(clamp_temperature(10.0), MAX_TEMPERATURE);
        assert_eq!(clamp_temperature(0.0), 0.0);
        assert_eq!(clamp_temperature(1.5), 1.5);
        assert_eq!(clamp_temperature(f32::NAN), DEFAULT_TEMPERATURE);
        assert_eq!(clamp_temperature(f32::INFINITY), MAX_TEMPERATURE);
    }

    #[test]
    fn missing_credential_reads_like_a_config_problem() {
        let err = ProviderError::MissingCredential {
            provider: "openai".into(),
            env_var: "OPENAI_API_KEY".into(),
        };
        assert_eq!(err.kind(), "ConfigurationError");
        assert_eq!(err.to_string(), "OPENAI_API_KEY missing on server.");
    }

    #[test]
    fn status_error_names_provider_and_code() {
        let err = ProviderError::Status {
            provider: "deepseek".into(),
            status: 503,
            detail: "overloaded".into(),
        };
        assert_eq!(err.kind(), "ProviderError");
        assert_eq!(err.provider(), "deepseek");
        assert_eq!(
            err.to_string(),
            "ProviderError: deepseek returned HTTP 503: overloaded"
        );
    }

    #[test]
    fn roles_serialize_lowercase() {
        let msg = Message::assistant("hi");
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }
}
