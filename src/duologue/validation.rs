//! Caller input checks shared by the library entry points and the HTTP layer.
//!
//! [`Debate::run`](crate::duologue::debate::Debate::run) and
//! [`dual_chat`](crate::duologue::dual_chat::dual_chat) run these before any provider is
//! called; the server runs the same checks on request bodies.

use std::error::Error;
use std::fmt;

use crate::client_wrapper::Message;

/// Shortest accepted debate topic, in characters, after trimming.
pub const MIN_TOPIC_CHARS: usize = 3;

/// Malformed caller input.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The body is not valid JSON for the endpoint.
    MalformedBody(String),
    /// A chat was started without messages.
    EmptyMessages,
    /// A message carries a role other than system, user or assistant.
    UnknownRole { index: usize, role: String },
    /// The debate topic is shorter than [`MIN_TOPIC_CHARS`].
    TopicTooShort { min: usize, actual: usize },
    /// The temperature is not a number.
    InvalidTemperature,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MalformedBody(detail) => write!(f, "malformed request body: {}", detail),
            ValidationError::EmptyMessages => write!(f, "messages must contain at least one message"),
            ValidationError::UnknownRole { index, role } => write!(
                f,
                "messages[{}] has unknown role {:?} (expected system, user or assistant)",
                index, role
            ),
            ValidationError::TopicTooShort { min, actual } => write!(
                f,
                "prompt must be at least {} characters, got {}",
                min, actual
            ),
            ValidationError::InvalidTemperature => write!(f, "temperature must be a number"),
        }
    }
}

impl Error for ValidationError {}

/// Trim `topic` and check it is long enough to debate.
///
/// ```rust
/// use duologue::duologue::validation::{validate_topic, ValidationError};
///
/// assert_eq!(validate_topic("  Is art work? ").unwrap(), "Is art work?");
/// assert_eq!(
///     validate_topic("  ok "),
///     Err(ValidationError::TopicTooShort { min: 3, actual: 2 })
/// );
/// ```
pub fn validate_topic(topic: &str) -> Result<&str, ValidationError> {
    let topic = topic.trim();
    let actual = topic.chars().count();
    if actual < MIN_TOPIC_CHARS {
        return Err(ValidationError::TopicTooShort {
            min: MIN_TOPIC_CHARS,
            actual,
        });
    }
    Ok(topic)
}

/// A chat needs at least one message to answer.
pub fn validate_history(history: &[Message]) -> Result<(), ValidationError> {
    if history.is_empty() {
        Err(ValidationError::EmptyMessages)
    } else {
        Ok(())
    }
}

/// Only NaN is refused; any other value is clamped later.
pub fn validate_temperature(temperature: f32) -> Result<(), ValidationError> {
    if temperature.is_nan() {
        Err(ValidationError::InvalidTemperature)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_topic_rejected() {
        assert_eq!(
            validate_topic("   "),
            Err(ValidationError::TopicTooShort { min: 3, actual: 0 })
        );
        assert_eq!(validate_topic("Art?").unwrap(), "Art?");
    }

    #[test]
    fn empty_history_rejected() {
        assert_eq!(validate_history(&[]), Err(ValidationError::EmptyMessages));
        assert!(validate_history(&[Message::user("hi")]).is_ok());
    }

    #[test]
    fn only_nan_temperature_rejected() {
        assert_eq!(validate_temperature(f32::NAN), Err(ValidationError::InvalidTemperature));
        assert!(validate_temperature(f32::INFINITY).is_ok());
        assert!(validate_temperature(-3.0).is_ok());
    }
}
