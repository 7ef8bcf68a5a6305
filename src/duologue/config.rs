//! Configuration for Duologue.
//!
//! Provides the [`DuologueConfig`] struct holding provider credentials, endpoints and the
//! service limits. Users construct it by hand or read it from the process environment with
//! [`DuologueConfig::from_env`]; no config file is involved.
//!
//! # Example
//!
//! ```rust
//! use duologue::DuologueConfig;
//!
//! let config = DuologueConfig {
//!     openai_api_key: Some("sk-test-1234".into()),
//!     ..DuologueConfig::default()
//! };
//! assert_eq!(config.openai_key_suffix().as_deref(), Some("1234"));
//! assert!(config.deepseek_key_suffix().is_none());
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::duologue::http_client_pool::DEFAULT_REQUEST_TIMEOUT;

pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const OPENAI_API_URL_VAR: &str = "OPENAI_API_URL";
pub const DEEPSEEK_API_KEY_VAR: &str = "DEEPSEEK_API_KEY";
pub const DEEPSEEK_API_URL_VAR: &str = "DEEPSEEK_API_URL";
pub const BIND_VAR: &str = "DUOLOGUE_BIND";
pub const TIMEOUT_VAR: &str = "DUOLOGUE_TIMEOUT_SECS";
pub const TRANSPORT_RETRIES_VAR: &str = "DUOLOGUE_TRANSPORT_RETRIES";
pub const MAX_ROUNDS_VAR: &str = "DUOLOGUE_MAX_ROUNDS";
pub const INTERACTION_LOG_VAR: &str = "DUOLOGUE_INTERACTION_LOG";

pub const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_DEEPSEEK_API_URL: &str = "https://api.deepseek.com/v1/chat/completions";
pub const DEFAULT_BIND: &str = "127.0.0.1:8000";
pub const DEFAULT_TRANSPORT_RETRIES: u32 = 3;
pub const DEFAULT_MAX_DEBATE_ROUNDS: u32 = 6;

/// Global configuration for the service.
///
/// Blank credentials are normalised to `None` by [`DuologueConfig::from_env`]; the
/// provider wrappers treat `None` as a configuration error at call time.
#[derive(Clone)]
pub struct DuologueConfig {
    /// Credential for Agent A's provider (OpenAI).
    pub openai_api_key: Option<String>,
    /// Full chat-completions URL for OpenAI.
    pub openai_api_url: String,
    /// Credential for Agent B's provider (DeepSeek).
    pub deepseek_api_key: Option<String>,
    /// Full chat-completions URL for DeepSeek.
    pub deepseek_api_url: String,
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// Upper bound on a single provider call.
    pub request_timeout: Duration,
    /// How many times a connection failure is retried inside one provider call.
    pub max_transport_retries: u32,
    /// Ceiling applied to the requested number of debate rounds.
    pub max_debate_rounds: u32,
    /// Optional JSON-lines audit log of served requests.
    pub interaction_log: Option<PathBuf>,
}

impl Default for DuologueConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_api_url: DEFAULT_OPENAI_API_URL.to_string(),
            deepseek_api_key: None,
            deepseek_api_url: DEFAULT_DEEPSEEK_API_URL.to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_transport_retries: DEFAULT_TRANSPORT_RETRIES,
            max_debate_rounds: DEFAULT_MAX_DEBATE_ROUNDS,
            interaction_log: None,
        }
    }
}

impl std::fmt::Debug for DuologueConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuologueConfig")
            .field("openai_key_suffix", &self.openai_key_suffix())
            .field("openai_api_url", &self.openai_api_url)
            .field("deepseek_key_suffix", &self.deepseek_key_suffix())
            .field("deepseek_api_url", &self.deepseek_api_url)
            .field("bind_addr", &self.bind_addr)
            .field("request_timeout", &self.request_timeout)
            .field("max_transport_retries", &self.max_transport_retries)
            .field("max_debate_rounds", &self.max_debate_rounds)
            .field("interaction_log", &self.interaction_log)
            .finish()
    }
}

impl DuologueConfig {
    /// Read the configuration from the process environment.
    ///
    /// Unset or unparseable values fall back to the defaults; bad values are logged.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// ```rust
    /// use duologue::DuologueConfig;
    ///
    /// let config = DuologueConfig::from_lookup(|name| match name {
    ///     "DEEPSEEK_API_KEY" => Some("ds-abcdef".to_string()),
    ///     "DUOLOGUE_MAX_ROUNDS" => Some("4".to_string()),
    ///     _ => None,
    /// });
    /// assert_eq!(config.max_debate_rounds, 4);
    /// assert_eq!(config.deepseek_key_suffix().as_deref(), Some("cdef"));
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_blank = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            openai_api_key: non_blank(OPENAI_API_KEY_VAR),
            openai_api_url: non_blank(OPENAI_API_URL_VAR).unwrap_or(defaults.openai_api_url),
            deepseek_api_key: non_blank(DEEPSEEK_API_KEY_VAR),
            deepseek_api_url: non_blank(DEEPSEEK_API_URL_VAR)
                .unwrap_or(defaults.deepseek_api_url),
            bind_addr: parse_or(BIND_VAR, non_blank(BIND_VAR), defaults.bind_addr),
            request_timeout: match parse_or::<u64>(TIMEOUT_VAR, non_blank(TIMEOUT_VAR), 0) {
                0 => defaults.request_timeout,
                secs => Duration::from_secs(secs),
            },
            max_transport_retries: parse_or(
                TRANSPORT_RETRIES_VAR,
                non_blank(TRANSPORT_RETRIES_VAR),
                defaults.max_transport_retries,
            ),
            max_debate_rounds: parse_or(
                MAX_ROUNDS_VAR,
                non_blank(MAX_ROUNDS_VAR),
                defaults.max_debate_rounds,
            )
            .max(1),
            interaction_log: non_blank(INTERACTION_LOG_VAR).map(PathBuf::from),
        }
    }

    /// Last four characters of the OpenAI key, for health reporting.
    pub fn openai_key_suffix(&self) -> Option<String> {
        self.openai_api_key.as_deref().and_then(key_suffix)
    }

    /// Last four characters of the DeepSeek key, for health reporting.
    pub fn deepseek_key_suffix(&self) -> Option<String> {
        self.deepseek_api_key.as_deref().and_then(key_suffix)
    }
}

/// Reported instead of a suffix when the key is too short to reveal any of it.
pub const MASKED_KEY_SUFFIX: &str = "****";

/// Redact a credential down to its last four characters.
///
/// Blank keys are `None`. Keys of four characters or fewer are masked as
/// [`MASKED_KEY_SUFFIX`] so the full secret is never surfaced.
///
/// ```rust
/// use duologue::duologue::config::key_suffix;
///
/// assert_eq!(key_suffix("sk-live-9f3a").as_deref(), Some("9f3a"));
/// assert_eq!(key_suffix("abcd").as_deref(), Some("****"));
/// assert_eq!(key_suffix("   "), None);
/// ```
pub fn key_suffix(key: &str) -> Option<String> {
    let key = key.trim();
    let chars: Vec<char> = key.chars().collect();
    if chars.is_empty() {
        return None;
    }
    if chars.len() <= 4 {
        return Some(MASKED_KEY_SUFFIX.to_string());
    }
    Some(chars[chars.len() - 4..].iter().collect())
}

fn parse_or<T: std::str::FromStr>(name: &str, raw: Option<String>, default: T) -> T {
    match raw {
        Some(value) => match value.parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                log::warn!("Ignoring unparseable {}={:?}, using default", name, value);
                default
            }
        },
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = DuologueConfig::from_lookup(|_| None);
        assert!(config.openai_api_key.is_none());
        assert_eq!(config.deepseek_api_url, DEFAULT_DEEPSEEK_API_URL);
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.max_transport_retries, 3);
        assert!(config.interaction_log.is_none());
    }

    #[test]
    fn blank_keys_count_as_unset() {
        let config = DuologueConfig::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "   "),
            ("DEEPSEEK_API_KEY", ""),
        ]));
        assert!(config.openai_api_key.is_none());
        assert!(config.deepseek_api_key.is_none());
    }

    #[test]
    fn bad_numbers_fall_back_to_defaults() {
        let config = DuologueConfig::from_lookup(lookup_from(&[
            ("DUOLOGUE_TIMEOUT_SECS", "soon"),
            ("DUOLOGUE_MAX_ROUNDS", "0"),
            ("DUOLOGUE_BIND", "not-an-addr"),
        ]));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.max_debate_rounds, 1);
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND);
    }

    #[test]
    fn overrides_are_applied() {
        let config = DuologueConfig::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-abc12345"),
            ("DEEPSEEK_API_URL", "http://localhost:9999/v1/chat/completions"),
            ("DUOLOGUE_TIMEOUT_SECS", "5"),
            ("DUOLOGUE_INTERACTION_LOG", "/tmp/duologue.jsonl"),
        ]));
        assert_eq!(config.openai_key_suffix().as_deref(), Some("2345"));
        assert_eq!(
            config.deepseek_api_url,
            "http://localhost:9999/v1/chat/completions"
        );
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(
            config.interaction_log,
            Some(PathBuf::from("/tmp/duologue.jsonl"))
        );
    }

    #[test]
    fn short_keys_are_masked_not_missing() {
        let config = DuologueConfig {
            openai_api_key: Some("abc".into()),
            deepseek_api_key: Some("  ".into()),
            ..DuologueConfig::default()
        };
        assert_eq!(config.openai_key_suffix().as_deref(), Some(MASKED_KEY_SUFFIX));
        assert!(config.deepseek_key_suffix().is_none());
    }

    #[test]
    fn debug_output_never_contains_the_key() {
        let config = DuologueConfig {
            openai_api_key: Some("sk-very-secret-wxyz".into()),
            ..DuologueConfig::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("very-secret"));
        assert!(rendered.contains("wxyz"));
    }
}
