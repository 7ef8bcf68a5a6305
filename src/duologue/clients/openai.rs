//! The `OpenAIClient` struct implements `ClientWrapper` for OpenAI's Chat Completions API,
//! and for any other endpoint that speaks the same wire format.
//!
//! # Key Features
//!
//! - **send_message(...)**: posts `{model, messages, temperature}` and returns the first
//!   choice as an assistant `Message`.
//! - **Eager credential check**: a missing key fails with a configuration error before any
//!   network traffic.
//! - **Bounded calls**: every request carries the configured timeout; only connection
//!   failures are retried, and only a few times.
//!
//! # Example
//!
//! ```rust,no_run
//! use duologue::clients::openai::{OpenAIClient, Model};
//! use duologue::client_wrapper::{ClientWrapper, Message};
//!
//! #[tokio::main]
//! async fn main() {
//!     let secret_key: String = std::env::var("OPENAI_API_KEY").unwrap_or_default();
//!     let client = OpenAIClient::new_with_model_enum(&secret_key, Model::GPT41Nano);
//!
//!     let reply = client
//!         .complete(
//!             &[
//!                 Message::system("You are an assistant."),
//!                 Message::user("Hello!"),
//!             ],
//!             None,
//!             0.7,
//!         )
//!         .await;
//!     match reply {
//!         Ok(text) => println!("Assistant: {}", text),
//!         Err(err) => println!("Failed: {}", err),
//!     }
//! }
//! ```
use std::time::Duration;

use async_trait::async_trait;

use crate::client_wrapper::{ClientWrapper, CompletionRequest, Message, ProviderError, Role};
use crate::clients::common::{build_chat_request, send_chat_completion, ChatEndpoint};
use crate::duologue::config::{
    key_suffix, DuologueConfig, DEFAULT_OPENAI_API_URL, DEFAULT_TRANSPORT_RETRIES,
    OPENAI_API_KEY_VAR,
};
use crate::duologue::http_client_pool::{build_http_client, DEFAULT_REQUEST_TIMEOUT};

/// Model identifiers commonly used with OpenAI's Chat Completions API.
pub enum Model {
    /// `gpt-4.1` – general availability GPT-4.1, Agent A's default.
    GPT41,
    /// `gpt-4.1-mini` – reduced cost GPT-4.1 tier.
    GPT41Mini,
    /// `gpt-4.1-nano` – ultra low cost GPT-4.1 derivative.
    GPT41Nano,
    /// `gpt-4o` – Omni model with text + image inputs.
    GPT4o,
    /// `gpt-4o-mini` – cost effective GPT-4o derivative.
    GPT4oMini,
}

/// Convert a [`Model`] variant into the string identifier expected by the REST API.
pub fn model_to_string(model: Model) -> String {
    match model {
        Model::GPT41 => "gpt-4.1".to_string(),
        Model::GPT41Mini => "gpt-4.1-mini".to_string(),
        Model::GPT41Nano => "gpt-4.1-nano".to_string(),
        Model::GPT4o => "gpt-4o".to_string(),
        Model::GPT4oMini => "gpt-4o-mini".to_string(),
    }
}

/// Model Agent A talks to when the request does not override it.
pub const DEFAULT_MODEL: &str = "gpt-4.1";

/// Client wrapper for OpenAI compatible Chat Completions endpoints.
///
/// The wrapper owns one pooled `reqwest::Client` for its whole lifetime, see
/// [`crate::duologue::http_client_pool`].
pub struct OpenAIClient {
    /// Long-lived HTTP client reused by every call.
    http: reqwest::Client,
    /// Provider name reported in errors and logs.
    provider: String,
    /// Environment variable the credential is expected in, quoted in configuration errors.
    credential_var: String,
    /// API key; `None` turns every call into a configuration error.
    secret_key: Option<String>,
    /// Full chat-completions URL.
    url: String,
    /// Model used when the caller does not pick one.
    model: String,
    /// Bound on a single call.
    timeout: Duration,
    /// Connection retries inside one call.
    max_transport_retries: u32,
}

impl OpenAIClient {
    /// Construct a new client using the provided API key and [`Model`] variant.
    pub fn new_with_model_enum(secret_key: &str, model: Model) -> Self {
        Self::new_with_model_string(secret_key, &model_to_string(model))
    }

    /// Construct a new client using the provided API key and explicit model name.
    ///
    /// A blank key is accepted here and reported as a configuration error on first use.
    pub fn new_with_model_string(secret_key: &str, model_name: &str) -> Self {
        Self::new_with_base_url(secret_key, model_name, DEFAULT_OPENAI_API_URL)
    }

    /// Construct a client targeting a custom OpenAI compatible chat-completions URL.
    pub fn new_with_base_url(secret_key: &str, model_name: &str, url: &str) -> Self {
        let secret_key = secret_key.trim();
        OpenAIClient {
            http: build_http_client(DEFAULT_REQUEST_TIMEOUT),
            provider: "openai".to_string(),
            credential_var: OPENAI_API_KEY_VAR.to_string(),
            secret_key: if secret_key.is_empty() {
                None
            } else {
                Some(secret_key.to_string())
            },
            url: url.to_string(),
            model: model_name.to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
            max_transport_retries: DEFAULT_TRANSPORT_RETRIES,
        }
    }

    /// Convenience helper wrapping [`OpenAIClient::new_with_base_url`] for strongly typed models.
    pub fn new_with_base_url_and_model_enum(secret_key: &str, model: Model, url: &str) -> Self {
        Self::new_with_base_url(secret_key, &model_to_string(model), url)
    }

    /// Agent A's provider as described by the service configuration.
    pub fn from_config(config: &DuologueConfig) -> Self {
        Self::new_with_base_url(
            config.openai_api_key.as_deref().unwrap_or(""),
            DEFAULT_MODEL,
            &config.openai_api_url,
        )
        .with_timeout(config.request_timeout)
        .with_max_transport_retries(config.max_transport_retries)
    }

    /// Rename the provider and the credential variable quoted in errors.
    ///
    /// Used by wrappers that delegate to this client for another vendor.
    pub fn with_provider_identity(
        mut self,
        provider: impl Into<String>,
        credential_var: impl Into<String>,
    ) -> Self {
        self.provider = provider.into();
        self.credential_var = credential_var.into();
        self
    }

    /// Bound every call by `timeout` and rebuild the pooled HTTP client accordingly.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self.http = build_http_client(timeout);
        self
    }

    /// Number of connection retries inside one call.
    pub fn with_max_transport_retries(mut self, retries: u32) -> Self {
        self.max_transport_retries = retries;
        self
    }

    /// Chat-completions URL this client posts to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ClientWrapper for OpenAIClient {
    fn provider_name(&self) -> &str {
        &self.provider
    }

    fn default_model(&self) -> &str {
        &self.model
    }

    fn credential_suffix(&self) -> Option<String> {
        self.secret_key.as_deref().and_then(key_suffix)
    }

    async fn send_message(
        &self,
        messages: &[Message],
        request: &CompletionRequest,
    ) -> Result<Message, ProviderError> {
        let secret_key = match self.secret_key.as_deref() {
            Some(key) => key,
            None => {
                log::error!(
                    "OpenAIClient::send_message(...): {} credential {} is not configured",
                    self.provider,
                    self.credential_var
                );
                return Err(ProviderError::MissingCredential {
                    provider: self.provider.clone(),
                    env_var: self.credential_var.clone(),
                });
            }
        };

        let body = build_chat_request(messages, request);
        let endpoint = ChatEndpoint {
            http: &self.http,
            provider: &self.provider,
            url: &self.url,
            api_key: secret_key,
            timeout: self.timeout,
            max_transport_retries: self.max_transport_retries,
        };

        log::debug!(
            "OpenAIClient::send_message(...): {} model={} temperature={} messages={}",
            self.provider,
            request.model,
            request.temperature,
            messages.len()
        );

        let content = send_chat_completion(&endpoint, &body).await?;
        Ok(Message {
            role: Role::Assistant,
            content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_key_is_treated_as_missing() {
        let client = OpenAIClient::new_with_model_string("   ", "gpt-4.1");
        assert!(client.credential_suffix().is_none());
    }

    #[tokio::test]
    async fn missing_key_fails_before_network() {
        // Unroutable URL: reaching the network would surface a transport error instead.
        let client = OpenAIClient::new_with_base_url("", "gpt-4.1", "http://0.0.0.0:1/v1/chat");
        let err = client
            .complete(&[Message::user("hi")], None, 0.7)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ProviderError::MissingCredential {
                provider: "openai".into(),
                env_var: "OPENAI_API_KEY".into(),
            }
        );
    }

    #[test]
    fn config_wires_url_and_key() {
        let config = DuologueConfig {
            openai_api_key: Some("sk-test-7777".into()),
            openai_api_url: "http://localhost:1234/v1/chat/completions".into(),
            ..DuologueConfig::default()
        };
        let client = OpenAIClient::from_config(&config);
        assert_eq!(client.url(), "http://localhost:1234/v1/chat/completions");
        assert_eq!(client.default_model(), DEFAULT_MODEL);
        assert_eq!(client.credential_suffix().as_deref(), Some("7777"));
    }
}
