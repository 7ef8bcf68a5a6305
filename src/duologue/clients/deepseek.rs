//! DeepSeek client wrapper built on the OpenAI-compatible transport.
//!
//! DeepSeek exposes the same chat-completions surface as OpenAI, so this wrapper only
//! swaps the URL, the default model and the credential it reports when the key is absent.

use crate::clients::openai::OpenAIClient;
use crate::duologue::config::{DuologueConfig, DEEPSEEK_API_KEY_VAR, DEFAULT_DEEPSEEK_API_URL};
use crate::{ClientWrapper, CompletionRequest, Message, ProviderError};
use async_trait::async_trait;

pub struct DeepSeekClient {
    client: OpenAIClient,
    model: String,
}

pub enum Model {
    DeepSeekChat,     // general chat model, Agent B's default
    DeepSeekReasoner, // reasoning model, slower
}

fn model_to_string(model: Model) -> String {
    match model {
        Model::DeepSeekChat => "deepseek-chat".to_string(),
        Model::DeepSeekReasoner => "deepseek-reasoner".to_string(),
    }
}

/// Model Agent B talks to when the request does not override it.
pub const DEFAULT_MODEL: &str = "deepseek-chat";

impl DeepSeekClient {
    pub fn new_with_model_enum(secret_key: &str, model: Model) -> Self {
        Self::new_with_model_str(secret_key, &model_to_string(model))
    }

    pub fn new_with_model_str(secret_key: &str, model_name: &str) -> Self {
        Self::new_with_base_url(secret_key, model_name, DEFAULT_DEEPSEEK_API_URL)
    }

    /// The default URL is "<https://api.deepseek.com/v1/chat/completions>"
    pub fn new_with_base_url(secret_key: &str, model_name: &str, url: &str) -> Self {
        DeepSeekClient {
            client: OpenAIClient::new_with_base_url(secret_key, model_name, url)
                .with_provider_identity("deepseek", DEEPSEEK_API_KEY_VAR),
            model: model_name.to_string(),
        }
    }

    /// Agent B's provider as described by the service configuration.
    pub fn from_config(config: &DuologueConfig) -> Self {
        DeepSeekClient {
            client: OpenAIClient::new_with_base_url(
                config.deepseek_api_key.as_deref().unwrap_or(""),
                DEFAULT_MODEL,
                &config.deepseek_api_url,
            )
            .with_provider_identity("deepseek", DEEPSEEK_API_KEY_VAR)
            .with_timeout(config.request_timeout)
            .with_max_transport_retries(config.max_transport_retries),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

#[async_trait]
impl ClientWrapper for DeepSeekClient {
    fn provider_name(&self) -> &str {
        self.client.provider_name()
    }

    fn default_model(&self) -> &str {
        &self.model
    }

    fn credential_suffix(&self) -> Option<String> {
        self.client.credential_suffix()
    }

    async fn send_message(
        &self,
        messages: &[Message],
        request: &CompletionRequest,
    ) -> Result<Message, ProviderError> {
        self.client.send_message(messages, request).await
    }
}
