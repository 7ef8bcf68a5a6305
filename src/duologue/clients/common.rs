use crate::client_wrapper::{CompletionRequest, Message, ProviderError, Role};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Longest slice of an error body copied into a [`ProviderError`].
const MAX_ERROR_DETAIL: usize = 300;

/// Chat-completions request body shared by every OpenAI compatible provider.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    pub temperature: f32,
}

/// One message as it travels on the wire.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WireMessage {
    pub role: String,
    pub content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Where and how to send a chat-completions request.
pub struct ChatEndpoint<'a> {
    pub http: &'a reqwest::Client,
    pub provider: &'a str,
    pub url: &'a str,
    pub api_key: &'a str,
    pub timeout: Duration,
    pub max_transport_retries: u32,
}

/// Build the request body for a call.
///
/// The body is a pure function of its inputs, so identical `(messages, request)` pairs
/// always serialize to identical payloads.
pub fn build_chat_request(messages: &[Message], request: &CompletionRequest) -> ChatCompletionRequest {
    let mut formatted_messages = Vec::with_capacity(messages.len());
    for msg in messages {
        formatted_messages.push(WireMessage {
            role: match msg.role {
                Role::System => "system".to_owned(),
                Role::User => "user".to_owned(),
                Role::Assistant => "assistant".to_owned(),
            },
            content: msg.content.clone(),
        });
    }

    ChatCompletionRequest {
        model: request.model.clone(),
        messages: formatted_messages,
        temperature: request.temperature,
    }
}

/// Extract `choices[0].message.content` from a successful response body.
pub fn parse_chat_response(provider: &str, body: &str) -> Result<String, ProviderError> {
    let malformed = |detail: String| ProviderError::MalformedResponse {
        provider: provider.to_string(),
        detail,
    };

    let response: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|err| malformed(format!("is not valid JSON: {}", err)))?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| malformed("has no choices".to_string()))?;
    let message = choice
        .message
        .ok_or_else(|| malformed("choice has no message".to_string()))?;
    message
        .content
        .ok_or_else(|| malformed("message has no content".to_string()))
}

/// Send a chat request and return the assistant's content.
///
/// Connection failures are retried up to `endpoint.max_transport_retries` times.
/// Timeouts and non-success statuses are returned immediately.
pub async fn send_chat_completion(
    endpoint: &ChatEndpoint<'_>,
    body: &ChatCompletionRequest,
) -> Result<String, ProviderError> {
    let mut attempt: u32 = 0;
    let response = loop {
        let result = endpoint
            .http
            .post(endpoint.url)
            .bearer_auth(endpoint.api_key)
            .timeout(endpoint.timeout)
            .json(body)
            .send()
            .await;

        match result {
            Ok(response) => break response,
            Err(err) if err.is_connect() && attempt < endpoint.max_transport_retries => {
                attempt += 1;
                log::warn!(
                    "duologue::clients::common::send_chat_completion(...): {} connect failure, retry {}/{}: {}",
                    endpoint.provider,
                    attempt,
                    endpoint.max_transport_retries,
                    err
                );
            }
            Err(err) => return Err(transport_error(endpoint, err)),
        }
    };

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|err| transport_error(endpoint, err))?;

    if !status.is_success() {
        log::error!(
            "duologue::clients::common::send_chat_completion(...): {} API Error: HTTP {}",
            endpoint.provider,
            status.as_u16()
        );
        return Err(ProviderError::Status {
            provider: endpoint.provider.to_string(),
            status: status.as_u16(),
            detail: truncate_detail(&text),
        });
    }

    parse_chat_response(endpoint.provider, &text)
}

fn transport_error(endpoint: &ChatEndpoint<'_>, err: reqwest::Error) -> ProviderError {
    log::error!(
        "duologue::clients::common::send_chat_completion(...): {} transport error: {}",
        endpoint.provider,
        err
    );
    if err.is_timeout() {
        ProviderError::Timeout {
            provider: endpoint.provider.to_string(),
            after: endpoint.timeout,
        }
    } else {
        ProviderError::Transport {
            provider: endpoint.provider.to_string(),
            detail: err.to_string(),
        }
    }
}

fn truncate_detail(body: &str) -> String {
    let body = body.trim();
    if body.chars().count() <= MAX_ERROR_DETAIL {
        return body.to_string();
    }
    let mut cut: String = body.chars().take(MAX_ERROR_DETAIL).collect();
    cut.push('…');
    cut
}
