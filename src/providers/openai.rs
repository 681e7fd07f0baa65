//! OpenAI-compatible provider using the `/chat/completions` API.
//!
//! Works against OpenAI, Groq, and other servers speaking the same wire format.

use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use crate::credentials::ApiKey;

use super::{check_http_response, ChatCompletion, ChatRequest, ProviderError};

// ---------------------------------------------------------------------------
// Wire types (pub for integration testing)
// ---------------------------------------------------------------------------

/// Chat completions API request body.
#[doc(hidden)]
#[derive(Debug, Serialize)]
pub struct OpenAiRequest {
    /// Model identifier.
    pub model: String,
    /// System and user messages.
    pub messages: Vec<OpenAiMessage>,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum completion tokens.
    pub max_tokens: u32,
}

/// A message in chat format.
#[doc(hidden)]
#[derive(Debug, Serialize)]
pub struct OpenAiMessage {
    /// Role (`system` or `user`).
    pub role: String,
    /// Plain text content.
    pub content: String,
}

/// Chat completions API response body.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct OpenAiResponse {
    /// Response choices.
    pub choices: Vec<OpenAiChoice>,
}

/// A response choice.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct OpenAiChoice {
    /// Assistant message for this choice.
    pub message: OpenAiResponseMessage,
    /// Why generation stopped.
    pub finish_reason: Option<String>,
}

/// Assistant message.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct OpenAiResponseMessage {
    /// Text content.
    pub content: Option<String>,
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// OpenAI-compatible chat completions provider.
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    endpoint: String,
    model: String,
    api_key: ApiKey,
    client: reqwest::Client,
}

impl OpenAiProvider {
    /// Create a provider for `{base_url}/chat/completions`.
    pub fn new(base_url: &str, model: impl Into<String>, api_key: ApiKey) -> Self {
        Self {
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            model: model.into(),
            api_key,
            client: reqwest::Client::new(),
        }
    }

    /// Create a provider from the `[llm]` config section.
    pub fn from_config(config: &LlmConfig, api_key: ApiKey) -> Self {
        Self::new(&config.base_url, config.model.clone(), api_key)
    }

    /// The full completions URL requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

// ---------------------------------------------------------------------------
// Request / Response builders (pub for integration testing)
// ---------------------------------------------------------------------------

/// Build an API request body from a chat request.
#[doc(hidden)]
pub fn build_request(model: &str, request: &ChatRequest) -> OpenAiRequest {
    OpenAiRequest {
        model: model.to_owned(),
        messages: vec![
            OpenAiMessage {
                role: "system".to_owned(),
                content: request.system.clone(),
            },
            OpenAiMessage {
                role: "user".to_owned(),
                content: request.user.clone(),
            },
        ],
        temperature: request.temperature,
        max_tokens: request.max_tokens,
    }
}

/// Extract the completion text from an API response body.
///
/// # Errors
///
/// Returns `ProviderError::Parse` if the body cannot be deserialized or has
/// no first choice.
#[doc(hidden)]
pub fn parse_response(body: &str) -> Result<String, ProviderError> {
    let resp: OpenAiResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::parse(e, body))?;

    let choice = resp.choices.into_iter().next().ok_or_else(|| {
        ProviderError::parse(serde::de::Error::custom("missing choices[0]"), body)
    })?;

    if choice.finish_reason.as_deref() == Some("length") {
        tracing::warn!("completion stopped at the token limit; output may be truncated");
    }

    Ok(choice.message.content.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Trait impl
// ---------------------------------------------------------------------------

#[async_trait::async_trait]
impl ChatCompletion for OpenAiProvider {
    async fn complete_chat(&self, request: ChatRequest) -> Result<String, ProviderError> {
        let api_request = build_request(&self.model, &request);

        let response = self
            .client
            .post(&self.endpoint)
            .header("content-type", "application/json")
            .bearer_auth(self.api_key.expose())
            .timeout(request.timeout)
            .json(&api_request)
            .send()
            .await?;

        let payload = check_http_response(response).await?;
        parse_response(&payload)
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
