//! Completion endpoint abstraction.
//!
//! Defines the [`ChatCompletion`] trait and the request/error types shared by
//! provider implementations. One provider is implemented:
//! - [`openai::OpenAiProvider`]: any OpenAI-compatible `/chat/completions`
//!   endpoint (Groq by default)

use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;

pub mod openai;

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// A single-turn chat completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// System instruction.
    pub system: String,
    /// User prompt.
    pub user: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum tokens in the response.
    pub max_tokens: u32,
    /// Bound on the whole network round trip.
    pub timeout: Duration,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors returned by completion providers.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// HTTP transport failure, including timeouts.
    #[error("provider request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// A success response whose body did not match the expected schema.
    #[error("provider response parse error: {source}")]
    Parse {
        /// The decoding failure.
        #[source]
        source: serde_json::Error,
        /// Sanitized, truncated response body.
        snippet: String,
    },
    /// Upstream provider responded with an error status.
    #[error("provider returned non-success status {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Sanitized response body.
        body: String,
    },
}

impl ProviderError {
    /// A [`ProviderError::Parse`] for `body`, keeping only a sanitized prefix.
    pub fn parse(source: serde_json::Error, body: &str) -> Self {
        Self::Parse {
            source,
            snippet: sanitize_http_error_body(body),
        }
    }

    /// HTTP status code, when the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            Self::Parse { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// HTTP helpers
// ---------------------------------------------------------------------------

/// Check HTTP response status and return body text or a structured error.
///
/// # Errors
///
/// Returns `ProviderError::Request` on transport failure, `ProviderError::HttpStatus` on non-2xx.
pub async fn check_http_response(response: reqwest::Response) -> Result<String, ProviderError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(ProviderError::HttpStatus {
            status: status.as_u16(),
            body: sanitize_http_error_body(&body),
        });
    }
    Ok(body)
}

fn sanitize_http_error_body(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut sanitized = collapsed;
    for pattern in [
        r"gsk_[A-Za-z0-9]{20,}",
        r"sk-[A-Za-z0-9_\-]{20,}",
        r"Bearer [A-Za-z0-9_\-\.]{16,}",
    ] {
        if let Ok(regex) = Regex::new(pattern) {
            sanitized = regex.replace_all(&sanitized, "[REDACTED]").into_owned();
        }
    }

    const MAX_ERROR_BODY_CHARS: usize = 256;
    if sanitized.chars().count() > MAX_ERROR_BODY_CHARS {
        let shortened = sanitized
            .chars()
            .take(MAX_ERROR_BODY_CHARS)
            .collect::<String>();
        return format!("{shortened}...[truncated]");
    }

    sanitized
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// A text completion endpoint.
///
/// One attempt per call; retrying is the caller's decision.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Submit the request and return the completion text.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] on network, timeout, HTTP status, or
    /// response-shape failure.
    async fn complete_chat(&self, request: ChatRequest) -> Result<String, ProviderError>;

    /// The model identifier this provider sends.
    fn model_id(&self) -> &str;
}
