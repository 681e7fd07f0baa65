//! One persona generation attempt: prompt, completion, parse.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::config::Config;
use crate::content::UserContent;
use crate::providers::{ChatCompletion, ChatRequest};

use super::parse::{parse_persona_json, snippet};
use super::prompt::{build_prompt, SYSTEM_PROMPT};
use super::{PersonaError, PersonaRecord};

/// Request parameters for persona synthesis.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisSettings {
    /// Sampling temperature.
    pub temperature: f32,
    /// Upper bound on completion tokens.
    pub max_tokens: u32,
    /// Bound on the completion round trip.
    pub timeout: Duration,
    /// Posts and comments quoted in the prompt (each).
    pub sample_limit: usize,
}

impl Default for SynthesisSettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 8000,
            timeout: Duration::from_secs(120),
            sample_limit: 5,
        }
    }
}

impl SynthesisSettings {
    /// Settings from the `[llm]` and `[persona]` sections.
    pub fn from_config(config: &Config) -> Self {
        Self {
            temperature: config.llm.temperature,
            max_tokens: config.llm.max_tokens,
            timeout: config.llm.timeout(),
            sample_limit: config.persona.sample_limit,
        }
    }
}

/// Turns user content into a [`PersonaRecord`] via a completion endpoint.
pub struct PersonaSynthesizer {
    completion: Arc<dyn ChatCompletion>,
    settings: SynthesisSettings,
}

impl PersonaSynthesizer {
    /// Create a synthesizer over `completion`.
    pub fn new(completion: Arc<dyn ChatCompletion>, settings: SynthesisSettings) -> Self {
        Self {
            completion,
            settings,
        }
    }

    /// The settings requests are built with.
    pub fn settings(&self) -> &SynthesisSettings {
        &self.settings
    }

    /// The chat request that [`Self::synthesize`] would send.
    pub fn request_for(&self, content: &UserContent, username: &str) -> ChatRequest {
        ChatRequest {
            system: SYSTEM_PROMPT.to_owned(),
            user: build_prompt(
                &content.posts,
                &content.comments,
                username,
                self.settings.sample_limit,
            ),
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
            timeout: self.settings.timeout,
        }
    }

    /// Run one generation attempt. Not retried.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::Endpoint`] on transport, timeout, or non-2xx
    /// failures, and [`PersonaError::Parse`] when a success response has an
    /// undecodable envelope or its text holds no JSON object.
    pub async fn synthesize(
        &self,
        content: &UserContent,
        username: &str,
    ) -> Result<PersonaRecord, PersonaError> {
        let request = self.request_for(content, username);

        info!(
            username,
            model = self.completion.model_id(),
            prompt_chars = request.user.chars().count(),
            "requesting persona completion"
        );
        let raw = self.completion.complete_chat(request).await?;
        debug!(preview = %snippet(&raw), "raw persona completion");

        let map = parse_persona_json(&raw)?;
        Ok(PersonaRecord::from_json(&map))
    }
}
