//! Persona synthesizer tests with a scripted completion endpoint.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use personagen::content::{Comment, Post, UserContent};
use personagen::credentials::ApiKey;
use personagen::providers::openai::OpenAiProvider;
use personagen::persona::prompt::SYSTEM_PROMPT;
use personagen::persona::synthesizer::{PersonaSynthesizer, SynthesisSettings};
use personagen::persona::PersonaError;
use personagen::providers::{ChatCompletion, ChatRequest, ProviderError};

use crate::http_support::serve_once;

/// Returns a fixed result and records every request.
struct ScriptedCompletion {
    reply: Result<String, u16>,
    seen: Mutex<Vec<ChatRequest>>,
}

impl ScriptedCompletion {
    fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_owned()),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(status),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<ChatRequest> {
        self.seen.lock().expect("lock").clone()
    }
}

#[async_trait]
impl ChatCompletion for ScriptedCompletion {
    async fn complete_chat(&self, request: ChatRequest) -> Result<String, ProviderError> {
        self.seen.lock().expect("lock").push(request);
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(status) => Err(ProviderError::HttpStatus {
                status: *status,
                body: "upstream unavailable".to_owned(),
            }),
        }
    }

    fn model_id(&self) -> &str {
        "scripted"
    }
}

fn content() -> UserContent {
    UserContent {
        posts: vec![Post {
            title: "Rust borrow checker question".to_owned(),
            body: "Why does this not compile?".to_owned(),
            source_path: "/r/rust/comments/abc/".to_owned(),
        }],
        comments: vec![Comment {
            body: "Try cloning the Arc.".to_owned(),
            source_path: "/r/rust/comments/def/".to_owned(),
        }],
    }
}

fn settings() -> SynthesisSettings {
    SynthesisSettings {
        temperature: 0.7,
        max_tokens: 8000,
        timeout: Duration::from_secs(30),
        sample_limit: 5,
    }
}

#[tokio::test]
async fn fenced_completion_becomes_record() {
    let completion = ScriptedCompletion::replying(
        "```json\n{\"name\": \"Alice\", \"traits\": [\"curious\"]}\n```",
    );
    let synthesizer = PersonaSynthesizer::new(completion.clone(), settings());

    let persona = synthesizer
        .synthesize(&content(), "alice")
        .await
        .expect("should synthesize");
    assert_eq!(persona.name.as_deref(), Some("Alice"));
    assert_eq!(persona.traits, vec!["curious".to_owned()]);
}

#[tokio::test]
async fn request_carries_fixed_instruction_and_settings() {
    let completion = ScriptedCompletion::replying("{}");
    let synthesizer = PersonaSynthesizer::new(completion.clone(), settings());
    synthesizer
        .synthesize(&content(), "alice")
        .await
        .expect("should synthesize");

    let requests = completion.requests();
    assert_eq!(requests.len(), 1, "exactly one attempt");
    let request = &requests[0];
    assert_eq!(request.system, SYSTEM_PROMPT);
    assert_eq!(request.max_tokens, 8000);
    assert_eq!(request.timeout, Duration::from_secs(30));
    assert!(request.user.contains("u/alice"));
    assert!(request.user.contains("https://reddit.com/r/rust/comments/abc/"));
}

#[tokio::test]
async fn endpoint_failure_is_not_retried() {
    let completion = ScriptedCompletion::failing(503);
    let synthesizer = PersonaSynthesizer::new(completion.clone(), settings());

    let err = synthesizer
        .synthesize(&content(), "alice")
        .await
        .expect_err("should fail");
    match err {
        PersonaError::Endpoint(provider) => assert_eq!(provider.status(), Some(503)),
        other => panic!("expected endpoint error, got: {other}"),
    }
    assert_eq!(completion.requests().len(), 1);
}

#[tokio::test]
async fn unparsable_completion_is_parse_error() {
    let completion = ScriptedCompletion::replying("Sorry, I can't do that.");
    let synthesizer = PersonaSynthesizer::new(completion, settings());

    let err = synthesizer
        .synthesize(&content(), "alice")
        .await
        .expect_err("should fail");
    assert!(matches!(err, PersonaError::Parse { .. }));
}

#[tokio::test]
async fn empty_content_still_synthesizes() {
    let completion = ScriptedCompletion::replying("{\"name\": \"Nobody\"}");
    let synthesizer = PersonaSynthesizer::new(completion.clone(), settings());

    let persona = synthesizer
        .synthesize(&UserContent::default(), "ghost")
        .await
        .expect("should synthesize");
    assert_eq!(persona.name.as_deref(), Some("Nobody"));
    assert!(completion.requests()[0]
        .user
        .contains("No recent posts or comments available"));
}

#[tokio::test]
async fn success_status_with_non_json_body_is_parse_error() {
    let (base, _requests) = serve_once("200 OK", "<html>gateway says hi</html>").await;
    let provider = Arc::new(OpenAiProvider::new(&base, "m", ApiKey::new("k")));
    let synthesizer = PersonaSynthesizer::new(provider, settings());

    let err = synthesizer
        .synthesize(&content(), "alice")
        .await
        .expect_err("should fail");
    match err {
        PersonaError::Parse { snippet, .. } => {
            assert!(snippet.contains("gateway says hi"));
        }
        other => panic!("expected parse error, got: {other}"),
    }
}

#[tokio::test]
async fn success_status_without_choices_is_parse_error() {
    let (base, _requests) = serve_once("200 OK", r#"{"choices": []}"#).await;
    let provider = Arc::new(OpenAiProvider::new(&base, "m", ApiKey::new("k")));
    let synthesizer = PersonaSynthesizer::new(provider, settings());

    let err = synthesizer
        .synthesize(&content(), "alice")
        .await
        .expect_err("should fail");
    assert!(matches!(err, PersonaError::Parse { .. }));
}

#[tokio::test]
async fn error_status_stays_endpoint_error() {
    let (base, _requests) = serve_once("502 Bad Gateway", "<html>upstream down</html>").await;
    let provider = Arc::new(OpenAiProvider::new(&base, "m", ApiKey::new("k")));
    let synthesizer = PersonaSynthesizer::new(provider, settings());

    let err = synthesizer
        .synthesize(&content(), "alice")
        .await
        .expect_err("should fail");
    match err {
        PersonaError::Endpoint(provider) => assert_eq!(provider.status(), Some(502)),
        other => panic!("expected endpoint error, got: {other}"),
    }
}
