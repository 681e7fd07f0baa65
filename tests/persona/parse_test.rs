//! Completion text recovery tests.

use serde_json::{json, Value};

use personagen::persona::parse::{parse_persona_json, strip_code_fences};
use personagen::persona::PersonaError;

fn object() -> Value {
    json!({
        "name": "Alice Hart",
        "traits": ["curious", "direct"],
        "citations": {"Liked cats": "http://x/1"}
    })
}

fn parsed(raw: &str) -> Value {
    match parse_persona_json(raw) {
        Ok(map) => Value::Object(map),
        Err(err) => panic!("expected JSON object, got error: {err}"),
    }
}

#[test]
fn plain_object_parses_unchanged() {
    let raw = object().to_string();
    assert_eq!(parsed(&raw), object());
}

#[test]
fn json_fenced_object_matches_unfenced() {
    let raw = format!("```json\n{}\n```", object());
    assert_eq!(parsed(&raw), object());
}

#[test]
fn generic_fence_is_stripped() {
    let raw = format!("  ```\n{}\n```  \n", object());
    assert_eq!(parsed(&raw), object());
}

#[test]
fn prose_around_object_is_discarded() {
    let raw = format!(
        "Here is the persona you asked for:\n{}\nLet me know if you need more.",
        object()
    );
    assert_eq!(parsed(&raw), object());
}

#[test]
fn fenced_object_with_trailing_prose_is_recovered() {
    let raw = format!("```json\n{}\n```\nHope this helps!", object());
    assert_eq!(parsed(&raw), object());
}

#[test]
fn text_without_braces_is_parse_error() {
    let err = parse_persona_json("I cannot help with that request.").expect_err("should fail");
    match err {
        PersonaError::Parse { snippet, .. } => {
            assert!(snippet.starts_with("I cannot help"));
        }
        other => panic!("expected parse error, got: {other}"),
    }
}

#[test]
fn truncated_object_is_parse_error() {
    let err = parse_persona_json("{\"name\": \"Alice\", \"traits\": [\"curious\"")
        .expect_err("should fail");
    assert!(matches!(err, PersonaError::Parse { .. }));
}

#[test]
fn broken_span_reports_span_snippet() {
    let err = parse_persona_json("intro {\"name\": } outro").expect_err("should fail");
    match err {
        PersonaError::Parse { snippet, .. } => assert_eq!(snippet, "{\"name\": }"),
        other => panic!("expected parse error, got: {other}"),
    }
}

#[test]
fn non_object_json_is_parse_error() {
    let err = parse_persona_json("[\"curious\", \"direct\"]").expect_err("should fail");
    assert!(matches!(err, PersonaError::Parse { .. }));
}

#[test]
fn strip_leaves_unfenced_text_trimmed() {
    assert_eq!(strip_code_fences("\n  {\"a\":1}  \n"), "{\"a\":1}");
}
