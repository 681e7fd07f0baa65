//! Model JSON through record mapping into both documents.

use serde_json::{json, Value};

use personagen::persona::PersonaRecord;
use personagen::render::html::render_html;
use personagen::render::text::render_text;
use personagen::render::RenderContext;

use crate::fixed_time;

fn documents(value: Value) -> (String, String) {
    let persona = match value {
        Value::Object(map) => PersonaRecord::from_json(&map),
        other => panic!("fixture must be an object, got {other}"),
    };
    let ctx = RenderContext {
        username: "alice",
        avatar_url: None,
        generated_at: fixed_time(),
    };
    (render_html(&persona, &ctx), render_text(&persona, &ctx))
}

#[test]
fn missing_traits_render_one_placeholder_item() {
    let (html, text) = documents(json!({
        "name": "Alice",
        "behaviors": ["lurks"]
    }));

    assert!(html.contains(
        "<h2>Personality Traits</h2>\n<div class=\"trait\"><ul><li>N/A</li></ul></div>"
    ));
    assert!(text.contains("Personality Traits:\n- N/A\n\nBehavior Patterns:\n- lurks\n"));
}

#[test]
fn citation_mapping_renders_one_linked_item() {
    let (html, text) = documents(json!({"citations": {"Liked cats": "http://x/1"}}));

    assert!(html.contains(
        "<div class=\"citations\"><ul><li><strong>Liked cats:</strong> <a href=\"http://x/1\" target=\"_blank\">http://x/1</a></li></ul></div>"
    ));
    assert!(text.contains("Citations:\n- Liked cats: http://x/1\n\n"));
}

#[test]
fn citation_list_renders_linked_and_verbatim_items() {
    let (html, text) = documents(json!({
        "citations": ["Liked cats: http://x/1", "malformed entry"]
    }));

    assert!(html.contains(
        "<ul><li><strong>Liked cats:</strong> <a href=\"http://x/1\" target=\"_blank\">http://x/1</a></li><li>malformed entry</li></ul>"
    ));
    assert!(text.contains("Citations:\n- Liked cats: http://x/1\n- malformed entry\n\n"));
}

#[test]
fn absent_citations_render_the_fallback_line() {
    let (html, text) = documents(json!({"citations": {}}));

    assert!(html.contains("<ul><li>No specific citations provided.</li></ul>"));
    assert!(text.contains("Citations:\n- No specific citations provided.\n"));
}
