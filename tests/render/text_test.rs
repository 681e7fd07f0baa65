//! Plain-text document tests.

use personagen::persona::PersonaRecord;
use personagen::render::text::render_text;
use personagen::render::RenderContext;

use crate::{fixed_time, full_persona};

fn ctx() -> RenderContext<'static> {
    RenderContext {
        username: "alice",
        avatar_url: Some("https://example.com/a.png"),
        generated_at: fixed_time(),
    }
}

#[test]
fn populated_persona_renders_exact_layout() {
    let expected = "\
--- Persona for u/alice ---

Name: Alice Hart
Age Range: 25-35
Occupation: Backend developer
User Archetype: The Learner

Personality Traits:
- curious
- patient

Behavior Patterns:
- posts late at night

Frustrations:
- flaky CI

Motivations:
- craft

Goals & Needs:
- mentorship

Citations:
- Asked about lifetimes: https://reddit.com/r/rust/comments/1/
- General tone of comments

Profile Image Inspiration: A developer at a standing desk

Generated on: 2024-03-09 14:05:07
-----------------------------------
";
    assert_eq!(render_text(&full_persona(), &ctx()), expected);
}

#[test]
fn empty_persona_uses_placeholders() {
    let text = render_text(&PersonaRecord::default(), &ctx());
    assert!(text.contains("Name: N/A\n"));
    assert!(text.contains("Motivations:\n- N/A\n"));
    assert!(text.contains("Citations:\n- No specific citations provided.\n"));
    assert!(text.contains("Profile Image Inspiration: N/A\n"));
}

#[test]
fn text_is_not_escaped_and_has_no_avatar() {
    let persona = PersonaRecord {
        name: Some("<Tom & Jerry>".to_owned()),
        ..PersonaRecord::default()
    };
    let text = render_text(&persona, &ctx());
    assert!(text.contains("Name: <Tom & Jerry>"));
    assert!(!text.contains("example.com/a.png"));
}
