//! Lenient schema mapping tests.

use serde_json::{json, Value};

use personagen::persona::{Citation, PersonaRecord};

fn record(value: Value) -> PersonaRecord {
    match value {
        Value::Object(map) => PersonaRecord::from_json(&map),
        other => panic!("fixture must be an object, got {other}"),
    }
}

fn linked(description: &str, url: &str) -> Citation {
    Citation {
        description: description.to_owned(),
        url: Some(url.to_owned()),
    }
}

fn verbatim(description: &str) -> Citation {
    Citation {
        description: description.to_owned(),
        url: None,
    }
}

#[test]
fn complete_object_maps_every_field() {
    let persona = record(json!({
        "name": "Alice Hart",
        "age_range": "25-35",
        "occupation": "Backend developer",
        "archetype": "The Learner",
        "traits": ["curious"],
        "behaviors": ["asks follow-up questions"],
        "frustrations": ["flaky CI"],
        "motivations": ["craft"],
        "goals_needs": ["mentorship"],
        "citations": {"Asked about lifetimes": "https://reddit.com/r/rust/1"},
        "profile_image_prompt": "A developer at a desk"
    }));

    assert_eq!(persona.name.as_deref(), Some("Alice Hart"));
    assert_eq!(persona.age_range.as_deref(), Some("25-35"));
    assert_eq!(persona.occupation.as_deref(), Some("Backend developer"));
    assert_eq!(persona.archetype.as_deref(), Some("The Learner"));
    assert_eq!(persona.traits, vec!["curious".to_owned()]);
    assert_eq!(persona.behaviors, vec!["asks follow-up questions".to_owned()]);
    assert_eq!(persona.frustrations, vec!["flaky CI".to_owned()]);
    assert_eq!(persona.motivations, vec!["craft".to_owned()]);
    assert_eq!(persona.goals_needs, vec!["mentorship".to_owned()]);
    assert_eq!(
        persona.citations,
        vec![linked("Asked about lifetimes", "https://reddit.com/r/rust/1")]
    );
    assert_eq!(
        persona.profile_image_prompt.as_deref(),
        Some("A developer at a desk")
    );
}

#[test]
fn empty_object_is_all_absent() {
    assert_eq!(record(json!({})), PersonaRecord::default());
}

#[test]
fn unknown_keys_are_ignored() {
    let persona = record(json!({"name": "Bo", "favourite_colour": "teal"}));
    assert_eq!(persona.name.as_deref(), Some("Bo"));
}

#[test]
fn citation_mapping_becomes_linked_entries() {
    let persona = record(json!({"citations": {"Liked cats": "http://x/1"}}));
    assert_eq!(persona.citations, vec![linked("Liked cats", "http://x/1")]);
}

#[test]
fn citation_list_splits_matching_entries() {
    let persona = record(json!({"citations": ["Liked cats: http://x/1", "malformed entry"]}));
    assert_eq!(
        persona.citations,
        vec![linked("Liked cats", "http://x/1"), verbatim("malformed entry")]
    );
}

#[test]
fn citation_string_is_single_verbatim_entry() {
    let persona = record(json!({"citations": "Based on overall posting history"}));
    assert_eq!(
        persona.citations,
        vec![verbatim("Based on overall posting history")]
    );
}

#[test]
fn empty_citations_in_any_shape_are_empty() {
    for value in [json!({}), json!([]), json!(""), Value::Null] {
        let persona = record(json!({ "citations": value }));
        assert!(persona.citations.is_empty(), "citations should be empty");
    }
}

#[test]
fn sections_are_in_display_order() {
    let headings: Vec<&str> = PersonaRecord::default()
        .sections()
        .iter()
        .map(|(heading, _)| *heading)
        .collect();
    assert_eq!(
        headings,
        vec![
            "Personality Traits",
            "Behavior Patterns",
            "Frustrations",
            "Motivations",
            "Goals & Needs"
        ]
    );
}
