//! Persona synthesis: prompt, completion, and lenient schema mapping.
//!
//! - [`prompt`] builds the instruction sent to the completion endpoint
//! - [`parse`] recovers a JSON object from free-form completion text
//! - [`synthesizer`] runs one generation attempt end to end
//!
//! [`PersonaRecord`] never rejects a field: anything the model omitted or
//! mistyped is left for the renderers to replace with a placeholder.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::providers::ProviderError;

pub mod parse;
pub mod prompt;
pub mod synthesizer;

/// Shown wherever a persona field is missing.
pub const PLACEHOLDER: &str = "N/A";

/// `description: http(s)://url` as emitted in citation lists.
static CITATION_ENTRY: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(.*?):\s*(https?://\S+)$").ok());

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures of a single persona generation attempt.
#[derive(Debug, thiserror::Error)]
pub enum PersonaError {
    /// The completion endpoint call failed (network, timeout, or HTTP status).
    #[error("completion endpoint error: {0}")]
    Endpoint(ProviderError),
    /// A success response held no recoverable JSON object, either in the
    /// response envelope or in the completion text.
    #[error("failed to parse persona JSON: {source}; response began with: {snippet}")]
    Parse {
        /// The last JSON error encountered.
        #[source]
        source: serde_json::Error,
        /// Leading part of the offending text.
        snippet: String,
    },
}

impl From<ProviderError> for PersonaError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Parse { source, snippet } => Self::Parse { source, snippet },
            other => Self::Endpoint(other),
        }
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// One citation: what was inferred and, when recognisable, where from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    /// Description, or the whole entry when it could not be split.
    pub description: String,
    /// Source URL, when the entry carried one.
    pub url: Option<String>,
}

impl Citation {
    /// Split a list entry of the form `description: http(s)://url`.
    ///
    /// Entries that do not match are kept verbatim with no URL.
    pub fn from_entry(entry: &str) -> Self {
        let captures = CITATION_ENTRY
            .as_ref()
            .and_then(|pattern| pattern.captures(entry));

        match captures {
            Some(caps) => Self {
                description: caps
                    .get(1)
                    .map(|m| m.as_str().trim().to_owned())
                    .unwrap_or_default(),
                url: caps.get(2).map(|m| m.as_str().to_owned()),
            },
            None => Self {
                description: entry.to_owned(),
                url: None,
            },
        }
    }
}

/// The fixed persona schema, filled leniently from model output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonaRecord {
    /// Realistic name.
    pub name: Option<String>,
    /// Inferred age range, e.g. `25-35`.
    pub age_range: Option<String>,
    /// Occupation or field of interest.
    pub occupation: Option<String>,
    /// Archetype, e.g. `The Learner`.
    pub archetype: Option<String>,
    /// Personality traits.
    pub traits: Vec<String>,
    /// Behavior patterns.
    pub behaviors: Vec<String>,
    /// Frustrations.
    pub frustrations: Vec<String>,
    /// Motivations.
    pub motivations: Vec<String>,
    /// Goals and needs.
    pub goals_needs: Vec<String>,
    /// Normalized citations, in the order the model gave them.
    pub citations: Vec<Citation>,
    /// Suggested prompt for an image generator.
    pub profile_image_prompt: Option<String>,
}

impl PersonaRecord {
    /// Build a record from a parsed JSON object.
    ///
    /// `null`, blank strings, and missing keys become absent fields. Numbers
    /// and other non-string scalars are stringified. A bare string where a
    /// list is expected becomes a one-item list. Unknown keys are ignored.
    pub fn from_json(map: &Map<String, Value>) -> Self {
        Self {
            name: scalar_field(map, "name"),
            age_range: scalar_field(map, "age_range"),
            occupation: scalar_field(map, "occupation"),
            archetype: scalar_field(map, "archetype"),
            traits: list_field(map, "traits"),
            behaviors: list_field(map, "behaviors"),
            frustrations: list_field(map, "frustrations"),
            motivations: list_field(map, "motivations"),
            goals_needs: list_field(map, "goals_needs"),
            citations: citations_field(map.get("citations")),
            profile_image_prompt: scalar_field(map, "profile_image_prompt"),
        }
    }

    /// The list sections in display order, with their headings.
    pub fn sections(&self) -> [(&'static str, &[String]); 5] {
        [
            ("Personality Traits", &self.traits),
            ("Behavior Patterns", &self.behaviors),
            ("Frustrations", &self.frustrations),
            ("Motivations", &self.motivations),
            ("Goals & Needs", &self.goals_needs),
        ]
    }
}

/// String form of a JSON value: strings unquoted, everything else as JSON.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn non_blank(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

fn scalar_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::Null => None,
        value => non_blank(value_text(value)),
    }
}

fn list_field(map: &Map<String, Value>, key: &str) -> Vec<String> {
    match map.get(key) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .filter(|item| !item.is_null())
            .filter_map(|item| non_blank(value_text(item)))
            .collect(),
        Some(other) => non_blank(value_text(other)).into_iter().collect(),
    }
}

/// Resolve the three shapes models use for citations into one list.
///
/// - object: each `description -> url` entry
/// - array: each entry split by [`Citation::from_entry`]
/// - anything else: its string form as a single entry
fn citations_field(value: Option<&Value>) -> Vec<Citation> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Object(entries)) => entries
            .iter()
            .map(|(description, url)| Citation {
                description: description.clone(),
                url: non_blank(value_text(url)),
            })
            .collect(),
        Some(Value::Array(items)) => items
            .iter()
            .filter(|item| !item.is_null())
            .filter_map(|item| non_blank(value_text(item)))
            .map(|entry| Citation::from_entry(&entry))
            .collect(),
        Some(other) => match non_blank(value_text(other)) {
            Some(description) => vec![Citation {
                description,
                url: None,
            }],
            None => Vec::new(),
        },
    }
}
