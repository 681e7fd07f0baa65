//! Recovery of a JSON object from completion text.
//!
//! Models wrap JSON in code fences or surround it with prose even when told
//! not to. Parsing runs in two stages:
//! 1. strict: the fence-stripped text must be one JSON object
//! 2. bounded: the span from the first `{` to the last `}` must be one
//!
//! If both fail the caller gets [`PersonaError::Parse`].

use serde_json::{Map, Value};

use super::PersonaError;

/// Characters of offending text kept in parse errors and logs.
pub const SNIPPET_CHARS: usize = 500;

/// Remove surrounding whitespace and a markdown code fence, if any.
///
/// Handles a ```` ```json ```` or bare ```` ``` ```` opener and a ```` ``` ````
/// closer independently, so a truncated completion missing its closer is
/// still unwrapped.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```json") {
        text = rest.trim();
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest.trim();
    }

    if let Some(rest) = text.strip_suffix("```") {
        text = rest.trim();
    }

    text
}

/// The text from the first `{` through the last `}`, when that is a span.
pub fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    text.get(start..=end)
}

/// Leading [`SNIPPET_CHARS`] characters of `text`, for diagnostics.
pub fn snippet(text: &str) -> String {
    text.chars().take(SNIPPET_CHARS).collect()
}

/// Parse completion text into a JSON object.
///
/// # Errors
///
/// Returns [`PersonaError::Parse`] when neither the strict nor the bounded
/// stage yields an object. The error carries the last parse failure and a
/// snippet of the text it was attempted on.
pub fn parse_persona_json(raw: &str) -> Result<Map<String, Value>, PersonaError> {
    let cleaned = strip_code_fences(raw);

    let strict_error = match serde_json::from_str::<Map<String, Value>>(cleaned) {
        Ok(map) => return Ok(map),
        Err(e) => e,
    };
    tracing::debug!(error = %strict_error, "strict persona JSON parse failed, scanning for braces");

    let Some(span) = brace_span(cleaned) else {
        return Err(PersonaError::Parse {
            source: strict_error,
            snippet: snippet(cleaned),
        });
    };

    serde_json::from_str::<Map<String, Value>>(span).map_err(|e| PersonaError::Parse {
        source: e,
        snippet: snippet(span),
    })
}
