//! Plain-text persona document.

use crate::persona::{Citation, PersonaRecord};

use super::{items_or_placeholder, scalar_or_placeholder, RenderContext, NO_CITATIONS};

const CLOSING_RULE: &str = "-----------------------------------";

fn citation_line(citation: &Citation) -> String {
    match citation.url.as_deref() {
        Some(url) => format!("- {}: {url}", citation.description),
        None => format!("- {}", citation.description),
    }
}

/// Render the persona as labeled plain text with blank-line separated sections.
pub fn render_text(persona: &PersonaRecord, ctx: &RenderContext<'_>) -> String {
    let mut out = Vec::new();

    out.push(format!("--- Persona for u/{} ---", ctx.username));
    out.push(String::new());
    out.push(format!(
        "Name: {}",
        scalar_or_placeholder(persona.name.as_deref())
    ));
    out.push(format!(
        "Age Range: {}",
        scalar_or_placeholder(persona.age_range.as_deref())
    ));
    out.push(format!(
        "Occupation: {}",
        scalar_or_placeholder(persona.occupation.as_deref())
    ));
    out.push(format!(
        "User Archetype: {}",
        scalar_or_placeholder(persona.archetype.as_deref())
    ));
    out.push(String::new());

    for (heading, items) in persona.sections() {
        out.push(format!("{heading}:"));
        out.extend(
            items_or_placeholder(items)
                .into_iter()
                .map(|item| format!("- {item}")),
        );
        out.push(String::new());
    }

    out.push("Citations:".to_owned());
    if persona.citations.is_empty() {
        out.push(format!("- {NO_CITATIONS}"));
    } else {
        out.extend(persona.citations.iter().map(citation_line));
    }
    out.push(String::new());

    out.push(format!(
        "Profile Image Inspiration: {}",
        scalar_or_placeholder(persona.profile_image_prompt.as_deref())
    ));
    out.push(String::new());
    out.push(format!("Generated on: {}", ctx.timestamp()));
    out.push(CLOSING_RULE.to_owned());

    let mut document = out.join("\n");
    document.push('\n');
    document
}
