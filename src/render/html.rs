//! HTML persona document.
//!
//! Every interpolated value is escaped. URLs are only placed in `href`/`src`
//! when they are `http(s)`; anything else is shown as text or dropped.

use crate::persona::{Citation, PersonaRecord};

use super::{
    is_http_url, items_or_placeholder, scalar_or_placeholder, RenderContext, NO_CITATIONS,
};

const STYLE: &str = "body { font-family: Arial, sans-serif; padding: 30px; max-width: 800px; margin: auto; }
img { max-width: 180px; border-radius: 10px; }
h1 { color: #e76f51; }
h2 { color: #264653; }
.trait { margin-bottom: 1em; }
.citations { font-size: 0.9em; color: gray; }";

/// Escape text for element content and double-quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn list(items: &[String]) -> String {
    let entries: String = items_or_placeholder(items)
        .into_iter()
        .map(|item| format!("<li>{}</li>", escape_html(item)))
        .collect();
    format!("<ul>{entries}</ul>")
}

fn citation_item(citation: &Citation) -> String {
    let description = escape_html(&citation.description);
    match citation.url.as_deref() {
        Some(url) if is_http_url(url) => {
            let url = escape_html(url);
            format!(
                "<li><strong>{description}:</strong> <a href=\"{url}\" target=\"_blank\">{url}</a></li>"
            )
        }
        Some(url) => format!(
            "<li><strong>{description}:</strong> {}</li>",
            escape_html(url)
        ),
        None => format!("<li>{description}</li>"),
    }
}

fn citations(citations: &[Citation]) -> String {
    if citations.is_empty() {
        return format!("<ul><li>{NO_CITATIONS}</li></ul>");
    }
    let entries: String = citations.iter().map(citation_item).collect();
    format!("<ul>{entries}</ul>")
}

/// Render the persona as a standalone HTML page.
pub fn render_html(persona: &PersonaRecord, ctx: &RenderContext<'_>) -> String {
    let name = escape_html(scalar_or_placeholder(persona.name.as_deref()));
    let age_range = escape_html(scalar_or_placeholder(persona.age_range.as_deref()));
    let occupation = escape_html(scalar_or_placeholder(persona.occupation.as_deref()));
    let archetype = escape_html(scalar_or_placeholder(persona.archetype.as_deref()));
    let image_prompt = escape_html(scalar_or_placeholder(
        persona.profile_image_prompt.as_deref(),
    ));

    let avatar = match ctx.avatar_url {
        Some(url) if is_http_url(url) => {
            format!("<img src=\"{}\" alt=\"Profile image\">\n", escape_html(url))
        }
        _ => String::new(),
    };

    let sections: String = persona
        .sections()
        .into_iter()
        .map(|(heading, items)| {
            format!(
                "<h2>{}</h2>\n<div class=\"trait\">{}</div>\n\n",
                escape_html(heading),
                list(items)
            )
        })
        .collect();

    format!(
        "<!DOCTYPE html>
<html>
<head>
<meta charset=\"utf-8\">
<title>Persona: {name}</title>
<style>
{STYLE}
</style>
</head>
<body>
<h1>{name}</h1>
<p><strong>Age Range:</strong> {age_range}</p>
<p><strong>Occupation:</strong> {occupation}</p>
<p><strong>User Archetype:</strong> {archetype}</p>
{avatar}
{sections}<h2>Citations</h2>
<div class=\"citations\">{citations}</div>

<p><em>Profile image inspiration: {image_prompt}</em></p>
<footer><hr><p style=\"font-size:0.8em;color:gray;\">Generated on {timestamp} for u/{username}</p></footer>
</body>
</html>
",
        citations = citations(&persona.citations),
        timestamp = ctx.timestamp(),
        username = escape_html(ctx.username),
    )
}
