//! Persona document rendering and persistence.
//!
//! Both renderers are pure: [`html::render_html`] and [`text::render_text`]
//! always return a document, substituting [`PLACEHOLDER`] for missing
//! fields. The `write_*` functions persist them as
//! `persona_<username>.{html,txt}`, overwriting earlier runs.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::info;

use crate::persona::{PersonaRecord, PLACEHOLDER};

pub mod html;
pub mod text;

/// Prefix shared by every artifact file name.
pub const ARTIFACT_PREFIX: &str = "persona_";

/// Extension of the HTML artifact.
pub const HTML_EXTENSION: &str = "html";

/// Extension of the plain-text artifact.
pub const TEXT_EXTENSION: &str = "txt";

/// Format of the generation timestamp in both documents.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Rendered when a persona has no citations.
pub const NO_CITATIONS: &str = "No specific citations provided.";

/// Per-run inputs that are not part of the persona itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContext<'a> {
    /// Reddit username the persona describes.
    pub username: &'a str,
    /// Avatar to embed in the HTML document.
    pub avatar_url: Option<&'a str>,
    /// Generation time shown in the footer.
    pub generated_at: NaiveDateTime,
}

impl RenderContext<'_> {
    /// The footer timestamp.
    pub fn timestamp(&self) -> String {
        self.generated_at.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Where one persona's documents were written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// The HTML document.
    pub html: PathBuf,
    /// The plain-text document.
    pub text: PathBuf,
}

// ---------------------------------------------------------------------------
// Naming
// ---------------------------------------------------------------------------

/// `persona_<username>.<extension>`.
pub fn artifact_file_name(username: &str, extension: &str) -> String {
    format!("{ARTIFACT_PREFIX}{username}.{extension}")
}

/// Path of the HTML artifact for `username`.
pub fn html_path(output_dir: &Path, username: &str) -> PathBuf {
    output_dir.join(artifact_file_name(username, HTML_EXTENSION))
}

/// Path of the text artifact for `username`.
pub fn text_path(output_dir: &Path, username: &str) -> PathBuf {
    output_dir.join(artifact_file_name(username, TEXT_EXTENSION))
}

// ---------------------------------------------------------------------------
// Shared field handling
// ---------------------------------------------------------------------------

/// The field value, or [`PLACEHOLDER`] when absent.
pub fn scalar_or_placeholder(value: Option<&str>) -> &str {
    value.unwrap_or(PLACEHOLDER)
}

/// The list items, or a single [`PLACEHOLDER`] item when empty.
pub fn items_or_placeholder(items: &[String]) -> Vec<&str> {
    if items.is_empty() {
        vec![PLACEHOLDER]
    } else {
        items.iter().map(String::as_str).collect()
    }
}

/// True for `http://` and `https://` URLs, the only ones linked or embedded.
pub fn is_http_url(url: &str) -> bool {
    let lower = url.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

fn write_document(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)
}

/// Render and write the HTML document.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created or the file
/// cannot be written.
pub fn write_html(
    output_dir: &Path,
    persona: &PersonaRecord,
    ctx: &RenderContext<'_>,
) -> std::io::Result<PathBuf> {
    let path = html_path(output_dir, ctx.username);
    write_document(&path, &html::render_html(persona, ctx))?;
    info!(path = %path.display(), "persona HTML saved");
    Ok(path)
}

/// Render and write the plain-text document.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created or the file
/// cannot be written.
pub fn write_text(
    output_dir: &Path,
    persona: &PersonaRecord,
    ctx: &RenderContext<'_>,
) -> std::io::Result<PathBuf> {
    let path = text_path(output_dir, ctx.username);
    write_document(&path, &text::render_text(persona, ctx))?;
    info!(path = %path.display(), "persona text saved");
    Ok(path)
}

/// Write both documents.
///
/// # Errors
///
/// Returns the first I/O error encountered.
pub fn write_artifacts(
    output_dir: &Path,
    persona: &PersonaRecord,
    ctx: &RenderContext<'_>,
) -> std::io::Result<ArtifactPaths> {
    Ok(ArtifactPaths {
        html: write_html(output_dir, persona, ctx)?,
        text: write_text(output_dir, persona, ctx)?,
    })
}

// ---------------------------------------------------------------------------
// Console summary
// ---------------------------------------------------------------------------

/// Short multi-line summary for the terminal.
pub fn summary(persona: &PersonaRecord) -> String {
    let mut lines = vec![
        format!("Name: {}", scalar_or_placeholder(persona.name.as_deref())),
        format!(
            "Age Range: {}",
            scalar_or_placeholder(persona.age_range.as_deref())
        ),
        format!(
            "Occupation: {}",
            scalar_or_placeholder(persona.occupation.as_deref())
        ),
        format!(
            "Archetype: {}",
            scalar_or_placeholder(persona.archetype.as_deref())
        ),
    ];

    for (heading, items) in persona.sections() {
        lines.push(format!("{heading}: {}", items_or_placeholder(items).join(", ")));
    }

    lines.push(format!(
        "Image prompt: {}",
        scalar_or_placeholder(persona.profile_image_prompt.as_deref())
    ));
    lines.join("\n")
}
