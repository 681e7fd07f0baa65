//! End-to-end persona generation: fetch, synthesize, render, save.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chrono::Local;
use tracing::{info, warn};

use crate::content::{AvatarSource, ContentSource, UserContent};
use crate::persona::synthesizer::PersonaSynthesizer;
use crate::persona::PersonaRecord;
use crate::render::{write_artifacts, ArtifactPaths, RenderContext};

/// A persona that was generated and saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPersona {
    /// The persona as parsed from the model.
    pub persona: PersonaRecord,
    /// Where the documents were written.
    pub paths: ArtifactPaths,
    /// Avatar embedded in the HTML document.
    pub avatar_url: Option<String>,
    /// Posts fetched for the user.
    pub post_count: usize,
    /// Comments fetched for the user.
    pub comment_count: usize,
}

/// Result of one generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// The persona was generated and both documents saved.
    Generated(Box<GeneratedPersona>),
    /// The user has no fetchable posts or comments; nothing was generated.
    NoContent,
}

/// Wires content acquisition, synthesis, and rendering together.
pub struct PersonaPipeline {
    content: Arc<dyn ContentSource>,
    avatars: Option<Arc<dyn AvatarSource>>,
    synthesizer: PersonaSynthesizer,
    output_dir: PathBuf,
    fetch_limit: u32,
}

impl PersonaPipeline {
    /// Create a pipeline writing into `output_dir`.
    pub fn new(
        content: Arc<dyn ContentSource>,
        synthesizer: PersonaSynthesizer,
        output_dir: impl Into<PathBuf>,
        fetch_limit: u32,
    ) -> Self {
        Self {
            content,
            avatars: None,
            synthesizer,
            output_dir: output_dir.into(),
            fetch_limit,
        }
    }

    /// Embed avatars looked up from `avatars` in the HTML document.
    #[must_use]
    pub fn with_avatars(mut self, avatars: Arc<dyn AvatarSource>) -> Self {
        self.avatars = Some(avatars);
        self
    }

    /// The directory artifacts are written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Generate and save the persona for `username`.
    ///
    /// # Errors
    ///
    /// Returns an error if the completion call fails, its output cannot be
    /// parsed (both as [`crate::persona::PersonaError`]), or the documents
    /// cannot be written.
    pub async fn generate(&self, username: &str) -> anyhow::Result<GenerationOutcome> {
        let content: UserContent = self
            .content
            .fetch_user_content(username, self.fetch_limit)
            .await;

        if content.is_empty() {
            warn!(username, "no content found, skipping persona generation");
            return Ok(GenerationOutcome::NoContent);
        }

        let persona = self.synthesizer.synthesize(&content, username).await?;

        let avatar_url = match &self.avatars {
            Some(avatars) => avatars.fetch_avatar(username).await,
            None => None,
        };

        let ctx = RenderContext {
            username,
            avatar_url: avatar_url.as_deref(),
            generated_at: Local::now().naive_local(),
        };
        let paths = write_artifacts(&self.output_dir, &persona, &ctx).with_context(|| {
            format!(
                "failed to write persona documents to {}",
                self.output_dir.display()
            )
        })?;

        info!(username, html = %paths.html.display(), "persona generated");
        Ok(GenerationOutcome::Generated(Box::new(GeneratedPersona {
            persona,
            paths,
            avatar_url,
            post_count: content.posts.len(),
            comment_count: content.comments.len(),
        })))
    }
}
