//! Browsing and clearing previously generated personas.
//!
//! The output directory is the only index: every `persona_<username>.html`
//! file present is one history entry.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::render::{artifact_file_name, ARTIFACT_PREFIX, HTML_EXTENSION, TEXT_EXTENSION};

/// History operation errors.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// The requested name is not a persona artifact in the output directory.
    #[error("not a persona artifact: {0:?}")]
    InvalidName(String),
    /// No artifact with that name exists.
    #[error("persona artifact not found: {}", .0.display())]
    NotFound(PathBuf),
    /// Filesystem failure.
    #[error("history I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One generated persona.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// File name of the HTML document.
    pub file_name: String,
    /// Username recovered from the file name.
    pub username: String,
    /// Full path of the HTML document.
    pub path: PathBuf,
}

/// Username from `persona_<username>.<extension>`, if the name has that shape.
fn username_from_file_name<'a>(file_name: &'a str, extension: &str) -> Option<&'a str> {
    let stem = file_name
        .strip_prefix(ARTIFACT_PREFIX)?
        .strip_suffix(extension)?
        .strip_suffix('.')?;
    (!stem.is_empty()).then_some(stem)
}

fn artifact_names(
    dir: &Path,
    extensions: &[&str],
) -> Result<Vec<(String, PathBuf)>, HistoryError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %dir.display(), "output directory does not exist");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "failed to read output directory entry");
                continue;
            }
        };

        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        if extensions
            .iter()
            .any(|ext| username_from_file_name(&file_name, ext).is_some())
        {
            names.push((file_name, path));
        }
    }

    names.sort();
    Ok(names)
}

/// List generated personas, sorted by file name.
///
/// A missing output directory is an empty history.
///
/// # Errors
///
/// Returns [`HistoryError::Io`] if the directory exists but cannot be read.
pub fn list_history(dir: &Path) -> Result<Vec<HistoryEntry>, HistoryError> {
    let entries = artifact_names(dir, &[HTML_EXTENSION])?
        .into_iter()
        .filter_map(|(file_name, path)| {
            let username = username_from_file_name(&file_name, HTML_EXTENSION)?.to_owned();
            Some(HistoryEntry {
                file_name,
                username,
                path,
            })
        })
        .collect();
    Ok(entries)
}

/// Resolve a history selection to a file in `dir`.
///
/// Accepts a listed file name (`persona_alice.html`, `persona_alice.txt`) or a
/// bare username, which selects the HTML document. Path separators are
/// rejected so nothing outside `dir` can be named.
///
/// # Errors
///
/// Returns [`HistoryError::InvalidName`] for anything else.
pub fn resolve_artifact(dir: &Path, selection: &str) -> Result<PathBuf, HistoryError> {
    let selection = selection.trim();
    if selection.is_empty() || selection.contains(['/', '\\']) || selection.contains("..") {
        return Err(HistoryError::InvalidName(selection.to_owned()));
    }

    let is_artifact = [HTML_EXTENSION, TEXT_EXTENSION]
        .iter()
        .any(|ext| username_from_file_name(selection, ext).is_some());

    let file_name = if is_artifact {
        selection.to_owned()
    } else if selection.contains('.') {
        return Err(HistoryError::InvalidName(selection.to_owned()));
    } else {
        artifact_file_name(selection, HTML_EXTENSION)
    };

    Ok(dir.join(file_name))
}

/// Read a persona document chosen from the history.
///
/// # Errors
///
/// Returns [`HistoryError::InvalidName`] for names outside the artifact
/// pattern, [`HistoryError::NotFound`] if the file was removed, and
/// [`HistoryError::Io`] for other read failures.
pub fn read_artifact(dir: &Path, selection: &str) -> Result<String, HistoryError> {
    let path = resolve_artifact(dir, selection)?;
    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(contents),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(HistoryError::NotFound(path)),
        Err(e) => Err(e.into()),
    }
}

/// Delete every generated persona, HTML and text alike.
///
/// Returns the number of files removed. A missing directory removes nothing.
///
/// # Errors
///
/// Returns [`HistoryError::Io`] on the first file that cannot be removed.
/// Files vanishing concurrently are not an error.
pub fn clear_history(dir: &Path) -> Result<usize, HistoryError> {
    let mut removed: usize = 0;
    for (file_name, path) in artifact_names(dir, &[HTML_EXTENSION, TEXT_EXTENSION])? {
        match std::fs::remove_file(&path) {
            Ok(()) => {
                debug!(file = %file_name, "removed persona artifact");
                removed = removed.saturating_add(1);
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }
    info!(dir = %dir.display(), removed, "persona history cleared");
    Ok(removed)
}
