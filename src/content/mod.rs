//! Content acquisition: the records a persona is built from.
//!
//! [`ContentSource`] and [`AvatarSource`] are the seams the rest of the crate
//! depends on. [`reddit::RedditClient`] implements both against Reddit's
//! public JSON listings.

use async_trait::async_trait;

pub mod reddit;

/// Host used to turn a relative permalink into a citation URL.
pub const PERMALINK_HOST: &str = "https://reddit.com";

const MAX_USERNAME_CHARS: usize = 64;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A submitted post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Post {
    /// Post title.
    pub title: String,
    /// Self text; empty for link posts.
    pub body: String,
    /// Relative permalink, e.g. `/r/rust/comments/abc/title/`.
    pub source_path: String,
}

/// A comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comment {
    /// Comment text.
    pub body: String,
    /// Relative permalink.
    pub source_path: String,
}

/// One piece of user content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentRecord {
    /// A submitted post.
    Post(Post),
    /// A comment.
    Comment(Comment),
}

impl ContentRecord {
    /// Relative permalink of the record.
    pub fn source_path(&self) -> &str {
        match self {
            Self::Post(post) => &post.source_path,
            Self::Comment(comment) => &comment.source_path,
        }
    }

    /// Absolute URL of the record.
    pub fn permalink(&self) -> String {
        format!("{PERMALINK_HOST}{}", self.source_path())
    }
}

/// Everything fetched for one user, newest first within each group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserContent {
    /// Submitted posts.
    pub posts: Vec<Post>,
    /// Comments.
    pub comments: Vec<Comment>,
}

impl UserContent {
    /// True when neither posts nor comments were found.
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty() && self.comments.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Collaborator seams
// ---------------------------------------------------------------------------

/// Source of a user's posts and comments.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch up to `limit` posts and `limit` comments.
    ///
    /// Never fails: on error the sequences hold whatever was fetched, which
    /// may be nothing.
    async fn fetch_user_content(&self, username: &str, limit: u32) -> UserContent;
}

/// Best-effort lookup of a user's profile picture.
#[async_trait]
pub trait AvatarSource: Send + Sync {
    /// Return a usable avatar URL, or `None` for placeholders and failures.
    async fn fetch_avatar(&self, username: &str) -> Option<String>;
}

// ---------------------------------------------------------------------------
// Profile identifiers
// ---------------------------------------------------------------------------

/// Errors for unusable profile identifiers.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ProfileError {
    /// No path segment could be taken as a username.
    #[error("no username found in {0:?}")]
    Empty(String),
    /// The extracted username has characters Reddit does not allow.
    #[error("invalid username {0:?}: expected 1-64 letters, digits, '_' or '-'")]
    InvalidUsername(String),
}

/// Extract a username from a bare name, `u/name`, or a profile URL.
///
/// The last non-empty path segment wins, so
/// `https://www.reddit.com/user/alice/` and `u/alice` both yield `alice`.
/// Query strings and fragments are ignored.
///
/// # Errors
///
/// Returns [`ProfileError`] when nothing usable remains. Accepted names are
/// safe to use as a file-name component.
pub fn username_from_input(input: &str) -> Result<String, ProfileError> {
    let trimmed = input.trim();
    let without_query = trimmed
        .split(['?', '#'])
        .next()
        .unwrap_or_default();

    let candidate = without_query
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .ok_or_else(|| ProfileError::Empty(trimmed.to_owned()))?;

    if is_valid_username(candidate) {
        Ok(candidate.to_owned())
    } else {
        Err(ProfileError::InvalidUsername(candidate.to_owned()))
    }
}

fn is_valid_username(name: &str) -> bool {
    !name.is_empty()
        && name.chars().count() <= MAX_USERNAME_CHARS
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
