//! Reddit client over the public JSON listings.
//!
//! No OAuth: `/user/<name>/submitted.json`, `/user/<name>/comments.json` and
//! `/user/<name>/about.json` are readable anonymously as long as a descriptive
//! `User-Agent` is sent.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::RedditConfig;
use crate::providers::{check_http_response, ProviderError};

use super::{AvatarSource, Comment, ContentSource, Post, UserContent};

/// Substrings marking Reddit's generated placeholder avatars.
pub const AVATAR_PLACEHOLDER_MARKERS: [&str; 2] = ["default_avatar", "external_picture"];

/// Reddit caps listing pages at 100 items.
const MAX_LISTING_LIMIT: u32 = 100;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Listing<T> {
    data: ListingData<T>,
}

#[derive(Debug, Deserialize)]
struct ListingData<T> {
    #[serde(default = "Vec::new")]
    children: Vec<ListingChild<T>>,
}

#[derive(Debug, Deserialize)]
struct ListingChild<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct PostData {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    selftext: Option<String>,
    #[serde(default)]
    permalink: Option<String>,
}

impl From<PostData> for Post {
    fn from(data: PostData) -> Self {
        Self {
            title: data.title.unwrap_or_default(),
            body: data.selftext.unwrap_or_default(),
            source_path: data.permalink.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CommentData {
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    permalink: Option<String>,
}

impl From<CommentData> for Comment {
    fn from(data: CommentData) -> Self {
        Self {
            body: data.body.unwrap_or_default(),
            source_path: data.permalink.unwrap_or_default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Anonymous Reddit JSON client.
#[derive(Debug, Clone)]
pub struct RedditClient {
    base_url: String,
    user_agent: String,
    listing_timeout: Duration,
    avatar_timeout: Duration,
    client: reqwest::Client,
}

impl RedditClient {
    /// Create a client from the `[reddit]` config section.
    pub fn new(config: &RedditConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            user_agent: config.user_agent.clone(),
            listing_timeout: config.timeout(),
            avatar_timeout: config.avatar_timeout(),
            client: reqwest::Client::new(),
        }
    }

    async fn fetch_listing<T, R>(
        &self,
        username: &str,
        kind: &str,
        limit: u32,
    ) -> Result<Vec<R>, ProviderError>
    where
        T: DeserializeOwned,
        R: From<T>,
    {
        let limit = limit.min(MAX_LISTING_LIMIT);
        let url = format!("{}/user/{username}/{kind}.json?limit={limit}", self.base_url);

        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, &self.user_agent)
            .timeout(self.listing_timeout)
            .send()
            .await?;
        let body = check_http_response(response).await?;

        let listing: Listing<T> =
            serde_json::from_str(&body).map_err(|e| ProviderError::parse(e, &body))?;

        Ok(listing
            .data
            .children
            .into_iter()
            .map(|child| R::from(child.data))
            .collect())
    }
}

#[async_trait]
impl ContentSource for RedditClient {
    async fn fetch_user_content(&self, username: &str, limit: u32) -> UserContent {
        let mut content = UserContent::default();

        match self
            .fetch_listing::<PostData, Post>(username, "submitted", limit)
            .await
        {
            Ok(posts) => content.posts = posts,
            Err(e) => warn!(username, error = %e, "failed to fetch posts"),
        }

        match self
            .fetch_listing::<CommentData, Comment>(username, "comments", limit)
            .await
        {
            Ok(comments) => content.comments = comments,
            Err(e) => warn!(username, error = %e, "failed to fetch comments"),
        }

        info!(
            username,
            posts = content.posts.len(),
            comments = content.comments.len(),
            "fetched user content"
        );
        content
    }
}

#[async_trait]
impl AvatarSource for RedditClient {
    async fn fetch_avatar(&self, username: &str) -> Option<String> {
        let url = format!("{}/user/{username}/about.json", self.base_url);

        let response = match self
            .client
            .get(&url)
            .header(USER_AGENT, &self.user_agent)
            .timeout(self.avatar_timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                debug!(username, error = %e, "avatar lookup failed");
                return None;
            }
        };

        if !response.status().is_success() {
            debug!(
                username,
                status = response.status().as_u16(),
                "avatar lookup returned non-success status"
            );
            return None;
        }

        match response.json::<Value>().await {
            Ok(about) => usable_avatar_url(&about),
            Err(e) => {
                debug!(username, error = %e, "avatar metadata was not JSON");
                None
            }
        }
    }
}

/// Pick the avatar URL out of an `about.json` document.
///
/// Returns `None` when `data.icon_img` is missing, blank, not an absolute
/// `http(s)` URL, or one of Reddit's placeholder images. Reddit HTML-escapes
/// the query string, so `&amp;` is decoded.
pub fn usable_avatar_url(about: &Value) -> Option<String> {
    let icon = about.get("data")?.get("icon_img")?.as_str()?.trim();
    if icon.is_empty()
        || AVATAR_PLACEHOLDER_MARKERS
            .iter()
            .any(|marker| icon.contains(marker))
    {
        return None;
    }

    let decoded = icon.replace("&amp;", "&");
    let parsed = Url::parse(&decoded).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        debug!(scheme = parsed.scheme(), "ignoring avatar with non-http scheme");
        return None;
    }
    Some(decoded)
}
