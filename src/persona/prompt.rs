//! Prompt construction for persona synthesis.

use crate::content::{Comment, ContentRecord, Post};

/// System instruction sent with every persona request.
pub const SYSTEM_PROMPT: &str = "You are a user persona generator that responds in strict JSON \
format only. No markdown wrappers. No explanation. Just the raw JSON object.";

/// Stands in for the content block when nothing was fetched.
pub const NO_CONTENT_SENTINEL: &str =
    "No recent posts or comments available for analysis for this user.";

/// Output format directive; always present in the prompt, before the content.
pub const JSON_DIRECTIVE: &str = "Respond in structured JSON format only, with no markdown \
wrappers (like ```json), no preambles, and no explanations outside of the JSON object itself. \
Ensure all string values are properly escaped within the JSON.";

/// Repeated after the content block so long content does not bury the
/// output format.
pub const CLOSING_REMINDER: &str =
    "Reminder: reply with the single JSON object described above and nothing else.";

const EMPTY_POST_BODY: &str = "[No selftext provided]";
const EMPTY_COMMENT_BODY: &str = "[No comment body provided]";
const UNTITLED_POST: &str = "No Title";

/// The 11 persona fields with a one-line description and example each.
const SCHEMA_FIELDS: [&str; 11] = [
    r#"**name** (realistic)"#,
    r#"**age_range** (inferred, e.g., "25-35")"#,
    r#"**occupation** or field of interest (inferred)"#,
    r#"**traits** (as a JSON array of strings, e.g., ["analytical", "curious", "supportive"])"#,
    r#"**behaviors** (as a JSON array of strings, e.g., ["engages in technical discussions", "shares personal anecdotes", "asks follow-up questions"])"#,
    r#"**frustrations** (as a JSON array of strings)"#,
    r#"**motivations** (as a JSON array of strings)"#,
    r#"**goals_needs** (as a JSON array of strings)"#,
    r#"**archetype** (e.g., "The Innovator", "The Learner", "The Advocate")"#,
    r#"**citations** (Cite the specific Reddit post/comment and include the URL used to infer each characteristic. This should be a JSON object where keys are concise descriptions (strings) and values are URLs (strings). Each key-value pair must be correctly comma-separated. Example: {"Expressed interest in programming": "https://reddit.com/r/learnprogramming/comments/123xyz", "Showed concern for privacy": "https://reddit.com/r/privacy/comments/abcde"})"#,
    r#"**profile_image_prompt** (Suggest a potential profile image description for an AI image generator based on the persona, e.g., "A young woman with a laptop, smiling, in a cozy cafe setting, soft lighting.")"#,
];

/// Format one record as a labeled prompt block.
pub fn format_record(record: &ContentRecord) -> String {
    let url = record.permalink();
    match record {
        ContentRecord::Post(post) => {
            let title = non_empty_or(&post.title, UNTITLED_POST);
            let body = non_empty_or(&post.body, EMPTY_POST_BODY);
            format!("Post: {title}\n{body}\nURL: {url}")
        }
        ContentRecord::Comment(comment) => {
            let body = non_empty_or(&comment.body, EMPTY_COMMENT_BODY);
            format!("Comment: {body}\nURL: {url}")
        }
    }
}

fn non_empty_or<'a>(text: &'a str, fallback: &'a str) -> &'a str {
    if text.is_empty() {
        fallback
    } else {
        text
    }
}

/// Build the persona instruction for `username`.
///
/// Quotes the first `sample_limit` posts, then the first `sample_limit`
/// comments, in the order given. Never fails; with no usable content the
/// block is replaced by [`NO_CONTENT_SENTINEL`].
pub fn build_prompt(
    posts: &[Post],
    comments: &[Comment],
    username: &str,
    sample_limit: usize,
) -> String {
    let blocks: Vec<String> = posts
        .iter()
        .take(sample_limit)
        .cloned()
        .map(ContentRecord::Post)
        .chain(
            comments
                .iter()
                .take(sample_limit)
                .cloned()
                .map(ContentRecord::Comment),
        )
        .map(|record| format_record(&record))
        .collect();

    let mut combined = blocks.join("\n\n");
    if combined.trim().is_empty() {
        combined = NO_CONTENT_SENTINEL.to_owned();
    }

    let schema = SCHEMA_FIELDS
        .iter()
        .zip(1_u8..)
        .map(|(field, number)| format!("{number}. {field}"))
        .collect::<Vec<_>>()
        .join("\n");

    let prompt = format!(
        "You are a personality analyst AI. Based on the Reddit posts and comments below from \
user u/{username}, generate a **User Persona** that includes:\n\n\
{schema}\n\n\
{JSON_DIRECTIVE}\n\n\
### Reddit Content for u/{username}:\n\
{combined}\n\n\
{CLOSING_REMINDER}"
    );

    prompt.trim().to_owned()
}
