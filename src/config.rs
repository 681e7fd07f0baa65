//! Configuration loading.
//!
//! Loads `personagen.toml` from `--config`, `$PERSONAGEN_CONFIG`, or the
//! working directory. Every section uses `#[serde(default)]` so a missing or
//! empty file yields a usable configuration.
//!
//! Precedence: env vars > config file > defaults. The resulting [`Config`] is
//! loaded once at startup and handed to constructors by reference.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

/// Default config file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "personagen.toml";

/// Env var naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "PERSONAGEN_CONFIG";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Completion endpoint settings.
    pub llm: LlmConfig,
    /// Reddit client settings.
    pub reddit: RedditConfig,
    /// Persona synthesis settings.
    pub persona: PersonaConfig,
    /// Artifact output settings.
    pub output: OutputConfig,
    /// Log sink settings.
    pub logging: LoggingConfig,
    /// Env overrides that could not be applied, kept for reporting once
    /// logging is installed.
    #[serde(skip)]
    rejected_overrides: Vec<RejectedOverride>,
}

/// An environment override whose value could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedOverride {
    /// The env var name.
    pub var: &'static str,
    /// The value it held.
    pub value: String,
}

/// OpenAI-compatible chat completion endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL; `/chat/completions` is appended.
    pub base_url: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Name of the env var holding the bearer token.
    pub api_key_env: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Upper bound on completion tokens.
    pub max_tokens: u32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_owned(),
            model: "llama3-70b-8192".to_owned(),
            api_key_env: "GROQ_API_KEY".to_owned(),
            temperature: 0.7,
            max_tokens: 8000,
            timeout_secs: 120,
        }
    }
}

impl LlmConfig {
    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Reddit public JSON API settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RedditConfig {
    /// API base URL (no trailing slash required).
    pub base_url: String,
    /// `User-Agent` sent with every request. Reddit rejects generic agents.
    pub user_agent: String,
    /// Number of posts and of comments requested per user.
    pub fetch_limit: u32,
    /// Timeout for each listing request in seconds.
    pub timeout_secs: u64,
    /// Timeout for the avatar lookup in seconds.
    pub avatar_timeout_secs: u64,
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.reddit.com".to_owned(),
            user_agent: concat!("personagen/", env!("CARGO_PKG_VERSION")).to_owned(),
            fetch_limit: 50,
            timeout_secs: 30,
            avatar_timeout_secs: 10,
        }
    }
}

impl RedditConfig {
    /// Listing request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Avatar lookup timeout as a [`Duration`].
    pub fn avatar_timeout(&self) -> Duration {
        Duration::from_secs(self.avatar_timeout_secs)
    }
}

/// Persona synthesis settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PersonaConfig {
    /// How many posts and how many comments are quoted in the prompt.
    pub sample_limit: usize,
    /// Whether to look up the Reddit avatar for the HTML document.
    pub fetch_avatar: bool,
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            sample_limit: 5,
            fetch_avatar: true,
        }
    }
}

/// Artifact output location.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory holding `persona_<username>.{html,txt}`.
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
        }
    }
}

/// Log sink settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// When set, JSON logs are also written here with daily rotation.
    pub dir: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration using the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named config file is missing or any
    /// config file fails to parse.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        Self::load_with(explicit, |key| std::env::var(key).ok())
    }

    /// Load configuration with a custom env resolver (for testing).
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`].
    pub fn load_with(
        explicit: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let (path, required) = match explicit {
            Some(path) => (path.to_path_buf(), true),
            None => match env(CONFIG_PATH_ENV) {
                Some(path) => (PathBuf::from(path), true),
                None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
            },
        };

        let mut config = match std::fs::read_to_string(&path) {
            Ok(contents) => {
                tracing::debug!(path = %path.display(), "loading config from file");
                Self::from_toml(&contents)
                    .with_context(|| format!("failed to parse config at {}", path.display()))?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
                tracing::debug!("no config file found, using defaults");
                Self::default()
            }
            Err(e) => {
                return Err(anyhow::anyhow!(
                    "failed to read config at {}: {e}",
                    path.display()
                ))
            }
        };

        config.apply_overrides(env);
        Ok(config)
    }

    /// Parse a TOML string into config.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or has mistyped fields.
    pub fn from_toml(toml_str: &str) -> anyhow::Result<Self> {
        toml::from_str(toml_str).context("failed to parse config TOML")
    }

    /// Apply environment variable overrides.
    ///
    /// Takes a resolver function for testability.
    pub fn apply_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(v) = env("PERSONAGEN_OUTPUT_DIR") {
            self.output.dir = PathBuf::from(v);
        }
        if let Some(v) = env("PERSONAGEN_MODEL") {
            self.llm.model = v;
        }
        if let Some(v) = env("PERSONAGEN_LLM_BASE_URL") {
            self.llm.base_url = v;
        }
        if let Some(v) = env("PERSONAGEN_FETCH_LIMIT") {
            match v.parse() {
                Ok(n) => self.reddit.fetch_limit = n,
                Err(_) => self.rejected_overrides.push(RejectedOverride {
                    var: "PERSONAGEN_FETCH_LIMIT",
                    value: v,
                }),
            }
        }
    }

    /// Env overrides ignored because their values did not parse.
    pub fn rejected_overrides(&self) -> &[RejectedOverride] {
        &self.rejected_overrides
    }

    /// Log every rejected override at `warn`. Call after logging is set up.
    pub fn log_rejected_overrides(&self) {
        for rejected in &self.rejected_overrides {
            tracing::warn!(
                var = rejected.var,
                value = %rejected.value,
                "ignoring invalid env override"
            );
        }
    }
}
