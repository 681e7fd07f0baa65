//! Credential loading from `.env` files and the process environment.

use std::path::Path;

use anyhow::Context;
use tracing::debug;

/// Bearer token for the completion endpoint.
///
/// `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ApiKey").field(&"[REDACTED]").finish()
    }
}

impl ApiKey {
    /// Wrap a raw token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for building the `Authorization` header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

/// Load variables from a `.env` file into the process environment.
///
/// Existing variables are not overwritten. A missing file is not an error.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_dotenv(path: &Path) -> anyhow::Result<()> {
    match dotenvy::from_path(path) {
        Ok(()) => {
            debug!(path = %path.display(), "loaded environment file");
            Ok(())
        }
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e).with_context(|| format!("failed to load {}", path.display())),
    }
}

/// Resolve the API key from the env var named `var`.
///
/// Takes a resolver function for testability.
///
/// # Errors
///
/// Returns an error when the variable is unset or blank.
pub fn resolve_api_key(var: &str, env: impl Fn(&str) -> Option<String>) -> anyhow::Result<ApiKey> {
    match env(var) {
        Some(value) if !value.trim().is_empty() => Ok(ApiKey::new(value.trim())),
        _ => Err(anyhow::anyhow!(
            "missing required credential: {var} (set it in the environment or .env)"
        )),
    }
}
