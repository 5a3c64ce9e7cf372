// ============================================================================
// External Service Configuration
// ============================================================================
//
// Base URLs of the collaborators consulted on every request:
// - session service: resolves a session token into an actor id
// - policy service: decides whether an actor may view a group's data
// - user directory (optional): display names for thread listings
//
// ============================================================================

use anyhow::{Context, Result};
use url::Url;

use crate::constants::DEFAULT_SERVICE_REQUEST_TIMEOUT_SECS;

#[derive(Clone, Debug)]
pub struct ServicesConfig {
    pub session_url: String,
    pub policy_url: String,
    /// When unset, thread listings are returned without resolved names
    pub directory_url: Option<String>,
    /// Per-request timeout applied by the HTTP clients (seconds)
    pub request_timeout_secs: u64,
}

impl ServicesConfig {
    pub(crate) fn from_env() -> Result<Self> {
        let session_url = required_url("SESSION_SERVICE_URL")?;
        let policy_url = required_url("POLICY_SERVICE_URL")?;
        let directory_url = match std::env::var("DIRECTORY_SERVICE_URL") {
            Ok(raw) if !raw.trim().is_empty() => Some(validate_url("DIRECTORY_SERVICE_URL", &raw)?),
            _ => None,
        };

        Ok(Self {
            session_url,
            policy_url,
            directory_url,
            request_timeout_secs: std::env::var("SERVICE_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVICE_REQUEST_TIMEOUT_SECS),
        })
    }
}

fn required_url(key: &str) -> Result<String> {
    let raw = std::env::var(key).with_context(|| format!("{} must be set", key))?;
    validate_url(key, &raw)
}

/// Parses the URL and strips any trailing slash so paths can be appended
fn validate_url(key: &str, raw: &str) -> Result<String> {
    let parsed = Url::parse(raw.trim()).with_context(|| format!("{} is not a valid URL", key))?;
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}
