// ============================================================================
// Collaborator Clients
// ============================================================================
//
// The service delegates identity and policy to external services. Each
// collaborator is a capability trait so the gate and handlers never depend
// on a transport; the HTTP implementations below are the production ones.
//
// - SessionResolver: session token -> actor id
// - PolicyDecider:   may this actor view this group?
// - UserDirectory:   user id -> display name (optional)
//
// ============================================================================

mod directory;
mod policy;
mod session;

pub use directory::HttpUserDirectory;
pub use policy::HttpPolicyClient;
pub use session::HttpSessionResolver;

use std::time::Duration;

use async_trait::async_trait;
use msgstore_config::ServicesConfig;
use msgstore_error::AppResult;
use url::Url;

/// Outcome of a policy query that reached the policy service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyDecision {
    Allow,
    Deny,
}

#[async_trait]
pub trait SessionResolver: Send + Sync {
    /// `Ok(None)` when the token is unknown or expired
    async fn resolve_session(&self, token: &str) -> AppResult<Option<String>>;
}

#[async_trait]
pub trait PolicyDecider: Send + Sync {
    /// Any failure to obtain a decision is an error, never a `Deny`
    async fn can_view(&self, actor_id: &str, group_id: &str) -> AppResult<PolicyDecision>;
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// `Ok(None)` when the directory has no such user
    async fn display_name(&self, user_id: &str) -> AppResult<Option<String>>;
}

/// reqwest client shared by the collaborator implementations
pub fn build_http_client(config: &ServicesConfig) -> AppResult<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()?;
    Ok(client)
}

/// `base` with `segments` appended, each percent-encoded as one path segment
pub(crate) fn endpoint(base: &str, segments: &[&str]) -> Option<Url> {
    let mut url = Url::parse(base).ok()?;
    url.path_segments_mut()
        .ok()?
        .pop_if_empty()
        .extend(segments);
    Some(url)
}

/// Error text for a failed collaborator call.
///
/// The request URL can carry a session token, so it is stripped before the
/// text reaches an `AppError`, the logs or the status registry.
pub(crate) fn transport_error(error: reqwest::Error) -> String {
    error.without_url().to_string()
}
