use async_trait::async_trait;
use msgstore_error::{AppError, AppResult};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::{PolicyDecider, PolicyDecision, endpoint, transport_error};

const VIEW_ACTION: &str = "view";

#[derive(Debug, Serialize)]
struct AuthorizeRequest<'a> {
    actor: &'a str,
    resource: &'a str,
    action: &'a str,
}

#[derive(Debug, Deserialize)]
struct AuthorizeResponse {
    allowed: bool,
}

/// `POST {base}/authorize` against the policy service
///
/// A 403 is a decision. Every other non-200 answer, a transport error or an
/// unreadable body means no decision was obtained.
#[derive(Clone)]
pub struct HttpPolicyClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpPolicyClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl PolicyDecider for HttpPolicyClient {
    async fn can_view(&self, actor_id: &str, group_id: &str) -> AppResult<PolicyDecision> {
        let url = endpoint(&self.base_url, &["authorize"])
            .ok_or_else(|| AppError::policy_unavailable("invalid policy service URL"))?;

        let response = self
            .http
            .post(url)
            .json(&AuthorizeRequest {
                actor: actor_id,
                resource: group_id,
                action: VIEW_ACTION,
            })
            .send()
            .await
            .map_err(|e| AppError::policy_unavailable(transport_error(e)))?;

        match response.status() {
            StatusCode::OK => {
                let body: AuthorizeResponse = response
                    .json()
                    .await
                    .map_err(|e| {
                        AppError::policy_unavailable(format!("malformed body: {}", transport_error(e)))
                    })?;
                Ok(if body.allowed {
                    PolicyDecision::Allow
                } else {
                    PolicyDecision::Deny
                })
            }
            StatusCode::FORBIDDEN => Ok(PolicyDecision::Deny),
            other => Err(AppError::policy_unavailable(format!(
                "policy service returned {}",
                other
            ))),
        }
    }
}
