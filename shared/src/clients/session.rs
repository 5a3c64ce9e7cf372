use async_trait::async_trait;
use msgstore_error::{AppError, AppResult};
use reqwest::StatusCode;
use serde::Deserialize;

use super::{SessionResolver, endpoint, transport_error};

#[derive(Debug, Deserialize)]
struct SessionBody {
    #[serde(alias = "userId", alias = "user_id")]
    userid: String,
}

/// `GET {base}/sessions/{token}` against the session service
#[derive(Clone)]
pub struct HttpSessionResolver {
    http: reqwest::Client,
    base_url: String,
}

impl HttpSessionResolver {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl SessionResolver for HttpSessionResolver {
    async fn resolve_session(&self, token: &str) -> AppResult<Option<String>> {
        let url = endpoint(&self.base_url, &["sessions", token])
            .ok_or_else(|| AppError::session_unavailable("invalid session service URL"))?;

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::session_unavailable(transport_error(e)))?;

        match response.status() {
            StatusCode::OK => {
                let body: SessionBody = response
                    .json()
                    .await
                    .map_err(|e| {
                        AppError::session_unavailable(format!("malformed body: {}", transport_error(e)))
                    })?;
                if body.userid.trim().is_empty() {
                    return Ok(None);
                }
                Ok(Some(body.userid))
            }
            StatusCode::UNAUTHORIZED | StatusCode::NOT_FOUND => Ok(None),
            other => Err(AppError::session_unavailable(format!(
                "session service returned {}",
                other
            ))),
        }
    }
}
