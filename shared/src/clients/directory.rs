use async_trait::async_trait;
use msgstore_error::{AppError, AppResult};
use reqwest::StatusCode;
use serde::Deserialize;

use super::{UserDirectory, endpoint, transport_error};

#[derive(Debug, Deserialize)]
struct UserBody {
    #[serde(alias = "displayName", alias = "display_name")]
    name: String,
}

/// `GET {base}/users/{id}` against the user directory
#[derive(Clone)]
pub struct HttpUserDirectory {
    http: reqwest::Client,
    base_url: String,
}

impl HttpUserDirectory {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn display_name(&self, user_id: &str) -> AppResult<Option<String>> {
        let url = endpoint(&self.base_url, &["users", user_id])
            .ok_or_else(|| AppError::directory_unavailable("invalid directory URL"))?;

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::directory_unavailable(transport_error(e)))?;

        match response.status() {
            StatusCode::OK => {
                let body: UserBody = response.json().await.map_err(|e| {
                    AppError::directory_unavailable(format!("malformed body: {}", transport_error(e)))
                })?;
                Ok(Some(body.name))
            }
            StatusCode::NOT_FOUND => Ok(None),
            other => Err(AppError::directory_unavailable(format!(
                "directory returned {}",
                other
            ))),
        }
    }
}
