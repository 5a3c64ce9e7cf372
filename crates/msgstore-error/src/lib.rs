use axum::{http::StatusCode, response::IntoResponse};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// Application error type shared by every layer of the service
///
/// Each variant maps onto one of four outcomes a caller can observe:
/// validation failure (400), not found (404), unauthorized (401) or a
/// dependency failure (5xx). Internal details are logged, never echoed.
#[derive(Error, Debug)]
pub enum AppError {
    // ===== Request Errors =====
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Policy denial or missing/unknown actor. Deliberately carries no detail.
    #[error("Unauthorized")]
    Unauthorized,

    // ===== Collaborator Errors =====
    #[error("Policy service unavailable: {0}")]
    PolicyUnavailable(String),

    #[error("Session service unavailable: {0}")]
    SessionUnavailable(String),

    #[error("User directory unavailable: {0}")]
    DirectoryUnavailable(String),

    #[cfg(feature = "http")]
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    // ===== Database & Storage Errors =====
    #[cfg(feature = "database")]
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    // ===== Serialization Errors =====
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ===== Configuration Errors =====
    #[error("Configuration error: {0}")]
    Config(String),

    // ===== Internal Server Errors =====
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Unknown error: {0}")]
    Unknown(#[from] anyhow::Error),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            #[cfg(feature = "http")]
            AppError::Http(_) => StatusCode::BAD_GATEWAY,
            AppError::PolicyUnavailable(_)
            | AppError::SessionUnavailable(_)
            | AppError::DirectoryUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            #[cfg(feature = "database")]
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a user-friendly error message (without sensitive details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => format!("Validation error: {}", msg),
            AppError::NotFound(msg) => format!("Not found: {}", msg),
            AppError::Unauthorized => "Unauthorized".to_string(),
            _ => "Internal server error".to_string(),
        }
    }

    /// Get error code for programmatic error handling
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::PolicyUnavailable(_) => "POLICY_UNAVAILABLE",
            AppError::SessionUnavailable(_) => "SESSION_UNAVAILABLE",
            AppError::DirectoryUnavailable(_) => "DIRECTORY_UNAVAILABLE",
            #[cfg(feature = "http")]
            AppError::Http(_) => "EXTERNAL_SERVICE_ERROR",
            #[cfg(feature = "database")]
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::Json(_) => "JSON_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
            AppError::Unknown(_) => "UNKNOWN_ERROR",
        }
    }

    /// True for failures of a backing service rather than of the request itself
    pub fn is_dependency_failure(&self) -> bool {
        match self {
            AppError::PolicyUnavailable(_)
            | AppError::SessionUnavailable(_)
            | AppError::DirectoryUnavailable(_)
            | AppError::Storage(_) => true,
            #[cfg(feature = "database")]
            AppError::Database(_) => true,
            #[cfg(feature = "http")]
            AppError::Http(_) => true,
            _ => false,
        }
    }

    /// Log this error with appropriate level and context
    pub fn log(&self) {
        let status = self.status_code();
        let code = self.error_code();

        if status.is_server_error() {
            tracing::error!(
                error = %self,
                error_code = %code,
                status = %status.as_u16(),
                "Server error occurred"
            );
        } else if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(error_code = %code, "Request not authorized");
        } else {
            tracing::debug!(
                error = %self,
                error_code = %code,
                "Client error occurred"
            );
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        self.log();

        let status = self.status_code();
        let error_code = self.error_code();

        let response_body = if status.is_server_error() {
            // Internal details stay in the log
            json!({
                "error": "Internal server error",
                "error_code": error_code,
                "status": status.as_u16(),
            })
        } else {
            json!({
                "error": self.user_message(),
                "error_code": error_code,
                "status": status.as_u16(),
            })
        };

        (status, axum::Json(response_body)).into_response()
    }
}

// ============================================================================
// Helper functions for creating common errors
// ============================================================================

impl AppError {
    /// Create a validation error (400)
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    /// Create a not-found error (404)
    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    /// Create a storage backend error
    pub fn storage(msg: impl Into<String>) -> Self {
        AppError::Storage(msg.into())
    }

    /// Create a policy backend error
    pub fn policy_unavailable(msg: impl Into<String>) -> Self {
        AppError::PolicyUnavailable(msg.into())
    }

    /// Create a session backend error
    pub fn session_unavailable(msg: impl Into<String>) -> Self {
        AppError::SessionUnavailable(msg.into())
    }

    /// Create a user directory error
    pub fn directory_unavailable(msg: impl Into<String>) -> Self {
        AppError::DirectoryUnavailable(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        AppError::Config(msg.into())
    }

    /// Create an internal server error
    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::validation("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::policy_unavailable("timeout").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::storage("down").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_policy_failure_is_distinct_from_denial() {
        let denied = AppError::Unauthorized;
        let unreachable = AppError::policy_unavailable("connection refused");

        assert_ne!(denied.error_code(), unreachable.error_code());
        assert!(unreachable.is_dependency_failure());
        assert!(!denied.is_dependency_failure());
    }

    #[tokio::test]
    async fn test_server_error_body_hides_details() {
        let (status, body) = body_json(AppError::storage("replica set ghost-01 unreachable")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
        assert_eq!(body["error_code"], "STORAGE_ERROR");
        assert!(!body.to_string().contains("ghost-01"));
    }

    #[tokio::test]
    async fn test_unauthorized_body_is_uniform() {
        let (status, body) = body_json(AppError::Unauthorized).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Unauthorized");
        assert_eq!(body["status"], 401);
    }

    #[tokio::test]
    async fn test_validation_body_carries_reason() {
        let (status, body) = body_json(AppError::validation("messagetext is required")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Validation error: messagetext is required");
        assert_eq!(body["error_code"], "VALIDATION_ERROR");
    }
}
