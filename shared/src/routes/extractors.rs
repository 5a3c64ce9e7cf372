// ============================================================================
// Actor Extractor
// ============================================================================
//
// Resolves the caller's session token into an actor id via the session
// service. The token is read from `Authorization: Bearer <token>`, falling
// back to `x-session-token`.
//
// A missing token and an unknown session both reject with the same 401.
// A session service failure rejects with 500 and marks `session` down.
//
// ============================================================================

use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};
use msgstore_error::AppError;

use crate::context::ServiceContext;
use crate::status::SESSION;
use crate::utils::log_safe_id;

const SESSION_TOKEN_HEADER: &str = "x-session-token";

/// The authenticated caller of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
}

fn session_token(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim);

    bearer
        .or_else(|| {
            headers
                .get(SESSION_TOKEN_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
        })
        .filter(|token| !token.is_empty())
}

#[async_trait]
impl FromRequestParts<Arc<ServiceContext>> for Actor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &Arc<ServiceContext>,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(&parts.headers) else {
            tracing::debug!("Request without session token");
            return Err(AppError::Unauthorized);
        };

        match ctx.sessions.resolve_session(token).await {
            Ok(Some(user_id)) => {
                ctx.status.mark_up(SESSION).await;
                tracing::trace!(
                    actor_hash = %log_safe_id(&user_id, &ctx.config.logging.hash_salt),
                    "Actor resolved"
                );
                Ok(Actor { user_id })
            }
            Ok(None) => {
                ctx.status.mark_up(SESSION).await;
                Err(AppError::Unauthorized)
            }
            Err(e) => {
                ctx.status.mark_down(SESSION, &e.to_string()).await;
                Err(match e {
                    AppError::SessionUnavailable(_) => e,
                    other => AppError::session_unavailable(other.to_string()),
                })
            }
        }
    }
}
