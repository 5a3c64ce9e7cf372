// ============================================================================
// Message Routes
// ============================================================================
//
// Endpoints:
// - GET    /read/:id         - one message
// - GET    /all/:groupid     - a group's messages in an event-time window
// - POST   /send/:groupid    - create a message
// - PUT    /edit/:id         - partial update
// - DELETE /delete/:id       - soft delete
// - GET    /thread/:id       - root message and its replies
//
// Each handler runs: actor -> gate -> (validation) -> store -> response.
// Not found is 404 everywhere, malformed ids included.
//
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use msgstore_error::{AppError, AppResult};
use msgstore_metrics::{MESSAGES_CREATED_TOTAL, MESSAGES_DELETED_TOTAL, MESSAGES_EDITED_TOTAL};
use msgstore_types::{
    DeleteDetails, EditMessageRequest, Message, MessageListResponse, MessageResponse,
    SendMessageRequest, SendMessageResponse, TimeRange, parse_event_time,
};
use serde::{Deserialize, Serialize};

use crate::context::ServiceContext;
use crate::names::resolve_names;
use crate::routes::extractors::Actor;
use crate::utils::log_safe_id;
use crate::validation::{validate_edits, validate_for_create};

#[derive(Debug, Default, Deserialize)]
pub struct RangeParams {
    #[serde(default, alias = "startTime")]
    pub starttime: Option<String>,
    #[serde(default, alias = "endTime")]
    pub endtime: Option<String>,
}

impl RangeParams {
    fn to_range(&self) -> AppResult<TimeRange> {
        let raw_start = self
            .starttime
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| AppError::validation("starttime is required"))?;
        let start = parse_event_time(raw_start)
            .ok_or_else(|| AppError::validation("starttime is not a valid date"))?;

        let end = match self.endtime.as_deref().filter(|v| !v.trim().is_empty()) {
            Some(raw_end) => Some(
                parse_event_time(raw_end)
                    .ok_or_else(|| AppError::validation("endtime is not a valid date"))?,
            ),
            None => None,
        };

        Ok(TimeRange::new(start, end))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ThreadParams {
    #[serde(default, alias = "resolveNames")]
    pub resolvenames: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ThreadResponse {
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub names: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degraded: Option<bool>,
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::validation(rejection.body_text()))
}

// Extractor rejections are held until the gate has run, so a caller without
// access sees 401 whatever the request carries.
fn query<T>(params: Result<Query<T>, QueryRejection>) -> AppResult<T> {
    params
        .map(|Query(value)| value)
        .map_err(|rejection| AppError::validation(rejection.body_text()))
}

/// GET /read/:id
pub async fn read_message(
    State(ctx): State<Arc<ServiceContext>>,
    actor: Actor,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let message = ctx.gate.authorize_for_message(&actor, &id).await?;
    Ok(Json(MessageResponse { message }))
}

/// GET /all/:groupid?starttime=..&endtime=..
///
/// `starttime` is required, `endtime` optional. Both bounds are inclusive;
/// a plain date means midnight UTC.
pub async fn get_all_messages(
    State(ctx): State<Arc<ServiceContext>>,
    actor: Actor,
    Path(group_id): Path<String>,
    params: Result<Query<RangeParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    ctx.gate.authorize_for_group(&actor, &group_id).await?;

    let range = query(params)?.to_range()?;
    let messages = ctx.store.get_all_messages(&group_id, &range).await?;
    if messages.is_empty() {
        return Err(AppError::not_found("no messages in range"));
    }

    tracing::debug!(group_id = %group_id, count = messages.len(), "Group messages listed");
    Ok(Json(MessageListResponse { messages }))
}

/// POST /send/:groupid
pub async fn send_message(
    State(ctx): State<Arc<ServiceContext>>,
    actor: Actor,
    Path(group_id): Path<String>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    ctx.gate.authorize_for_group(&actor, &group_id).await?;

    let request = body(payload)?;
    let draft = validate_for_create(&request.message)?;
    if draft.group_id != group_id {
        return Err(AppError::validation("groupid does not match the request path"));
    }

    let id = ctx.store.create_message(draft).await?;
    MESSAGES_CREATED_TOTAL.inc();

    tracing::info!(
        message_id = %id,
        group_id = %group_id,
        actor_hash = %log_safe_id(&actor.user_id, &ctx.config.logging.hash_salt),
        "Message created"
    );
    Ok((StatusCode::CREATED, Json(SendMessageResponse { id })))
}

/// PUT /edit/:id
pub async fn edit_message(
    State(ctx): State<Arc<ServiceContext>>,
    actor: Actor,
    Path(id): Path<String>,
    payload: Result<Json<EditMessageRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    ctx.gate.authorize_for_message(&actor, &id).await?;

    let request = body(payload)?;
    validate_edits(&request.edits)?;

    // The message may have been deleted since the gate resolved it
    let message = ctx
        .store
        .edit_message(&id, request.edits)
        .await?
        .ok_or_else(|| AppError::not_found("message"))?;
    MESSAGES_EDITED_TOTAL.inc();

    tracing::info!(message_id = %id, "Message edited");
    Ok(Json(MessageResponse { message }))
}

/// DELETE /delete/:id
pub async fn delete_message(
    State(ctx): State<Arc<ServiceContext>>,
    actor: Actor,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    ctx.gate.authorize_for_message(&actor, &id).await?;

    let message = ctx
        .store
        .delete_message(&id, DeleteDetails::now())
        .await?
        .ok_or_else(|| AppError::not_found("message"))?;
    MESSAGES_DELETED_TOTAL.inc();

    tracing::info!(
        message_id = %id,
        actor_hash = %log_safe_id(&actor.user_id, &ctx.config.logging.hash_salt),
        "Message deleted"
    );
    Ok(Json(MessageResponse { message }))
}

/// GET /thread/:id?resolvenames=true
///
/// Replies outside the root's group are dropped: the caller was only
/// authorized for that group.
pub async fn get_thread(
    State(ctx): State<Arc<ServiceContext>>,
    actor: Actor,
    Path(id): Path<String>,
    params: Result<Query<ThreadParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let root = ctx.gate.authorize_for_message(&actor, &id).await?;
    let params = query(params)?;

    let messages: Vec<Message> = ctx
        .store
        .get_messages_in_thread(&root.id)
        .await?
        .into_iter()
        .filter(|message| message.group_id == root.group_id)
        .collect();

    let mut response = ThreadResponse {
        messages,
        names: None,
        degraded: None,
    };

    if params.resolvenames.unwrap_or(false) {
        match &ctx.directory {
            Some(directory) => {
                let resolution = resolve_names(
                    directory.as_ref(),
                    &ctx.status,
                    response.messages.iter().map(|m| m.user_id.as_str()),
                )
                .await;
                response.names = Some(resolution.names);
                response.degraded = Some(resolution.degraded);
            }
            None => tracing::debug!("Name resolution requested but no directory configured"),
        }
    }

    Ok(Json(response))
}
