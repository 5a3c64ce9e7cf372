// ============================================================================
// Axum Routes Module
// ============================================================================
//
// Structure:
// - mod.rs: router assembly and middleware
// - extractors.rs: `Actor` (session token -> actor id)
// - health.rs: status, liveness and metrics endpoints
// - messages.rs: message CRUD, group listings and threads
//
// ============================================================================

pub mod extractors;
pub mod health;
pub mod messages;

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    routing::{delete, get, post, put},
};
use msgstore_config::MAX_REQUEST_BODY_SIZE;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::context::ServiceContext;

/// Create the service router
pub fn create_router(ctx: Arc<ServiceContext>) -> Router {
    Router::new()
        // Health and monitoring (no session needed)
        .route("/status", get(health::status))
        .route("/health/live", get(health::liveness_check))
        .route("/metrics", get(health::metrics))
        // Messages
        .route("/read/:id", get(messages::read_message))
        .route("/all/:groupid", get(messages::get_all_messages))
        .route("/send/:groupid", post(messages::send_message))
        .route("/edit/:id", put(messages::edit_message))
        .route("/delete/:id", delete(messages::delete_message))
        .route("/thread/:id", get(messages::get_thread))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                        tracing::info_span!(
                            "request",
                            request_id = %Uuid::new_v4(),
                            method = %request.method(),
                            path = %request.uri().path(),
                        )
                    }),
                )
                .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_SIZE))
                .into_inner(),
        )
        .with_state(ctx)
}
