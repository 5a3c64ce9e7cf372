//! Prometheus metrics for the message store service
//!
//! Provides centralized metrics collection for monitoring:
//! - Message lifecycle (create / edit / delete)
//! - Authorization decisions by outcome
//! - Dependency failures (store, policy, session, directory)
//! - Storage latency

use anyhow::Result;
use once_cell::sync::Lazy;
use prometheus::{
    Encoder, HistogramVec, IntCounter, IntCounterVec, TextEncoder, opts, register_histogram_vec,
    register_int_counter, register_int_counter_vec,
};

// ============================================================================
// Message Metrics
// ============================================================================

pub static MESSAGES_CREATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(opts!(
        "msgstore_messages_created_total",
        "Total number of messages created"
    ))
    .expect("Failed to register MESSAGES_CREATED_TOTAL metric")
});

pub static MESSAGES_EDITED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(opts!(
        "msgstore_messages_edited_total",
        "Total number of message edits applied"
    ))
    .expect("Failed to register MESSAGES_EDITED_TOTAL metric")
});

pub static MESSAGES_DELETED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(opts!(
        "msgstore_messages_deleted_total",
        "Total number of messages soft deleted"
    ))
    .expect("Failed to register MESSAGES_DELETED_TOTAL metric")
});

// ============================================================================
// Authorization & Dependency Metrics
// ============================================================================

/// Gate decisions: allow, deny, not_found, unavailable
pub static AUTHORIZATION_DECISIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        opts!(
            "msgstore_authorization_decisions_total",
            "Authorization gate decisions by outcome"
        ),
        &["outcome"]
    )
    .expect("Failed to register AUTHORIZATION_DECISIONS_TOTAL metric")
});

/// Failed calls to a backing dependency
pub static DEPENDENCY_FAILURES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        opts!(
            "msgstore_dependency_failures_total",
            "Failed calls to backing services by dependency"
        ),
        &["dependency"]
    )
    .expect("Failed to register DEPENDENCY_FAILURES_TOTAL metric")
});

/// Name-resolution batches where at least one lookup failed
pub static NAME_RESOLUTION_DEGRADED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(opts!(
        "msgstore_name_resolution_degraded_total",
        "Name resolution batches completed with failed lookups"
    ))
    .expect("Failed to register NAME_RESOLUTION_DEGRADED_TOTAL metric")
});

// ============================================================================
// Storage Metrics
// ============================================================================

pub static STORE_OPERATION_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "msgstore_store_operation_duration_seconds",
        "Storage adapter operation duration in seconds",
        &["operation"]
    )
    .expect("Failed to register STORE_OPERATION_DURATION_SECONDS metric")
});

// ============================================================================
// Metrics Collection
// ============================================================================

/// Gather all registered metrics and encode as Prometheus text format
pub fn gather_metrics() -> Result<String> {
    let mut buffer = vec![];
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder.encode(&metric_families, &mut buffer)?;

    Ok(String::from_utf8(buffer)?)
}
