//! # Message Store Database
//!
//! Storage adapter for the message store service: the `MessageStore`
//! contract plus a MongoDB implementation and a process-local one.
//!
//! Shared rules every backend follows:
//! - ids are MongoDB ObjectIds; a string that does not parse as one is
//!   treated as "not found" before any query is issued
//! - soft-deleted records (`deleteflag` set) are invisible to every read
//!   and mutation path
//! - `createdtime` is stamped once on create, `modifiedtime` on edit/delete

mod memory;
mod mongo;

pub use memory::InMemoryMessageStore;
pub use mongo::MongoMessageStore;

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use mongodb::bson::oid::ObjectId;
use msgstore_error::AppResult;
use msgstore_metrics::STORE_OPERATION_DURATION_SECONDS;
use msgstore_types::{
    DeleteDetails, DependencyReport, Message, MessageDraft, MessageEdits, StoreStatus, TimeRange,
};
use prometheus::HistogramTimer;

/// Persistence contract for messages
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Name reported in `/status` (`"mongodb"`, `"memory"`)
    fn backend_name(&self) -> &'static str;

    /// Persist a validated message and return its store-assigned id
    async fn create_message(&self, draft: MessageDraft) -> AppResult<String>;

    /// `Ok(None)` for malformed ids as well as absent or deleted records
    async fn get_message(&self, id: &str) -> AppResult<Option<Message>>;

    /// Visible messages of `group_id` whose event time falls in `range`
    async fn get_all_messages(&self, group_id: &str, range: &TimeRange)
        -> AppResult<Vec<Message>>;

    /// Visible replies to `parent_id`, plus the root message itself
    async fn get_messages_in_thread(&self, parent_id: &str) -> AppResult<Vec<Message>>;

    /// Apply the present fields of `edits` and stamp `modifiedtime`
    async fn edit_message(&self, id: &str, edits: MessageEdits) -> AppResult<Option<Message>>;

    /// Mark the message deleted; returns the record as marked
    async fn delete_message(&self, id: &str, details: DeleteDetails)
        -> AppResult<Option<Message>>;

    /// Round trip to the backing store
    async fn ping(&self) -> AppResult<()>;

    /// Liveness report for `/status`; never used for request admission
    async fn status(&self) -> StoreStatus {
        let name = self.backend_name().to_string();
        match self.ping().await {
            Ok(()) => StoreStatus {
                running: true,
                deps: DependencyReport {
                    up: vec![name],
                    down: vec![],
                },
            },
            Err(e) => {
                tracing::warn!(backend = %name, error = %e, "Store ping failed");
                StoreStatus {
                    running: false,
                    deps: DependencyReport {
                        up: vec![],
                        down: vec![name],
                    },
                }
            }
        }
    }
}

/// Parse an id in the store's identifier format. `None` means "not found".
pub fn parse_message_id(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id).ok()
}

/// Current time at the millisecond precision the document store keeps
pub(crate) fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Latency timer for one storage operation; records when dropped
pub(crate) fn observe(operation: &str) -> HistogramTimer {
    STORE_OPERATION_DURATION_SECONDS
        .with_label_values(&[operation])
        .start_timer()
}
