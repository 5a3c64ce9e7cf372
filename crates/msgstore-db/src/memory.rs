// ============================================================================
// In-Memory Message Store
// ============================================================================
//
// Process-local implementation of `MessageStore` with the same id format,
// soft-delete and range semantics as the MongoDB backend. Used by the test
// suites and by `STORE_BACKEND=memory` local runs.
//
// `set_available(false)` simulates a store outage: every operation then
// fails with a storage error, which is how the HTTP tests exercise the
// dependency-failure paths.
//
// ============================================================================

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use msgstore_error::{AppError, AppResult};
use msgstore_types::{
    DeleteDetails, Message, MessageDraft, MessageEdits, TimeRange, parse_event_time,
};
use tokio::sync::RwLock;

use crate::{MessageStore, now_millis, observe, parse_message_id};

struct StoredMessage {
    message: Message,
    /// Parsed `timestamp`; `None` never matches a range query
    event_time: Option<DateTime<Utc>>,
}

impl StoredMessage {
    fn is_visible(&self) -> bool {
        self.message.delete_flag.is_none()
    }
}

pub struct InMemoryMessageStore {
    messages: RwLock<HashMap<ObjectId, StoredMessage>>,
    available: AtomicBool,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self {
            messages: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of records held, deleted ones included
    pub async fn len(&self) -> usize {
        self.messages.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn ensure_available(&self) -> AppResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(AppError::storage("in-memory store is offline"))
        }
    }
}

impl Default for InMemoryMessageStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Results come back ordered by event time, then id, so listings are stable
fn sorted(mut found: Vec<(Option<DateTime<Utc>>, Message)>) -> Vec<Message> {
    found.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.id.cmp(&b.1.id)));
    found.into_iter().map(|(_, message)| message).collect()
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create_message(&self, draft: MessageDraft) -> AppResult<String> {
        let _timer = observe("create_message");
        self.ensure_available()?;

        let id = ObjectId::new();
        let event_time = parse_event_time(&draft.timestamp);
        let message = Message {
            id: id.to_hex(),
            parent_message: draft.parent_message,
            user_id: draft.user_id,
            group_id: draft.group_id,
            timestamp: draft.timestamp,
            created_time: now_millis(),
            modified_time: None,
            message_text: draft.message_text,
            delete_flag: None,
        };

        self.messages
            .write()
            .await
            .insert(id, StoredMessage { message, event_time });

        Ok(id.to_hex())
    }

    async fn get_message(&self, id: &str) -> AppResult<Option<Message>> {
        let _timer = observe("get_message");
        self.ensure_available()?;

        let Some(oid) = parse_message_id(id) else {
            return Ok(None);
        };

        let messages = self.messages.read().await;
        Ok(messages
            .get(&oid)
            .filter(|stored| stored.is_visible())
            .map(|stored| stored.message.clone()))
    }

    async fn get_all_messages(
        &self,
        group_id: &str,
        range: &TimeRange,
    ) -> AppResult<Vec<Message>> {
        let _timer = observe("get_all_messages");
        self.ensure_available()?;

        let messages = self.messages.read().await;
        let found = messages
            .values()
            .filter(|stored| stored.is_visible())
            .filter(|stored| stored.message.group_id == group_id)
            .filter(|stored| stored.event_time.is_some_and(|at| range.contains(at)))
            .map(|stored| (stored.event_time, stored.message.clone()))
            .collect();

        Ok(sorted(found))
    }

    async fn get_messages_in_thread(&self, parent_id: &str) -> AppResult<Vec<Message>> {
        let _timer = observe("get_messages_in_thread");
        self.ensure_available()?;

        let root = parse_message_id(parent_id);
        let messages = self.messages.read().await;
        let found = messages
            .iter()
            .filter(|(_, stored)| stored.is_visible())
            .filter(|(oid, stored)| {
                Some(**oid) == root || stored.message.parent_message.as_deref() == Some(parent_id)
            })
            .map(|(_, stored)| (stored.event_time, stored.message.clone()))
            .collect();

        Ok(sorted(found))
    }

    async fn edit_message(&self, id: &str, edits: MessageEdits) -> AppResult<Option<Message>> {
        let _timer = observe("edit_message");
        self.ensure_available()?;

        let Some(oid) = parse_message_id(id) else {
            return Ok(None);
        };

        let mut messages = self.messages.write().await;
        let Some(stored) = messages.get_mut(&oid).filter(|stored| stored.is_visible()) else {
            return Ok(None);
        };

        if let Some(text) = edits.message_text {
            stored.message.message_text = text;
        }
        if let Some(timestamp) = edits.timestamp {
            stored.event_time = parse_event_time(&timestamp);
            stored.message.timestamp = timestamp;
        }
        stored.message.modified_time = Some(edits.modified_time.unwrap_or_else(now_millis));

        Ok(Some(stored.message.clone()))
    }

    async fn delete_message(
        &self,
        id: &str,
        details: DeleteDetails,
    ) -> AppResult<Option<Message>> {
        let _timer = observe("delete_message");
        self.ensure_available()?;

        let Some(oid) = parse_message_id(id) else {
            return Ok(None);
        };

        let mut messages = self.messages.write().await;
        let Some(stored) = messages.get_mut(&oid).filter(|stored| stored.is_visible()) else {
            return Ok(None);
        };

        stored.message.delete_flag = Some(details.deleted_at);
        stored.message.modified_time = Some(details.deleted_at);

        Ok(Some(stored.message.clone()))
    }

    async fn ping(&self) -> AppResult<()> {
        self.ensure_available()
    }
}
