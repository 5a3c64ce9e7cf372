// ============================================================================
// MongoDB Message Store
// ============================================================================
//
// Documents live in a single collection. Alongside the client-facing fields
// each document carries `eventtime`, a BSON date parsed from `timestamp`,
// which is what range queries and ordering run against.
//
// Indexes (created on connect):
// - { groupid: 1, eventtime: 1 }  group listings
// - { parentmessage: 1 }          thread lookups
//
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::{
    Client, Collection, Database, IndexModel,
    bson::{self, Bson, Document, doc, oid::ObjectId},
    options::{ClientOptions, ReturnDocument},
};
use msgstore_config::DbConfig;
use msgstore_error::AppResult;
use msgstore_types::{
    DeleteDetails, Message, MessageDraft, MessageEdits, TimeRange, parse_event_time,
};
use serde::{Deserialize, Serialize};

use crate::{MessageStore, now_millis, observe, parse_message_id};

const APP_NAME: &str = "message-service";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MessageDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    #[serde(default)]
    parentmessage: Option<String>,
    userid: String,
    groupid: String,
    timestamp: String,
    #[serde(default)]
    eventtime: Option<bson::DateTime>,
    createdtime: bson::DateTime,
    #[serde(default)]
    modifiedtime: Option<bson::DateTime>,
    messagetext: String,
    #[serde(default)]
    deleteflag: Option<bson::DateTime>,
}

impl MessageDocument {
    fn from_draft(id: ObjectId, draft: MessageDraft, created: DateTime<Utc>) -> Self {
        Self {
            id,
            eventtime: parse_event_time(&draft.timestamp).map(to_bson_time),
            parentmessage: draft.parent_message,
            userid: draft.user_id,
            groupid: draft.group_id,
            timestamp: draft.timestamp,
            createdtime: to_bson_time(created),
            modifiedtime: None,
            messagetext: draft.message_text,
            deleteflag: None,
        }
    }
}

impl From<MessageDocument> for Message {
    fn from(doc: MessageDocument) -> Self {
        Message {
            id: doc.id.to_hex(),
            parent_message: doc.parentmessage,
            user_id: doc.userid,
            group_id: doc.groupid,
            timestamp: doc.timestamp,
            created_time: from_bson_time(doc.createdtime),
            modified_time: doc.modifiedtime.map(from_bson_time),
            message_text: doc.messagetext,
            delete_flag: doc.deleteflag.map(from_bson_time),
        }
    }
}

fn to_bson_time(at: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(at.timestamp_millis())
}

fn from_bson_time(at: bson::DateTime) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(at.timestamp_millis()).unwrap_or_default()
}

/// Matches documents that have not been soft deleted (field null or absent)
fn visible(mut filter: Document) -> Document {
    filter.insert("deleteflag", Bson::Null);
    filter
}

fn range_filter(group_id: &str, range: &TimeRange) -> Document {
    let mut bounds = doc! { "$gte": to_bson_time(range.start) };
    if let Some(end) = range.end {
        bounds.insert("$lte", to_bson_time(end));
    }
    visible(doc! { "groupid": group_id, "eventtime": bounds })
}

fn thread_filter(parent_id: &str) -> Document {
    match parse_message_id(parent_id) {
        Some(root) => visible(doc! {
            "$or": [ { "_id": root }, { "parentmessage": parent_id } ]
        }),
        None => visible(doc! { "parentmessage": parent_id }),
    }
}

fn edit_update(edits: MessageEdits) -> Document {
    let modified = edits.modified_time.unwrap_or_else(now_millis);
    let mut set = doc! { "modifiedtime": to_bson_time(modified) };

    if let Some(text) = edits.message_text {
        set.insert("messagetext", text);
    }
    if let Some(timestamp) = edits.timestamp {
        let eventtime = parse_event_time(&timestamp)
            .map(|at| Bson::DateTime(to_bson_time(at)))
            .unwrap_or(Bson::Null);
        set.insert("eventtime", eventtime);
        set.insert("timestamp", timestamp);
    }

    doc! { "$set": set }
}

fn ordering() -> Document {
    doc! { "eventtime": 1, "_id": 1 }
}

pub struct MongoMessageStore {
    database: Database,
    messages: Collection<MessageDocument>,
}

impl MongoMessageStore {
    /// Connect to MongoDB and make sure the query indexes exist
    pub async fn connect(config: &DbConfig) -> AppResult<Self> {
        let mut options = ClientOptions::parse(&config.uri).await?;
        options.app_name = Some(APP_NAME.to_string());
        options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));
        options.server_selection_timeout =
            Some(Duration::from_secs(config.server_selection_timeout_secs));

        let client = Client::with_options(options)?;
        let database = client.database(&config.database);
        let messages = database.collection::<MessageDocument>(&config.collection);

        let store = Self { database, messages };
        store.ensure_indexes().await?;

        tracing::info!(
            database = %config.database,
            collection = %config.collection,
            "Connected to MongoDB"
        );
        Ok(store)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        self.messages
            .create_indexes(vec![
                IndexModel::builder()
                    .keys(doc! { "groupid": 1, "eventtime": 1 })
                    .build(),
                IndexModel::builder()
                    .keys(doc! { "parentmessage": 1 })
                    .build(),
            ])
            .await?;
        Ok(())
    }

    async fn find_sorted(&self, filter: Document) -> AppResult<Vec<Message>> {
        let docs: Vec<MessageDocument> = self
            .messages
            .find(filter)
            .sort(ordering())
            .await?
            .try_collect()
            .await?;
        Ok(docs.into_iter().map(Message::from).collect())
    }
}

#[async_trait]
impl MessageStore for MongoMessageStore {
    fn backend_name(&self) -> &'static str {
        "mongodb"
    }

    async fn create_message(&self, draft: MessageDraft) -> AppResult<String> {
        let _timer = observe("create_message");

        let id = ObjectId::new();
        let document = MessageDocument::from_draft(id, draft, now_millis());
        self.messages.insert_one(document).await?;

        tracing::debug!(message_id = %id, "Message inserted");
        Ok(id.to_hex())
    }

    async fn get_message(&self, id: &str) -> AppResult<Option<Message>> {
        let _timer = observe("get_message");

        let Some(oid) = parse_message_id(id) else {
            return Ok(None);
        };

        let found = self.messages.find_one(visible(doc! { "_id": oid })).await?;
        Ok(found.map(Message::from))
    }

    async fn get_all_messages(
        &self,
        group_id: &str,
        range: &TimeRange,
    ) -> AppResult<Vec<Message>> {
        let _timer = observe("get_all_messages");
        self.find_sorted(range_filter(group_id, range)).await
    }

    async fn get_messages_in_thread(&self, parent_id: &str) -> AppResult<Vec<Message>> {
        let _timer = observe("get_messages_in_thread");
        self.find_sorted(thread_filter(parent_id)).await
    }

    async fn edit_message(&self, id: &str, edits: MessageEdits) -> AppResult<Option<Message>> {
        let _timer = observe("edit_message");

        let Some(oid) = parse_message_id(id) else {
            return Ok(None);
        };

        let updated = self
            .messages
            .find_one_and_update(visible(doc! { "_id": oid }), edit_update(edits))
            .return_document(ReturnDocument::After)
            .await?;
        Ok(updated.map(Message::from))
    }

    async fn delete_message(
        &self,
        id: &str,
        details: DeleteDetails,
    ) -> AppResult<Option<Message>> {
        let _timer = observe("delete_message");

        let Some(oid) = parse_message_id(id) else {
            return Ok(None);
        };

        let deleted_at = to_bson_time(details.deleted_at);
        let marked = self
            .messages
            .find_one_and_update(
                visible(doc! { "_id": oid }),
                doc! { "$set": { "deleteflag": deleted_at, "modifiedtime": deleted_at } },
            )
            .return_document(ReturnDocument::After)
            .await?;
        Ok(marked.map(Message::from))
    }

    async fn ping(&self) -> AppResult<()> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
