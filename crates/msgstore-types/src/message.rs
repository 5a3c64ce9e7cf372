use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted message as exposed to clients
///
/// Wire names are lowercase (`userid`, `groupid`, `messagetext`, ...).
/// `deleteflag` only appears on records that were soft deleted, which in
/// practice means the response to a delete call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    #[serde(rename = "parentmessage")]
    pub parent_message: Option<String>,
    #[serde(rename = "userid")]
    pub user_id: String,
    #[serde(rename = "groupid")]
    pub group_id: String,
    /// Caller-supplied event time (ISO 8601), not the creation time
    pub timestamp: String,
    #[serde(rename = "createdtime")]
    pub created_time: DateTime<Utc>,
    #[serde(rename = "modifiedtime")]
    pub modified_time: Option<DateTime<Utc>>,
    #[serde(rename = "messagetext")]
    pub message_text: String,
    #[serde(
        rename = "deleteflag",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub delete_flag: Option<DateTime<Utc>>,
}

impl Message {
    pub fn is_deleted(&self) -> bool {
        self.delete_flag.is_some()
    }
}

/// Candidate message as submitted by a client (POST /send/:groupid)
///
/// Every field is optional here so that presence can be checked explicitly;
/// a client-supplied `id` is not part of the payload and is ignored.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NewMessage {
    #[serde(default, rename = "parentmessage", alias = "parentMessage")]
    pub parent_message: Option<String>,
    #[serde(default, rename = "userid", alias = "userId")]
    pub user_id: Option<String>,
    #[serde(default, rename = "groupid", alias = "groupId")]
    pub group_id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default, rename = "messagetext", alias = "messageText")]
    pub message_text: Option<String>,
}

/// A message that passed create validation and is ready to persist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDraft {
    pub parent_message: Option<String>,
    pub user_id: String,
    pub group_id: String,
    pub timestamp: String,
    pub message_text: String,
}

/// Partial update of a message (PUT /edit/:id)
///
/// Only present fields are overwritten. `modified_time` is set by the server;
/// when `None` the store stamps the current time.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MessageEdits {
    #[serde(default, rename = "messagetext", alias = "messageText")]
    pub message_text: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(skip)]
    pub modified_time: Option<DateTime<Utc>>,
}

impl MessageEdits {
    pub fn is_empty(&self) -> bool {
        self.message_text.is_none() && self.timestamp.is_none()
    }
}

/// Soft-delete marker applied by `delete_message`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteDetails {
    /// Written to both `deleteflag` and `modifiedtime`
    pub deleted_at: DateTime<Utc>,
}

impl DeleteDetails {
    pub fn now() -> Self {
        Self {
            deleted_at: Utc::now(),
        }
    }
}

// ============================================================================
// Request/Response bodies
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub message: NewMessage,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct EditMessageRequest {
    pub edits: MessageEdits,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: Message,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageListResponse {
    pub messages: Vec<Message>,
}
