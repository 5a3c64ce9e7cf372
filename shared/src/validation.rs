use msgstore_error::{AppError, AppResult};
use msgstore_types::{MessageDraft, MessageEdits, NewMessage};

fn present(value: &Option<String>) -> Option<&String> {
    value.as_ref().filter(|v| !v.trim().is_empty())
}

/// Checks that a create payload carries every required field.
///
/// `userid`, `groupid`, `timestamp` and `messagetext` must be present and
/// non-blank; the error lists all that are not. A blank `parentmessage` is
/// treated as absent. Values are kept as sent.
pub fn validate_for_create(message: &NewMessage) -> AppResult<MessageDraft> {
    let user_id = present(&message.user_id);
    let group_id = present(&message.group_id);
    let timestamp = present(&message.timestamp);
    let message_text = present(&message.message_text);

    match (user_id, group_id, timestamp, message_text) {
        (Some(user_id), Some(group_id), Some(timestamp), Some(message_text)) => Ok(MessageDraft {
            parent_message: present(&message.parent_message).cloned(),
            user_id: user_id.clone(),
            group_id: group_id.clone(),
            timestamp: timestamp.clone(),
            message_text: message_text.clone(),
        }),
        _ => {
            let missing: Vec<&str> = [
                ("userid", user_id.is_none()),
                ("groupid", group_id.is_none()),
                ("timestamp", timestamp.is_none()),
                ("messagetext", message_text.is_none()),
            ]
            .into_iter()
            .filter_map(|(field, missing)| missing.then_some(field))
            .collect();

            Err(AppError::validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )))
        }
    }
}

/// Fields present in an edit must not be blank
pub fn validate_edits(edits: &MessageEdits) -> AppResult<()> {
    let blank: Vec<&str> = [
        ("messagetext", &edits.message_text),
        ("timestamp", &edits.timestamp),
    ]
    .into_iter()
    .filter(|(_, value)| value.as_ref().is_some_and(|v| v.trim().is_empty()))
    .map(|(field, _)| field)
    .collect();

    if blank.is_empty() {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "fields must not be empty: {}",
            blank.join(", ")
        )))
    }
}
