//! Document store encoding of chat turns
//!
//! Turns live under `users/{uid}/chats/{id}` with string fields `question`,
//! `answer`, `error` and a server-assigned `createdAt` timestamp.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

/// Sub-collection holding a user's turns
pub const CHATS_COLLECTION: &str = "chats";
const USERS_COLLECTION: &str = "users";
const CREATED_AT: &str = "createdAt";

/// One persisted question with its answer or error
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatTurn {
    pub question: String,
    pub answer: String,
    pub error: String,
    /// Assigned by the store; `None` until written or when unreadable
    pub created_at: Option<DateTime<Utc>>,
}

impl ChatTurn {
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            error: error.into(),
            created_at: None,
        }
    }

    /// Text of the bot entry for this turn, if any.
    pub fn bot_text(&self) -> Option<&str> {
        [self.answer.as_str(), self.error.as_str()]
            .into_iter()
            .find(|s| !s.is_empty())
    }

    pub fn from_document(doc: &Document) -> Self {
        let string_field = |name: &str| {
            doc.fields
                .get(name)
                .and_then(|v| v.get("stringValue"))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let created_at = doc
            .fields
            .get(CREATED_AT)
            .and_then(|v| v.get("timestampValue"))
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Self {
            question: string_field("question"),
            answer: string_field("answer"),
            error: string_field("error"),
            created_at,
        }
    }
}

/// Path of the parent document owning a user's chats, relative to the
/// document root (e.g. `/users/abc`).
pub fn user_document_path(uid: &str) -> String {
    format!("/{}/{}", USERS_COLLECTION, uid)
}

/// `:commit` body creating one turn with a server-side `createdAt`.
pub fn commit_body(documents_root: &str, uid: &str, doc_id: &str, turn: &ChatTurn) -> Value {
    let name = format!(
        "{}{}/{}/{}",
        documents_root,
        user_document_path(uid),
        CHATS_COLLECTION,
        doc_id
    );
    json!({
        "writes": [{
            "update": {
                "name": name,
                "fields": {
                    "question": { "stringValue": turn.question },
                    "answer": { "stringValue": turn.answer },
                    "error": { "stringValue": turn.error },
                }
            },
            "updateTransforms": [{
                "fieldPath": CREATED_AT,
                "setToServerValue": "REQUEST_TIME"
            }],
            "currentDocument": { "exists": false }
        }]
    })
}

/// `:runQuery` body for the oldest-first history of a user's chats.
pub fn history_query(limit: usize) -> Value {
    json!({
        "structuredQuery": {
            "from": [{ "collectionId": CHATS_COLLECTION }],
            "orderBy": [{
                "field": { "fieldPath": CREATED_AT },
                "direction": "ASCENDING"
            }],
            "limit": limit
        }
    })
}

/// A document as returned by the REST API
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fields: HashMap<String, Value>,
}

/// One row of a `:runQuery` response stream
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunQueryRow {
    /// Absent on the marker row of an empty result
    #[serde(default)]
    pub document: Option<Document>,
}

pub fn turns_from_rows(rows: &[RunQueryRow]) -> Vec<ChatTurn> {
    rows.iter()
        .filter_map(|row| row.document.as_ref())
        .map(ChatTurn::from_document)
        .collect()
}
