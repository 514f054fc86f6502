//! Answer endpoint types and the error type shared by HTTP collaborators.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::messages;

/// API error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// Network or connection error (including timeouts)
    #[error("Network error: {0}")]
    Network(String),
    /// Server returned an error status
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },
    /// Failed to parse response
    #[error("Parse error: {0}")]
    Parse(String),
    /// Authentication required or failed
    #[error("Auth error: {0}")]
    Auth(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Parse(err.to_string())
    }
}

/// Paths served by the page origin.
pub mod endpoints {
    pub const CHAT: &str = "/chat";
    pub const FIREBASE_CONFIG: &str = "/firebase-config";
}

/// Body of `POST /chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub question: String,
}

impl ChatRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
        }
    }
}

/// Normalized reply of the answer endpoint.
///
/// The endpoint answers with either an object or a one-element array wrapping
/// one; anything else counts as an empty object. Empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatReply {
    pub answer: Option<String>,
    pub error: Option<String>,
}

/// What the transcript shows for a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    Answer(String),
    Error(String),
    Empty,
}

impl ChatReply {
    pub fn from_body(body: &Value) -> Self {
        let object = match body {
            Value::Array(items) => items.first(),
            other => Some(other),
        };
        let Some(Value::Object(map)) = object else {
            return Self::default();
        };

        let field = |name: &str| {
            map.get(name)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Self {
            answer: field("answer"),
            error: field("error"),
        }
    }

    pub fn outcome(&self) -> ReplyOutcome {
        match (&self.answer, &self.error) {
            (Some(answer), _) => ReplyOutcome::Answer(answer.clone()),
            (None, Some(error)) => ReplyOutcome::Error(error.clone()),
            (None, None) => ReplyOutcome::Empty,
        }
    }

    /// Text revealed in the transcript for this reply.
    pub fn display_text(&self) -> String {
        match self.outcome() {
            ReplyOutcome::Answer(text) | ReplyOutcome::Error(text) => text,
            ReplyOutcome::Empty => messages::REQUEST_FAILED.to_string(),
        }
    }
}
