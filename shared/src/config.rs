//! Runtime configuration
//!
//! The host page serves the identity/document-store project settings from
//! `/firebase-config`; everything else is fixed client-side in
//! [`ClientSettings`].

use serde::{Deserialize, Serialize};

use crate::api::endpoints;
use crate::{HISTORY_LIMIT, TYPEWRITER_DELAY_MS};

const IDENTITY_BASE: &str = "https://identitytoolkit.googleapis.com/v1";
const SECURE_TOKEN_BASE: &str = "https://securetoken.googleapis.com/v1";
const FIRESTORE_BASE: &str = "https://firestore.googleapis.com/v1";

/// Project settings served by `GET /firebase-config`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirebaseConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub project_id: String,
}

impl FirebaseConfig {
    /// Both the identity provider and the document store need these two.
    pub fn is_usable(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.project_id.trim().is_empty()
    }

    /// e.g. `identity_url("accounts:signUp")`
    pub fn identity_url(&self, method: &str) -> String {
        format!("{}/{}?key={}", IDENTITY_BASE, method, self.api_key)
    }

    pub fn token_url(&self) -> String {
        format!("{}/token?key={}", SECURE_TOKEN_BASE, self.api_key)
    }

    /// Resource name of the default database's document root.
    pub fn documents_root(&self) -> String {
        format!(
            "projects/{}/databases/(default)/documents",
            self.project_id
        )
    }

    /// Full URL of a document path or document-root method (`":commit"`).
    pub fn documents_url(&self, suffix: &str) -> String {
        format!("{}/{}{}", FIRESTORE_BASE, self.documents_root(), suffix)
    }
}

/// Fixed client-side settings
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    pub chat_path: String,
    pub config_path: String,
    pub history_limit: usize,
    pub typewriter_delay_ms: u32,
    /// Timeout for the answer endpoint
    pub answer_timeout_ms: u32,
    /// Timeout for identity and document store calls
    pub request_timeout_ms: u32,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            chat_path: endpoints::CHAT.to_string(),
            config_path: endpoints::FIREBASE_CONFIG.to_string(),
            history_limit: HISTORY_LIMIT,
            typewriter_delay_ms: TYPEWRITER_DELAY_MS,
            answer_timeout_ms: 60_000,
            request_timeout_ms: 30_000,
        }
    }
}

/// True when the first `guest` parameter of the query string (with or without
/// leading `?`) is exactly `1`.
pub fn is_guest_query(search: &str) -> bool {
    search
        .trim_start_matches('?')
        .split('&')
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find(|(key, _)| *key == "guest")
        .is_some_and(|(_, value)| value == "1")
}
