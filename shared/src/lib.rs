//! Wire types and pure domain logic for the chat widget.
//!
//! Nothing in this crate touches the DOM, so everything here builds and
//! tests natively as well as on `wasm32-unknown-unknown`.

// Answer endpoint contract and the error type shared by every HTTP collaborator
pub mod api;
pub use api::{ApiError, ChatReply, ChatRequest, ReplyOutcome};

// Identity provider: sessions, credential checks and error-code mapping
pub mod auth;
pub use auth::{
    auth_error_message, AuthErrorCode, AuthFailure, CredentialError, Credentials, Session,
};

// Runtime configuration served by the host page
pub mod config;
pub use config::{ClientSettings, FirebaseConfig};

// Document store encoding of persisted chat turns
pub mod firestore;
pub use firestore::ChatTurn;

// User-facing strings
pub mod messages;

/// Minimum password length accepted before any network call is made.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum number of persisted turns replayed when a session starts.
pub const HISTORY_LIMIT: usize = 100;

/// Delay between revealed characters of a bot answer, in milliseconds.
pub const TYPEWRITER_DELAY_MS: u32 = 8;
