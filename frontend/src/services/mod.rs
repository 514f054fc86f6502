//! Collaborators the widget talks to
//!
//! Each remote dependency sits behind a small trait so the chat and auth flows
//! can run against in-memory fakes. The concrete implementations speak HTTP
//! through `gloo-net`:
//! - `answer.rs` - the `/chat` answer endpoint
//! - `identity.rs` - email/password identity provider plus stored session
//! - `firestore.rs` - per-user chat turn storage
//! - `http.rs` - request helper with a per-call timeout, and config loading

mod answer;
mod firestore;
pub mod http;
mod identity;

#[cfg(test)]
pub mod fakes;

use chat_shared::{
    ApiError, AuthFailure, ChatReply, ChatTurn, ClientSettings, Credentials, FirebaseConfig,
    Session,
};

use crate::chat::typewriter::{TimerPause, Typewriter};

pub use answer::HttpAnswerService;
pub use firestore::FirestoreStore;
pub use identity::{parse_session, FirebaseAuth, SESSION_STORAGE_KEY};

/// Remote endpoint answering questions
#[allow(async_fn_in_trait)]
pub trait AnswerService {
    async fn ask(&self, question: &str) -> Result<ChatReply, ApiError>;
}

/// Per-user storage of completed turns
#[allow(async_fn_in_trait)]
pub trait TurnStore {
    /// Persist one turn; the store assigns its creation time.
    async fn append(&self, session: &Session, turn: &ChatTurn) -> Result<(), ApiError>;

    /// Up to `limit` turns, oldest first.
    async fn recent(&self, session: &Session, limit: usize) -> Result<Vec<ChatTurn>, ApiError>;
}

/// Email/password identity provider
#[allow(async_fn_in_trait)]
pub trait IdentityProvider {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthFailure>;
    async fn sign_up(&self, credentials: &Credentials) -> Result<Session, AuthFailure>;
    async fn sign_out(&self);

    /// The session as currently stored, shared with other tabs
    fn stored_session(&self) -> Option<Session>;

    /// Exchange the refresh token for a new id token and store the result.
    async fn refresh(&self, session: &Session) -> Result<Session, ApiError>;

    /// Epoch milliseconds used to judge token expiry
    fn now_ms(&self) -> f64;

    /// The live session, renewed first when its id token is about to expire.
    ///
    /// `None` once signed out (here or in another tab) or when renewal fails.
    async fn current_session(&self) -> Option<Session> {
        let session = self.stored_session()?;
        if !session.needs_refresh(self.now_ms()) {
            return Some(session);
        }
        match self.refresh(&session).await {
            Ok(renewed) => Some(renewed),
            Err(e) => {
                log::warn!("Could not renew session for {}: {}", session.uid, e);
                None
            }
        }
    }
}

/// Everything the running widget needs, built once the configuration is known.
pub struct Services {
    pub settings: ClientSettings,
    pub answers: HttpAnswerService,
    /// `None` in guest mode or when the host served no usable configuration
    pub identity: Option<FirebaseAuth>,
    pub store: Option<FirestoreStore>,
    pub typewriter: Typewriter,
    pub pause: TimerPause,
}

impl Services {
    pub fn new(settings: ClientSettings, config: Option<FirebaseConfig>) -> Self {
        let config = config.filter(FirebaseConfig::is_usable);
        let identity = config
            .clone()
            .map(|cfg| FirebaseAuth::new(cfg, settings.request_timeout_ms));
        let store = config.map(|cfg| FirestoreStore::new(cfg, settings.request_timeout_ms));

        Self {
            answers: HttpAnswerService::new(&settings),
            identity,
            store,
            typewriter: Typewriter::new(settings.typewriter_delay_ms),
            pause: TimerPause,
            settings,
        }
    }

    pub fn guest(settings: ClientSettings) -> Self {
        Self::new(settings, None)
    }
}
