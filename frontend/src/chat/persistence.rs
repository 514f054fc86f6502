//! Best-effort storage of completed turns

use chat_shared::ChatTurn;

use crate::services::{IdentityProvider, TurnStore};

/// Writes turns for whoever is signed in when the turn completes.
///
/// A no-op without a store or identity provider (guest mode), or when nobody
/// is signed in at save time.
pub struct PersistenceSink<'a, S, I> {
    store: Option<&'a S>,
    identity: Option<&'a I>,
}

impl<'a, S: TurnStore, I: IdentityProvider> PersistenceSink<'a, S, I> {
    pub fn new(store: Option<&'a S>, identity: Option<&'a I>) -> Self {
        Self { store, identity }
    }

    /// Failures are logged and dropped so storage never blocks the chat.
    pub async fn record(&self, turn: &ChatTurn) {
        let (Some(store), Some(identity)) = (self.store, self.identity) else {
            return;
        };
        let Some(session) = identity.current_session().await else {
            log::debug!("No active session, chat turn not saved");
            return;
        };
        if let Err(e) = store.append(&session, turn).await {
            log::warn!("Failed to persist chat turn: {}", e);
        }
    }
}
