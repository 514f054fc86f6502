//! Which screen is shown, and what a session change implies

use chat_shared::{messages, Session};

use crate::services::{parse_session, SESSION_STORAGE_KEY};

#[derive(Debug, Clone, PartialEq)]
pub enum AuthPhase {
    Unauthenticated,
    Authenticated(Session),
    /// `?guest=1`: chat without identity, history or persistence
    Guest,
}

/// Session transition reported by the identity side
#[derive(Debug, Clone, PartialEq)]
pub enum SessionChange {
    SignedIn(Session),
    SignedOut,
}

impl SessionChange {
    /// Interpret a `storage` event raised by another tab.
    ///
    /// `key` is `None` when that tab cleared the whole storage area. Changes
    /// to unrelated keys yield `None`; a removed or unreadable session counts
    /// as a sign-out.
    pub fn from_storage(key: Option<&str>, new_value: Option<&str>) -> Option<Self> {
        if key.is_some_and(|key| key != SESSION_STORAGE_KEY) {
            return None;
        }
        Some(
            new_value
                .and_then(parse_session)
                .map_or(SessionChange::SignedOut, SessionChange::SignedIn),
        )
    }
}

/// Follow-up work a transition requires
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEffect {
    ClearTranscript,
    LoadHistory(Session),
}

impl AuthPhase {
    pub fn apply(&mut self, change: SessionChange) -> Vec<SessionEffect> {
        if self.is_guest() {
            return Vec::new();
        }
        match change {
            SessionChange::SignedIn(session) => {
                // Token refresh or a repeated notification for the same user
                let same_user = self.session().is_some_and(|current| current.uid == session.uid);
                *self = AuthPhase::Authenticated(session.clone());
                if same_user {
                    Vec::new()
                } else {
                    vec![
                        SessionEffect::ClearTranscript,
                        SessionEffect::LoadHistory(session),
                    ]
                }
            }
            SessionChange::SignedOut => {
                let was_signed_in = self.session().is_some();
                *self = AuthPhase::Unauthenticated;
                if was_signed_in {
                    vec![SessionEffect::ClearTranscript]
                } else {
                    Vec::new()
                }
            }
        }
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthPhase::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    pub fn shows_chat(&self) -> bool {
        !matches!(self, AuthPhase::Unauthenticated)
    }

    pub fn is_guest(&self) -> bool {
        matches!(self, AuthPhase::Guest)
    }

    pub fn user_label(&self) -> String {
        match self {
            AuthPhase::Unauthenticated => String::new(),
            AuthPhase::Authenticated(session) => session.label().to_string(),
            AuthPhase::Guest => messages::GUEST_LABEL.to_string(),
        }
    }
}
