//! In-memory collaborators for tests

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use chat_shared::{ApiError, AuthFailure, ChatReply, ChatTurn, Credentials, Session};

use super::{AnswerService, IdentityProvider, TurnStore};
use crate::chat::transcript::{ChatEvent, Transcript};
use crate::chat::typewriter::Pause;

pub struct NoPause;

impl Pause for NoPause {
    async fn pause(&self, _ms: u32) {}
}

/// Records emitted events in order
#[derive(Default)]
pub struct EventLog(RefCell<Vec<ChatEvent>>);

impl EventLog {
    pub fn emitter(&self) -> impl Fn(ChatEvent) + '_ {
        move |event| self.0.borrow_mut().push(event)
    }

    pub fn events(&self) -> Vec<ChatEvent> {
        self.0.borrow().clone()
    }

    pub fn replay_into(&self, transcript: &mut Transcript) {
        for event in self.events() {
            transcript.apply(event);
        }
    }

    pub fn transcript(&self) -> Transcript {
        let mut transcript = Transcript::new();
        self.replay_into(&mut transcript);
        transcript
    }
}

/// Answer endpoint returning canned replies
#[derive(Default)]
pub struct ScriptedAnswers {
    replies: RefCell<VecDeque<Result<ChatReply, ApiError>>>,
    pub questions: RefCell<Vec<String>>,
}

impl ScriptedAnswers {
    pub fn replying(reply: Result<ChatReply, ApiError>) -> Self {
        let answers = Self::default();
        answers.replies.borrow_mut().push_back(reply);
        answers
    }
}

impl AnswerService for ScriptedAnswers {
    async fn ask(&self, question: &str) -> Result<ChatReply, ApiError> {
        self.questions.borrow_mut().push(question.to_string());
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network("no scripted reply".into())))
    }
}

/// Turn store keeping everything in a vector
#[derive(Default)]
pub struct MemoryStore {
    pub turns: RefCell<Vec<(String, ChatTurn)>>,
    /// id token presented with each write
    pub tokens: RefCell<Vec<String>>,
    pub fail: Cell<bool>,
    pub queried_limit: Cell<Option<usize>>,
}

impl MemoryStore {
    pub fn with_turns(uid: &str, turns: Vec<ChatTurn>) -> Self {
        let store = Self::default();
        store
            .turns
            .borrow_mut()
            .extend(turns.into_iter().map(|t| (uid.to_string(), t)));
        store
    }

    pub fn failing() -> Self {
        let store = Self::default();
        store.fail.set(true);
        store
    }

    pub fn saved(&self) -> Vec<ChatTurn> {
        self.turns.borrow().iter().map(|(_, t)| t.clone()).collect()
    }
}

impl TurnStore for MemoryStore {
    async fn append(&self, session: &Session, turn: &ChatTurn) -> Result<(), ApiError> {
        if self.fail.get() {
            return Err(ApiError::Server {
                status: 403,
                message: "permission denied".into(),
            });
        }
        self.tokens.borrow_mut().push(session.id_token.clone());
        self.turns
            .borrow_mut()
            .push((session.uid.clone(), turn.clone()));
        Ok(())
    }

    async fn recent(&self, session: &Session, limit: usize) -> Result<Vec<ChatTurn>, ApiError> {
        self.queried_limit.set(Some(limit));
        if self.fail.get() {
            return Err(ApiError::Network("offline".into()));
        }
        Ok(self
            .turns
            .borrow()
            .iter()
            .filter(|(uid, _)| *uid == session.uid)
            .map(|(_, t)| t.clone())
            .take(limit)
            .collect())
    }
}

/// Identity provider with a fixed outcome and an in-memory stored session
pub struct FixedIdentity {
    pub outcome: Result<Session, AuthFailure>,
    pub calls: RefCell<Vec<(&'static str, Credentials)>>,
    pub signed_out: Cell<bool>,
    pub stored: RefCell<Option<Session>>,
    pub now_ms: Cell<f64>,
    pub refreshes: Cell<u32>,
    pub refresh_fails: Cell<bool>,
}

impl FixedIdentity {
    pub fn new(outcome: Result<Session, AuthFailure>) -> Self {
        Self {
            outcome,
            calls: RefCell::new(Vec::new()),
            signed_out: Cell::new(false),
            stored: RefCell::new(None),
            now_ms: Cell::new(0.0),
            refreshes: Cell::new(0),
            refresh_fails: Cell::new(false),
        }
    }

    /// Already signed in as `session`
    pub fn signed_in(session: Session) -> Self {
        let identity = Self::new(Ok(session.clone()));
        identity.stored.replace(Some(session));
        identity
    }

    fn remember(&self, outcome: &Result<Session, AuthFailure>) {
        if let Ok(session) = outcome {
            self.stored.replace(Some(session.clone()));
        }
    }
}

impl IdentityProvider for FixedIdentity {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthFailure> {
        self.calls
            .borrow_mut()
            .push(("sign_in", credentials.clone()));
        self.remember(&self.outcome);
        self.outcome.clone()
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<Session, AuthFailure> {
        self.calls
            .borrow_mut()
            .push(("sign_up", credentials.clone()));
        self.remember(&self.outcome);
        self.outcome.clone()
    }

    async fn sign_out(&self) {
        self.signed_out.set(true);
        self.stored.replace(None);
    }

    fn stored_session(&self) -> Option<Session> {
        self.stored.borrow().clone()
    }

    async fn refresh(&self, session: &Session) -> Result<Session, ApiError> {
        self.refreshes.set(self.refreshes.get() + 1);
        if self.refresh_fails.get() {
            return Err(ApiError::Auth("TOKEN_EXPIRED".into()));
        }
        let renewed = Session {
            id_token: format!("{}-renewed", session.id_token),
            expires_at_ms: self.now_ms.get() + 3_600_000.0,
            ..session.clone()
        };
        self.stored.replace(Some(renewed.clone()));
        Ok(renewed)
    }

    fn now_ms(&self) -> f64 {
        self.now_ms.get()
    }
}

/// Signed-in session whose id token has already expired
pub fn expired_session(uid: &str) -> Session {
    Session {
        expires_at_ms: 0.0,
        ..session(uid)
    }
}

pub fn session(uid: &str) -> Session {
    Session {
        uid: uid.to_string(),
        email: Some(format!("{}@example.com", uid)),
        id_token: "id-token".into(),
        refresh_token: "refresh-token".into(),
        expires_at_ms: f64::MAX,
    }
}
