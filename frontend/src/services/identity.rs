//! Email/password identity over the provider's REST API
//!
//! The session is kept in localStorage so a reload (or another tab) sees the
//! same sign-in state.

use chat_shared::auth::{PasswordAuthRequest, RefreshResponse, RestErrorEnvelope, SignInResponse};
use chat_shared::{ApiError, AuthFailure, Credentials, FirebaseConfig, Session};
use gloo_net::http::Request;

use super::{http, IdentityProvider};
use crate::utils;

/// localStorage key holding the serialized [`Session`]
pub const SESSION_STORAGE_KEY: &str = "chat-widget.session";

fn storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

/// Load the stored session, if any
pub fn load_session() -> Option<Session> {
    storage()
        .and_then(|storage| storage.get_item(SESSION_STORAGE_KEY).ok().flatten())
        .and_then(|json| parse_session(&json))
}

pub fn parse_session(json: &str) -> Option<Session> {
    serde_json::from_str(json).ok()
}

fn save_session(session: &Session) {
    if let Some(storage) = storage() {
        if let Ok(json) = serde_json::to_string(session) {
            let _ = storage.set_item(SESSION_STORAGE_KEY, &json);
        }
    }
}

fn forget_session() {
    if let Some(storage) = storage() {
        let _ = storage.remove_item(SESSION_STORAGE_KEY);
    }
}

pub struct FirebaseAuth {
    config: FirebaseConfig,
    timeout_ms: u32,
}

impl FirebaseAuth {
    pub fn new(config: FirebaseConfig, timeout_ms: u32) -> Self {
        Self { config, timeout_ms }
    }

    async fn password_call(
        &self,
        method: &str,
        credentials: &Credentials,
    ) -> Result<Session, AuthFailure> {
        let body = serde_json::to_string(&PasswordAuthRequest::from(credentials))
            .map_err(|_| AuthFailure { code: None })?;
        let request = Request::post(&self.config.identity_url(method))
            .header("Content-Type", "application/json");

        let reply = http::send(request, Some(body), self.timeout_ms)
            .await
            .map_err(|e| {
                log::warn!("Identity request {} failed: {}", method, e);
                AuthFailure::network()
            })?;

        if !reply.is_success() {
            return Err(reply
                .json::<RestErrorEnvelope>()
                .map(AuthFailure::from)
                .unwrap_or(AuthFailure { code: None }));
        }

        let resp: SignInResponse = reply.json().map_err(|e| {
            log::warn!("Unreadable identity response: {}", e);
            AuthFailure { code: None }
        })?;
        let session = Session::from_sign_in(resp, utils::now_ms());
        save_session(&session);
        Ok(session)
    }

    /// The stored session, refreshed first when its token is about to expire.
    ///
    /// A session that cannot be refreshed is discarded.
    pub async fn restore(&self) -> Option<Session> {
        let restored = self.current_session().await;
        if restored.is_none() {
            forget_session();
        }
        restored
    }
}

impl IdentityProvider for FirebaseAuth {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthFailure> {
        self.password_call("accounts:signInWithPassword", credentials)
            .await
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<Session, AuthFailure> {
        self.password_call("accounts:signUp", credentials).await
    }

    async fn sign_out(&self) {
        forget_session();
    }

    fn stored_session(&self) -> Option<Session> {
        load_session()
    }

    async fn refresh(&self, session: &Session) -> Result<Session, ApiError> {
        let token: String = js_sys::encode_uri_component(&session.refresh_token).into();
        let body = format!("grant_type=refresh_token&refresh_token={}", token);
        let request = Request::post(&self.config.token_url())
            .header("Content-Type", "application/x-www-form-urlencoded");
        let reply = http::send(request, Some(body), self.timeout_ms)
            .await?
            .ensure_success()?;
        let resp: RefreshResponse = reply.json()?;
        let renewed = session.refreshed(resp, utils::now_ms());
        save_session(&renewed);
        Ok(renewed)
    }

    fn now_ms(&self) -> f64 {
        utils::now_ms()
    }
}
