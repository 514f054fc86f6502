//! Sign-in / sign-up form handling

use chat_shared::{messages, Credentials, Session};

use crate::services::IdentityProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    SignIn,
    SignUp,
}

impl AuthAction {
    pub fn idle_label(self) -> &'static str {
        match self {
            AuthAction::SignIn => messages::SIGN_IN_LABEL,
            AuthAction::SignUp => messages::SIGN_UP_LABEL,
        }
    }

    pub fn busy_label(self) -> &'static str {
        match self {
            AuthAction::SignIn => messages::SIGN_IN_BUSY_LABEL,
            AuthAction::SignUp => messages::SIGN_UP_BUSY_LABEL,
        }
    }

    fn not_configured(self) -> &'static str {
        match self {
            AuthAction::SignIn => messages::SIGN_IN_NOT_CONFIGURED,
            AuthAction::SignUp => messages::SIGN_UP_NOT_CONFIGURED,
        }
    }
}

/// Changes to the auth form emitted while a request runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// Show (or hide, with `None`) the error line
    Error(Option<String>),
    /// Disable both buttons and relabel the active one
    Busy(AuthAction),
    /// Re-enable both buttons with their normal labels
    Idle,
}

/// State of the auth screen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthForm {
    pub email: String,
    pub password: String,
    pub busy: Option<AuthAction>,
    pub error: Option<String>,
}

impl AuthForm {
    pub fn apply(&mut self, event: AuthEvent) {
        match event {
            AuthEvent::Error(error) => self.error = error.filter(|e| !e.is_empty()),
            AuthEvent::Busy(action) => self.busy = Some(action),
            AuthEvent::Idle => self.busy = None,
        }
    }

    pub fn controls_disabled(&self) -> bool {
        self.busy.is_some()
    }

    pub fn label(&self, action: AuthAction) -> &'static str {
        if self.busy == Some(action) {
            action.busy_label()
        } else {
            action.idle_label()
        }
    }
}

/// Validate the form and run `action` against the provider.
///
/// Invalid input is rejected locally without calling the provider. Provider
/// failures are shown through the error-code table. The buttons are always
/// restored once the provider answers.
pub async fn authenticate<I, E>(
    identity: Option<&I>,
    action: AuthAction,
    email: &str,
    password: &str,
    emit: &E,
) -> Option<Session>
where
    I: IdentityProvider,
    E: Fn(AuthEvent),
{
    let Some(identity) = identity else {
        emit(AuthEvent::Error(Some(action.not_configured().to_string())));
        return None;
    };

    emit(AuthEvent::Error(None));
    let credentials = match Credentials::validate(email, password) {
        Ok(credentials) => credentials,
        Err(e) => {
            emit(AuthEvent::Error(Some(e.message())));
            return None;
        }
    };

    emit(AuthEvent::Busy(action));
    let result = match action {
        AuthAction::SignIn => identity.sign_in(&credentials).await,
        AuthAction::SignUp => identity.sign_up(&credentials).await,
    };
    emit(AuthEvent::Idle);

    match result {
        Ok(session) => {
            log::info!("Signed in as {}", session.label());
            emit(AuthEvent::Error(None));
            Some(session)
        }
        Err(failure) => {
            log::warn!("{:?} failed: {}", action, failure);
            emit(AuthEvent::Error(Some(failure.message())));
            None
        }
    }
}
