//! Identity provider types
//!
//! Covers local credential validation, the session handle returned by the
//! provider, and the mapping from provider error codes to user-facing text.

use serde::{Deserialize, Serialize};

use crate::{messages, MIN_PASSWORD_LENGTH};

/// Provider error codes with a dedicated localized message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorCode {
    InvalidEmail,
    UserDisabled,
    UserNotFound,
    WrongPassword,
    InvalidCredential,
    EmailAlreadyInUse,
    WeakPassword,
    OperationNotAllowed,
    TooManyRequests,
    NetworkRequestFailed,
}

impl AuthErrorCode {
    pub const ALL: [AuthErrorCode; 10] = [
        AuthErrorCode::InvalidEmail,
        AuthErrorCode::UserDisabled,
        AuthErrorCode::UserNotFound,
        AuthErrorCode::WrongPassword,
        AuthErrorCode::InvalidCredential,
        AuthErrorCode::EmailAlreadyInUse,
        AuthErrorCode::WeakPassword,
        AuthErrorCode::OperationNotAllowed,
        AuthErrorCode::TooManyRequests,
        AuthErrorCode::NetworkRequestFailed,
    ];

    pub fn as_code(self) -> &'static str {
        match self {
            AuthErrorCode::InvalidEmail => "auth/invalid-email",
            AuthErrorCode::UserDisabled => "auth/user-disabled",
            AuthErrorCode::UserNotFound => "auth/user-not-found",
            AuthErrorCode::WrongPassword => "auth/wrong-password",
            AuthErrorCode::InvalidCredential => "auth/invalid-credential",
            AuthErrorCode::EmailAlreadyInUse => "auth/email-already-in-use",
            AuthErrorCode::WeakPassword => "auth/weak-password",
            AuthErrorCode::OperationNotAllowed => "auth/operation-not-allowed",
            AuthErrorCode::TooManyRequests => "auth/too-many-requests",
            AuthErrorCode::NetworkRequestFailed => "auth/network-request-failed",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_code() == code)
    }

    pub fn message(self) -> String {
        match self {
            AuthErrorCode::InvalidEmail => "请输入有效的邮箱地址".to_string(),
            AuthErrorCode::UserDisabled => "该账号已被禁用".to_string(),
            AuthErrorCode::UserNotFound => "未找到该邮箱对应的账号，请先注册".to_string(),
            AuthErrorCode::WrongPassword => "密码错误".to_string(),
            AuthErrorCode::InvalidCredential => "邮箱或密码错误".to_string(),
            AuthErrorCode::EmailAlreadyInUse => "该邮箱已被注册，请直接登录".to_string(),
            AuthErrorCode::WeakPassword => format!("密码至少需要 {} 位", MIN_PASSWORD_LENGTH),
            AuthErrorCode::OperationNotAllowed => "当前未开放注册/登录，请联系管理员".to_string(),
            AuthErrorCode::TooManyRequests => "尝试次数过多，请稍后再试".to_string(),
            AuthErrorCode::NetworkRequestFailed => "网络错误，请检查网络后重试".to_string(),
        }
    }
}

/// Convert a REST error message (e.g. `"WEAK_PASSWORD : Password should be..."`)
/// into an `auth/...` code.
///
/// Unknown REST codes keep their name, lower-cased and dash-separated, so they
/// still render through the generic fallback.
pub fn code_from_rest_message(message: &str) -> String {
    let name = message.split(" : ").next().unwrap_or(message).trim();
    let known = match name {
        "INVALID_EMAIL" => Some(AuthErrorCode::InvalidEmail),
        "USER_DISABLED" => Some(AuthErrorCode::UserDisabled),
        "EMAIL_NOT_FOUND" => Some(AuthErrorCode::UserNotFound),
        "INVALID_PASSWORD" => Some(AuthErrorCode::WrongPassword),
        "INVALID_LOGIN_CREDENTIALS" => Some(AuthErrorCode::InvalidCredential),
        "EMAIL_EXISTS" => Some(AuthErrorCode::EmailAlreadyInUse),
        "WEAK_PASSWORD" => Some(AuthErrorCode::WeakPassword),
        "OPERATION_NOT_ALLOWED" | "PASSWORD_LOGIN_DISABLED" => {
            Some(AuthErrorCode::OperationNotAllowed)
        }
        "TOO_MANY_ATTEMPTS_TRY_LATER" => Some(AuthErrorCode::TooManyRequests),
        _ => None,
    };
    match known {
        Some(code) => code.as_code().to_string(),
        None if name.is_empty() => String::new(),
        None => format!("auth/{}", name.to_lowercase().replace('_', "-")),
    }
}

/// Message shown for a provider failure.
///
/// `None` or an empty code yields the generic fill-in prompt.
pub fn auth_error_message(code: Option<&str>) -> String {
    match code.filter(|c| !c.is_empty()) {
        None => messages::FILL_IN_CREDENTIALS.to_string(),
        Some(code) => match AuthErrorCode::from_code(code) {
            Some(known) => known.message(),
            None => format!("登录失败：{}", code),
        },
    }
}

/// Why credentials were rejected before reaching the provider
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    #[error("email and password are required")]
    Missing,
    #[error("password shorter than {} characters", MIN_PASSWORD_LENGTH)]
    PasswordTooShort,
}

impl CredentialError {
    pub fn message(&self) -> String {
        match self {
            CredentialError::Missing => messages::FILL_IN_CREDENTIALS.to_string(),
            CredentialError::PasswordTooShort => AuthErrorCode::WeakPassword.message(),
        }
    }
}

/// Trimmed, locally validated credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn validate(email: &str, password: &str) -> Result<Self, CredentialError> {
        let email = email.trim();
        let password = password.trim();
        if email.is_empty() || password.is_empty() {
            return Err(CredentialError::Missing);
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(CredentialError::PasswordTooShort);
        }
        Ok(Self {
            email: email.to_string(),
            password: password.to_string(),
        })
    }
}

/// Failure reported by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("identity provider rejected the request: {code:?}")]
pub struct AuthFailure {
    /// `auth/...` code, if the provider reported one
    pub code: Option<String>,
}

impl AuthFailure {
    pub fn with_code(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
        }
    }

    pub fn network() -> Self {
        Self::with_code(AuthErrorCode::NetworkRequestFailed.as_code())
    }

    pub fn message(&self) -> String {
        auth_error_message(self.code.as_deref())
    }
}

/// Signed-in identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub uid: String,
    #[serde(default)]
    pub email: Option<String>,
    pub id_token: String,
    pub refresh_token: String,
    /// Expiry of `id_token`, in milliseconds since the Unix epoch
    pub expires_at_ms: f64,
}

impl Session {
    /// Tokens are refreshed this long before they actually expire.
    pub const REFRESH_MARGIN_MS: f64 = 60_000.0;

    pub fn label(&self) -> &str {
        self.email
            .as_deref()
            .filter(|e| !e.is_empty())
            .unwrap_or(&self.uid)
    }

    pub fn needs_refresh(&self, now_ms: f64) -> bool {
        now_ms + Self::REFRESH_MARGIN_MS >= self.expires_at_ms
    }

    pub fn from_sign_in(resp: SignInResponse, now_ms: f64) -> Self {
        Self {
            uid: resp.local_id,
            email: resp.email,
            id_token: resp.id_token,
            refresh_token: resp.refresh_token,
            expires_at_ms: now_ms + parse_seconds(&resp.expires_in) * 1000.0,
        }
    }

    /// Apply a token refresh, keeping the identity fields.
    pub fn refreshed(&self, resp: RefreshResponse, now_ms: f64) -> Self {
        Self {
            uid: resp.user_id.unwrap_or_else(|| self.uid.clone()),
            email: self.email.clone(),
            id_token: resp.id_token,
            refresh_token: resp.refresh_token,
            expires_at_ms: now_ms + parse_seconds(&resp.expires_in) * 1000.0,
        }
    }
}

/// Token lifetimes arrive as decimal strings; the provider default is one hour.
fn parse_seconds(value: &str) -> f64 {
    value.trim().parse().unwrap_or(3600.0)
}

/// Body of `accounts:signInWithPassword` and `accounts:signUp`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordAuthRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub return_secure_token: bool,
}

impl<'a> From<&'a Credentials> for PasswordAuthRequest<'a> {
    fn from(creds: &'a Credentials) -> Self {
        Self {
            email: &creds.email,
            password: &creds.password,
            return_secure_token: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub local_id: String,
    #[serde(default)]
    pub email: Option<String>,
    pub id_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: String,
}

/// Response of the secure token endpoint (snake_case, unlike the rest)
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub id_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// `{"error": {"code": 400, "message": "EMAIL_EXISTS"}}`
#[derive(Debug, Clone, Deserialize)]
pub struct RestErrorEnvelope {
    pub error: RestErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RestErrorBody {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
}

impl From<RestErrorEnvelope> for AuthFailure {
    fn from(envelope: RestErrorEnvelope) -> Self {
        let code = code_from_rest_message(&envelope.error.message);
        AuthFailure {
            code: (!code.is_empty()).then_some(code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_known_code_maps_to_its_message() {
        let expected = [
            ("auth/invalid-email", "请输入有效的邮箱地址"),
            ("auth/user-disabled", "该账号已被禁用"),
            ("auth/user-not-found", "未找到该邮箱对应的账号，请先注册"),
            ("auth/wrong-password", "密码错误"),
            ("auth/invalid-credential", "邮箱或密码错误"),
            ("auth/email-already-in-use", "该邮箱已被注册，请直接登录"),
            ("auth/weak-password", "密码至少需要 6 位"),
            ("auth/operation-not-allowed", "当前未开放注册/登录，请联系管理员"),
            ("auth/too-many-requests", "尝试次数过多，请稍后再试"),
            ("auth/network-request-failed", "网络错误，请检查网络后重试"),
        ];
        for (code, message) in expected {
            assert_eq!(auth_error_message(Some(code)), message, "{}", code);
        }
    }

    #[test]
    fn unknown_and_missing_codes() {
        assert_eq!(
            auth_error_message(Some("auth/quota-exceeded")),
            "登录失败：auth/quota-exceeded"
        );
        assert_eq!(auth_error_message(None), "请填写邮箱和密码");
        assert_eq!(auth_error_message(Some("")), "请填写邮箱和密码");
    }

    #[test]
    fn validation_trims_and_checks_length() {
        let creds = Credentials::validate("  a@b.c ", " secret ").unwrap();
        assert_eq!(creds.email, "a@b.c");
        assert_eq!(creds.password, "secret");

        assert_eq!(Credentials::validate("", "secret"), Err(CredentialError::Missing));
        assert_eq!(Credentials::validate("a@b.c", "   "), Err(CredentialError::Missing));
        assert_eq!(
            Credentials::validate("a@b.c", "12345"),
            Err(CredentialError::PasswordTooShort)
        );
        assert_eq!(
            CredentialError::PasswordTooShort.message(),
            "密码至少需要 6 位"
        );
    }

    #[test]
    fn rest_messages_become_auth_codes() {
        assert_eq!(
            code_from_rest_message("WEAK_PASSWORD : Password should be at least 6 characters"),
            "auth/weak-password"
        );
        assert_eq!(
            code_from_rest_message("INVALID_LOGIN_CREDENTIALS"),
            "auth/invalid-credential"
        );
        assert_eq!(
            code_from_rest_message("MISSING_PASSWORD"),
            "auth/missing-password"
        );
        assert_eq!(code_from_rest_message(""), "");
    }

    #[test]
    fn rest_error_envelope_parses() {
        let json = r#"{"error":{"code":400,"message":"EMAIL_EXISTS","errors":[]}}"#;
        let envelope: RestErrorEnvelope = serde_json::from_str(json).unwrap();
        let failure = AuthFailure::from(envelope);
        assert_eq!(failure.message(), "该邮箱已被注册，请直接登录");
    }

    #[test]
    fn session_from_sign_in_and_refresh() {
        let json = r#"{
            "localId": "uid-1",
            "email": "a@b.c",
            "idToken": "tok",
            "refreshToken": "ref",
            "expiresIn": "3600"
        }"#;
        let resp: SignInResponse = serde_json::from_str(json).unwrap();
        let session = Session::from_sign_in(resp, 1_000.0);
        assert_eq!(session.label(), "a@b.c");
        assert_eq!(session.expires_at_ms, 3_601_000.0);
        assert!(!session.needs_refresh(1_000.0));
        assert!(session.needs_refresh(3_560_000.0));

        let refresh: RefreshResponse = serde_json::from_str(
            r#"{"id_token":"tok2","refresh_token":"ref2","expires_in":"60"}"#,
        )
        .unwrap();
        let renewed = session.refreshed(refresh, 10_000.0);
        assert_eq!(renewed.uid, "uid-1");
        assert_eq!(renewed.id_token, "tok2");
        assert_eq!(renewed.expires_at_ms, 70_000.0);
    }

    #[test]
    fn label_falls_back_to_uid() {
        let session = Session {
            uid: "uid-9".into(),
            email: Some(String::new()),
            id_token: String::new(),
            refresh_token: String::new(),
            expires_at_ms: 0.0,
        };
        assert_eq!(session.label(), "uid-9");
    }
}
