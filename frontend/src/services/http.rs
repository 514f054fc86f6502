//! HTTP plumbing shared by the collaborators

use std::cell::Cell;
use std::rc::Rc;

use chat_shared::{ApiError, ClientSettings, FirebaseConfig};
use gloo::timers::callback::Timeout;
use gloo_net::http::{Request, RequestBuilder};
use serde::de::DeserializeOwned;
use web_sys::AbortController;

use crate::utils;

/// Status and raw body of a completed request
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON regardless of the status.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        Ok(serde_json::from_str(&self.body)?)
    }

    pub fn ensure_success(self) -> Result<Self, ApiError> {
        match self.status {
            _ if self.is_success() => Ok(self),
            401 | 403 => Err(ApiError::Auth(truncate(&self.body))),
            status => Err(ApiError::Server {
                status,
                message: truncate(&self.body),
            }),
        }
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(200).collect()
}

/// Aborts the request it is attached to once the timer fires.
struct Deadline {
    controller: AbortController,
    fired: Rc<Cell<bool>>,
    _timer: Timeout,
}

impl Deadline {
    fn after(ms: u32) -> Result<Self, ApiError> {
        let controller = AbortController::new()
            .map_err(|_| ApiError::Network("AbortController unavailable".to_string()))?;
        let fired = Rc::new(Cell::new(false));
        let timer = {
            let controller = controller.clone();
            let fired = fired.clone();
            Timeout::new(ms, move || {
                fired.set(true);
                controller.abort();
            })
        };
        Ok(Self {
            controller,
            fired,
            _timer: timer,
        })
    }
}

/// Send a request and read its body, giving up after `timeout_ms`.
///
/// Timeouts and transport failures both surface as [`ApiError::Network`].
pub async fn send(
    builder: RequestBuilder,
    body: Option<String>,
    timeout_ms: u32,
) -> Result<Reply, ApiError> {
    let deadline = Deadline::after(timeout_ms)?;
    let signal = deadline.controller.signal();
    let builder = builder.abort_signal(Some(&signal));
    let request = match body {
        Some(body) => builder.body(body),
        None => builder.build(),
    }
    .map_err(|e| ApiError::Network(e.to_string()))?;

    let network_error = |e: gloo_net::Error| {
        if deadline.fired.get() {
            ApiError::Network(format!("timed out after {} ms", timeout_ms))
        } else {
            ApiError::Network(e.to_string())
        }
    };

    let response = request.send().await.map_err(network_error)?;
    let status = response.status();
    let body = response.text().await.map_err(network_error)?;
    Ok(Reply { status, body })
}

/// Fetch the project settings from the host page.
///
/// Returns `None` (and logs) when the endpoint is unreachable or the settings
/// are incomplete; the widget then runs without sign-in.
pub async fn fetch_config(settings: &ClientSettings) -> Option<FirebaseConfig> {
    let url = utils::api_url(&settings.config_path);
    let result = match send(Request::get(&url), None, settings.request_timeout_ms).await {
        Ok(reply) => reply.json::<FirebaseConfig>(),
        Err(e) => Err(e),
    };

    match result {
        Ok(config) if config.is_usable() => Some(config),
        Ok(_) => {
            log::error!("Firebase config missing. Set FIREBASE_* env vars on the server.");
            None
        }
        Err(e) => {
            log::error!("Failed to load Firebase config: {}", e);
            None
        }
    }
}
