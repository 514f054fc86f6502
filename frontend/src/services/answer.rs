use chat_shared::{ApiError, ChatReply, ChatRequest, ClientSettings};
use gloo_net::http::Request;
use serde_json::Value;

use super::{http, AnswerService};
use crate::utils;

/// `POST /chat` on the page origin
pub struct HttpAnswerService {
    url: String,
    timeout_ms: u32,
}

impl HttpAnswerService {
    pub fn new(settings: &ClientSettings) -> Self {
        Self {
            url: utils::api_url(&settings.chat_path),
            timeout_ms: settings.answer_timeout_ms,
        }
    }
}

impl AnswerService for HttpAnswerService {
    async fn ask(&self, question: &str) -> Result<ChatReply, ApiError> {
        let body = serde_json::to_string(&ChatRequest::new(question))?;
        let request = Request::post(&self.url).header("Content-Type", "application/json");
        let reply = http::send(request, Some(body), self.timeout_ms).await?;
        // The status is not inspected: error replies carry their own `error` field.
        let value: Value = reply.json()?;
        Ok(ChatReply::from_body(&value))
    }
}
