use chat_shared::firestore::{self, RunQueryRow};
use chat_shared::{ApiError, ChatTurn, FirebaseConfig, Session};
use gloo_net::http::{Request, RequestBuilder};

use super::{http, TurnStore};

/// Chat turns stored in the project's document database
pub struct FirestoreStore {
    config: FirebaseConfig,
    timeout_ms: u32,
}

impl FirestoreStore {
    pub fn new(config: FirebaseConfig, timeout_ms: u32) -> Self {
        Self { config, timeout_ms }
    }

    fn post(&self, url: &str, session: &Session) -> RequestBuilder {
        Request::post(url)
            .header("Content-Type", "application/json")
            .header("Authorization", &format!("Bearer {}", session.id_token))
    }
}

impl TurnStore for FirestoreStore {
    async fn append(&self, session: &Session, turn: &ChatTurn) -> Result<(), ApiError> {
        let doc_id = uuid::Uuid::new_v4().simple().to_string();
        let body = firestore::commit_body(
            &self.config.documents_root(),
            &session.uid,
            &doc_id,
            turn,
        );
        let url = self.config.documents_url(":commit");
        http::send(self.post(&url, session), Some(body.to_string()), self.timeout_ms)
            .await?
            .ensure_success()?;
        Ok(())
    }

    async fn recent(&self, session: &Session, limit: usize) -> Result<Vec<ChatTurn>, ApiError> {
        let url = self.config.documents_url(&format!(
            "{}:runQuery",
            firestore::user_document_path(&session.uid)
        ));
        let body = firestore::history_query(limit);
        let reply = http::send(self.post(&url, session), Some(body.to_string()), self.timeout_ms)
            .await?
            .ensure_success()?;
        let rows: Vec<RunQueryRow> = reply.json()?;
        Ok(firestore::turns_from_rows(&rows))
    }
}
