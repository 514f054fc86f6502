//! Question submission: render, ask, reveal, persist

use chat_shared::{messages, ChatTurn};

use super::persistence::PersistenceSink;
use super::transcript::ChatEvent;
use super::typewriter::{Pause, Typewriter};
use crate::services::{AnswerService, IdentityProvider, TurnStore};
use crate::utils;

/// Collaborators used by one submission
pub struct Pipeline<'a, A, S, I, P> {
    pub answers: &'a A,
    pub sink: PersistenceSink<'a, S, I>,
    pub typewriter: &'a Typewriter,
    pub pause: &'a P,
}

impl<A, S, I, P> Pipeline<'_, A, S, I, P>
where
    A: AnswerService,
    S: TurnStore,
    I: IdentityProvider,
    P: Pause,
{
    /// Submit one question.
    ///
    /// Blank questions are ignored and return `None`. Otherwise the user entry
    /// is shown right away, the composer is locked, and a placeholder waits for
    /// the answer endpoint. The resulting turn is persisted for whoever is
    /// signed in once it completes, and returned; the composer is unlocked
    /// again whatever the outcome.
    pub async fn submit<E>(&self, raw: &str, emit: &E) -> Option<ChatTurn>
    where
        E: Fn(ChatEvent),
    {
        let question = raw.trim();
        if question.is_empty() {
            return None;
        }

        emit(ChatEvent::AppendUser {
            text: question.to_string(),
            stamp: utils::now_label(),
        });
        emit(ChatEvent::ClearInput);
        emit(ChatEvent::Busy(true));

        let pending = uuid::Uuid::new_v4();
        emit(ChatEvent::AppendPending {
            id: pending,
            stamp: utils::now_label(),
        });

        let turn = match self.answers.ask(question).await {
            Ok(reply) => {
                emit(ChatEvent::Settle { id: pending });
                self.typewriter
                    .reveal(self.pause, pending, &reply.display_text(), emit)
                    .await;
                ChatTurn::new(
                    question,
                    reply.answer.unwrap_or_default(),
                    reply.error.unwrap_or_default(),
                )
            }
            Err(e) => {
                log::warn!("Answer request failed: {}", e);
                emit(ChatEvent::Settle { id: pending });
                emit(ChatEvent::SetText {
                    id: pending,
                    text: messages::REQUEST_ERROR.to_string(),
                });
                ChatTurn::new(question, "", messages::REQUEST_ERROR)
            }
        };

        self.sink.record(&turn).await;
        emit(ChatEvent::Busy(false));
        Some(turn)
    }
}
