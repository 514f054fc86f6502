//! Replay of persisted turns when a session starts

use chat_shared::Session;

use super::transcript::ChatEvent;
use crate::services::TurnStore;
use crate::utils;

/// Clear the transcript and replay up to `limit` stored turns, oldest first.
///
/// Returns the number of turns replayed. A failed query leaves the transcript
/// empty; the failure is only logged.
pub async fn load_history<S, E>(store: &S, session: &Session, limit: usize, emit: &E) -> usize
where
    S: TurnStore,
    E: Fn(ChatEvent),
{
    emit(ChatEvent::Clear);

    let turns = match store.recent(session, limit).await {
        Ok(turns) => turns,
        Err(e) => {
            log::warn!("Failed to load chat history for {}: {}", session.uid, e);
            return 0;
        }
    };

    for turn in &turns {
        let stamp = turn
            .created_at
            .map(utils::clock_label)
            .unwrap_or_else(utils::now_label);
        if !turn.question.is_empty() {
            emit(ChatEvent::AppendUser {
                text: turn.question.clone(),
                stamp: stamp.clone(),
            });
        }
        if let Some(text) = turn.bot_text() {
            emit(ChatEvent::AppendBot {
                text: text.to_string(),
                stamp,
            });
        }
    }

    log::debug!("Replayed {} chat turns", turns.len());
    turns.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::transcript::Speaker;
    use crate::services::fakes::{session, EventLog, MemoryStore};
    use chat_shared::ChatTurn;
    use futures::executor::block_on;

    #[test]
    fn replays_questions_and_answers_in_order() {
        let store = MemoryStore::with_turns(
            "u1",
            vec![
                ChatTurn::new("Q1", "A1", ""),
                ChatTurn::new("Q2", "", "E2"),
                ChatTurn::new("", "orphan answer", ""),
                ChatTurn::new("Q4", "", ""),
            ],
        );
        let log = EventLog::default();
        let count = block_on(load_history(&store, &session("u1"), 100, &log.emitter()));
        assert_eq!(count, 4);
        assert_eq!(store.queried_limit.get(), Some(100));

        let transcript = log.transcript();
        let shown: Vec<_> = transcript
            .entries()
            .iter()
            .map(|e| (e.speaker, e.text.as_str()))
            .collect();
        assert_eq!(
            shown,
            vec![
                (Speaker::User, "Q1"),
                (Speaker::Bot, "A1"),
                (Speaker::User, "Q2"),
                (Speaker::Bot, "E2"),
                (Speaker::Bot, "orphan answer"),
                (Speaker::User, "Q4"),
            ]
        );
    }

    #[test]
    fn stored_timestamp_is_used_for_both_entries() {
        let mut turn = ChatTurn::new("Q", "A", "");
        turn.created_at = Some(chrono::Utc::now());
        let expected = utils::clock_label(turn.created_at.unwrap());
        let store = MemoryStore::with_turns("u1", vec![turn]);
        let log = EventLog::default();
        block_on(load_history(&store, &session("u1"), 100, &log.emitter()));

        let transcript = log.transcript();
        assert!(transcript.entries().iter().all(|e| e.stamp == expected));
    }

    #[test]
    fn clears_existing_entries_and_swallows_failures() {
        let store = MemoryStore::failing();
        let log = EventLog::default();
        let emit = log.emitter();
        emit(ChatEvent::AppendUser {
            text: "stale".into(),
            stamp: String::new(),
        });
        let count = block_on(load_history(&store, &session("u1"), 100, &emit));
        assert_eq!(count, 0);
        assert!(log.transcript().is_empty());
    }

    #[test]
    fn only_the_sessions_turns_are_replayed() {
        let store = MemoryStore::with_turns("someone-else", vec![ChatTurn::new("Q", "A", "")]);
        let log = EventLog::default();
        let count = block_on(load_history(&store, &session("u1"), 100, &log.emitter()));
        assert_eq!(count, 0);
        assert!(log.transcript().is_empty());
    }
}
