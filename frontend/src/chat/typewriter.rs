//! Character-by-character reveal of bot answers

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use super::transcript::{ChatEvent, EntryId};

/// Yields control to the host for a number of milliseconds.
#[allow(async_fn_in_trait)]
pub trait Pause {
    async fn pause(&self, ms: u32);
}

/// Browser timer backed pause
pub struct TimerPause;

impl Pause for TimerPause {
    async fn pause(&self, ms: u32) {
        gloo::timers::future::TimeoutFuture::new(ms).await;
    }
}

/// Cancellation flag for one running reveal
#[derive(Clone)]
pub struct RevealToken(Rc<Cell<bool>>);

impl RevealToken {
    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Reveals text into transcript entries with a fixed per-character delay.
///
/// At most one reveal runs per entry: starting another one for the same entry
/// cancels the previous reveal, which then stops emitting.
pub struct Typewriter {
    delay_ms: u32,
    active: RefCell<HashMap<EntryId, RevealToken>>,
}

impl Typewriter {
    pub fn new(delay_ms: u32) -> Self {
        Self {
            delay_ms,
            active: RefCell::new(HashMap::new()),
        }
    }

    /// Register a reveal for `id`, cancelling any reveal already running there.
    pub fn begin(&self, id: EntryId) -> RevealToken {
        let token = RevealToken(Rc::new(Cell::new(false)));
        if let Some(previous) = self.active.borrow_mut().insert(id, token.clone()) {
            previous.0.set(true);
        }
        token
    }

    fn finish(&self, id: EntryId, token: &RevealToken) {
        let mut active = self.active.borrow_mut();
        if active.get(&id).is_some_and(|t| Rc::ptr_eq(&t.0, &token.0)) {
            active.remove(&id);
        }
    }

    /// Clear the entry's text, then append `text` one character at a time.
    ///
    /// Returns `false` when a newer reveal for the same entry took over.
    pub async fn reveal<P, E>(&self, pause: &P, id: EntryId, text: &str, emit: &E) -> bool
    where
        P: Pause,
        E: Fn(ChatEvent),
    {
        let token = self.begin(id);
        emit(ChatEvent::SetText {
            id,
            text: String::new(),
        });

        for ch in text.chars() {
            if token.is_cancelled() {
                log::debug!("Reveal for {} superseded", id);
                return false;
            }
            emit(ChatEvent::PushChar { id, ch });
            pause.pause(self.delay_ms).await;
        }

        self.finish(id, &token);
        true
    }

    #[cfg(test)]
    pub fn running(&self) -> usize {
        self.active.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::transcript::Transcript;
    use crate::services::fakes::{EventLog, NoPause};
    use futures::executor::block_on;
    use uuid::Uuid;

    fn revealed(text: &str) -> String {
        let typewriter = Typewriter::new(8);
        let log = EventLog::default();
        let id = Uuid::new_v4();
        let mut transcript = Transcript::new();
        transcript.apply(ChatEvent::AppendPending {
            id,
            stamp: String::new(),
        });
        transcript.apply(ChatEvent::SetText {
            id,
            text: "stale".into(),
        });

        assert!(block_on(typewriter.reveal(&NoPause, id, text, &log.emitter())));
        log.replay_into(&mut transcript);
        assert_eq!(typewriter.running(), 0);
        transcript.get(id).unwrap().text.clone()
    }

    #[test]
    fn reveal_ends_with_exact_text() {
        for text in ["", "a", "你好，世界", "line one\nline two"] {
            assert_eq!(revealed(text), text);
        }
        let long = "x".repeat(2_000);
        assert_eq!(revealed(&long), long);
    }

    #[test]
    fn pauses_once_per_character() {
        struct Counting(Cell<u32>);
        impl Pause for Counting {
            async fn pause(&self, ms: u32) {
                assert_eq!(ms, 8);
                self.0.set(self.0.get() + 1);
            }
        }

        let typewriter = Typewriter::new(8);
        let pause = Counting(Cell::new(0));
        let log = EventLog::default();
        block_on(typewriter.reveal(&pause, Uuid::new_v4(), "abc", &log.emitter()));
        assert_eq!(pause.0.get(), 3);
    }

    #[test]
    fn newer_reveal_cancels_older_one() {
        let typewriter = Typewriter::new(8);
        let id = Uuid::new_v4();
        let first = typewriter.begin(id);
        let second = typewriter.begin(id);
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert!(!typewriter.begin(Uuid::new_v4()).is_cancelled());
    }

    #[test]
    fn superseded_reveal_stops_emitting() {
        struct Interrupt<'a> {
            typewriter: &'a Typewriter,
            id: EntryId,
        }
        impl Pause for Interrupt<'_> {
            async fn pause(&self, _ms: u32) {
                self.typewriter.begin(self.id);
            }
        }

        let typewriter = Typewriter::new(8);
        let id = Uuid::new_v4();
        let log = EventLog::default();
        let pause = Interrupt {
            typewriter: &typewriter,
            id,
        };
        let finished = block_on(typewriter.reveal(&pause, id, "abc", &log.emitter()));
        assert!(!finished);

        let pushed: Vec<_> = log
            .events()
            .into_iter()
            .filter(|e| matches!(e, ChatEvent::PushChar { .. }))
            .collect();
        assert_eq!(pushed, vec![ChatEvent::PushChar { id, ch: 'a' }]);
    }
}
