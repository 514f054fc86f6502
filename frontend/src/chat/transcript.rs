//! Transcript model
//!
//! The visible conversation is a list of entries plus the composer state
//! (draft text, busy flag). Everything that changes it arrives as a
//! [`ChatEvent`], so the async flows never touch the DOM directly.

use uuid::Uuid;

pub type EntryId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Bot,
}

/// One rendered message
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptEntry {
    pub id: EntryId,
    pub speaker: Speaker,
    pub text: String,
    /// Display timestamp (local `HH:MM:SS`)
    pub stamp: String,
    /// Pending bot placeholder still waiting for its answer
    pub loading: bool,
}

/// Changes emitted by the chat flows
#[derive(Debug, Clone, PartialEq)]
pub enum ChatEvent {
    AppendUser { text: String, stamp: String },
    AppendBot { text: String, stamp: String },
    AppendPending { id: EntryId, stamp: String },
    /// Drop the loading state of a placeholder
    Settle { id: EntryId },
    /// Replace an entry's text
    SetText { id: EntryId, text: String },
    /// Append one revealed character
    PushChar { id: EntryId, ch: char },
    /// Disable (or re-enable) the input field and the send button
    Busy(bool),
    ClearInput,
    Clear,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
    pub draft: String,
    pub busy: bool,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: EntryId) -> Option<&TranscriptEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Apply one event. Events addressed to an unknown entry are ignored, which
    /// happens when the transcript was cleared while a reply was in flight.
    pub fn apply(&mut self, event: ChatEvent) {
        match event {
            ChatEvent::AppendUser { text, stamp } => self.push(Speaker::User, text, stamp),
            ChatEvent::AppendBot { text, stamp } => self.push(Speaker::Bot, text, stamp),
            ChatEvent::AppendPending { id, stamp } => self.entries.push(TranscriptEntry {
                id,
                speaker: Speaker::Bot,
                text: String::new(),
                stamp,
                loading: true,
            }),
            ChatEvent::Settle { id } => {
                if let Some(entry) = self.get_mut(id) {
                    entry.loading = false;
                }
            }
            ChatEvent::SetText { id, text } => {
                if let Some(entry) = self.get_mut(id) {
                    entry.text = text;
                }
            }
            ChatEvent::PushChar { id, ch } => {
                if let Some(entry) = self.get_mut(id) {
                    entry.text.push(ch);
                }
            }
            ChatEvent::Busy(busy) => self.busy = busy,
            ChatEvent::ClearInput => self.draft.clear(),
            ChatEvent::Clear => self.entries.clear(),
        }
    }

    fn push(&mut self, speaker: Speaker, text: String, stamp: String) {
        self.entries.push(TranscriptEntry {
            id: Uuid::new_v4(),
            speaker,
            text,
            stamp,
            loading: false,
        });
    }

    fn get_mut(&mut self, id: EntryId) -> Option<&mut TranscriptEntry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }
}
