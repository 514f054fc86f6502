//! Conversation flows
//!
//! - `transcript.rs` - the rendered message list and composer state
//! - `typewriter.rs` - per-character reveal of bot answers
//! - `pipeline.rs` - question submission
//! - `history.rs` - replay of stored turns on session start
//! - `persistence.rs` - best-effort storage of completed turns

pub mod history;
pub mod persistence;
pub mod pipeline;
pub mod transcript;
pub mod typewriter;

pub use history::load_history;
pub use persistence::PersistenceSink;
pub use pipeline::Pipeline;
pub use transcript::{ChatEvent, EntryId, Speaker, Transcript, TranscriptEntry};
pub use typewriter::{Pause, TimerPause, Typewriter};
