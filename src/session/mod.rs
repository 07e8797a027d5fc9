//! Session lifecycle management
//!
//! This module provides the `Session` abstraction that owns:
//! - The recording/transcription state machine (idle through done/error)
//! - The background capture task and its join discipline
//! - The captured audio clip and last-error message
//! - Status-change notifications for the presentation layer

mod session;
mod status;

pub use session::{
    FileTranscribeError, RetakeOutcome, Session, StartOutcome, StopOutcome, TranscribeOutcome,
};
pub use status::{SessionStatus, StatusEvent};
