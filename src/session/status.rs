use chrono::{DateTime, Utc};
use serde::Serialize;

/// Lifecycle state of the single recording/transcription session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Idle,
    Recording,
    Captured,
    Transcribing,
    Done,
    Error,
}

impl SessionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Recording => "recording",
            SessionStatus::Captured => "captured",
            SessionStatus::Transcribing => "transcribing",
            SessionStatus::Done => "done",
            SessionStatus::Error => "error",
        }
    }
}

/// Notification emitted on every status transition and advisory.
///
/// The presentation layer subscribes to these instead of polling the session;
/// `message` is the user-visible text for the output panel.
#[derive(Debug, Clone, Serialize)]
pub struct StatusEvent {
    pub status: SessionStatus,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl StatusEvent {
    pub fn new(status: SessionStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}
