pub mod http;

pub use http::CloudSpeechGateway;

use crate::audio::AudioClip;

/// A classified transcription failure.
///
/// Backend-specific errors are folded into this three-way taxonomy at the
/// gateway boundary; no backend error type crosses into the session layer.
#[derive(Debug, thiserror::Error)]
pub enum TranscribeError {
    #[error("sorry, could not understand the audio")]
    Unintelligible,

    #[error("speech recognition service is unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("transcription failed: {0}")]
    Other(String),
}

/// The external speech-recognition backend, seen as a single opaque call.
///
/// One backend call per invocation; no retry, no caching.
#[async_trait::async_trait]
pub trait SpeechBackend: Send + Sync {
    async fn recognize(&self, clip: &AudioClip) -> Result<String, TranscribeError>;

    /// Backend name for logging.
    fn name(&self) -> &str;
}
