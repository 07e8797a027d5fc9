use std::time::Duration;

use super::clip::AudioClip;

/// Errors from the microphone/audio subsystem.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("no input device available")]
    NoInputDevice,

    #[error("failed to configure input device: {0}")]
    DeviceConfig(String),

    #[error("audio stream error: {0}")]
    Stream(String),

    #[error("capture task failed: {0}")]
    Task(String),
}

/// Configuration for a single capture (calibrate, then listen).
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// How long to sample ambient noise before listening.
    pub calibration: Duration,
    /// Fixed upper bound on the listen phase.
    pub listen_limit: Duration,
    /// Trailing silence that ends the phrase once speech has been heard.
    pub silence_hold: Duration,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            calibration: Duration::from_secs(1),
            listen_limit: Duration::from_secs(10),
            silence_hold: Duration::from_millis(800),
        }
    }
}

/// A device that records one clip per call.
///
/// `capture` blocks (asynchronously) for the calibration phase plus the listen
/// phase; the listen phase ends on its own at end-of-phrase or at the fixed
/// limit and cannot be interrupted from outside.
#[async_trait::async_trait]
pub trait CaptureDevice: Send + Sync {
    async fn capture(&self, config: &CaptureConfig) -> Result<AudioClip, CaptureError>;

    /// Device name for logging.
    fn name(&self) -> &str;
}
