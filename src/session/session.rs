use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::status::{SessionStatus, StatusEvent};
use crate::audio::{
    AudioClip, AudioFile, AudioFileError, CaptureConfig, CaptureDevice, CaptureError,
};
use crate::gateway::{SpeechBackend, TranscribeError};

/// Result of a start-recording request.
#[derive(Debug, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    /// Advisory no-op: a recording is already in progress.
    AlreadyRecording,
}

/// Result of a stop-recording request.
#[derive(Debug)]
pub enum StopOutcome {
    Captured,
    /// Advisory no-op: nothing was being recorded.
    NotRecording,
    CaptureFailed(CaptureError),
}

/// Result of a live-transcription request.
#[derive(Debug)]
pub enum TranscribeOutcome {
    Text(String),
    /// Advisory no-op: there is no captured audio to transcribe.
    NothingCaptured,
    Failed(TranscribeError),
}

/// Result of a retake request.
#[derive(Debug, PartialEq, Eq)]
pub enum RetakeOutcome {
    Reset,
    /// Advisory no-op: stop recording before retaking.
    StillRecording,
}

/// Errors from file-mode transcription.
#[derive(Debug, thiserror::Error)]
pub enum FileTranscribeError {
    #[error(transparent)]
    File(#[from] AudioFileError),

    #[error(transparent)]
    Backend(#[from] TranscribeError),
}

/// The single live recording/transcription session.
///
/// One `Session` value owns all mutable state: the status, the captured clip,
/// and the handle of the at-most-one background capture task. Construct it
/// once per process and drive it from the four user actions; wrong-state
/// actions are advisory no-ops, never errors.
///
/// The captured clip travels by value through the capture task's `JoinHandle`,
/// so it is only ever read after `stop_recording` has joined the task.
pub struct Session {
    device: Arc<dyn CaptureDevice>,
    backend: Arc<dyn SpeechBackend>,
    capture_config: CaptureConfig,

    /// Session ID for log correlation.
    session_id: Uuid,

    /// Latest status + message; subscribers get every transition.
    status_tx: watch::Sender<StatusEvent>,

    /// Audio from the last completed capture, replaced wholesale per recording.
    captured: Mutex<Option<AudioClip>>,

    /// Cooperative stop flag shared with the capture task. Clearing it cannot
    /// interrupt an in-progress listen; it only suppresses the task's
    /// "recording complete" note when stop won the race.
    recording: Arc<AtomicBool>,

    /// Handle of the in-flight capture task, if any.
    capture_task: Mutex<Option<JoinHandle<Result<AudioClip, CaptureError>>>>,

    last_error: Mutex<Option<String>>,
}

impl Session {
    pub fn new(
        device: Arc<dyn CaptureDevice>,
        backend: Arc<dyn SpeechBackend>,
        capture_config: CaptureConfig,
    ) -> Self {
        let session_id = Uuid::new_v4();
        let (status_tx, _status_rx) = watch::channel(StatusEvent::new(
            SessionStatus::Idle,
            "Ready to record or transcribe.",
        ));

        info!("Session created: {}", session_id);

        Self {
            device,
            backend,
            capture_config,
            session_id,
            status_tx,
            captured: Mutex::new(None),
            recording: Arc::new(AtomicBool::new(false)),
            capture_task: Mutex::new(None),
            last_error: Mutex::new(None),
        }
    }

    /// Current session status.
    pub fn status(&self) -> SessionStatus {
        self.status_tx.borrow().status
    }

    /// Subscribe to status transitions and advisory messages.
    pub fn subscribe(&self) -> watch::Receiver<StatusEvent> {
        self.status_tx.subscribe()
    }

    /// Message from the most recent failure, if the session is in Error.
    pub async fn last_error(&self) -> Option<String> {
        self.last_error.lock().await.clone()
    }

    /// Whether a captured clip is currently held.
    pub async fn has_capture(&self) -> bool {
        self.captured
            .lock()
            .await
            .as_ref()
            .map(|clip| !clip.is_empty())
            .unwrap_or(false)
    }

    /// Start a live recording on a background capture task.
    ///
    /// Valid from any state except Recording; a double start is an advisory
    /// no-op that leaves the in-progress recording untouched.
    pub async fn start_recording(&self) -> StartOutcome {
        if self.status() == SessionStatus::Recording {
            warn!("Start requested while already recording ({})", self.session_id);
            self.emit(SessionStatus::Recording, "Already recording.");
            return StartOutcome::AlreadyRecording;
        }

        info!("Starting recording ({})", self.session_id);

        // The previous take is replaced wholesale by this recording.
        *self.captured.lock().await = None;
        *self.last_error.lock().await = None;
        self.recording.store(true, Ordering::SeqCst);

        self.emit(
            SessionStatus::Recording,
            "Adjusting for ambient noise, then recording. Speak now.",
        );

        let device = Arc::clone(&self.device);
        let capture_config = self.capture_config.clone();
        let recording = Arc::clone(&self.recording);
        let status_tx = self.status_tx.clone();
        let session_id = self.session_id;

        let task = tokio::spawn(async move {
            let result = device.capture(&capture_config).await;

            // The listen can end on its own (end-of-phrase or time limit). Let
            // the user know, unless stop already cleared the flag.
            if result.is_ok() && recording.load(Ordering::SeqCst) {
                info!("Capture finished before stop was pressed ({})", session_id);
                status_tx.send_replace(StatusEvent::new(
                    SessionStatus::Recording,
                    "Listening finished. Press stop to keep the take.",
                ));
            }

            result
        });

        *self.capture_task.lock().await = Some(task);
        StartOutcome::Started
    }

    /// Stop the live recording, joining the capture task before touching the
    /// captured clip.
    ///
    /// Blocks until the capture task has fully terminated; the listen itself
    /// cannot be aborted early, only waited out.
    pub async fn stop_recording(&self) -> StopOutcome {
        if self.status() != SessionStatus::Recording {
            warn!("Stop requested while not recording ({})", self.session_id);
            self.emit(self.status(), "Not currently recording.");
            return StopOutcome::NotRecording;
        }

        info!("Stopping recording ({})", self.session_id);
        self.recording.store(false, Ordering::SeqCst);
        self.emit(SessionStatus::Recording, "Stopping recording...");

        let task = self.capture_task.lock().await.take();
        let Some(task) = task else {
            // Flag said Recording but no task exists; treat as a no-op.
            warn!("No capture task to join ({})", self.session_id);
            self.emit(SessionStatus::Idle, "Not currently recording.");
            return StopOutcome::NotRecording;
        };

        // True join: the clip is only available once the task has terminated.
        match task.await {
            Ok(Ok(clip)) if !clip.is_empty() => {
                info!(
                    "Capture complete: {:.1}s of audio ({})",
                    clip.duration_seconds(),
                    self.session_id
                );
                *self.captured.lock().await = Some(clip);
                self.emit(
                    SessionStatus::Captured,
                    "Recording stopped. You can transcribe or retake.",
                );
                StopOutcome::Captured
            }
            Ok(Ok(_)) => {
                let err = CaptureError::Stream("no audio captured".to_string());
                self.fail_capture(&err).await;
                StopOutcome::CaptureFailed(err)
            }
            Ok(Err(err)) => {
                self.fail_capture(&err).await;
                StopOutcome::CaptureFailed(err)
            }
            Err(join_err) => {
                let err = CaptureError::Task(join_err.to_string());
                self.fail_capture(&err).await;
                StopOutcome::CaptureFailed(err)
            }
        }
    }

    /// Transcribe the captured clip through the speech backend.
    ///
    /// Valid whenever a clip is held (Captured, Done, or after a failed
    /// transcription, which keeps the clip so a retry needs no re-recording).
    pub async fn transcribe_captured(&self) -> TranscribeOutcome {
        if self.status() == SessionStatus::Recording {
            self.emit(SessionStatus::Recording, "Stop recording before transcribing.");
            return TranscribeOutcome::NothingCaptured;
        }

        let clip = { self.captured.lock().await.clone() };
        let Some(clip) = clip else {
            warn!("Transcribe requested with nothing captured ({})", self.session_id);
            self.emit(self.status(), "Please record audio first.");
            return TranscribeOutcome::NothingCaptured;
        };

        info!("Transcribing captured audio ({})", self.session_id);
        self.emit(SessionStatus::Transcribing, "Recognizing...");

        match self.backend.recognize(&clip).await {
            Ok(text) => {
                *self.last_error.lock().await = None;
                self.emit(SessionStatus::Done, text.clone());
                TranscribeOutcome::Text(text)
            }
            Err(err) => {
                error!("Transcription failed ({}): {}", self.session_id, err);
                *self.last_error.lock().await = Some(err.to_string());
                // The clip is kept so the user can retry without re-recording.
                self.emit(SessionStatus::Error, err.to_string());
                TranscribeOutcome::Failed(err)
            }
        }
    }

    /// Transcribe an audio file, independent of the live-session state.
    ///
    /// Never touches the captured clip or the session status.
    pub async fn transcribe_file(&self, path: &str) -> Result<String, FileTranscribeError> {
        info!("Transcribing file: {} ({})", path, self.session_id);

        let file = AudioFile::open(path)?;
        let text = self.backend.recognize(file.clip()).await?;

        info!("File transcription complete: {} ({})", path, self.session_id);
        Ok(text)
    }

    /// Discard the captured clip and return to Idle.
    ///
    /// Rejected while recording; the take must be stopped first.
    pub async fn retake(&self) -> RetakeOutcome {
        if self.status() == SessionStatus::Recording {
            warn!("Retake requested while recording ({})", self.session_id);
            self.emit(SessionStatus::Recording, "Stop recording before retaking.");
            return RetakeOutcome::StillRecording;
        }

        info!("Retake: clearing captured audio ({})", self.session_id);
        *self.captured.lock().await = None;
        *self.last_error.lock().await = None;
        self.emit(SessionStatus::Idle, "Ready to record new audio.");
        RetakeOutcome::Reset
    }

    async fn fail_capture(&self, err: &CaptureError) {
        error!("Capture failed ({}): {}", self.session_id, err);
        *self.captured.lock().await = None;
        *self.last_error.lock().await = Some(err.to_string());
        self.emit(
            SessionStatus::Error,
            format!("Error during recording: {}", err),
        );
    }

    fn emit(&self, status: SessionStatus, message: impl Into<String>) {
        self.status_tx
            .send_replace(StatusEvent::new(status, message));
    }
}
