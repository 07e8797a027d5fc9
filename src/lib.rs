pub mod audio;
pub mod config;
pub mod gateway;
pub mod session;

pub use audio::{
    AudioClip, AudioFile, AudioFileError, CaptureConfig, CaptureDevice, CaptureError,
    MicrophoneDevice,
};
pub use config::Config;
pub use gateway::{CloudSpeechGateway, SpeechBackend, TranscribeError};
pub use session::{
    FileTranscribeError, RetakeOutcome, Session, SessionStatus, StartOutcome, StatusEvent,
    StopOutcome, TranscribeOutcome,
};
