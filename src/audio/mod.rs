pub mod capture;
pub mod clip;
pub mod file;
pub mod mic;

pub use capture::{CaptureConfig, CaptureDevice, CaptureError};
pub use clip::AudioClip;
pub use file::{AudioFile, AudioFileError};
pub use mic::MicrophoneDevice;
