use std::path::Path;

use hound::WavReader;
use tracing::info;

use super::clip::AudioClip;

/// Errors from file-mode audio input.
#[derive(Debug, thiserror::Error)]
pub enum AudioFileError {
    #[error("invalid audio path: {0}")]
    InvalidPath(String),

    #[error("could not read audio file: {0}")]
    Unreadable(String),
}

/// An audio file loaded from disk (mono/stereo PCM WAV).
pub struct AudioFile {
    pub path: String,
    pub duration_seconds: f64,
    clip: AudioClip,
}

impl AudioFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AudioFileError> {
        let path = path.as_ref();

        if path.as_os_str().is_empty() {
            return Err(AudioFileError::InvalidPath("empty path".to_string()));
        }
        if !path.is_file() {
            return Err(AudioFileError::InvalidPath(path.display().to_string()));
        }

        info!("Opening audio file: {}", path.display());

        let reader =
            WavReader::open(path).map_err(|e| AudioFileError::Unreadable(e.to_string()))?;

        let spec = reader.spec();
        let samples: Vec<i16> = reader
            .into_samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AudioFileError::Unreadable(e.to_string()))?;

        let clip = AudioClip::new(samples, spec.sample_rate, spec.channels);
        let duration_seconds = clip.duration_seconds();

        info!(
            "Audio file loaded: {:.1}s, {}Hz, {} channels, {} samples",
            duration_seconds,
            spec.sample_rate,
            spec.channels,
            clip.samples().len()
        );

        Ok(Self {
            path: path.display().to_string(),
            duration_seconds,
            clip,
        })
    }

    pub fn clip(&self) -> &AudioClip {
        &self.clip
    }

    pub fn into_clip(self) -> AudioClip {
        self.clip
    }
}
