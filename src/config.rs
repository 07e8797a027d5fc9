use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;

use crate::audio::CaptureConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub backend: BackendConfig,
    pub audio: AudioConfig,
}

/// Cloud speech backend connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    pub endpoint: String,
    pub api_key: String,
    pub language: String,
    pub request_timeout_secs: u64,
}

/// Live capture settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    /// Ambient noise calibration window in seconds.
    pub calibration_secs: u64,
    /// Fixed upper bound on a single listen, in seconds.
    pub listen_limit_secs: u64,
    /// Trailing silence that ends a phrase, in milliseconds.
    pub silence_hold_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://speech.googleapis.com/v1/speech:recognize".to_string(),
            api_key: String::new(),
            language: "en-US".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            calibration_secs: 1,
            listen_limit_secs: 10,
            silence_hold_ms: 800,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            audio: AudioConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration, overlaying an optional file on the built-in defaults.
    pub fn load(path: &str) -> Result<Self> {
        let defaults = Config::default();

        let settings = config::Config::builder()
            .set_default("backend.endpoint", defaults.backend.endpoint)?
            .set_default("backend.api_key", defaults.backend.api_key)?
            .set_default("backend.language", defaults.backend.language)?
            .set_default(
                "backend.request_timeout_secs",
                defaults.backend.request_timeout_secs,
            )?
            .set_default("audio.calibration_secs", defaults.audio.calibration_secs)?
            .set_default("audio.listen_limit_secs", defaults.audio.listen_limit_secs)?
            .set_default("audio.silence_hold_ms", defaults.audio.silence_hold_ms)?
            .add_source(config::File::with_name(path).required(false))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn capture_config(&self) -> CaptureConfig {
        CaptureConfig {
            calibration: Duration::from_secs(self.audio.calibration_secs),
            listen_limit: Duration::from_secs(self.audio.listen_limit_secs),
            silence_hold: Duration::from_millis(self.audio.silence_hold_ms),
        }
    }
}
