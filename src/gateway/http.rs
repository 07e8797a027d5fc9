use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::StatusCode;
use serde_json::json;
use tracing::{info, warn};

use super::{SpeechBackend, TranscribeError};
use crate::audio::AudioClip;
use crate::config::BackendConfig;

/// Gateway to a cloud speech-recognition HTTP API.
///
/// Posts the clip as base64 LINEAR16 WAV in a `speech:recognize`-style JSON
/// request and extracts the best transcript from the response. Exactly one
/// network call per `recognize` invocation.
pub struct CloudSpeechGateway {
    client: reqwest::Client,
    config: BackendConfig,
}

impl CloudSpeechGateway {
    pub fn new(config: BackendConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }
}

#[async_trait::async_trait]
impl SpeechBackend for CloudSpeechGateway {
    async fn recognize(&self, clip: &AudioClip) -> Result<String, TranscribeError> {
        let wav_bytes = clip
            .to_wav_bytes()
            .map_err(|e| TranscribeError::Other(format!("failed to encode audio: {}", e)))?;

        info!(
            "Sending {:.1}s of audio ({} bytes) to speech backend",
            clip.duration_seconds(),
            wav_bytes.len()
        );

        let body = json!({
            "config": {
                "encoding": "LINEAR16",
                "sampleRateHertz": clip.sample_rate(),
                "audioChannelCount": clip.channels(),
                "languageCode": self.config.language,
            },
            "audio": {
                "content": STANDARD.encode(&wav_bytes),
            },
        });

        let response = self
            .client
            .post(&self.config.endpoint)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Speech backend returned {}: {}", status, detail);
            return Err(classify_status(status, &detail));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TranscribeError::Other(format!("malformed backend response: {}", e)))?;

        let text = extract_transcript(&payload)?;
        info!("Speech backend recognized {} characters", text.len());
        Ok(text)
    }

    fn name(&self) -> &str {
        "cloud-speech"
    }
}

/// Map transport-level failures onto the error taxonomy.
fn classify_transport(err: reqwest::Error) -> TranscribeError {
    if err.is_timeout() || err.is_connect() {
        TranscribeError::ServiceUnavailable(err.to_string())
    } else {
        TranscribeError::Other(err.to_string())
    }
}

/// Map non-success HTTP statuses onto the error taxonomy.
fn classify_status(status: StatusCode, detail: &str) -> TranscribeError {
    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        TranscribeError::ServiceUnavailable(format!("{}: {}", status, detail))
    } else {
        TranscribeError::Other(format!("backend error ({}): {}", status, detail))
    }
}

/// Pull the top transcript out of a recognize response.
///
/// A well-formed response with no results means the backend heard the audio
/// but could not make out any speech.
fn extract_transcript(payload: &serde_json::Value) -> Result<String, TranscribeError> {
    let results = match payload.get("results").and_then(|r| r.as_array()) {
        Some(results) if !results.is_empty() => results,
        _ => return Err(TranscribeError::Unintelligible),
    };

    let mut parts = Vec::new();
    for result in results {
        if let Some(transcript) = result
            .get("alternatives")
            .and_then(|a| a.as_array())
            .and_then(|a| a.first())
            .and_then(|alt| alt.get("transcript"))
            .and_then(|t| t.as_str())
        {
            let trimmed = transcript.trim();
            if !trimmed.is_empty() {
                parts.push(trimmed.to_string());
            }
        }
    }

    if parts.is_empty() {
        return Err(TranscribeError::Unintelligible);
    }

    Ok(parts.join(" "))
}
