use anyhow::{Context, Result};
use std::io::Cursor;

/// A single captured or decoded take of audio (16-bit PCM, interleaved).
///
/// A clip is owned wholesale: recording replaces it, retake drops it. It is
/// never partially mutated after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    samples: Vec<i16>,
    sample_rate: u32,
    channels: u16,
}

impl AudioClip {
    pub fn new(samples: Vec<i16>, sample_rate: u32, channels: u16) -> Self {
        Self {
            samples,
            sample_rate,
            channels,
        }
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_seconds(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.len() as f64 / (self.sample_rate as f64 * self.channels.max(1) as f64)
    }

    /// Encode the clip as an in-memory WAV file for the speech backend upload.
    pub fn to_wav_bytes(&self) -> Result<Vec<u8>> {
        let spec = hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec)
                .context("Failed to create WAV writer")?;

            for &sample in &self.samples {
                writer
                    .write_sample(sample)
                    .context("Failed to write sample to WAV")?;
            }

            writer.finalize().context("Failed to finalize WAV data")?;
        }

        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_clip() {
        let clip = AudioClip::new(Vec::new(), 16000, 1);
        assert!(clip.is_empty());
        assert_eq!(clip.duration_seconds(), 0.0);
    }

    #[test]
    fn test_duration() {
        let clip = AudioClip::new(vec![0i16; 16000], 16000, 1);
        assert!((clip.duration_seconds() - 1.0).abs() < 1e-9);

        let stereo = AudioClip::new(vec![0i16; 32000], 16000, 2);
        assert!((stereo.duration_seconds() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_to_wav_bytes() {
        let clip = AudioClip::new(vec![0i16; 1600], 16000, 1);
        let wav = clip.to_wav_bytes().expect("encode should succeed");

        // 44-byte WAV header plus 2 bytes per sample
        assert!(wav.len() > 44);
        assert_eq!(&wav[0..4], b"RIFF");
    }
}
