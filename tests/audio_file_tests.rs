// Integration tests for audio file input.
//
// Fixtures are generated on the fly with hound into a temp directory, so the
// tests verify real WAV decoding without binary files in the repo.

use std::fs;
use std::path::{Path, PathBuf};

use speechpad::{AudioFile, AudioFileError};
use tempfile::TempDir;

fn write_wav(dir: &Path, name: &str, seconds: f64, sample_rate: u32, channels: u16) -> PathBuf {
    let path = dir.join(name);
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(&path, spec).expect("create fixture");
    let frames = (seconds * sample_rate as f64) as usize;
    for i in 0..frames {
        // Quiet 440 Hz tone so the file contains non-zero audio.
        let t = i as f64 / sample_rate as f64;
        let sample = ((t * 440.0 * 2.0 * std::f64::consts::PI).sin() * 3000.0) as i16;
        for _ in 0..channels {
            writer.write_sample(sample).expect("write fixture sample");
        }
    }
    writer.finalize().expect("finalize fixture");

    path
}

#[test]
fn test_audio_file_open() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_wav(dir.path(), "sample.wav", 1.0, 16000, 1);

    let audio = AudioFile::open(&path).expect("open should succeed");

    assert!(audio.duration_seconds > 0.0, "Duration should be positive");
    assert!(!audio.clip().is_empty(), "Should have audio samples");
    assert_eq!(audio.clip().sample_rate(), 16000);
    assert_eq!(audio.clip().channels(), 1);
    assert!(audio.path.contains("sample.wav"));
}

#[test]
fn test_audio_file_duration_matches_sample_count() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_wav(dir.path(), "two-seconds.wav", 2.0, 8000, 1);

    let audio = AudioFile::open(&path).expect("open should succeed");

    assert!((audio.duration_seconds - 2.0).abs() < 0.01);
    assert_eq!(audio.clip().samples().len(), 16000);
}

#[test]
fn test_audio_file_stereo_interleaved() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_wav(dir.path(), "stereo.wav", 0.5, 16000, 2);

    let audio = AudioFile::open(&path).expect("open should succeed");

    assert_eq!(audio.clip().channels(), 2);
    assert_eq!(
        audio.clip().samples().len() % 2,
        0,
        "Stereo audio should have an even number of samples"
    );
    assert!((audio.duration_seconds - 0.5).abs() < 0.01);
}

#[test]
fn test_audio_file_nonexistent_is_invalid_path() {
    let result = AudioFile::open("/nonexistent/path/to/audio.wav");
    assert!(matches!(result, Err(AudioFileError::InvalidPath(_))));
}

#[test]
fn test_audio_file_empty_path_is_invalid_path() {
    let result = AudioFile::open("");
    assert!(matches!(result, Err(AudioFileError::InvalidPath(_))));
}

#[test]
fn test_audio_file_garbage_is_unreadable() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("garbage.wav");
    fs::write(&path, b"this is not a wav file").expect("write garbage");

    let result = AudioFile::open(&path);
    assert!(matches!(result, Err(AudioFileError::Unreadable(_))));
}

#[test]
fn test_audio_file_clip_reencodes_to_wav() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_wav(dir.path(), "reencode.wav", 0.25, 16000, 1);

    let clip = AudioFile::open(&path).expect("open should succeed").into_clip();
    let wav = clip.to_wav_bytes().expect("encode should succeed");

    assert_eq!(&wav[0..4], b"RIFF");
    assert!(wav.len() > 44 + clip.samples().len());
}
