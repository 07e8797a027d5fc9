use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::SampleFormat;
use tracing::{error, info};

use super::capture::{CaptureConfig, CaptureDevice, CaptureError};
use super::clip::AudioClip;

/// Minimum energy threshold so dead-silent rooms don't trigger on noise floor.
const THRESHOLD_FLOOR: f64 = 0.01;
/// Multiplier applied to the ambient level measured during calibration.
const AMBIENT_MARGIN: f64 = 1.8;
/// Polling interval for the end-of-phrase check.
const TICK: Duration = Duration::from_millis(100);

/// Default-input-device capture via cpal.
///
/// Calibrates an energy threshold against ambient noise, then records until the
/// phrase ends (speech followed by sustained silence) or the listen limit hits.
pub struct MicrophoneDevice;

impl MicrophoneDevice {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MicrophoneDevice {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl CaptureDevice for MicrophoneDevice {
    async fn capture(&self, config: &CaptureConfig) -> Result<AudioClip, CaptureError> {
        let config = config.clone();

        // cpal streams are not Send; keep the whole capture on a blocking thread.
        tokio::task::spawn_blocking(move || capture_blocking(&config))
            .await
            .map_err(|e| CaptureError::Task(e.to_string()))?
    }

    fn name(&self) -> &str {
        "microphone"
    }
}

fn capture_blocking(config: &CaptureConfig) -> Result<AudioClip, CaptureError> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or(CaptureError::NoInputDevice)?;

    let device_config = device
        .default_input_config()
        .map_err(|e| CaptureError::DeviceConfig(e.to_string()))?;

    let sample_rate = device_config.sample_rate().0;
    let channels = device_config.channels();
    let sample_format = device_config.sample_format();
    let stream_config: cpal::StreamConfig = device_config.into();

    info!(
        "Capture device ready: {} Hz, {} channels, {:?}",
        sample_rate, channels, sample_format
    );

    let buffer: Arc<Mutex<Vec<i16>>> = Arc::new(Mutex::new(Vec::new()));
    let stream = build_stream(&device, &stream_config, sample_format, Arc::clone(&buffer))?;

    stream
        .play()
        .map_err(|e| CaptureError::Stream(e.to_string()))?;

    // Calibration phase: measure the ambient level to derive the speech threshold.
    std::thread::sleep(config.calibration);
    let calibration_end = {
        let buf = buffer.lock().unwrap_or_else(|p| p.into_inner());
        buf.len()
    };
    let ambient = {
        let buf = buffer.lock().unwrap_or_else(|p| p.into_inner());
        rms(&buf[..calibration_end])
    };
    let threshold = (ambient * AMBIENT_MARGIN).max(THRESHOLD_FLOOR);

    info!(
        "Ambient noise calibrated: level {:.4}, threshold {:.4}",
        ambient, threshold
    );

    // Listen phase: record until end-of-phrase or the fixed limit.
    let listen_start = Instant::now();
    let mut cursor = calibration_end;
    let mut heard_speech = false;
    let mut silence = Duration::ZERO;

    loop {
        std::thread::sleep(TICK);

        let frame_rms = {
            let buf = buffer.lock().unwrap_or_else(|p| p.into_inner());
            let frame = &buf[cursor.min(buf.len())..];
            cursor = buf.len();
            rms(frame)
        };

        if frame_rms > threshold {
            heard_speech = true;
            silence = Duration::ZERO;
        } else if heard_speech {
            silence += TICK;
        }

        if heard_speech && silence >= config.silence_hold {
            break;
        }
        if listen_start.elapsed() >= config.listen_limit {
            break;
        }
    }

    drop(stream);

    let samples = {
        let buf = buffer.lock().unwrap_or_else(|p| p.into_inner());
        buf[calibration_end..].to_vec()
    };

    info!(
        "Capture finished: {} samples (~{:.1}s), phrase detected: {}",
        samples.len(),
        samples.len() as f64 / (sample_rate as f64 * channels.max(1) as f64),
        heard_speech
    );

    Ok(AudioClip::new(samples, sample_rate, channels))
}

fn build_stream(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    sample_format: SampleFormat,
    buffer: Arc<Mutex<Vec<i16>>>,
) -> Result<cpal::Stream, CaptureError> {
    let err_fn = |err| {
        error!("Audio stream error: {}", err);
    };

    let stream = match sample_format {
        SampleFormat::F32 => device.build_input_stream(
            config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                let mut buf = buffer.lock().unwrap_or_else(|p| p.into_inner());
                buf.extend(
                    data.iter()
                        .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16),
                );
            },
            err_fn,
            None,
        ),
        SampleFormat::I16 => device.build_input_stream(
            config,
            move |data: &[i16], _: &cpal::InputCallbackInfo| {
                let mut buf = buffer.lock().unwrap_or_else(|p| p.into_inner());
                buf.extend_from_slice(data);
            },
            err_fn,
            None,
        ),
        SampleFormat::U16 => device.build_input_stream(
            config,
            move |data: &[u16], _: &cpal::InputCallbackInfo| {
                let mut buf = buffer.lock().unwrap_or_else(|p| p.into_inner());
                buf.extend(data.iter().map(|&s| (s as i32 - 32768) as i16));
            },
            err_fn,
            None,
        ),
        other => {
            return Err(CaptureError::DeviceConfig(format!(
                "unsupported sample format: {:?}",
                other
            )));
        }
    };

    stream.map_err(|e| CaptureError::Stream(e.to_string()))
}

/// Root-mean-square level of a sample slice, normalized to [0, 1].
fn rms(samples: &[i16]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_sq: f64 = samples
        .iter()
        .map(|&s| {
            let v = s as f64 / i16::MAX as f64;
            v * v
        })
        .sum();

    (sum_sq / samples.len() as f64).sqrt()
}
