//! Live capture from an audio input device.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SizedSample, StreamConfig, SupportedStreamConfig};
use log::{error, info};
use std::sync::{Arc, Mutex};

use super::analysis::{quantize_sample, AnalysisThread, PcmQueue};
use super::shared::{lock, SharedSpectrum};
use crate::error::{Result, SpectrumError};
use crate::params::{CaptureConfig, SpectrumConfig};
use crate::spectrum::SpectrumFrame;

/// Audio system capturing mono input into a shared spectrum pipeline
pub struct AudioSystem {
    /// Pipeline and latest published frame (thread-safe)
    spectrum: Arc<SharedSpectrum>,

    /// Audio input stream (kept alive)
    _stream: cpal::Stream,

    /// Analysis thread (stopped on drop)
    _analysis: AnalysisThread,
}

impl AudioSystem {
    /// Open the configured input device and start capturing and analyzing
    pub fn start(spectrum_config: SpectrumConfig, capture_config: CaptureConfig) -> Result<Self> {
        capture_config
            .validate()
            .map_err(SpectrumError::InvalidConfig)?;

        let sample_rate_hz = spectrum_config.sample_rate_hz;
        let fft_size = spectrum_config.fft_size;
        let spectrum = Arc::new(SharedSpectrum::new(spectrum_config)?);

        let host = cpal::default_host();
        let device = select_device(&host, capture_config.device_name.as_deref())?;
        let supported = choose_config(&device, sample_rate_hz)?;
        let config = supported.config();

        info!(
            "Audio input: {} @ {}Hz, {} channel(s), {:?}",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            config.sample_rate.0,
            config.channels,
            supported.sample_format()
        );

        // One transform's worth of backlog at most
        let queue = Arc::new(Mutex::new(PcmQueue::new(fft_size)));
        let gain = capture_config.clamped_gain();

        let stream = match supported.sample_format() {
            SampleFormat::I16 => build_stream::<i16>(&device, &config, Arc::clone(&queue), gain, |s| {
                s as f32 / 32768.0
            })?,
            SampleFormat::U16 => build_stream::<u16>(&device, &config, Arc::clone(&queue), gain, |s| {
                (s as f32 - 32768.0) / 32768.0
            })?,
            SampleFormat::F32 => {
                build_stream::<f32>(&device, &config, Arc::clone(&queue), gain, |s| s)?
            }
            other => {
                return Err(SpectrumError::Device(format!(
                    "Unsupported sample format {:?}",
                    other
                )))
            }
        };

        stream
            .play()
            .map_err(|e| SpectrumError::Stream(format!("Failed to start input stream: {}", e)))?;

        let analysis =
            AnalysisThread::spawn(capture_config.update_interval_ms, queue, Arc::clone(&spectrum));

        Ok(Self {
            spectrum,
            _stream: stream,
            _analysis: analysis,
        })
    }

    /// Most recent frame published by the analysis thread
    pub fn latest(&self) -> Option<Arc<SpectrumFrame>> {
        self.spectrum.latest()
    }
}

/// Names of all available input devices
pub fn list_input_devices() -> Result<Vec<String>> {
    let host = cpal::default_host();
    let devices = host
        .input_devices()
        .map_err(|e| SpectrumError::Device(format!("Failed to enumerate inputs: {}", e)))?;

    Ok(devices
        .map(|d| d.name().unwrap_or_else(|_| "Unknown".to_string()))
        .collect())
}

/// Default input device, or the first whose name contains `wanted` (case-insensitive)
fn select_device(host: &cpal::Host, wanted: Option<&str>) -> Result<cpal::Device> {
    let Some(wanted) = wanted else {
        return host
            .default_input_device()
            .ok_or_else(|| SpectrumError::Device("No audio input device found".to_string()));
    };

    let needle = wanted.to_lowercase();
    host.input_devices()
        .map_err(|e| SpectrumError::Device(format!("Failed to enumerate inputs: {}", e)))?
        .find(|d| {
            d.name()
                .map(|name| name.to_lowercase().contains(&needle))
                .unwrap_or(false)
        })
        .ok_or_else(|| SpectrumError::Device(format!("No input device matching '{}'", wanted)))
}

/// Preference among sample formats we can convert (lower is better)
fn format_rank(format: SampleFormat) -> Option<u8> {
    match format {
        SampleFormat::I16 => Some(0),
        SampleFormat::F32 => Some(1),
        SampleFormat::U16 => Some(2),
        _ => None,
    }
}

/// Pick a config at `sample_rate_hz`, preferring mono and native 16-bit
fn choose_config(device: &cpal::Device, sample_rate_hz: usize) -> Result<SupportedStreamConfig> {
    let rate = sample_rate_hz as u32;
    let ranges = device
        .supported_input_configs()
        .map_err(|e| SpectrumError::Device(format!("Failed to query input configs: {}", e)))?;

    ranges
        .filter(|r| r.min_sample_rate().0 <= rate && rate <= r.max_sample_rate().0)
        .filter_map(|r| format_rank(r.sample_format()).map(|rank| (r.channels() != 1, rank, r)))
        .min_by_key(|(multichannel, rank, _)| (*multichannel, *rank))
        .map(|(_, _, r)| r.with_sample_rate(cpal::SampleRate(rate)))
        .ok_or_else(|| {
            SpectrumError::Device(format!(
                "No 16-bit or float input config at {} Hz",
                sample_rate_hz
            ))
        })
}

/// Build an input stream that queues channel 0 of each frame as 16-bit PCM
fn build_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    queue: Arc<Mutex<PcmQueue>>,
    gain: f32,
    to_f32: fn(T) -> f32,
) -> Result<cpal::Stream>
where
    T: SizedSample + Send + 'static,
{
    let channels = (config.channels as usize).max(1);

    device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                let mut queue = lock(&queue);
                for frame in data.chunks(channels) {
                    queue.push_sample(quantize_sample(to_f32(frame[0]), gain));
                }
            },
            |err| error!("Audio stream error: {}", err),
            None,
        )
        .map_err(|e| SpectrumError::Stream(format!("Failed to build input stream: {}", e)))
}
