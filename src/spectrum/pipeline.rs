//! Sample-buffer-to-spectrum pipeline.

use log::{debug, info, warn};
use std::sync::Arc;

use super::frame::SpectrumFrame;
use super::history::{pcm16le_samples, SampleHistory};
use super::transform::{alloc_buffer, HalfComplexFft};
use crate::error::{Result, SpectrumError};
use crate::params::{MagnitudeMode, SpectrumConfig};

/// Rolling history plus a fixed-size transform producing band-limited magnitudes.
///
/// Owns its transform buffers exclusively; they are allocated in `new` and
/// reused by every `update`. Not internally synchronized; see
/// [`crate::audio::SharedSpectrum`] for cross-thread use.
pub struct SpectrumPipeline {
    config: SpectrumConfig,
    history: SampleHistory,

    /// 0..N, paired positionally with the history
    sample_indices: Arc<[f32]>,

    /// Band frequencies in Hz, spaced by R/N
    frequencies: Arc<[f32]>,

    fft_input: Vec<f32>,
    fft_output: Vec<f32>,
    transform: HalfComplexFft,
    sequence: u64,
}

impl SpectrumPipeline {
    /// Validate `config` and allocate every buffer the pipeline needs
    pub fn new(config: SpectrumConfig) -> Result<Self> {
        config.validate().map_err(SpectrumError::InvalidConfig)?;

        let n = config.fft_size;
        let bins = config.band_bins();
        if bins.is_empty() {
            warn!(
                "FFT size {} is below sample rate {} Hz: spectrum band is empty",
                n, config.sample_rate_hz
            );
        }

        let history = SampleHistory::with_capacity(n)?;
        let fft_input = alloc_buffer(n, 0.0, "transform input")?;
        let fft_output = alloc_buffer(n, 0.0, "transform output")?;
        let transform = HalfComplexFft::new(n)?;

        let sample_indices: Arc<[f32]> = (0..n).map(|i| i as f32).collect();
        let frequencies: Arc<[f32]> = band_frequencies(&config).into();

        info!(
            "Spectrum pipeline: N={} @ {}Hz, band {}..{} Hz -> bins {}..{} ({:?} magnitude)",
            n,
            config.sample_rate_hz,
            config.band_low_hz,
            config.band_high_hz,
            bins.start,
            bins.end,
            config.magnitude
        );

        Ok(Self {
            config,
            history,
            sample_indices,
            frequencies,
            fft_input,
            fft_output,
            transform,
            sequence: 0,
        })
    }

    /// Decode a burst of little-endian 16-bit samples into the history.
    ///
    /// An odd-length burst is decoded up to its last whole sample and the
    /// trailing byte is dropped. Returns the number of samples decoded.
    pub fn ingest(&mut self, bytes: &[u8]) -> usize {
        if bytes.len() % 2 != 0 {
            warn!(
                "Malformed burst of {} bytes: dropping trailing byte",
                bytes.len()
            );
        }
        self.history.extend(pcm16le_samples(bytes))
    }

    /// Run one analysis cycle over the current history.
    ///
    /// The history never holds more than N samples; with fewer, the transform
    /// input is zero-padded after the newest sample.
    pub fn update(&mut self) -> SpectrumFrame {
        self.history.copy_into(&mut self.fft_input);
        self.transform.process(&self.fft_input, &mut self.fft_output);

        let bins = self.config.band_bins();
        let magnitudes: Vec<f32> = match self.config.magnitude {
            MagnitudeMode::Exact => bins.map(|k| self.transform.bin(k).norm()).collect(),
            MagnitudeMode::HalfComplex => self.fft_output[bins].iter().map(|v| v.abs()).collect(),
        };

        self.sequence += 1;
        debug!(
            "Update #{}: {} samples, {} magnitude bins",
            self.sequence,
            self.history.len(),
            magnitudes.len()
        );

        SpectrumFrame::new(
            self.sequence,
            Arc::clone(&self.sample_indices),
            self.history.to_vec(),
            Arc::clone(&self.frequencies),
            magnitudes,
        )
    }

    pub fn config(&self) -> &SpectrumConfig {
        &self.config
    }

    pub fn history(&self) -> &SampleHistory {
        &self.history
    }

    /// Sample index series 0..N
    pub fn sample_indices(&self) -> &[f32] {
        &self.sample_indices
    }

    /// Full frequency index series for the band
    pub fn frequencies(&self) -> &[f32] {
        &self.frequencies
    }

    /// Raw half-complex output of the most recent update
    pub fn transform_output(&self) -> &[f32] {
        &self.fft_output
    }
}

/// Frequencies from the band's lower bound up to (excluding) its upper bound, R/N apart
fn band_frequencies(config: &SpectrumConfig) -> Vec<f32> {
    let step = config.sample_rate_hz as f64 / config.fft_size as f64;
    let low = config.band_low_hz as f64;
    let high = config.band_high_hz as f64;

    // Index-based rather than accumulated so 40k steps don't drift
    let count = ((high - low) / step).ceil() as usize;
    (0..count)
        .map(|i| low + i as f64 * step)
        .take_while(|&f| f < high)
        .map(|f| f as f32)
        .collect()
}
