//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;

use crate::params::{CaptureConfig, MagnitudeMode, SpectrumConfig};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "spectroscope")]
#[command(about = "Live audio history and spectrum monitor", long_about = None)]
pub struct Args {
    /// List input devices and exit
    #[arg(long)]
    pub list_devices: bool,

    /// Input device (case-insensitive name substring, default device otherwise)
    #[arg(long, value_name = "NAME")]
    pub device: Option<String>,

    /// Replay a 16-bit mono WAV file instead of capturing
    #[arg(long, value_name = "PATH", conflicts_with = "device")]
    pub wav: Option<PathBuf>,

    /// Transform size and history length (samples)
    #[arg(long, value_name = "SAMPLES", default_value = "96000")]
    pub fft_size: usize,

    /// Sample rate (Hz)
    #[arg(long, value_name = "HZ", default_value = "48000")]
    pub sample_rate: usize,

    /// Lower edge of the displayed band (Hz)
    #[arg(long, value_name = "HZ", default_value = "20")]
    pub band_low: usize,

    /// Upper edge of the displayed band (Hz)
    #[arg(long, value_name = "HZ", default_value = "20000")]
    pub band_high: usize,

    /// Use |half-complex slot| instead of true bin magnitude
    #[arg(long)]
    pub half_complex: bool,

    /// Analysis interval (milliseconds)
    #[arg(long, value_name = "MS", default_value = "100")]
    pub interval_ms: u64,

    /// Input gain, 0.0 to 1.0
    #[arg(long, value_name = "GAIN", default_value = "1.0")]
    pub gain: f32,

    /// Stop after this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub duration: Option<f32>,
}

impl Args {
    /// Pipeline configuration from command-line arguments
    pub fn spectrum_config(&self) -> SpectrumConfig {
        SpectrumConfig {
            fft_size: self.fft_size,
            sample_rate_hz: self.sample_rate,
            band_low_hz: self.band_low,
            band_high_hz: self.band_high,
            magnitude: if self.half_complex {
                MagnitudeMode::HalfComplex
            } else {
                MagnitudeMode::Exact
            },
        }
    }

    /// Capture configuration from command-line arguments
    pub fn capture_config(&self) -> CaptureConfig {
        CaptureConfig {
            update_interval_ms: self.interval_ms,
            device_name: self.device.clone(),
            input_gain: self.gain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_config_defaults() {
        let args = Args::parse_from(["spectroscope"]);

        let spectrum = args.spectrum_config();
        let defaults = SpectrumConfig::default();
        assert_eq!(spectrum.fft_size, defaults.fft_size);
        assert_eq!(spectrum.sample_rate_hz, defaults.sample_rate_hz);
        assert_eq!(spectrum.band_low_hz, defaults.band_low_hz);
        assert_eq!(spectrum.band_high_hz, defaults.band_high_hz);
        assert_eq!(spectrum.magnitude, MagnitudeMode::Exact);

        let capture = args.capture_config();
        assert_eq!(capture.update_interval_ms, 100);
        assert_eq!(capture.device_name, None);
        assert_eq!(capture.input_gain, 1.0);
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from([
            "spectroscope",
            "--fft-size",
            "8",
            "--sample-rate",
            "8",
            "--band-low",
            "1",
            "--band-high",
            "4",
            "--half-complex",
            "--device",
            "usb",
            "--gain",
            "0.1",
        ]);

        let spectrum = args.spectrum_config();
        assert_eq!(spectrum.fft_size, 8);
        assert_eq!(spectrum.band_bins(), 1..4);
        assert_eq!(spectrum.magnitude, MagnitudeMode::HalfComplex);

        let capture = args.capture_config();
        assert_eq!(capture.device_name.as_deref(), Some("usb"));
        assert!((capture.input_gain - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_wav_conflicts_with_device() {
        let result = Args::try_parse_from(["spectroscope", "--wav", "a.wav", "--device", "usb"]);
        assert!(result.is_err());
    }
}
