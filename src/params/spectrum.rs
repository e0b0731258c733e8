//! Spectrum analysis configuration.

use std::ops::Range;

/// How a bin's magnitude is derived from the transform output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MagnitudeMode {
    /// True bin magnitude: sqrt(re² + im²)
    #[default]
    Exact,

    /// Absolute value of each raw half-complex slot.
    /// Slots above N/2 hold imaginary parts, so this is only an approximation
    /// of the spectrum; kept for parity with older displays.
    HalfComplex,
}

/// Pipeline configuration, fixed for the lifetime of a pipeline
#[derive(Debug, Clone)]
pub struct SpectrumConfig {
    /// Transform size and history capacity (samples)
    pub fft_size: usize,

    /// Capture sample rate (Hz)
    pub sample_rate_hz: usize,

    /// Lower bound of the displayed band (Hz, inclusive)
    pub band_low_hz: usize,

    /// Upper bound of the displayed band (Hz, exclusive)
    pub band_high_hz: usize,

    /// Magnitude derivation
    pub magnitude: MagnitudeMode,
}

impl Default for SpectrumConfig {
    fn default() -> Self {
        Self {
            fft_size: 96_000, // 2 s of history at 48 kHz
            sample_rate_hz: 48_000,
            band_low_hz: 20,
            band_high_hz: 20_000,
            magnitude: MagnitudeMode::Exact,
        }
    }
}

impl SpectrumConfig {
    /// Whole transform bins per Hz (integer truncation, may be 0)
    pub fn bins_per_hz(&self) -> usize {
        self.fft_size / self.sample_rate_hz
    }

    /// Bin index range covering the configured band
    pub fn band_bins(&self) -> Range<usize> {
        let per_hz = self.bins_per_hz();
        per_hz * self.band_low_hz..per_hz * self.band_high_hz
    }

    /// Frequency distance between adjacent bins (Hz)
    pub fn bin_spacing_hz(&self) -> f32 {
        self.sample_rate_hz as f32 / self.fft_size as f32
    }

    /// Validate configuration (non-zero sizes, ordered band that fits the transform)
    pub fn validate(&self) -> Result<(), String> {
        if self.fft_size == 0 {
            return Err("FFT size must be > 0".to_string());
        }
        if self.sample_rate_hz == 0 {
            return Err("Sample rate must be > 0".to_string());
        }
        if self.band_low_hz >= self.band_high_hz {
            return Err(format!(
                "Band must satisfy low < high, got {}..{} Hz",
                self.band_low_hz, self.band_high_hz
            ));
        }
        let per_hz = self.bins_per_hz();
        let end_bin = per_hz.checked_mul(self.band_high_hz).ok_or_else(|| {
            format!(
                "Band upper edge {} Hz overflows bin index at {} bins/Hz",
                self.band_high_hz, per_hz
            )
        })?;
        if end_bin > self.fft_size {
            return Err(format!(
                "Band {}..{} Hz maps to bins {}..{}, beyond FFT size {}",
                self.band_low_hz,
                self.band_high_hz,
                per_hz * self.band_low_hz,
                end_bin,
                self.fft_size
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_band_bins() {
        let config = SpectrumConfig::default();

        // 96000 / 48000 = 2 bins per Hz
        assert_eq!(config.bins_per_hz(), 2);
        assert_eq!(config.band_bins(), 40..40_000);
        assert!((config.bin_spacing_hz() - 0.5).abs() < 1e-6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bins_per_hz_truncates() {
        let config = SpectrumConfig {
            fft_size: 1000,
            sample_rate_hz: 48_000,
            ..SpectrumConfig::default()
        };

        // Fewer bins than Hz: band collapses to an empty range
        assert_eq!(config.bins_per_hz(), 0);
        assert!(config.band_bins().is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_config() {
        let zero_size = SpectrumConfig {
            fft_size: 0,
            ..SpectrumConfig::default()
        };
        assert!(zero_size.validate().is_err());

        let zero_rate = SpectrumConfig {
            sample_rate_hz: 0,
            ..SpectrumConfig::default()
        };
        assert!(zero_rate.validate().is_err());

        let inverted = SpectrumConfig {
            band_low_hz: 500,
            band_high_hz: 100,
            ..SpectrumConfig::default()
        };
        assert!(inverted.validate().is_err());

        // 20 kHz * 2 bins/Hz = 40000 > 8 bins
        let too_wide = SpectrumConfig {
            fft_size: 8,
            sample_rate_hz: 4,
            ..SpectrumConfig::default()
        };
        assert!(too_wide.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bin_index_overflow() {
        let huge = SpectrumConfig {
            fft_size: usize::MAX,
            sample_rate_hz: 1,
            ..SpectrumConfig::default()
        };

        // usize::MAX bins/Hz * 20000 Hz does not fit in usize
        let err = huge.validate().unwrap_err();
        assert!(err.contains("overflows"), "{}", err);
    }
}
