//! Audio capture configuration.

/// Capture glue configuration (device selection and analysis cadence)
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Interval between analysis cycles (milliseconds)
    /// 100 ms = 10 spectrum updates per second
    pub update_interval_ms: u64,

    /// Case-insensitive substring of the input device name (None = default device)
    pub device_name: Option<String>,

    /// Linear gain applied before quantizing to 16-bit, clamped to [0, 1]
    pub input_gain: f32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: 100,
            device_name: None,
            input_gain: 1.0,
        }
    }
}

impl CaptureConfig {
    /// Gain after clamping to the usable range
    pub fn clamped_gain(&self) -> f32 {
        self.input_gain.clamp(0.0, 1.0)
    }

    /// Samples delivered per analysis interval at the given rate
    pub fn burst_samples(&self, sample_rate_hz: usize) -> usize {
        ((sample_rate_hz as u64 * self.update_interval_ms) / 1000).max(1) as usize
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.update_interval_ms == 0 {
            return Err("Update interval must be > 0 ms".to_string());
        }
        if !self.input_gain.is_finite() {
            return Err(format!("Input gain must be finite, got {}", self.input_gain));
        }
        Ok(())
    }
}
