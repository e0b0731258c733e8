//! Error types for the spectrum pipeline and its capture glue

use std::fmt;

/// Errors that can occur while building or feeding a spectrum pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum SpectrumError {
    /// Configuration rejected by validation
    InvalidConfig(String),

    /// Transform buffers could not be allocated
    Allocation(String),

    /// No usable audio input device
    Device(String),

    /// Audio stream could not be built or started
    Stream(String),

    /// WAV source could not be opened or has an unsupported format
    Wav(String),
}

impl fmt::Display for SpectrumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpectrumError::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
            SpectrumError::Allocation(msg) => write!(f, "Allocation failed: {}", msg),
            SpectrumError::Device(msg) => write!(f, "Device error: {}", msg),
            SpectrumError::Stream(msg) => write!(f, "Stream error: {}", msg),
            SpectrumError::Wav(msg) => write!(f, "WAV error: {}", msg),
        }
    }
}

impl std::error::Error for SpectrumError {}

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, SpectrumError>;
