//! Spectroscope library - rolling audio history and live spectrum analysis

pub mod audio;
pub mod cli;
pub mod error;
pub mod params;
pub mod spectrum;

pub use error::{Result, SpectrumError};
pub use params::{CaptureConfig, MagnitudeMode, SpectrumConfig};
pub use spectrum::{SpectrumFrame, SpectrumPipeline};
