//! Parameter definitions with physical units and documented semantics.

mod capture;
mod spectrum;

// Re-export all types
pub use capture::CaptureConfig;
pub use spectrum::{MagnitudeMode, SpectrumConfig};
