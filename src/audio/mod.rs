//! Audio capture and threaded spectrum analysis.
//!
//! Capture callbacks only queue raw 16-bit PCM; a separate analysis thread
//! drains the queue into the shared pipeline and publishes whole frames.

mod analysis;
mod capture;
mod shared;
mod wav;

// Re-export public types
pub use analysis::{drain_and_update, quantize_sample, AnalysisThread, PcmQueue};
pub use capture::{list_input_devices, AudioSystem};
pub use shared::SharedSpectrum;
pub use wav::WavSource;
