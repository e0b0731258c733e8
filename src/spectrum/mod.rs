//! Rolling sample history, fixed-size transform and audible-band magnitudes.

mod frame;
mod history;
mod pipeline;
mod transform;

pub use frame::SpectrumFrame;
pub use history::{normalize_sample, pcm16le_samples, SampleHistory, PCM16_FULL_SCALE};
pub use pipeline::SpectrumPipeline;
pub use transform::HalfComplexFft;
