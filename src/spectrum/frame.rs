//! One published cycle of pipeline output.

use std::sync::Arc;

/// Time-domain and frequency-domain series produced by a single update.
///
/// The index series are shared with the pipeline; the samples and magnitudes
/// belong to this cycle only, so both pairs always come from the same update.
#[derive(Debug, Clone)]
pub struct SpectrumFrame {
    /// Update counter (1 for the first update of a pipeline)
    pub sequence: u64,
    sample_indices: Arc<[f32]>,
    samples: Vec<f32>,
    frequencies: Arc<[f32]>,
    magnitudes: Vec<f32>,
}

impl SpectrumFrame {
    pub(crate) fn new(
        sequence: u64,
        sample_indices: Arc<[f32]>,
        samples: Vec<f32>,
        frequencies: Arc<[f32]>,
        magnitudes: Vec<f32>,
    ) -> Self {
        debug_assert!(samples.len() <= sample_indices.len());
        debug_assert!(magnitudes.len() <= frequencies.len());
        Self {
            sequence,
            sample_indices,
            samples,
            frequencies,
            magnitudes,
        }
    }

    /// (sample index, amplitude) pairs, oldest sample first
    pub fn time_series(&self) -> (&[f32], &[f32]) {
        let len = self.samples.len().min(self.sample_indices.len());
        (&self.sample_indices[..len], &self.samples[..len])
    }

    /// (frequency in Hz, magnitude) pairs over the configured band
    pub fn frequency_series(&self) -> (&[f32], &[f32]) {
        let len = self.magnitudes.len().min(self.frequencies.len());
        (&self.frequencies[..len], &self.magnitudes[..len])
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn magnitudes(&self) -> &[f32] {
        &self.magnitudes
    }

    /// Strongest bin as (frequency Hz, magnitude), None for an empty band
    pub fn peak(&self) -> Option<(f32, f32)> {
        let (frequencies, magnitudes) = self.frequency_series();
        frequencies
            .iter()
            .zip(magnitudes)
            .fold(None, |best: Option<(f32, f32)>, (&f, &m)| match best {
                Some((_, best_m)) if best_m >= m => best,
                _ if m.is_nan() => best,
                _ => Some((f, m)),
            })
    }

    /// Root-mean-square of the time-domain samples (0 when empty)
    pub fn rms(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sum_sq: f32 = self.samples.iter().map(|s| s * s).sum();
        (sum_sq / self.samples.len() as f32).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(samples: Vec<f32>, magnitudes: Vec<f32>) -> SpectrumFrame {
        let indices: Arc<[f32]> = (0..4).map(|i| i as f32).collect();
        let frequencies: Arc<[f32]> = vec![100.0, 200.0, 300.0, 400.0].into();
        SpectrumFrame::new(1, indices, samples, frequencies, magnitudes)
    }

    #[test]
    fn test_series_are_aligned() {
        let frame = frame(vec![0.5, -0.5], vec![1.0, 3.0, 2.0]);

        let (indices, samples) = frame.time_series();
        assert_eq!(indices, &[0.0, 1.0]);
        assert_eq!(samples, &[0.5, -0.5]);

        // Frequency series truncated to magnitude length
        let (freqs, mags) = frame.frequency_series();
        assert_eq!(freqs, &[100.0, 200.0, 300.0]);
        assert_eq!(mags.len(), freqs.len());
    }

    #[test]
    fn test_peak_and_rms() {
        let frame = frame(vec![0.5, -0.5, 0.5, -0.5], vec![1.0, 3.0, 2.0]);

        assert_eq!(frame.peak(), Some((200.0, 3.0)));
        assert!((frame.rms() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_empty_frame() {
        let frame = frame(vec![], vec![]);

        assert_eq!(frame.peak(), None);
        assert_eq!(frame.rms(), 0.0);
    }
}
