//! Forward real-input FFT with half-complex output packing.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

use crate::error::{Result, SpectrumError};

/// Allocate a buffer of `len` copies of `value`, reporting allocation failure
pub(crate) fn alloc_buffer<T: Clone>(len: usize, value: T, what: &str) -> Result<Vec<T>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|e| SpectrumError::Allocation(format!("{} ({} slots): {}", what, len, e)))?;
    buffer.resize(len, value);
    Ok(buffer)
}

/// Fixed-size forward transform.
///
/// Plan, work buffer and scratch are allocated once and reused by every
/// `process` call. Output follows the half-complex layout:
/// `out[0] = Re X0`, `out[k] = Re Xk` for `1 <= k <= N/2`,
/// `out[N-k] = Im Xk` for `1 <= k < (N+1)/2`.
pub struct HalfComplexFft {
    fft: Arc<dyn Fft<f32>>,
    spectrum: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
}

impl HalfComplexFft {
    /// Plan a transform of `size` points
    pub fn new(size: usize) -> Result<Self> {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        let spectrum = alloc_buffer(size, Complex::new(0.0, 0.0), "transform work buffer")?;
        let scratch = alloc_buffer(
            fft.get_inplace_scratch_len(),
            Complex::new(0.0, 0.0),
            "transform scratch",
        )?;

        Ok(Self {
            fft,
            spectrum,
            scratch,
        })
    }

    /// Transform size (points)
    pub fn len(&self) -> usize {
        self.spectrum.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spectrum.is_empty()
    }

    /// Transform `input` and write the half-complex packing into `output`.
    ///
    /// Both slices must be exactly `len()` long.
    pub fn process(&mut self, input: &[f32], output: &mut [f32]) {
        let n = self.len();
        assert_eq!(input.len(), n, "transform input length");
        assert_eq!(output.len(), n, "transform output length");
        if n == 0 {
            return;
        }

        for (bin, &x) in self.spectrum.iter_mut().zip(input) {
            *bin = Complex::new(x, 0.0);
        }
        self.fft
            .process_with_scratch(&mut self.spectrum, &mut self.scratch);

        output[0] = self.spectrum[0].re;
        for k in 1..(n + 1) / 2 {
            output[k] = self.spectrum[k].re;
            output[n - k] = self.spectrum[k].im;
        }
        if n % 2 == 0 {
            output[n / 2] = self.spectrum[n / 2].re;
        }
    }

    /// Complex value of bin `k` from the most recent `process` call
    pub fn bin(&self, k: usize) -> Complex<f32> {
        self.spectrum[k]
    }
}
