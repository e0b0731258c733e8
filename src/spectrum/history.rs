//! Bounded sample history and 16-bit PCM decoding.

use std::collections::VecDeque;

use crate::error::{Result, SpectrumError};

/// Full-scale value of a signed 16-bit sample
pub const PCM16_FULL_SCALE: f32 = 32768.0;

/// Normalize a signed 16-bit sample to [-1.0, 1.0)
#[inline]
pub fn normalize_sample(sample: i16) -> f32 {
    if sample == 0 {
        return 0.0;
    }
    sample as f32 / PCM16_FULL_SCALE
}

/// Decode little-endian signed 16-bit samples.
///
/// Only whole sample pairs are decoded; a trailing odd byte is ignored.
pub fn pcm16le_samples(bytes: &[u8]) -> impl Iterator<Item = f32> + '_ {
    bytes
        .chunks_exact(2)
        .map(|pair| normalize_sample(i16::from_le_bytes([pair[0], pair[1]])))
}

/// Rolling history of normalized samples, oldest first, never longer than its capacity
#[derive(Debug, Clone)]
pub struct SampleHistory {
    samples: VecDeque<f32>,
    capacity: usize,
}

impl SampleHistory {
    /// Create an empty history holding at most `capacity` samples
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut samples = VecDeque::new();
        samples.try_reserve_exact(capacity).map_err(|e| {
            SpectrumError::Allocation(format!("sample history of {} samples: {}", capacity, e))
        })?;
        Ok(Self { samples, capacity })
    }

    /// Append one sample, evicting the oldest when full
    pub fn push(&mut self, sample: f32) {
        if self.capacity == 0 {
            return;
        }
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Append samples in order, returning how many were consumed
    pub fn extend<I: IntoIterator<Item = f32>>(&mut self, samples: I) -> usize {
        let mut count = 0;
        for sample in samples {
            self.push(sample);
            count += 1;
        }
        count
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// True once the history holds `capacity` samples
    pub fn is_full(&self) -> bool {
        self.samples.len() == self.capacity
    }

    /// Snapshot of the history, oldest first
    pub fn to_vec(&self) -> Vec<f32> {
        self.samples.iter().copied().collect()
    }

    /// Copy the most recent samples into `dest`, oldest at index 0.
    ///
    /// Slots past the available history are zeroed, so a short history never
    /// leaves stale values from a previous cycle in `dest`.
    pub fn copy_into(&self, dest: &mut [f32]) {
        let skip = self.samples.len().saturating_sub(dest.len());
        let mut written = 0;
        for (slot, &sample) in dest.iter_mut().zip(self.samples.iter().skip(skip)) {
            *slot = sample;
            written += 1;
        }
        dest[written..].fill(0.0);
    }
}
