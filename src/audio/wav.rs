//! WAV file replay in fixed-size bursts.

use log::info;
use std::path::Path;

use crate::error::{Result, SpectrumError};

/// 16-bit mono WAV file delivered as little-endian PCM bursts
#[derive(Debug, Clone)]
pub struct WavSource {
    samples: Vec<i16>,
    position: usize,
    burst_samples: usize,
}

impl WavSource {
    /// Open `path`, requiring 16-bit integer mono audio at `sample_rate_hz`
    pub fn open<P: AsRef<Path>>(
        path: P,
        sample_rate_hz: usize,
        burst_samples: usize,
    ) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = hound::WavReader::open(path)
            .map_err(|e| SpectrumError::Wav(format!("{}: {}", path.display(), e)))?;

        let spec = reader.spec();
        if spec.channels != 1 {
            return Err(SpectrumError::Wav(format!(
                "{}: expected mono, got {} channels",
                path.display(),
                spec.channels
            )));
        }
        if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != 16 {
            return Err(SpectrumError::Wav(format!(
                "{}: expected 16-bit integer samples, got {}-bit {:?}",
                path.display(),
                spec.bits_per_sample,
                spec.sample_format
            )));
        }
        if spec.sample_rate as usize != sample_rate_hz {
            return Err(SpectrumError::Wav(format!(
                "{}: sample rate {} Hz does not match pipeline rate {} Hz",
                path.display(),
                spec.sample_rate,
                sample_rate_hz
            )));
        }

        let samples = reader
            .samples::<i16>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| SpectrumError::Wav(format!("{}: {}", path.display(), e)))?;

        info!(
            "WAV source: {} ({} samples, {:.1}s)",
            path.display(),
            samples.len(),
            samples.len() as f32 / sample_rate_hz as f32
        );

        Ok(Self::from_samples(samples, burst_samples))
    }

    /// Replay in-memory samples
    pub fn from_samples(samples: Vec<i16>, burst_samples: usize) -> Self {
        Self {
            samples,
            position: 0,
            burst_samples: burst_samples.max(1),
        }
    }

    /// Samples not yet delivered
    pub fn remaining_samples(&self) -> usize {
        self.samples.len() - self.position
    }
}

impl Iterator for WavSource {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Vec<u8>> {
        if self.position >= self.samples.len() {
            return None;
        }
        let end = (self.position + self.burst_samples).min(self.samples.len());
        let burst = self.samples[self.position..end]
            .iter()
            .flat_map(|s| s.to_le_bytes())
            .collect();
        self.position = end;
        Some(burst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_wav(name: &str, spec: hound::WavSpec, samples: &[i16]) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "spectroscope-{}-{}.wav",
            name,
            std::process::id()
        ));
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
        path
    }

    fn mono_spec(sample_rate: u32) -> hound::WavSpec {
        hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        }
    }

    #[test]
    fn test_bursts_cover_file() {
        let path = write_wav("bursts", mono_spec(8), &[1, -2, 3, -4, 5]);
        let mut source = WavSource::open(&path, 8, 2).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(source.remaining_samples(), 5);
        assert_eq!(source.next(), Some(vec![1, 0, 0xFE, 0xFF]));
        assert_eq!(source.next(), Some(vec![3, 0, 0xFC, 0xFF]));
        assert_eq!(source.next(), Some(vec![5, 0])); // Short final burst
        assert_eq!(source.next(), None);
    }

    #[test]
    fn test_rejects_rate_mismatch() {
        let path = write_wav("rate", mono_spec(44_100), &[0; 4]);
        let result = WavSource::open(&path, 48_000, 4);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(SpectrumError::Wav(_))));
    }

    #[test]
    fn test_rejects_stereo() {
        let spec = hound::WavSpec {
            channels: 2,
            ..mono_spec(8)
        };
        let path = write_wav("stereo", spec, &[0; 4]);
        let result = WavSource::open(&path, 8, 4);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(SpectrumError::Wav(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = WavSource::open("/nonexistent/spectroscope.wav", 8, 4);
        assert!(matches!(result, Err(SpectrumError::Wav(_))));
    }

    #[test]
    fn test_zero_burst_size_is_clamped() {
        let mut source = WavSource::from_samples(vec![7, 8], 0);
        assert_eq!(source.next(), Some(vec![7, 0]));
        assert_eq!(source.next(), Some(vec![8, 0]));
        assert_eq!(source.next(), None);
    }
}
