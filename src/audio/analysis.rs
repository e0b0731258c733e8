//! Analysis thread and the byte queue that feeds it.

use log::debug;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use super::shared::{lock, SharedSpectrum};
use crate::spectrum::SpectrumFrame;

/// Bounded queue of little-endian 16-bit samples waiting for analysis.
///
/// Filled by the capture callback, drained by the analysis thread. When the
/// analysis side falls behind, the oldest bytes are discarded.
#[derive(Debug, Default)]
pub struct PcmQueue {
    bytes: VecDeque<u8>,
    max_bytes: usize,
}

impl PcmQueue {
    /// Queue holding at most `max_samples` samples
    pub fn new(max_samples: usize) -> Self {
        Self {
            bytes: VecDeque::new(),
            max_bytes: max_samples * 2,
        }
    }

    pub fn push_sample(&mut self, sample: i16) {
        self.bytes.extend(sample.to_le_bytes());
        // At most one sample's worth of eviction per push
        while self.bytes.len() > self.max_bytes {
            self.bytes.pop_front();
        }
    }

    /// Take all queued bytes, oldest first, leaving the queue empty
    pub fn take(&mut self) -> Vec<u8> {
        Vec::from(std::mem::take(&mut self.bytes))
    }

    pub fn len_samples(&self) -> usize {
        self.bytes.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Quantize a normalized sample (with gain) to signed 16-bit
#[inline]
pub fn quantize_sample(value: f32, gain: f32) -> i16 {
    let scaled = (value * gain * 32768.0).round();
    if scaled.is_nan() {
        return 0;
    }
    scaled.clamp(i16::MIN as f32, i16::MAX as f32) as i16
}

/// Drain the queue into the pipeline; None when nothing was queued
pub fn drain_and_update(
    queue: &Mutex<PcmQueue>,
    spectrum: &SharedSpectrum,
) -> Option<Arc<SpectrumFrame>> {
    // Release the queue before the transform so the capture callback never waits on it
    let bytes = {
        let mut queue = lock(queue);
        debug!("Draining {} queued samples", queue.len_samples());
        queue.take()
    };
    if bytes.is_empty() {
        return None;
    }
    Some(spectrum.ingest_and_update(&bytes))
}

/// Periodic analysis thread, stopped and joined on drop
pub struct AnalysisThread {
    stop: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl AnalysisThread {
    /// Spawn a thread that drains `queue` into `spectrum` every `interval_ms`
    pub fn spawn(
        interval_ms: u64,
        queue: Arc<Mutex<PcmQueue>>,
        spectrum: Arc<SharedSpectrum>,
    ) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = thread::spawn(move || {
            while !stop_flag.load(Ordering::Relaxed) {
                thread::sleep(Duration::from_millis(interval_ms));

                if let Some(frame) = drain_and_update(&queue, &spectrum) {
                    debug!(
                        "Published frame #{} ({} samples)",
                        frame.sequence,
                        frame.samples().len()
                    );
                }
            }
        });

        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Signal the thread to stop and wait for it
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for AnalysisThread {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{MagnitudeMode, SpectrumConfig};
    use std::time::Instant;

    fn small_spectrum() -> Arc<SharedSpectrum> {
        Arc::new(
            SharedSpectrum::new(SpectrumConfig {
                fft_size: 8,
                sample_rate_hz: 8,
                band_low_hz: 1,
                band_high_hz: 4,
                magnitude: MagnitudeMode::Exact,
            })
            .unwrap(),
        )
    }

    #[test]
    fn test_queue_drops_oldest_when_full() {
        let mut queue = PcmQueue::new(2);
        queue.push_sample(1);
        queue.push_sample(2);
        queue.push_sample(3);

        assert_eq!(queue.len_samples(), 2);
        assert_eq!(queue.take(), vec![2, 0, 3, 0]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_full_queue_keeps_newest_samples() {
        let mut queue = PcmQueue::new(96_000);
        for i in 0..96_000 {
            queue.push_sample((i % 1000) as i16);
        }

        // One more second at 48 kHz into a queue that is already full
        for i in 0..48_000 {
            queue.push_sample(-((i % 1000) as i16) - 1);
        }
        assert_eq!(queue.len_samples(), 96_000);

        let bytes = queue.take();
        let samples: Vec<i16> = bytes
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect();

        // Oldest surviving sample is the 48000th of the first fill
        assert_eq!(samples[0], (48_000 % 1000) as i16);
        assert_eq!(samples[47_999], (95_999 % 1000) as i16);
        assert_eq!(samples[48_000], -1);
        assert_eq!(samples[95_999], -((47_999 % 1000) as i16) - 1);
    }

    #[test]
    fn test_quantize_sample() {
        assert_eq!(quantize_sample(0.0, 1.0), 0);
        assert_eq!(quantize_sample(0.5, 1.0), 16384);
        assert_eq!(quantize_sample(-1.0, 1.0), i16::MIN);
        assert_eq!(quantize_sample(1.0, 1.0), i16::MAX); // Clipped
        assert_eq!(quantize_sample(0.5, 0.5), 8192);
        assert_eq!(quantize_sample(f32::NAN, 1.0), 0);
    }

    #[test]
    fn test_drain_and_update() {
        let queue = Mutex::new(PcmQueue::new(16));
        let spectrum = small_spectrum();

        assert!(drain_and_update(&queue, &spectrum).is_none());

        lock(&queue).push_sample(16384);
        let frame = drain_and_update(&queue, &spectrum).unwrap();
        assert_eq!(frame.samples(), &[0.5]);
        assert!(lock(&queue).is_empty());
    }

    #[test]
    fn test_thread_publishes_and_stops() {
        let queue = Arc::new(Mutex::new(PcmQueue::new(16)));
        let spectrum = small_spectrum();
        let mut analysis = AnalysisThread::spawn(1, Arc::clone(&queue), Arc::clone(&spectrum));

        lock(&queue).push_sample(-16384);

        let deadline = Instant::now() + Duration::from_secs(5);
        while spectrum.latest().is_none() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        analysis.stop();

        let frame = spectrum.latest().unwrap();
        assert_eq!(frame.samples(), &[-0.5]);
    }
}
