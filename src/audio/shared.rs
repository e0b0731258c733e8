//! Pipeline shared between the capture side and display consumers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::Result;
use crate::params::SpectrumConfig;
use crate::spectrum::{SpectrumFrame, SpectrumPipeline};

/// Lock a mutex, recovering the data if a holder panicked
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Serialized pipeline with an atomically published latest frame.
///
/// Ingest and update run under one lock; readers only ever see a whole
/// `SpectrumFrame`, so the time and frequency series they get always come
/// from the same update.
pub struct SharedSpectrum {
    pipeline: Mutex<SpectrumPipeline>,
    latest: Mutex<Option<Arc<SpectrumFrame>>>,
}

impl SharedSpectrum {
    pub fn new(config: SpectrumConfig) -> Result<Self> {
        Ok(Self::from_pipeline(SpectrumPipeline::new(config)?))
    }

    pub fn from_pipeline(pipeline: SpectrumPipeline) -> Self {
        Self {
            pipeline: Mutex::new(pipeline),
            latest: Mutex::new(None),
        }
    }

    /// Feed one burst and publish the resulting frame
    pub fn ingest_and_update(&self, bytes: &[u8]) -> Arc<SpectrumFrame> {
        let mut pipeline = lock(&self.pipeline);
        pipeline.ingest(bytes);
        let frame = Arc::new(pipeline.update());

        // Published while the pipeline lock is held so frames appear in sequence order
        *lock(&self.latest) = Some(Arc::clone(&frame));
        frame
    }

    /// Most recently published frame (None before the first update)
    pub fn latest(&self) -> Option<Arc<SpectrumFrame>> {
        lock(&self.latest).clone()
    }
}
