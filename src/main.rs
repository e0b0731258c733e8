//! Spectroscope - live audio history and spectrum monitor
//!
//! Captures mono audio (or replays a WAV file), keeps a rolling history,
//! and reports the strongest audible-band bin after every analysis cycle.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::thread;
use std::time::{Duration, Instant};

use spectroscope::audio::{list_input_devices, AudioSystem, WavSource};
use spectroscope::cli::Args;
use spectroscope::{CaptureConfig, SpectrumConfig, SpectrumFrame, SpectrumPipeline};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.list_devices {
        for name in list_input_devices().context("Listing input devices")? {
            println!("{}", name);
        }
        return Ok(());
    }

    let spectrum_config = args.spectrum_config();
    let capture_config = args.capture_config();
    let deadline = run_deadline(args.duration, Instant::now())?;

    match &args.wav {
        Some(path) => run_wav(path, spectrum_config, capture_config, deadline),
        None => run_live(spectrum_config, capture_config, deadline),
    }
}

/// Instant at which to stop, None to run until interrupted
fn run_deadline(duration_secs: Option<f32>, start: Instant) -> Result<Option<Instant>> {
    let Some(secs) = duration_secs else {
        return Ok(None);
    };
    let duration = Duration::try_from_secs_f32(secs)
        .with_context(|| format!("Invalid --duration {}", secs))?;
    let deadline = start
        .checked_add(duration)
        .with_context(|| format!("--duration {} is too large", secs))?;
    Ok(Some(deadline))
}

/// Replay a WAV file through a pipeline, paced at the analysis interval
fn run_wav(
    path: &std::path::Path,
    spectrum_config: SpectrumConfig,
    capture_config: CaptureConfig,
    deadline: Option<Instant>,
) -> Result<()> {
    capture_config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("Invalid capture config")?;

    let burst = capture_config.burst_samples(spectrum_config.sample_rate_hz);
    let mut source = WavSource::open(path, spectrum_config.sample_rate_hz, burst)
        .with_context(|| format!("Opening {}", path.display()))?;
    let mut pipeline =
        SpectrumPipeline::new(spectrum_config).context("Building spectrum pipeline")?;

    let interval = Duration::from_millis(capture_config.update_interval_ms);
    for bytes in source.by_ref() {
        pipeline.ingest(&bytes);
        report(&pipeline.update());

        if deadline.is_some_and(|d| Instant::now() >= d) {
            break;
        }
        thread::sleep(interval);
    }

    info!(
        "WAV replay finished ({} samples not played)",
        source.remaining_samples()
    );
    Ok(())
}

/// Capture from an input device until the deadline (or forever)
fn run_live(
    spectrum_config: SpectrumConfig,
    capture_config: CaptureConfig,
    deadline: Option<Instant>,
) -> Result<()> {
    let interval = Duration::from_millis(capture_config.update_interval_ms);
    let audio =
        AudioSystem::start(spectrum_config, capture_config).context("Starting audio capture")?;

    info!("Capturing, press Ctrl-C to quit");

    let mut last_sequence = 0;
    while deadline.map_or(true, |d| Instant::now() < d) {
        thread::sleep(interval);

        if let Some(frame) = audio.latest() {
            if frame.sequence != last_sequence {
                last_sequence = frame.sequence;
                report(&frame);
            }
        }
    }

    Ok(())
}

/// One-line summary of a published frame
fn report(frame: &SpectrumFrame) {
    match frame.peak() {
        Some((freq, magnitude)) => info!(
            "#{:<5} history={:<6} rms={:.4} peak={:.1} Hz ({:.3})",
            frame.sequence,
            frame.samples().len(),
            frame.rms(),
            freq,
            magnitude
        ),
        None => info!(
            "#{:<5} history={:<6} rms={:.4} (empty band)",
            frame.sequence,
            frame.samples().len(),
            frame.rms()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_deadline() {
        let start = Instant::now();

        assert_eq!(run_deadline(None, start).unwrap(), None);
        assert_eq!(
            run_deadline(Some(1.5), start).unwrap(),
            Some(start + Duration::from_millis(1500))
        );
    }

    #[test]
    fn test_run_deadline_rejects_unrepresentable() {
        let start = Instant::now();

        assert!(run_deadline(Some(1e30), start).is_err());
        assert!(run_deadline(Some(-1.0), start).is_err());
        assert!(run_deadline(Some(f32::NAN), start).is_err());
        assert!(run_deadline(Some(f32::INFINITY), start).is_err());
    }
}
