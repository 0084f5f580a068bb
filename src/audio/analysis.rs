use rayon::prelude::*;

use super::decode::AudioData;
use super::features::SpectrumFrame;
use super::spectrum::{SpectrumAnalyzer, SpectrumSmoother};
use crate::config::AnalysisSettings;

/// Runs the spectrum pipeline over a whole decoded file.
///
/// Pass 1 computes raw spectra in parallel, since the transform holds no
/// state. Pass 2 feeds them through the per-bin filters in frame order.
///
/// # Panics
/// * If `settings` would fail `AnalysisSettings::validate`
pub fn analyze(audio: &AudioData, settings: &AnalysisSettings) -> Vec<SpectrumFrame> {
    let starts = frame_starts(audio.samples.len(), settings.fft_size, settings.hop_size);

    log::info!(
        "Pass 1: Raw spectra ({} frames of {} samples, hop {})...",
        starts.len(),
        settings.fft_size,
        settings.hop_size
    );
    let raw = pass1_raw(&audio.samples, &starts, settings.fft_size);

    log::info!(
        "Pass 2: Smoothing ({:?}, cutoff={}Hz, fifo={})...",
        settings.smoothing,
        settings.cutoff_hz,
        settings.fifo_size
    );
    pass2_smooth(raw, &starts, audio.sample_rate, settings)
}

/// Start offsets of every full frame. A trailing partial frame is dropped.
pub fn frame_starts(total: usize, fft_size: usize, hop_size: usize) -> Vec<usize> {
    assert!(hop_size > 0, "hop size must be positive");
    if total < fft_size {
        return Vec::new();
    }
    (0..=total - fft_size).step_by(hop_size).collect()
}

fn pass1_raw(samples: &[f32], starts: &[usize], fft_size: usize) -> Vec<Vec<f32>> {
    starts
        .par_iter()
        .map(|&start| SpectrumAnalyzer::raw_spectrum(&samples[start..start + fft_size]))
        .collect()
}

fn pass2_smooth(
    raw: Vec<Vec<f32>>,
    starts: &[usize],
    sample_rate: u32,
    settings: &AnalysisSettings,
) -> Vec<SpectrumFrame> {
    let mut smoother =
        SpectrumSmoother::new(settings.smoothing, settings.cutoff_hz, settings.fifo_size);
    let bin_hz = sample_rate as f32 / settings.fft_size as f32;

    // Consumes `raw` so each raw spectrum is freed once it has been smoothed.
    raw.into_iter()
        .zip(starts)
        .enumerate()
        .map(|(index, (spectrum, &start))| {
            let mut bins = smoother.apply(&spectrum);
            let peak_bin = bins
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
                .map_or(0, |(i, _)| i);
            settings.display.clamp(&mut bins);

            SpectrumFrame {
                index,
                time: start as f32 / sample_rate as f32,
                peak_bin,
                peak_hz: peak_bin as f32 * bin_hz,
                bins,
            }
        })
        .collect()
}
