//! # Spectrum pipeline
//!
//! Turns one frame of mono samples into a smoothed decibel spectrum:
//! FFT, magnitude in dB for the first N/2 bins, then one smoothing filter per
//! bin across successive frames.

use serde::{Deserialize, Serialize};

use crate::dsp::complex::ComplexBuffer;
use crate::dsp::fft;
use crate::dsp::filters::{FifoFilter, LowPassFilter};

/// Added to each magnitude before taking the log so silent bins stay finite.
pub const MAGNITUDE_FLOOR: f32 = 1e-10;

/// Which per-bin filter smooths the spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SmoothingMode {
    /// Single-pole IIR per bin
    #[serde(rename = "lpf")]
    #[value(name = "lpf")]
    LowPass,
    /// Weighted moving average per bin
    Fifo,
}

/// Clamp range applied before handing a spectrum to a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    Line,
    Bar,
    /// No clamping
    Raw,
}

impl DisplayMode {
    pub fn range(self) -> Option<(f32, f32)> {
        match self {
            Self::Line => Some((-140.0, 0.0)),
            Self::Bar => Some((-140.0, 40.0)),
            Self::Raw => None,
        }
    }

    pub fn clamp(self, bins: &mut [f32]) {
        if let Some((lo, hi)) = self.range() {
            for v in bins.iter_mut() {
                *v = v.clamp(lo, hi);
            }
        }
    }
}

/// Magnitude in dB of the first `N/2` bins of a transformed buffer.
pub fn magnitudes_db(spectrum: &ComplexBuffer) -> Vec<f32> {
    spectrum
        .iter()
        .take(spectrum.len() / 2)
        .map(|(re, im)| 20.0 * ((re * re + im * im).sqrt() + MAGNITUDE_FLOOR).log10())
        .collect()
}

/// Per-bin smoothing state for both filter kinds.
///
/// Each bank holds one filter per bin. A bank whose length does not match
/// the incoming spectrum is rebuilt from scratch; that discontinuity is
/// accepted when the transform size changes. FIFO capacity, on the other
/// hand, changes in place so the displayed spectrum does not jump.
#[derive(Debug, Clone)]
pub struct SpectrumSmoother {
    mode: SmoothingMode,
    cutoff_hz: f32,
    fifo_size: usize,
    low_pass: Vec<LowPassFilter>,
    fifo: Vec<FifoFilter>,
}

impl SpectrumSmoother {
    /// # Panics
    /// * If `fifo_size` is zero
    pub fn new(mode: SmoothingMode, cutoff_hz: f32, fifo_size: usize) -> Self {
        assert!(fifo_size > 0, "FIFO filter size must be positive");
        Self {
            mode,
            cutoff_hz,
            fifo_size,
            low_pass: Vec::new(),
            fifo: Vec::new(),
        }
    }

    pub fn mode(&self) -> SmoothingMode {
        self.mode
    }

    pub fn cutoff_hz(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn fifo_size(&self) -> usize {
        self.fifo_size
    }

    /// Number of bins the active bank is currently sized for.
    pub fn bins(&self) -> usize {
        match self.mode {
            SmoothingMode::LowPass => self.low_pass.len(),
            SmoothingMode::Fifo => self.fifo.len(),
        }
    }

    pub fn set_mode(&mut self, mode: SmoothingMode) {
        self.mode = mode;
    }

    /// Replaces the low-pass bank; the coefficient of an existing filter
    /// never changes. Setting the current cutoff again keeps the bank.
    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        if cutoff_hz == self.cutoff_hz {
            return;
        }
        self.cutoff_hz = cutoff_hz;
        let bins = self.low_pass.len();
        log::debug!("Rebuilding low-pass bank: {} bins at {}Hz", bins, cutoff_hz);
        self.low_pass = (0..bins).map(|_| LowPassFilter::new(cutoff_hz)).collect();
    }

    /// Resizes every FIFO in place, keeping their last outputs.
    ///
    /// # Panics
    /// * If `size` is zero
    pub fn set_fifo_size(&mut self, size: usize) {
        assert!(size > 0, "FIFO filter size must be positive");
        if size == self.fifo_size {
            return;
        }
        log::debug!("Resizing {} FIFO filters: {} -> {}", self.fifo.len(), self.fifo_size, size);
        self.fifo_size = size;
        for filter in &mut self.fifo {
            filter.resize(size);
        }
    }

    pub fn reset(&mut self) {
        self.low_pass.iter_mut().for_each(LowPassFilter::reset);
        self.fifo.iter_mut().for_each(FifoFilter::reset);
    }

    /// Smooths one spectrum, one filter per bin.
    pub fn apply(&mut self, spectrum: &[f32]) -> Vec<f32> {
        let bins = spectrum.len();
        match self.mode {
            SmoothingMode::LowPass => {
                if self.low_pass.len() != bins {
                    log::debug!("Creating low-pass bank: {} bins at {}Hz", bins, self.cutoff_hz);
                    self.low_pass = (0..bins).map(|_| LowPassFilter::new(self.cutoff_hz)).collect();
                }
                self.low_pass
                    .iter_mut()
                    .zip(spectrum)
                    .map(|(filter, &v)| filter.process(v))
                    .collect()
            }
            SmoothingMode::Fifo => {
                if self.fifo.len() != bins {
                    log::debug!("Creating FIFO bank: {} bins of size {}", bins, self.fifo_size);
                    self.fifo = (0..bins).map(|_| FifoFilter::new(self.fifo_size)).collect();
                }
                self.fifo
                    .iter_mut()
                    .zip(spectrum)
                    .map(|(filter, &v)| filter.process(v))
                    .collect()
            }
        }
    }
}

/// Frame-in, smoothed-spectrum-out analyzer for a fixed transform size.
///
/// Not reentrant: one analyzer per audio stream, fed from a single thread.
#[derive(Debug, Clone)]
pub struct SpectrumAnalyzer {
    fft_size: usize,
    smoother: SpectrumSmoother,
}

impl SpectrumAnalyzer {
    /// # Panics
    /// * If `fft_size` is zero
    pub fn new(fft_size: usize, smoother: SpectrumSmoother) -> Self {
        assert!(fft_size > 0, "FFT size must be positive");
        Self { fft_size, smoother }
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    pub fn smoother(&self) -> &SpectrumSmoother {
        &self.smoother
    }

    pub fn smoother_mut(&mut self) -> &mut SpectrumSmoother {
        &mut self.smoother
    }

    /// Takes effect on the next frame; the filter banks are rebuilt then.
    ///
    /// # Panics
    /// * If `fft_size` is zero
    pub fn set_fft_size(&mut self, fft_size: usize) {
        assert!(fft_size > 0, "FFT size must be positive");
        self.fft_size = fft_size;
    }

    /// Unsmoothed dB spectrum of one frame. Holds no state.
    ///
    /// # Panics
    /// * If `frame` is empty
    pub fn raw_spectrum(frame: &[f32]) -> Vec<f32> {
        let mut buffer = ComplexBuffer::from_real(frame);
        fft::transform(&mut buffer);
        magnitudes_db(&buffer)
    }

    /// # Panics
    /// * If `frame.len()` differs from the configured FFT size
    pub fn process_frame(&mut self, frame: &[f32]) -> Vec<f32> {
        assert_eq!(
            frame.len(),
            self.fft_size,
            "frame length must equal the FFT size"
        );
        let raw = Self::raw_spectrum(frame);
        self.smoother.apply(&raw)
    }
}
