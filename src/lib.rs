//! Smoothed magnitude spectra for real-time audio display.
//!
//! Frames of mono samples go through an arbitrary-length FFT, are reduced to
//! decibel magnitudes, and are then smoothed per frequency bin across frames
//! so the rendered spectrum does not flicker.

pub mod audio;
pub mod config;
pub mod dsp;
pub mod encode;

pub use audio::spectrum::{DisplayMode, SmoothingMode, SpectrumAnalyzer, SpectrumSmoother};
pub use dsp::complex::ComplexBuffer;
