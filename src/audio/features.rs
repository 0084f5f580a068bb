use serde::Serialize;

/// One smoothed spectrum, ready for a renderer.
#[derive(Clone, Debug, Serialize)]
pub struct SpectrumFrame {
    /// Position in the frame sequence
    pub index: usize,
    /// Start of the analysed frame, in seconds
    pub time: f32,
    /// Loudest bin after smoothing
    pub peak_bin: usize,
    /// Centre frequency of `peak_bin` in Hz
    pub peak_hz: f32,
    /// Smoothed magnitudes in dB, N/2 elements
    pub bins: Vec<f32>,
}
