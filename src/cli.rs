use clap::Parser;
use std::path::PathBuf;

use smoothspec::{DisplayMode, SmoothingMode};

#[derive(Parser, Debug)]
#[command(name = "smoothspec", about = "Smoothed dB magnitude spectra from audio files")]
pub struct Cli {
    /// Input audio file (WAV, MP3, FLAC, OGG)
    pub input: Option<PathBuf>,

    /// Output file for JSON-lines frames (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Config file (defaults to smoothspec.toml or the user config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Samples per analysis frame; powers of two take the fast path
    #[arg(long, default_value_t = 2048)]
    pub fft_size: usize,

    /// Samples between frame starts (defaults to the FFT size)
    #[arg(long)]
    pub hop_size: Option<usize>,

    /// Per-bin smoothing filter
    #[arg(long, value_enum, default_value_t = SmoothingMode::LowPass)]
    pub smoothing: SmoothingMode,

    /// Low-pass cutoff in Hz (0.25, 0.5 or 1)
    #[arg(long, default_value_t = 1.0)]
    pub cutoff: f32,

    /// FIFO history length per bin
    #[arg(long, default_value_t = 4)]
    pub fifo_size: usize,

    /// Clamp range for output values
    #[arg(long, value_enum, default_value_t = DisplayMode::Line)]
    pub display: DisplayMode,

    /// List cutoff and FFT size presets and exit
    #[arg(long)]
    pub list_presets: bool,
}
