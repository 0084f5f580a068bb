use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::audio::spectrum::{DisplayMode, SmoothingMode};
use crate::dsp::filters::{CutoffPreset, LowPassFilter};

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_fft_size")]
    pub fft_size: usize,
    #[serde(default)]
    pub hop_size: Option<usize>,
    #[serde(default = "default_smoothing")]
    pub smoothing: SmoothingMode,
    #[serde(default = "default_cutoff_hz")]
    pub cutoff_hz: f32,
    #[serde(default = "default_fifo_size")]
    pub fifo_size: usize,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_display")]
    pub display: DisplayMode,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            fft_size: default_fft_size(),
            hop_size: None,
            smoothing: default_smoothing(),
            cutoff_hz: default_cutoff_hz(),
            fifo_size: default_fifo_size(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            display: default_display(),
        }
    }
}

pub fn default_fft_size() -> usize { 2048 }
pub fn default_smoothing() -> SmoothingMode { SmoothingMode::LowPass }
pub fn default_cutoff_hz() -> f32 { 1.0 }
pub fn default_fifo_size() -> usize { 4 }
pub fn default_display() -> DisplayMode { DisplayMode::Line }

/// Transform sizes offered by the interactive analyzer. Any positive size
/// works; these take the radix-2 path.
pub const FFT_SIZE_PRESETS: [usize; 3] = [1024, 2048, 4096];

/// Text printed by `--list-presets`. Alpha values come from the filter
/// itself so the listing cannot disagree with it.
pub fn preset_listing() -> String {
    let mut out = String::from("Low-pass cutoffs:\n");
    for preset in CutoffPreset::ALL {
        let alpha = LowPassFilter::from_preset(preset).alpha();
        out.push_str(&format!("  {:<8} alpha={}\n", preset.to_string(), alpha));
    }
    out.push_str("FFT sizes:\n");
    for size in FFT_SIZE_PRESETS {
        out.push_str(&format!("  {}\n", size));
    }
    out
}

pub fn load_config(path: &Path) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(err) => {
            log::warn!("Invalid config {}: {}", path.display(), err);
            None
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("FFT size must be positive")]
    ZeroFftSize,
    #[error("hop size must be positive")]
    ZeroHopSize,
    #[error("FIFO size must be positive")]
    ZeroFifoSize,
    #[error("unsupported low-pass cutoff {0}Hz (expected one of 0.25, 0.5, 1)")]
    UnsupportedCutoff(f32),
}

/// Fully resolved settings for one analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    pub fft_size: usize,
    pub hop_size: usize,
    pub smoothing: SmoothingMode,
    pub cutoff_hz: f32,
    pub fifo_size: usize,
    pub display: DisplayMode,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl AnalysisSettings {
    pub fn from_config(config: &Config) -> Self {
        let analysis = &config.analysis;
        Self {
            fft_size: analysis.fft_size,
            hop_size: analysis.hop_size.unwrap_or(analysis.fft_size),
            smoothing: analysis.smoothing,
            cutoff_hz: analysis.cutoff_hz,
            fifo_size: analysis.fifo_size,
            display: config.output.display,
        }
    }

    /// Checks the preconditions the DSP layer asserts on, so bad input
    /// surfaces as an error instead of a panic.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fft_size == 0 {
            return Err(ConfigError::ZeroFftSize);
        }
        if self.hop_size == 0 {
            return Err(ConfigError::ZeroHopSize);
        }
        if self.fifo_size == 0 {
            return Err(ConfigError::ZeroFifoSize);
        }
        CutoffPreset::try_from(self.cutoff_hz).map_err(ConfigError::UnsupportedCutoff)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        let settings = AnalysisSettings::from_config(&config);
        assert_eq!(settings.fft_size, 2048);
        assert_eq!(settings.hop_size, 2048);
        assert_eq!(settings.smoothing, SmoothingMode::LowPass);
        assert_eq!(settings.cutoff_hz, 1.0);
        assert_eq!(settings.fifo_size, 4);
        assert_eq!(settings.display, DisplayMode::Line);
        assert_eq!(settings.validate(), Ok(()));
    }

    #[test]
    fn parses_all_fields() {
        let config: Config = toml::from_str(
            r#"
            [analysis]
            fft_size = 1000
            hop_size = 500
            smoothing = "fifo"
            cutoff_hz = 0.25
            fifo_size = 8

            [output]
            display = "bar"
            "#,
        )
        .unwrap();
        let settings = AnalysisSettings::from_config(&config);
        assert_eq!(
            settings,
            AnalysisSettings {
                fft_size: 1000,
                hop_size: 500,
                smoothing: SmoothingMode::Fifo,
                cutoff_hz: 0.25,
                fifo_size: 8,
                display: DisplayMode::Bar,
            }
        );
    }

    #[test]
    fn low_pass_is_spelled_lpf() {
        let config: Config = toml::from_str("[analysis]\nsmoothing = \"lpf\"").unwrap();
        assert_eq!(config.analysis.smoothing, SmoothingMode::LowPass);
        assert!(toml::from_str::<Config>("[analysis]\nsmoothing = \"lowpass\"").is_err());
    }

    #[test]
    fn validation_errors() {
        let base = AnalysisSettings::default();

        let settings = AnalysisSettings { fft_size: 0, ..base.clone() };
        assert_eq!(settings.validate(), Err(ConfigError::ZeroFftSize));

        let settings = AnalysisSettings { hop_size: 0, ..base.clone() };
        assert_eq!(settings.validate(), Err(ConfigError::ZeroHopSize));

        let settings = AnalysisSettings { fifo_size: 0, ..base.clone() };
        assert_eq!(settings.validate(), Err(ConfigError::ZeroFifoSize));

        let settings = AnalysisSettings { cutoff_hz: 3.0, ..base };
        assert_eq!(settings.validate(), Err(ConfigError::UnsupportedCutoff(3.0)));
    }

    #[test]
    fn cutoff_error_message() {
        assert_eq!(
            ConfigError::UnsupportedCutoff(2.0).to_string(),
            "unsupported low-pass cutoff 2Hz (expected one of 0.25, 0.5, 1)"
        );
    }

    #[test]
    fn preset_listing_uses_filter_alpha() {
        let listing = preset_listing();
        for preset in CutoffPreset::ALL {
            let line = format!(
                "  {:<8} alpha={}",
                preset.to_string(),
                LowPassFilter::from_preset(preset).alpha()
            );
            assert!(listing.contains(&line), "missing {:?}", line);
        }
        assert!(listing.contains("  4096\n"));
        assert_eq!(listing.lines().count(), 8);
    }

    #[test]
    fn missing_file_is_none() {
        assert!(load_config(Path::new("/nonexistent/smoothspec.toml")).is_none());
    }
}
