mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

use cli::Cli;
use smoothspec::audio::{analysis, decode};
use smoothspec::config::{self, AnalysisSettings};
use smoothspec::encode::jsonl::FrameWriter;
use smoothspec::{DisplayMode, SmoothingMode};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut cli = Cli::parse();

    if cli.list_presets {
        print!("{}", config::preset_listing());
        return Ok(());
    }

    // Explicit --config path, or auto-detect smoothspec.toml / global config
    let config_path = cli.config.clone().or_else(|| {
        let local = PathBuf::from("smoothspec.toml");
        if local.exists() {
            return Some(local);
        }
        if let Some(home) = dirs::home_dir() {
            let xdg = home.join(".config").join("smoothspec").join("config.toml");
            if xdg.exists() {
                return Some(xdg);
            }
        }
        if let Some(config_dir) = dirs::config_dir() {
            let platform = config_dir.join("smoothspec").join("config.toml");
            if platform.exists() {
                return Some(platform);
            }
        }
        None
    });
    if let Some(ref path) = config_path {
        if let Some(cfg) = config::load_config(path) {
            log::info!("Loaded config from {}", path.display());
            // Merge: config values apply only when CLI is at its default
            if cli.fft_size == config::default_fft_size() { cli.fft_size = cfg.analysis.fft_size; }
            if cli.hop_size.is_none() { cli.hop_size = cfg.analysis.hop_size; }
            if cli.smoothing == SmoothingMode::LowPass { cli.smoothing = cfg.analysis.smoothing; }
            if cli.cutoff == config::default_cutoff_hz() { cli.cutoff = cfg.analysis.cutoff_hz; }
            if cli.fifo_size == config::default_fifo_size() { cli.fifo_size = cfg.analysis.fifo_size; }
            if cli.display == DisplayMode::Line { cli.display = cfg.output.display; }
        } else {
            log::warn!("Failed to load config from {}", path.display());
        }
    }

    let input = cli.input.as_ref().context("Input audio file is required")?;
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let settings = AnalysisSettings {
        fft_size: cli.fft_size,
        hop_size: cli.hop_size.unwrap_or(cli.fft_size),
        smoothing: cli.smoothing,
        cutoff_hz: cli.cutoff,
        fifo_size: cli.fifo_size,
        display: cli.display,
    };
    settings.validate().context("Invalid analysis settings")?;
    if !settings.fft_size.is_power_of_two() {
        log::warn!("FFT size {} is not a power of two; using the mixed-radix path", settings.fft_size);
    }

    log::info!("smoothspec - smoothed audio spectra");
    log::info!("Input: {}", input.display());
    match cli.output {
        Some(ref path) => log::info!("Output: {}", path.display()),
        None => log::info!("Output: stdout"),
    }

    // 1. Decode audio
    log::info!("Decoding audio...");
    let audio_data = decode::decode_audio(input)?;

    // 2. Analyze (parallel spectra, sequential smoothing)
    log::info!("Analyzing audio...");
    let frames = analysis::analyze(&audio_data, &settings);
    log::info!("Total frames: {}, Duration: {:.1}s", frames.len(), audio_data.duration());

    // 3. Write frames
    let mut writer = FrameWriter::create(cli.output.as_deref())?;
    let pb = ProgressBar::new(frames.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} frames ({eta} remaining)")
            .context("Invalid progress bar template")?
            .progress_chars("=>-"),
    );

    for frame in &frames {
        writer.write_frame(frame)?;
        pb.inc(1);
    }
    pb.finish_with_message("Analysis complete");

    writer.finish()?;
    log::info!("Done!");
    Ok(())
}
