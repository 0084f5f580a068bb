use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::audio::features::SpectrumFrame;

/// Streams spectrum frames as JSON lines, one object per frame.
pub struct FrameWriter<W: Write> {
    out: W,
    written: usize,
}

impl FrameWriter<Box<dyn Write>> {
    /// Writes to `path`, or to stdout when no path is given.
    pub fn create(path: Option<&Path>) -> Result<Self> {
        let out: Box<dyn Write> = match path {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create output file: {}", path.display()))?;
                Box::new(BufWriter::new(file))
            }
            None => Box::new(BufWriter::new(io::stdout().lock())),
        };
        Ok(Self::new(out))
    }
}

impl<W: Write> FrameWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, written: 0 }
    }

    pub fn write_frame(&mut self, frame: &SpectrumFrame) -> Result<()> {
        serde_json::to_writer(&mut self.out, frame)
            .with_context(|| format!("Failed to serialize frame {}", frame.index))?;
        self.out
            .write_all(b"\n")
            .context("Failed to write frame separator")?;
        self.written += 1;
        Ok(())
    }

    pub fn frames_written(&self) -> usize {
        self.written
    }

    /// Flushes buffered output and hands back the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.out.flush().context("Failed to flush output")?;
        log::info!("Wrote {} frames", self.written);
        Ok(self.out)
    }
}
