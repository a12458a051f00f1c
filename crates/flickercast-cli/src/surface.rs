//! Display surfaces available from the command line.
//!
//! No window is opened here: the meter draws the overlay level as a terminal
//! bar and the trace surface records the intensity stream for offline use.

use std::io::{self, Write};

use flickercast_core::{DisplaySurface, FrameSample};

/// CSV header written by [`TraceSurface`].
pub const TRACE_HEADER: &str = "tick,frame,bit,intensity,alpha";

/// Width of the meter bar in characters.
const METER_WIDTH: usize = 20;

/// Discards every frame.
#[derive(Debug, Default)]
pub struct NullSurface;

impl DisplaySurface for NullSurface {
    fn present(&mut self, _sample: &FrameSample) -> io::Result<()> {
        Ok(())
    }
}

/// Writes one CSV row per frame.
#[derive(Debug)]
pub struct TraceSurface<W: Write> {
    writer: W,
    header_written: bool,
}

impl<W: Write> TraceSurface<W> {
    /// Wraps `writer`. The header is written with the first frame.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            header_written: false,
        }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Formats one trace row (without newline).
pub fn trace_row(sample: &FrameSample) -> String {
    let bit = sample.bit.map(|b| b.to_string()).unwrap_or_default();
    format!(
        "{},{},{},{:.2},{}",
        sample.tick,
        sample.frame,
        bit,
        sample.intensity,
        sample.alpha()
    )
}

impl<W: Write> DisplaySurface for TraceSurface<W> {
    fn present(&mut self, sample: &FrameSample) -> io::Result<()> {
        if !self.header_written {
            writeln!(self.writer, "{}", TRACE_HEADER)?;
            self.header_written = true;
        }
        writeln!(self.writer, "{}", trace_row(sample))
    }

    fn finish(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Redraws a single terminal line showing the overlay level.
#[derive(Debug)]
pub struct MeterSurface<W: Write> {
    writer: W,
}

impl<W: Write> MeterSurface<W> {
    /// Draws on `writer`, usually stderr.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

/// Formats the meter line for `sample`.
pub fn meter_line(sample: &FrameSample) -> String {
    let filled = (sample.intensity.clamp(0.0, 1.0) * METER_WIDTH as f32).round() as usize;
    let bit = match sample.bit {
        Some(bit) => bit.to_string(),
        None => "-".to_string(),
    };
    format!(
        "frame {:>2}  bit {}  [{}{}] {:.2}",
        sample.frame,
        bit,
        "#".repeat(filled),
        " ".repeat(METER_WIDTH - filled),
        sample.intensity
    )
}

impl<W: Write> DisplaySurface for MeterSurface<W> {
    fn present(&mut self, sample: &FrameSample) -> io::Result<()> {
        write!(self.writer, "\r{}", meter_line(sample))?;
        self.writer.flush()
    }

    fn finish(&mut self) -> io::Result<()> {
        writeln!(self.writer)
    }
}
