//! Per-frame output and the display seam.

use serde::{Deserialize, Serialize};
use std::io;

use crate::bit::Bit;

/// Everything the display needs for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameSample {
    /// Ticks elapsed before this frame.
    pub tick: u64,
    /// Superframe phase, 0..60.
    pub frame: u8,
    /// Bit latched for the current window.
    pub bit: Option<Bit>,
    /// Overlay intensity, 0.0..=1.0.
    pub intensity: f32,
}

impl FrameSample {
    /// Overlay alpha byte, truncated like the reference renderer.
    pub fn alpha(&self) -> u8 {
        (self.intensity.clamp(0.0, 1.0) * 255.0) as u8
    }
}

/// Something that shows one intensity per tick.
///
/// Implementations must return quickly; they run inside the tick loop.
pub trait DisplaySurface {
    /// Shows `sample` for the current frame.
    fn present(&mut self, sample: &FrameSample) -> io::Result<()>;

    /// Called once when the transmitter stops.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: DisplaySurface + ?Sized> DisplaySurface for Box<S> {
    fn present(&mut self, sample: &FrameSample) -> io::Result<()> {
        (**self).present(sample)
    }

    fn finish(&mut self) -> io::Result<()> {
        (**self).finish()
    }
}
