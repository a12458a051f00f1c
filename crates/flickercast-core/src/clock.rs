//! Fixed-rate frame clock.
//!
//! The clock is driven by an external tick source at [`FRAME_RATE_HZ`]. Its
//! phase wraps every [`SUPERFRAME_LEN`] frames; the wrap only bounds the
//! counter and has no effect on encoding.

use serde::{Deserialize, Serialize};

/// Nominal tick rate the carrier arithmetic assumes.
pub const FRAME_RATE_HZ: u32 = 60;

/// Frames per superframe (one second at the nominal rate).
pub const SUPERFRAME_LEN: u8 = 60;

/// Frames per poll window. One logical bit is sent per window.
pub const POLL_WINDOW: u8 = 12;

/// Wrapping frame counter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameClock {
    frame: u8,
    ticks: u64,
}

impl FrameClock {
    /// Creates a clock at frame 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the phase of the frame being produced, then advances by one.
    ///
    /// The first call after construction returns 0.
    pub fn tick(&mut self) -> u8 {
        let current = self.frame;
        self.frame = (self.frame + 1) % SUPERFRAME_LEN;
        self.ticks += 1;
        current
    }

    /// Phase the next [`tick`](Self::tick) will return.
    pub fn frame(&self) -> u8 {
        self.frame
    }

    /// Total number of advances since construction.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// True when `frame` opens a poll window.
    pub fn is_window_start(frame: u8) -> bool {
        frame % POLL_WINDOW == 0
    }
}
