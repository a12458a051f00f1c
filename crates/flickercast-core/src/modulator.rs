//! Binary FSK intensity modulator.
//!
//! Each bit selects a pulse train on the global frame counter:
//!
//! | bit | pulse when          | rate at 60 fps |
//! |-----|---------------------|----------------|
//! | 0   | `frame % 4 == 1`    | 15 Hz          |
//! | 1   | `frame % 3 == 2`    | 20 Hz          |
//!
//! Both periods divide the superframe length, so the phase is exact integer
//! arithmetic. The frame is never reset at a window boundary; receivers rely
//! on this fixed alignment.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bit::Bit;
use crate::clock::FRAME_RATE_HZ;

/// Overlay depth. Always exactly one of two levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Amplitude {
    /// 0.1 intensity.
    #[default]
    Low,
    /// 0.5 intensity.
    High,
}

impl Amplitude {
    /// Intensity emitted on a pulse frame.
    pub fn level(self) -> f32 {
        match self {
            Amplitude::Low => 0.1,
            Amplitude::High => 0.5,
        }
    }

    /// The other level.
    pub fn toggled(self) -> Self {
        match self {
            Amplitude::Low => Amplitude::High,
            Amplitude::High => Amplitude::Low,
        }
    }
}

impl fmt::Display for Amplitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amplitude::Low => write!(f, "low ({})", self.level()),
            Amplitude::High => write!(f, "high ({})", self.level()),
        }
    }
}

impl std::str::FromStr for Amplitude {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" | "0.1" => Ok(Amplitude::Low),
            "high" | "0.5" => Ok(Amplitude::High),
            other => Err(format!("unknown amplitude '{}': expected low or high", other)),
        }
    }
}

/// Pulse train assigned to a bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Carrier {
    /// Frames between pulses.
    pub period: u32,
    /// Frame offset of the pulse within the period.
    pub phase: u32,
}

impl Carrier {
    /// Carrier used for `bit`.
    pub const fn for_bit(bit: Bit) -> Self {
        match bit {
            Bit::Zero => Carrier {
                period: 4,
                phase: 1,
            },
            Bit::One => Carrier {
                period: 3,
                phase: 2,
            },
        }
    }

    /// True when `frame` carries a pulse.
    pub fn pulses_at(&self, frame: u32) -> bool {
        frame % self.period == self.phase
    }

    /// Pulse rate at the nominal frame rate.
    pub fn frequency_hz(&self) -> f64 {
        FRAME_RATE_HZ as f64 / self.period as f64
    }
}

/// Intensity emitted for `frame` while `latched` is on air.
///
/// Returns `amplitude` on carrier pulse frames and 0.0 otherwise; with no
/// latched bit there is no carrier and every frame is 0.0.
pub fn intensity(latched: Option<Bit>, frame: u32, amplitude: f32) -> f32 {
    match latched {
        Some(bit) if Carrier::for_bit(bit).pulses_at(frame) => amplitude,
        _ => 0.0,
    }
}
