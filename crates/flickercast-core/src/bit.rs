//! Logical bit type carried through the signaling chain.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single logical bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Bit {
    /// Sent on the 15 Hz carrier.
    Zero,
    /// Sent on the 20 Hz carrier.
    One,
}

impl Bit {
    /// Returns the bit as 0 or 1.
    pub fn as_u8(self) -> u8 {
        match self {
            Bit::Zero => 0,
            Bit::One => 1,
        }
    }

    /// Parity of an integer, as a bit.
    pub fn from_parity(n: u32) -> Self {
        if n % 2 == 0 {
            Bit::Zero
        } else {
            Bit::One
        }
    }
}

impl From<bool> for Bit {
    fn from(value: bool) -> Self {
        if value {
            Bit::One
        } else {
            Bit::Zero
        }
    }
}

impl From<Bit> for u8 {
    fn from(bit: Bit) -> Self {
        bit.as_u8()
    }
}

impl TryFrom<u8> for Bit {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Bit::Zero),
            1 => Ok(Bit::One),
            other => Err(format!("bit must be 0 or 1, got {}", other)),
        }
    }
}

impl fmt::Display for Bit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}
