//! Error types for the signaling core.
//!
//! None of these are fatal to a running transmitter. Rejected input is
//! reported back to the host as an event and otherwise ignored.

use thiserror::Error;

/// Result type for word encoding.
pub type EncodeResult<T> = Result<T, EncodeError>;

/// Errors raised while turning operator text into bits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// A character does not fit in a single byte.
    #[error("character {ch:?} at position {index} does not fit in one byte (U+{code:04X})")]
    UnencodableChar {
        /// The offending character.
        ch: char,
        /// Character position within the word (0-based).
        index: usize,
        /// Unicode scalar value of the character.
        code: u32,
    },
}

/// Errors raised by [`TransmitterConfig::validate`](crate::TransmitterConfig::validate).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// BER test length must be positive.
    #[error("invalid BER length: {length} (must be at least 1)")]
    InvalidBerLength {
        /// The rejected length.
        length: u32,
    },

    /// Too many padding bits requested after each word.
    #[error("invalid pad_zero_bits: {bits} (maximum is {max})")]
    InvalidPadding {
        /// The rejected padding.
        bits: u32,
        /// Largest accepted value.
        max: u32,
    },

    /// The config document could not be parsed.
    #[error("failed to parse config: {message}")]
    Parse {
        /// Parser message.
        message: String,
    },
}

impl ConfigError {
    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }
}

impl EncodeError {
    /// Stable error code.
    pub fn code(&self) -> &'static str {
        match self {
            EncodeError::UnencodableChar { .. } => "ENC_001",
        }
    }
}

impl ConfigError {
    /// Stable error code.
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::InvalidBerLength { .. } => "CFG_001",
            ConfigError::InvalidPadding { .. } => "CFG_002",
            ConfigError::Parse { .. } => "CFG_003",
        }
    }
}
