//! Transmitter configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::modulator::Amplitude;
use crate::source::DEFAULT_BER_LENGTH;

/// Largest accepted `pad_zero_bits`.
pub const MAX_PAD_ZERO_BITS: u32 = 64;

/// Tunables for a [`TransmitterState`](crate::TransmitterState).
///
/// Missing fields take their defaults when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransmitterConfig {
    /// Polls per BER test.
    pub ber_length: u32,
    /// Amplitude at startup.
    pub initial_amplitude: Amplitude,
    /// Zero bits appended after every queued word.
    pub pad_zero_bits: u32,
    /// Queuing a word also releases a manual override.
    pub release_override_on_word: bool,
}

impl Default for TransmitterConfig {
    fn default() -> Self {
        Self {
            ber_length: DEFAULT_BER_LENGTH,
            initial_amplitude: Amplitude::Low,
            pad_zero_bits: 0,
            release_override_on_word: false,
        }
    }
}

impl TransmitterConfig {
    /// Parses and validates a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ber_length == 0 {
            return Err(ConfigError::InvalidBerLength {
                length: self.ber_length,
            });
        }
        if self.pad_zero_bits > MAX_PAD_ZERO_BITS {
            return Err(ConfigError::InvalidPadding {
                bits: self.pad_zero_bits,
                max: MAX_PAD_ZERO_BITS,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TransmitterConfig::default();
        assert_eq!(config.ber_length, 200);
        assert_eq!(config.initial_amplitude, Amplitude::Low);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = TransmitterConfig::from_json(r#"{"initial_amplitude": "high"}"#).unwrap();
        assert_eq!(config.initial_amplitude, Amplitude::High);
        assert_eq!(config.ber_length, 200);
        assert!(!config.release_override_on_word);
    }

    #[test]
    fn test_rejects_zero_ber_length() {
        let err = TransmitterConfig::from_json(r#"{"ber_length": 0}"#).unwrap_err();
        assert_eq!(err, ConfigError::InvalidBerLength { length: 0 });
    }

    #[test]
    fn test_rejects_excess_padding() {
        let err = TransmitterConfig::from_json(r#"{"pad_zero_bits": 65}"#).unwrap_err();
        assert_eq!(err.code(), "CFG_002");
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let err = TransmitterConfig::from_json(r#"{"frame_rate": 30}"#).unwrap_err();
        assert_eq!(err.code(), "CFG_003");
    }
}
