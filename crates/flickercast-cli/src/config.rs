//! Configuration loading for CLI commands.
//!
//! A JSON file supplies the base [`TransmitterConfig`]; command-line flags
//! override individual fields.

use anyhow::{Context, Result};
use flickercast_core::{Amplitude, TransmitterConfig};
use std::path::Path;

/// Field overrides taken from command-line flags.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// `--amplitude`
    pub amplitude: Option<Amplitude>,
    /// `--ber-length`
    pub ber_length: Option<u32>,
    /// `--pad-zero-bits`
    pub pad_zero_bits: Option<u32>,
    /// `--release-override-on-word`
    pub release_override_on_word: bool,
}

/// Parse a transmitter config from a JSON file.
pub fn load_config(path: &Path) -> Result<TransmitterConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    TransmitterConfig::from_json(&content)
        .with_context(|| format!("Invalid config file: {}", path.display()))
}

/// Builds the effective config from an optional file plus overrides.
pub fn resolve(path: Option<&str>, overrides: &ConfigOverrides) -> Result<TransmitterConfig> {
    let mut config = match path {
        Some(path) => load_config(Path::new(path))?,
        None => TransmitterConfig::default(),
    };

    if let Some(amplitude) = overrides.amplitude {
        config.initial_amplitude = amplitude;
    }
    if let Some(length) = overrides.ber_length {
        config.ber_length = length;
    }
    if let Some(bits) = overrides.pad_zero_bits {
        config.pad_zero_bits = bits;
    }
    if overrides.release_override_on_word {
        config.release_override_on_word = true;
    }

    config.validate().context("Invalid transmitter settings")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults_without_file() {
        let config = resolve(None, &ConfigOverrides::default()).unwrap();
        assert_eq!(config, TransmitterConfig::default());
    }

    #[test]
    fn test_file_then_overrides() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("tx.json");
        fs::write(&path, r#"{"ber_length": 50, "pad_zero_bits": 8}"#).unwrap();

        let overrides = ConfigOverrides {
            ber_length: Some(20),
            amplitude: Some(Amplitude::High),
            ..ConfigOverrides::default()
        };
        let config = resolve(path.to_str(), &overrides).unwrap();
        assert_eq!(config.ber_length, 20);
        assert_eq!(config.pad_zero_bits, 8);
        assert_eq!(config.initial_amplitude, Amplitude::High);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = resolve(Some("/nonexistent/tx.json"), &ConfigOverrides::default()).unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/tx.json"));
    }

    #[test]
    fn test_invalid_override_rejected() {
        let overrides = ConfigOverrides {
            ber_length: Some(0),
            ..ConfigOverrides::default()
        };
        assert!(resolve(None, &overrides).is_err());
    }

    #[test]
    fn test_malformed_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("failed to parse config"));
    }
}
