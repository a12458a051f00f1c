//! Info command implementation
//!
//! Prints the signaling constants a receiver has to agree on.

use anyhow::Result;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::process::ExitCode;

use flickercast_core::{
    Amplitude, Bit, Carrier, TransmitterConfig, FRAME_RATE_HZ, POLL_WINDOW, SUPERFRAME_LEN,
};

/// Carrier description for one bit value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarrierInfo {
    /// Bit value.
    pub bit: Bit,
    /// Pulse rate in Hz.
    pub frequency_hz: f64,
    /// Frames between pulses.
    pub period_frames: u32,
    /// Pulse frame offset.
    pub phase_frames: u32,
}

/// Machine-readable signaling constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoOutput {
    /// CLI version.
    pub version: String,
    /// Frame rate in Hz.
    pub frame_rate_hz: u32,
    /// Frames per superframe.
    pub superframe_frames: u8,
    /// Frames per poll window.
    pub window_frames: u8,
    /// Bits per second.
    pub bit_rate: f64,
    /// Carriers for 0 and 1.
    pub carriers: Vec<CarrierInfo>,
    /// Available amplitude levels.
    pub amplitude_levels: Vec<f32>,
    /// Default BER test length.
    pub ber_length: u32,
}

impl InfoOutput {
    /// Collects the constants in effect for `config`.
    pub fn collect(config: &TransmitterConfig) -> Self {
        let carriers = [Bit::Zero, Bit::One]
            .into_iter()
            .map(|bit| {
                let carrier = Carrier::for_bit(bit);
                CarrierInfo {
                    bit,
                    frequency_hz: carrier.frequency_hz(),
                    period_frames: carrier.period,
                    phase_frames: carrier.phase,
                }
            })
            .collect();

        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            frame_rate_hz: FRAME_RATE_HZ,
            superframe_frames: SUPERFRAME_LEN,
            window_frames: POLL_WINDOW,
            bit_rate: f64::from(FRAME_RATE_HZ) / f64::from(POLL_WINDOW),
            carriers,
            amplitude_levels: vec![Amplitude::Low.level(), Amplitude::High.level()],
            ber_length: config.ber_length,
        }
    }
}

/// Run the info command
///
/// # Returns
/// Exit code: always 0
pub fn run(json: bool) -> Result<ExitCode> {
    let info = InfoOutput::collect(&TransmitterConfig::default());

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{}", "flickercast Info".cyan().bold());
    println!("{}", "================".cyan());
    println!();

    println!("{}", "Version:".bold());
    println!("  {} flickercast-cli v{}", "->".green(), info.version);
    println!();

    println!("{}", "Timing:".bold());
    println!("  {} frame rate      {} Hz", "->".green(), info.frame_rate_hz);
    println!(
        "  {} superframe      {} frames",
        "->".green(),
        info.superframe_frames
    );
    println!(
        "  {} poll window     {} frames ({} bit/s)",
        "->".green(),
        info.window_frames,
        info.bit_rate
    );
    println!();

    println!("{}", "Carriers:".bold());
    for carrier in &info.carriers {
        println!(
            "  {} bit {}  {:>4} Hz  pulse when frame % {} == {}",
            "->".green(),
            carrier.bit,
            carrier.frequency_hz,
            carrier.period_frames,
            carrier.phase_frames
        );
    }
    println!();

    println!("{}", "Levels:".bold());
    println!(
        "  {} amplitude       {:?}",
        "->".green(),
        info.amplitude_levels
    );
    println!("  {} BER length      {} bits", "->".green(), info.ber_length);

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_constants() {
        let info = InfoOutput::collect(&TransmitterConfig::default());
        assert_eq!(info.frame_rate_hz, 60);
        assert_eq!(info.window_frames, 12);
        assert_eq!(info.bit_rate, 5.0);
        assert_eq!(info.carriers[0].frequency_hz, 15.0);
        assert_eq!(info.carriers[1].frequency_hz, 20.0);
        assert_eq!(info.amplitude_levels, vec![0.1, 0.5]);
        assert_eq!(info.ber_length, 200);
    }

    #[test]
    fn test_json_shape() {
        let info = InfoOutput::collect(&TransmitterConfig::default());
        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["carriers"][1]["bit"], 1);
        assert_eq!(value["carriers"][0]["period_frames"], 4);
    }
}
