//! flickercast CLI - screen-flicker FSK transmitter
//!
//! This binary runs the live transmitter, renders offline intensity traces
//! and prints the signaling constants.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::ExitCode;

use flickercast_cli::commands;
use flickercast_cli::commands::run::RunOptions;
use flickercast_cli::commands::trace::{TraceFormat, TraceOptions};
use flickercast_cli::config::ConfigOverrides;
use flickercast_core::{Amplitude, Bit};

/// flickercast - send data to a light sensor through screen flicker
#[derive(Parser)]
#[command(name = "flickercast")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the live transmitter, reading words from stdin
    Run {
        /// Path to a JSON transmitter config
        #[arg(short, long)]
        config: Option<String>,

        /// Initial amplitude level
        #[arg(long, value_parser = ["low", "high"])]
        amplitude: Option<String>,

        /// Number of polls in a BER test
        #[arg(long)]
        ber_length: Option<u32>,

        /// Zero bits appended after every word
        #[arg(long)]
        pad_zero_bits: Option<u32>,

        /// Queuing a word releases a manual override
        #[arg(long)]
        release_override_on_word: bool,

        /// Draw the overlay level as a terminal meter
        #[arg(long)]
        meter: bool,

        /// Record every frame to a CSV file
        #[arg(long)]
        trace: Option<String>,

        /// Stop after this many frames
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        frames: Option<u64>,

        /// Suppress prompts and event lines
        #[arg(short, long)]
        quiet: bool,

        /// Print session statistics as JSON on exit
        #[arg(long)]
        json: bool,
    },

    /// Render the intensity stream for given input without a clock
    Trace {
        /// Word to queue (repeatable, sent in order)
        #[arg(short, long = "word")]
        words: Vec<String>,

        /// Start a BER test before the words
        #[arg(long)]
        ber: bool,

        /// Hold a manual override bit (requires --frames)
        #[arg(long = "override", value_parser = ["0", "1"])]
        override_bit: Option<String>,

        /// Exact number of frames (default: until idle)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        frames: Option<u64>,

        /// Output format
        #[arg(long, default_value = "csv", value_parser = ["csv", "json"])]
        format: String,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Path to a JSON transmitter config
        #[arg(short, long)]
        config: Option<String>,

        /// Amplitude level
        #[arg(long, value_parser = ["low", "high"])]
        amplitude: Option<String>,

        /// Number of polls in a BER test
        #[arg(long)]
        ber_length: Option<u32>,

        /// Zero bits appended after every word
        #[arg(long)]
        pad_zero_bits: Option<u32>,
    },

    /// Print frame timing, carriers and amplitude levels
    Info {
        /// Output machine-readable JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_amplitude(value: Option<String>) -> Result<Option<Amplitude>> {
    value
        .map(|v| v.parse::<Amplitude>().map_err(anyhow::Error::msg))
        .transpose()
}

fn parse_bit(value: Option<String>) -> Result<Option<Bit>> {
    value
        .map(|v| -> Result<Bit> {
            let n: u8 = v.parse()?;
            Bit::try_from(n).map_err(anyhow::Error::msg)
        })
        .transpose()
}

fn dispatch(command: Commands) -> Result<ExitCode> {
    match command {
        Commands::Run {
            config,
            amplitude,
            ber_length,
            pad_zero_bits,
            release_override_on_word,
            meter,
            trace,
            frames,
            quiet,
            json,
        } => commands::run::run(RunOptions {
            config,
            overrides: ConfigOverrides {
                amplitude: parse_amplitude(amplitude)?,
                ber_length,
                pad_zero_bits,
                release_override_on_word,
            },
            meter,
            trace,
            frames,
            quiet,
            json,
        }),
        Commands::Trace {
            words,
            ber,
            override_bit,
            frames,
            format,
            output,
            config,
            amplitude,
            ber_length,
            pad_zero_bits,
        } => {
            let format = format
                .parse::<TraceFormat>()
                .map_err(anyhow::Error::msg)?;
            commands::trace::run(&TraceOptions {
                words,
                ber,
                override_bit: parse_bit(override_bit)?,
                frames,
                format,
                output,
                config,
                overrides: ConfigOverrides {
                    amplitude: parse_amplitude(amplitude)?,
                    ber_length,
                    pad_zero_bits,
                    release_override_on_word: false,
                },
            })
        }
        Commands::Info { json } => commands::info::run(json),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match dispatch(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_run() {
        let cli = Cli::try_parse_from([
            "flickercast",
            "run",
            "--amplitude",
            "high",
            "--frames",
            "120",
            "--meter",
        ])
        .unwrap();
        match cli.command {
            Commands::Run {
                amplitude,
                frames,
                meter,
                quiet,
                ..
            } => {
                assert_eq!(amplitude.as_deref(), Some("high"));
                assert_eq!(frames, Some(120));
                assert!(meter);
                assert!(!quiet);
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_cli_parses_trace_words() {
        let cli = Cli::try_parse_from([
            "flickercast",
            "trace",
            "-w",
            "hello",
            "--word",
            "world",
            "--format",
            "json",
        ])
        .unwrap();
        match cli.command {
            Commands::Trace { words, format, .. } => {
                assert_eq!(words, vec!["hello".to_string(), "world".to_string()]);
                assert_eq!(format, "json");
            }
            _ => panic!("expected trace command"),
        }
    }

    #[test]
    fn test_cli_rejects_bad_values() {
        assert!(Cli::try_parse_from(["flickercast", "run", "--amplitude", "loud"]).is_err());
        assert!(Cli::try_parse_from(["flickercast", "trace", "--override", "2"]).is_err());
        assert!(Cli::try_parse_from(["flickercast", "run", "--frames", "0"]).is_err());
    }

    #[test]
    fn test_value_helpers() {
        assert_eq!(
            parse_amplitude(Some("low".to_string())).unwrap(),
            Some(Amplitude::Low)
        );
        assert_eq!(parse_bit(Some("1".to_string())).unwrap(), Some(Bit::One));
        assert_eq!(parse_bit(None).unwrap(), None);
    }
}
