//! Live transmitter command
//!
//! Runs the tick loop on a single-threaded tokio runtime and reads operator
//! lines on a separate thread. The two sides share nothing but the command
//! channel.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs::File;
use std::io::{self, BufWriter};
use std::process::ExitCode;
use std::time::Instant;

use flickercast_core::{
    channel, DisplaySurface, Step, Transmitter, TransmitterConfig, TransmitterState, TxStats,
};

use super::reporting::{print_summary, EventLog};
use crate::config::{self, ConfigOverrides};
use crate::console;
use crate::surface::{MeterSurface, NullSurface, TraceSurface};
use crate::ticker;

/// Options for the `run` command.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Path to a JSON config file.
    pub config: Option<String>,
    /// Flag overrides.
    pub overrides: ConfigOverrides,
    /// Draw the terminal meter.
    pub meter: bool,
    /// Record the intensity stream to this CSV file.
    pub trace: Option<String>,
    /// Stop after this many frames.
    pub frames: Option<u64>,
    /// Suppress event lines.
    pub quiet: bool,
    /// Print the session statistics as JSON on exit.
    pub json: bool,
}

/// Why the tick loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// `Quit` was applied (typed, end of input, or input thread gone).
    Quit,
    /// The frame limit was reached.
    FrameLimit,
    /// Ctrl+C.
    Interrupted,
}

/// Run the live transmitter.
///
/// # Returns
/// Exit code: 0 on a clean stop
pub fn run(options: RunOptions) -> Result<ExitCode> {
    let config = config::resolve(options.config.as_deref(), &options.overrides)?;
    let mut surfaces = build_surfaces(&options)?;

    if !options.quiet {
        print_banner(&config);
    }

    let (sender, inbox) = channel();
    let transmitter = Transmitter::new(TransmitterState::new(config), inbox);

    // Detached: a blocked line read must not keep the process alive.
    console::spawn_stdin(sender, !options.quiet).context("Failed to start console thread")?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    let started = Instant::now();
    let mut log = EventLog::new(options.quiet, options.meter);
    let (reason, state) = rt.block_on(tick_loop(
        transmitter,
        &mut surfaces,
        options.frames,
        &mut log,
    ))?;

    for surface in surfaces.iter_mut() {
        surface.finish().context("Failed to finalize display surface")?;
    }

    if reason == StopReason::Interrupted && !options.quiet {
        eprintln!("\n{}", "Interrupted".yellow());
    }
    report(state.stats(), started, options.json)?;
    Ok(ExitCode::SUCCESS)
}

fn build_surfaces(options: &RunOptions) -> Result<Vec<Box<dyn DisplaySurface>>> {
    let mut surfaces: Vec<Box<dyn DisplaySurface>> = Vec::new();
    if options.meter {
        surfaces.push(Box::new(MeterSurface::new(io::stderr())));
    }
    if let Some(path) = &options.trace {
        let file =
            File::create(path).with_context(|| format!("Failed to create trace file: {}", path))?;
        surfaces.push(Box::new(TraceSurface::new(BufWriter::new(file))));
    }
    if surfaces.is_empty() {
        surfaces.push(Box::new(NullSurface));
    }
    Ok(surfaces)
}

/// Drives the transmitter at the frame rate until it stops.
pub(crate) async fn tick_loop(
    mut transmitter: Transmitter,
    surfaces: &mut [Box<dyn DisplaySurface>],
    frame_limit: Option<u64>,
    log: &mut EventLog,
) -> Result<(StopReason, TransmitterState)> {
    let mut interval = ticker::frame_interval();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let reason = loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = &mut ctrl_c => break StopReason::Interrupted,
        }

        let now = Instant::now();
        match transmitter.step() {
            Step::Frame { sample, events } => {
                for event in &events {
                    log.record(event, now);
                }
                for surface in surfaces.iter_mut() {
                    surface
                        .present(&sample)
                        .context("Display surface failed")?;
                }
                if frame_limit.is_some_and(|limit| sample.tick + 1 >= limit) {
                    break StopReason::FrameLimit;
                }
            }
            Step::Quit { events } => {
                for event in &events {
                    log.record(event, now);
                }
                break StopReason::Quit;
            }
        }
    };

    Ok((reason, transmitter.into_state()))
}

fn print_banner(config: &TransmitterConfig) {
    eprintln!("{}", "flickercast".cyan().bold());
    eprintln!(
        "  {} amplitude {}, BER length {}",
        "->".green(),
        config.initial_amplitude,
        config.ber_length
    );
    eprintln!(
        "  {}",
        "Type a word to send it; 0/1 toggle overrides, ber, quit, :help".dimmed()
    );
}

fn report(stats: &TxStats, started: Instant, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(stats)?);
    } else {
        print_summary(stats, started.elapsed());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flickercast_core::{Bit, Command, FrameSample};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<FrameSample>>>);

    impl DisplaySurface for Recorder {
        fn present(&mut self, sample: &FrameSample) -> io::Result<()> {
            self.0.lock().unwrap().push(*sample);
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_frame_limit() {
        let (sender, inbox) = channel();
        let transmitter = Transmitter::new(TransmitterState::default(), inbox);
        sender.send(Command::SetOverride(Bit::One)).unwrap();

        let recorder = Recorder::default();
        let mut surfaces: Vec<Box<dyn DisplaySurface>> = vec![Box::new(recorder.clone())];
        let mut log = EventLog::new(true, false);

        let (reason, state) = tick_loop(transmitter, &mut surfaces, Some(24), &mut log)
            .await
            .unwrap();
        assert_eq!(reason, StopReason::FrameLimit);
        assert_eq!(state.stats().frames, 24);
        assert_eq!(state.stats().override_bits, 2);

        let frames = recorder.0.lock().unwrap();
        assert_eq!(frames.len(), 24);
        assert_eq!(frames[2].intensity, 0.1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quit_stops_loop() {
        let (sender, inbox) = channel();
        let transmitter = Transmitter::new(TransmitterState::default(), inbox);
        sender.send(Command::EnqueueWord("A".to_string())).unwrap();
        sender.send(Command::Quit).unwrap();

        let mut surfaces: Vec<Box<dyn DisplaySurface>> = Vec::new();
        let mut log = EventLog::new(true, false);
        let (reason, state) = tick_loop(transmitter, &mut surfaces, None, &mut log)
            .await
            .unwrap();
        assert_eq!(reason, StopReason::Quit);
        assert_eq!(state.stats().frames, 0);
        assert_eq!(state.source().queued_bits(), 8);
    }

    #[test]
    fn test_surfaces_default_to_null() {
        let surfaces = build_surfaces(&RunOptions::default()).unwrap();
        assert_eq!(surfaces.len(), 1);
    }

    #[test]
    fn test_trace_surface_replaces_null() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("live.csv");
        let options = RunOptions {
            trace: Some(path.to_string_lossy().to_string()),
            ..RunOptions::default()
        };
        let mut surfaces = build_surfaces(&options).unwrap();
        assert_eq!(surfaces.len(), 1);

        let sample = FrameSample {
            tick: 0,
            frame: 0,
            bit: Some(Bit::One),
            intensity: 0.0,
        };
        surfaces[0].present(&sample).unwrap();
        surfaces[0].finish().unwrap();
        drop(surfaces);
        let csv = std::fs::read_to_string(&path).unwrap();
        assert_eq!(csv, "tick,frame,bit,intensity,alpha\n0,0,1,0.00,0\n");
    }
}
