//! Operator-facing event output.

use colored::Colorize;
use flickercast_core::{TxEvent, TxStats};
use std::time::{Duration, Instant};

/// Plain-text description of an event.
pub(crate) fn describe(event: &TxEvent) -> String {
    match event {
        TxEvent::OverrideSet(bit) => format!("Manual override: {}", bit),
        TxEvent::OverrideCleared => "Manual override off".to_string(),
        TxEvent::AmplitudeChanged(level) => format!("Amplitude: {}", level),
        TxEvent::WordQueued {
            text,
            bits,
            released_override,
        } => {
            let mut line = format!("Sending {:?} ({} bits)", text, bits);
            if *released_override {
                line.push_str(", override released");
            }
            line
        }
        TxEvent::WordRejected { text, error } => {
            format!("Rejected {:?}: {} [{}]", text, error, error.code())
        }
        TxEvent::BerStarted { length } => format!("Testing... ({} bit BER pattern)", length),
        TxEvent::BerFinished => "BER pattern complete".to_string(),
        TxEvent::QueueDrained => "Sent!".to_string(),
        TxEvent::Quit => "Exiting".to_string(),
    }
}

/// Prints transmitter events to stderr and times word transmissions.
#[derive(Debug, Default)]
pub(crate) struct EventLog {
    quiet: bool,
    /// A meter owns the current stderr line.
    meter: bool,
    sending_since: Option<Instant>,
}

impl EventLog {
    pub(crate) fn new(quiet: bool, meter: bool) -> Self {
        Self {
            quiet,
            meter,
            sending_since: None,
        }
    }

    /// Logs `event`, observed at `now`.
    pub(crate) fn record(&mut self, event: &TxEvent, now: Instant) {
        let elapsed = self.track(event, now);
        if self.quiet {
            return;
        }
        eprintln!("{}", self.line(event, elapsed));
    }

    /// Formats the log line for `event`.
    fn line(&self, event: &TxEvent, elapsed: Option<Duration>) -> String {
        let text = describe(event);
        let line = match event {
            TxEvent::WordRejected { .. } => format!("  {} {}", "!!".red(), text),
            TxEvent::QueueDrained | TxEvent::BerFinished => match elapsed {
                Some(elapsed) => format!(
                    "  {} {} {}",
                    "ok".green(),
                    text,
                    format!("(time taken: {:.2}s)", elapsed.as_secs_f64()).dimmed()
                ),
                None => format!("  {} {}", "ok".green(), text),
            },
            _ => format!("  {} {}", "->".cyan(), text),
        };
        // End the meter's line so the event does not overwrite it.
        if self.meter {
            format!("\n{}", line)
        } else {
            line
        }
    }

    /// Updates the transmission timer; returns the elapsed time when a
    /// queue drains.
    fn track(&mut self, event: &TxEvent, now: Instant) -> Option<Duration> {
        match event {
            TxEvent::WordQueued { .. } => {
                self.sending_since.get_or_insert(now);
                None
            }
            TxEvent::QueueDrained => self.sending_since.take().map(|start| now - start),
            _ => None,
        }
    }
}

/// Prints the end-of-session summary.
pub(crate) fn print_summary(stats: &TxStats, elapsed: Duration) {
    eprintln!();
    eprintln!("{}", "Session".cyan().bold());
    eprintln!("{}", "-------".dimmed());
    eprintln!("Duration:       {:.1}s", elapsed.as_secs_f64());
    eprintln!("Frames:         {}", stats.frames);
    eprintln!(
        "Windows:        {} ({} idle)",
        stats.windows, stats.idle_windows
    );
    eprintln!("Word bits:      {}", stats.word_bits);
    eprintln!("BER bits:       {}", stats.ber_bits);
    eprintln!("Override bits:  {}", stats.override_bits);
    eprintln!("Words queued:   {}", stats.words_queued);
    if stats.words_rejected > 0 {
        eprintln!(
            "Words rejected: {}",
            format!("{}", stats.words_rejected).red()
        );
    } else {
        eprintln!("Words rejected: 0");
    }
}
