//! Offline trace command
//!
//! Renders the intensity stream for a fixed set of commands without a clock,
//! so receivers can be developed against a known-good reference.

use anyhow::{bail, Context, Result};
use flickercast_core::{
    Bit, Command, DisplaySurface, FrameSample, TransmitterState, TxEvent, TxStats, POLL_WINDOW,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::process::ExitCode;
use std::str::FromStr;

use crate::config::{self, ConfigOverrides};
use crate::surface::TraceSurface;

/// Output format for the trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraceFormat {
    /// One CSV row per frame.
    #[default]
    Csv,
    /// A single JSON document.
    Json,
}

impl FromStr for TraceFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(TraceFormat::Csv),
            "json" => Ok(TraceFormat::Json),
            other => Err(format!("unknown trace format '{}'", other)),
        }
    }
}

/// Options for the `trace` command.
#[derive(Debug, Clone, Default)]
pub struct TraceOptions {
    /// Words to queue, in order.
    pub words: Vec<String>,
    /// Start a BER test before the words.
    pub ber: bool,
    /// Hold a manual override.
    pub override_bit: Option<Bit>,
    /// Exact number of frames to render.
    pub frames: Option<u64>,
    /// Output format.
    pub format: TraceFormat,
    /// Output path (default: stdout).
    pub output: Option<String>,
    /// Path to a JSON config file.
    pub config: Option<String>,
    /// Flag overrides.
    pub overrides: ConfigOverrides,
}

/// JSON trace document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceOutput {
    /// Number of frames rendered.
    pub frame_count: u64,
    /// Bit latched in each poll window (`null` when idle).
    pub window_bits: Vec<Option<Bit>>,
    /// BLAKE3 digest of the intensity stream.
    pub digest: String,
    /// Transmitter counters after rendering.
    pub stats: TxStats,
    /// Every frame.
    pub samples: Vec<FrameSample>,
}

/// Run the trace command.
///
/// # Returns
/// Exit code: 0 on success
pub fn run(options: &TraceOptions) -> Result<ExitCode> {
    if options.override_bit.is_some() && options.frames.is_none() {
        bail!("--override never goes idle; pass --frames to bound the trace");
    }

    let config = config::resolve(options.config.as_deref(), &options.overrides)?;
    let mut state = TransmitterState::new(config);
    prime(&mut state, options)?;

    let (samples, stats) = render(state, options.frames)?;
    let text = match options.format {
        TraceFormat::Csv => to_csv(&samples)?,
        TraceFormat::Json => serde_json::to_string_pretty(&to_output(samples, stats))?,
    };

    match &options.output {
        Some(path) => fs::write(path, &text)
            .with_context(|| format!("Failed to write trace: {}", path))?,
        None => print!("{}", text),
    }
    Ok(ExitCode::SUCCESS)
}

/// Applies the requested commands to a fresh transmitter.
fn prime(state: &mut TransmitterState, options: &TraceOptions) -> Result<()> {
    if options.ber {
        state.apply(Command::StartBer);
    }
    for word in &options.words {
        if let Some(TxEvent::WordRejected { error, .. }) =
            state.apply(Command::EnqueueWord(word.clone()))
        {
            bail!("cannot encode {:?}: {} [{}]", word, error, error.code());
        }
    }
    if let Some(bit) = options.override_bit {
        state.apply(Command::SetOverride(bit));
    }
    Ok(())
}

/// Frames needed for a fresh transmitter to send every pending BER and word
/// bit and come to rest: one poll window per bit, at least one window.
pub fn settle_frames(state: &TransmitterState) -> u64 {
    let source = state.source();
    let bits = u64::from(source.ber_remaining()) + source.queued_bits() as u64;
    bits.max(1) * u64::from(POLL_WINDOW)
}

/// Ticks `state` for `frames` frames, or until it settles.
///
/// Without an explicit frame count a transmitter that never settles (a held
/// override) is an error.
pub fn render(
    mut state: TransmitterState,
    frames: Option<u64>,
) -> Result<(Vec<FrameSample>, TxStats)> {
    let limit = frames.unwrap_or_else(|| settle_frames(&state));
    let mut samples = Vec::new();
    while (samples.len() as u64) < limit {
        if frames.is_none() && state.is_settled() {
            break;
        }
        samples.push(state.tick().sample);
    }
    if frames.is_none() && !state.is_settled() {
        bail!(
            "transmitter still busy after {} frames; pass --frames to bound the trace",
            samples.len()
        );
    }
    Ok((samples, state.stats().clone()))
}

/// BLAKE3 digest over the little-endian intensity values.
pub fn intensity_digest(samples: &[FrameSample]) -> String {
    let mut hasher = blake3::Hasher::new();
    for sample in samples {
        hasher.update(&sample.intensity.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

fn to_csv(samples: &[FrameSample]) -> Result<String> {
    let mut surface = TraceSurface::new(Vec::new());
    for sample in samples {
        surface.present(sample)?;
    }
    surface.finish()?;
    String::from_utf8(surface.into_inner()).context("Trace is not valid UTF-8")
}

fn to_output(samples: Vec<FrameSample>, stats: TxStats) -> TraceOutput {
    let window_bits = samples
        .iter()
        .filter(|s| s.frame % POLL_WINDOW == 0)
        .map(|s| s.bit)
        .collect();
    TraceOutput {
        frame_count: samples.len() as u64,
        window_bits,
        digest: intensity_digest(&samples),
        stats,
        samples,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn options(words: &[&str]) -> TraceOptions {
        TraceOptions {
            words: words.iter().map(|w| w.to_string()).collect(),
            ..TraceOptions::default()
        }
    }

    fn primed(options: &TraceOptions) -> TransmitterState {
        let mut state = TransmitterState::default();
        prime(&mut state, options).unwrap();
        state
    }

    #[test]
    fn test_word_renders_until_settled() {
        let (samples, stats) = render(primed(&options(&["A"])), None).unwrap();
        assert_eq!(samples.len(), 8 * 12);
        assert_eq!(stats.word_bits, 8);

        let output = to_output(samples, stats);
        let bits: Vec<u8> = output.window_bits.iter().flatten().map(|b| b.as_u8()).collect();
        assert_eq!(bits, vec![0, 1, 0, 0, 0, 0, 0, 1]);
        assert_eq!(output.digest.len(), 64);
    }

    #[test]
    fn test_idle_trace_is_one_window() {
        let (samples, _) = render(TransmitterState::default(), None).unwrap();
        assert_eq!(samples.len(), 12);
        assert!(samples.iter().all(|s| s.intensity == 0.0));
    }

    #[test]
    fn test_explicit_frame_count() {
        let opts = TraceOptions {
            override_bit: Some(Bit::Zero),
            frames: Some(30),
            ..TraceOptions::default()
        };
        let (samples, stats) = render(primed(&opts), opts.frames).unwrap();
        assert_eq!(samples.len(), 30);
        assert_eq!(stats.override_bits, 3);
    }

    #[test]
    fn test_digest_is_deterministic() {
        let (a, _) = render(primed(&options(&["hi"])), None).unwrap();
        let (b, _) = render(primed(&options(&["hi"])), None).unwrap();
        let (c, _) = render(primed(&options(&["ho"])), None).unwrap();
        assert_eq!(intensity_digest(&a), intensity_digest(&b));
        assert_ne!(intensity_digest(&a), intensity_digest(&c));
    }

    #[test]
    fn test_long_input_renders_every_bit() {
        let long = "x".repeat(400);
        let opts = TraceOptions {
            words: vec![long],
            ber: true,
            ..TraceOptions::default()
        };
        let state = primed(&opts);
        assert_eq!(settle_frames(&state), (200 + 3200) * 12);

        let (samples, stats) = render(state, None).unwrap();
        assert_eq!(samples.len() as u64, (200 + 3200) * 12);
        assert_eq!(stats.word_bits, 3200);
        assert_eq!(stats.ber_bits, 200);
    }

    #[test]
    fn test_unbounded_override_is_an_error() {
        let mut state = TransmitterState::default();
        state.apply(Command::SetOverride(Bit::One));
        let err = render(state, None).unwrap_err();
        assert!(err.to_string().contains("--frames"));
    }

    #[test]
    fn test_rejected_word_is_an_error() {
        let mut state = TransmitterState::default();
        let err = prime(&mut state, &options(&["ok", "✓"])).unwrap_err();
        assert!(err.to_string().contains("ENC_001"));
    }

    #[test]
    fn test_override_requires_frames() {
        let opts = TraceOptions {
            override_bit: Some(Bit::One),
            ..TraceOptions::default()
        };
        assert!(run(&opts).is_err());
    }

    #[test]
    fn test_csv_header_and_rows() {
        let (samples, _) = render(primed(&options(&["A"])), None).unwrap();
        let csv = to_csv(&samples).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("tick,frame,bit,intensity,alpha"));
        assert_eq!(lines.next(), Some("0,0,0,0.00,0"));
        assert_eq!(lines.next(), Some("1,1,0,0.10,25"));
        assert_eq!(csv.lines().count(), 1 + 96);
    }

    #[test]
    fn test_writes_json_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("trace.json");
        let opts = TraceOptions {
            words: vec!["A".to_string()],
            format: TraceFormat::Json,
            output: Some(path.to_string_lossy().to_string()),
            ..TraceOptions::default()
        };
        run(&opts).unwrap();

        let parsed: TraceOutput =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.frame_count, 96);
        assert_eq!(parsed.samples.len(), 96);
        assert_eq!(parsed.stats.words_queued, 1);
    }
}
