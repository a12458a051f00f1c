//! Transmitter state and the per-tick pipeline.
//!
//! [`TransmitterState`] owns every piece of mutable signaling state. Each
//! tick runs clock → (poll on window start) → modulator and returns a
//! [`FrameSample`]. [`Transmitter`] adds the command inbox and drains it at
//! the start of every step, before the frame is computed.

use serde::{Deserialize, Serialize};

use crate::bit::Bit;
use crate::clock::FrameClock;
use crate::command::{Command, CommandInbox, Received};
use crate::config::TransmitterConfig;
use crate::error::EncodeError;
use crate::modulator::{self, Amplitude};
use crate::source::{BitSource, SourceKind};
use crate::surface::FrameSample;

/// Observable state change, reported to the host for logging.
#[derive(Debug, Clone, PartialEq)]
pub enum TxEvent {
    /// Manual override now forces this bit.
    OverrideSet(Bit),
    /// Manual override released.
    OverrideCleared,
    /// Amplitude switched.
    AmplitudeChanged(Amplitude),
    /// A word was expanded into the queue.
    WordQueued {
        /// The word as typed.
        text: String,
        /// Bits appended, padding included.
        bits: usize,
        /// The word also released a manual override.
        released_override: bool,
    },
    /// A word could not be encoded and was dropped.
    WordRejected {
        /// The word as typed.
        text: String,
        /// Why it was rejected.
        error: EncodeError,
    },
    /// BER test (re)started.
    BerStarted {
        /// Polls in the test.
        length: u32,
    },
    /// Last BER bit latched.
    BerFinished,
    /// Last queued word bit latched.
    QueueDrained,
    /// Transmitter stopped.
    Quit,
}

/// Session counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxStats {
    /// Frames produced.
    pub frames: u64,
    /// Poll windows opened.
    pub windows: u64,
    /// Windows with no bit.
    pub idle_windows: u64,
    /// Bits taken from the manual override.
    pub override_bits: u64,
    /// Bits taken from the BER pattern.
    pub ber_bits: u64,
    /// Bits taken from the word queue.
    pub word_bits: u64,
    /// Words accepted.
    pub words_queued: u64,
    /// Words rejected by the encoder.
    pub words_rejected: u64,
}

/// Output of one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// The frame to display.
    pub sample: FrameSample,
    /// Source transition caused by this tick's poll.
    pub event: Option<TxEvent>,
}

/// All mutable signaling state.
#[derive(Debug, Clone)]
pub struct TransmitterState {
    config: TransmitterConfig,
    clock: FrameClock,
    source: BitSource,
    amplitude: Amplitude,
    latched: Option<Bit>,
    quit: bool,
    stats: TxStats,
}

impl Default for TransmitterState {
    fn default() -> Self {
        Self::new(TransmitterConfig::default())
    }
}

impl TransmitterState {
    /// Creates an idle transmitter at frame 0.
    pub fn new(config: TransmitterConfig) -> Self {
        Self {
            amplitude: config.initial_amplitude,
            config,
            clock: FrameClock::new(),
            source: BitSource::new(),
            latched: None,
            quit: false,
            stats: TxStats::default(),
        }
    }

    /// Applies one command. Ignored once `Quit` has been applied.
    pub fn apply(&mut self, command: Command) -> Option<TxEvent> {
        if self.quit {
            return None;
        }
        match command {
            Command::SetOverride(bit) => {
                self.source.set_override(bit);
                Some(TxEvent::OverrideSet(bit))
            }
            Command::ClearOverride => self
                .source
                .clear_override()
                .map(|_| TxEvent::OverrideCleared),
            Command::ToggleOverride(bit) => match self.source.toggle_override(bit) {
                Some(bit) => Some(TxEvent::OverrideSet(bit)),
                None => Some(TxEvent::OverrideCleared),
            },
            Command::ToggleAmplitude => {
                self.amplitude = self.amplitude.toggled();
                Some(TxEvent::AmplitudeChanged(self.amplitude))
            }
            Command::SetAmplitude(level) => {
                if level == self.amplitude {
                    return None;
                }
                self.amplitude = level;
                Some(TxEvent::AmplitudeChanged(level))
            }
            Command::EnqueueWord(text) => self.enqueue_word(text),
            Command::StartBer => {
                self.source.start_ber(self.config.ber_length);
                Some(TxEvent::BerStarted {
                    length: self.config.ber_length,
                })
            }
            Command::Quit => {
                self.quit = true;
                Some(TxEvent::Quit)
            }
        }
    }

    fn enqueue_word(&mut self, text: String) -> Option<TxEvent> {
        match self.source.enqueue_word(&text, self.config.pad_zero_bits) {
            Ok(0) => None,
            Ok(bits) => {
                self.stats.words_queued += 1;
                let released_override =
                    self.config.release_override_on_word && self.source.clear_override().is_some();
                Some(TxEvent::WordQueued {
                    text,
                    bits,
                    released_override,
                })
            }
            Err(error) => {
                self.stats.words_rejected += 1;
                Some(TxEvent::WordRejected { text, error })
            }
        }
    }

    /// Produces the next frame.
    pub fn tick(&mut self) -> Tick {
        let tick = self.clock.ticks();
        let frame = self.clock.tick();
        let mut event = None;

        if FrameClock::is_window_start(frame) {
            self.stats.windows += 1;
            let polled = self.source.poll_with_kind();
            self.latched = polled.map(|(bit, _)| bit);
            match polled.map(|(_, kind)| kind) {
                Some(SourceKind::Override) => self.stats.override_bits += 1,
                Some(SourceKind::Ber) => {
                    self.stats.ber_bits += 1;
                    if self.source.ber_remaining() == 0 {
                        event = Some(TxEvent::BerFinished);
                    }
                }
                Some(SourceKind::Word) => {
                    self.stats.word_bits += 1;
                    if self.source.queued_bits() == 0 {
                        event = Some(TxEvent::QueueDrained);
                    }
                }
                None => self.stats.idle_windows += 1,
            }
        }

        self.stats.frames += 1;
        let intensity =
            modulator::intensity(self.latched, u32::from(frame), self.amplitude.level());
        Tick {
            sample: FrameSample {
                tick,
                frame,
                bit: self.latched,
                intensity,
            },
            event,
        }
    }

    /// True at a window boundary with nothing left to send.
    pub fn is_settled(&self) -> bool {
        self.clock.ticks() > 0
            && FrameClock::is_window_start(self.clock.frame())
            && self.source.is_idle()
    }

    /// Phase of the next frame.
    pub fn frame(&self) -> u8 {
        self.clock.frame()
    }

    /// Bit latched for the current window.
    pub fn latched(&self) -> Option<Bit> {
        self.latched
    }

    /// Current amplitude.
    pub fn amplitude(&self) -> Amplitude {
        self.amplitude
    }

    /// Bit producers.
    pub fn source(&self) -> &BitSource {
        &self.source
    }

    /// Active configuration.
    pub fn config(&self) -> &TransmitterConfig {
        &self.config
    }

    /// Session counters.
    pub fn stats(&self) -> &TxStats {
        &self.stats
    }

    /// True once `Quit` has been applied.
    pub fn is_quit(&self) -> bool {
        self.quit
    }
}

/// Result of one [`Transmitter::step`].
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// A frame was produced.
    Frame {
        /// The frame to display.
        sample: FrameSample,
        /// Events from commands applied this step and from the poll.
        events: Vec<TxEvent>,
    },
    /// The transmitter has stopped; no frame was produced.
    Quit {
        /// Events from commands applied before the stop.
        events: Vec<TxEvent>,
    },
}

/// Transmitter state wired to its command inbox.
#[derive(Debug)]
pub struct Transmitter {
    state: TransmitterState,
    inbox: CommandInbox,
}

impl Transmitter {
    /// Wires `state` to `inbox`.
    pub fn new(state: TransmitterState, inbox: CommandInbox) -> Self {
        Self { state, inbox }
    }

    /// Drains pending commands in arrival order, then ticks once.
    ///
    /// A closed inbox counts as `Quit`. Never blocks.
    pub fn step(&mut self) -> Step {
        let mut events = Vec::new();
        while !self.state.is_quit() {
            let command = match self.inbox.try_next() {
                Received::Command(command) => command,
                Received::Empty => break,
                Received::Closed => Command::Quit,
            };
            events.extend(self.state.apply(command));
        }

        if self.state.is_quit() {
            return Step::Quit { events };
        }

        let tick = self.state.tick();
        events.extend(tick.event);
        Step::Frame {
            sample: tick.sample,
            events,
        }
    }

    /// Read access to the state.
    pub fn state(&self) -> &TransmitterState {
        &self.state
    }

    /// Consumes the transmitter, returning its state.
    pub fn into_state(self) -> TransmitterState {
        self.state
    }
}
