//! Bit sources and their precedence.
//!
//! A [`BitSource`] holds every producer at once: the manual override, the
//! BER countdown and the word queue. Which one answers a poll is decided by
//! [`BitSource::active`], an explicit match over [`ActiveSource`]:
//!
//! 1. manual override (non-consuming)
//! 2. BER pattern while `remaining > 0`
//! 3. word queue while non-empty
//! 4. idle

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::bit::Bit;
use crate::encode::encode_word;
use crate::error::EncodeResult;

/// Default number of polls in a BER test.
pub const DEFAULT_BER_LENGTH: u32 = 200;

/// The producer that will answer the next poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveSource {
    /// Operator forced a constant bit.
    ManualOverride(Bit),
    /// Alternating test pattern with `remaining` polls left.
    BerPattern {
        /// Polls left in the test.
        remaining: u32,
    },
    /// Queued word bits, `len` of them.
    WordQueue {
        /// Bits waiting in the queue.
        len: usize,
    },
    /// Nothing to send.
    Idle,
}

/// Where a polled bit came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Manual override.
    Override,
    /// BER test pattern.
    Ber,
    /// Word queue.
    Word,
}

impl ActiveSource {
    /// Kind of the source, `None` when idle.
    pub fn kind(&self) -> Option<SourceKind> {
        match self {
            ActiveSource::ManualOverride(_) => Some(SourceKind::Override),
            ActiveSource::BerPattern { .. } => Some(SourceKind::Ber),
            ActiveSource::WordQueue { .. } => Some(SourceKind::Word),
            ActiveSource::Idle => None,
        }
    }
}

/// All bit producers with their precedence rule.
#[derive(Debug, Clone, Default)]
pub struct BitSource {
    manual: Option<Bit>,
    ber_remaining: u32,
    queue: VecDeque<Bit>,
}

impl BitSource {
    /// Creates an idle source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the producer for the next poll without consuming anything.
    pub fn active(&self) -> ActiveSource {
        match (self.manual, self.ber_remaining, self.queue.len()) {
            (Some(bit), _, _) => ActiveSource::ManualOverride(bit),
            (None, remaining, _) if remaining > 0 => ActiveSource::BerPattern { remaining },
            (None, _, len) if len > 0 => ActiveSource::WordQueue { len },
            _ => ActiveSource::Idle,
        }
    }

    /// Polls the next bit, `None` when idle.
    pub fn poll(&mut self) -> Option<Bit> {
        self.poll_with_kind().map(|(bit, _)| bit)
    }

    /// Polls the next bit together with the producer that supplied it.
    pub fn poll_with_kind(&mut self) -> Option<(Bit, SourceKind)> {
        match self.active() {
            ActiveSource::ManualOverride(bit) => Some((bit, SourceKind::Override)),
            ActiveSource::BerPattern { remaining } => {
                self.ber_remaining = remaining - 1;
                Some((Bit::from_parity(self.ber_remaining), SourceKind::Ber))
            }
            ActiveSource::WordQueue { .. } => self.queue.pop_front().map(|b| (b, SourceKind::Word)),
            ActiveSource::Idle => None,
        }
    }

    /// Forces every poll to return `bit`.
    pub fn set_override(&mut self, bit: Bit) {
        self.manual = Some(bit);
    }

    /// Releases the manual override. Returns the bit that was set.
    pub fn clear_override(&mut self) -> Option<Bit> {
        self.manual.take()
    }

    /// Key-press semantics: the active bit clears, any other bit sets.
    ///
    /// Returns the override in effect afterwards.
    pub fn toggle_override(&mut self, bit: Bit) -> Option<Bit> {
        self.manual = match self.manual {
            Some(current) if current == bit => None,
            _ => Some(bit),
        };
        self.manual
    }

    /// Current manual override.
    pub fn override_bit(&self) -> Option<Bit> {
        self.manual
    }

    /// Starts (or restarts) a BER test of `length` polls.
    pub fn start_ber(&mut self, length: u32) {
        self.ber_remaining = length;
    }

    /// Polls left in the running BER test.
    pub fn ber_remaining(&self) -> u32 {
        self.ber_remaining
    }

    /// Appends bits to the queue tail.
    pub fn enqueue_bits<I: IntoIterator<Item = Bit>>(&mut self, bits: I) {
        self.queue.extend(bits);
    }

    /// Encodes `text` and appends it followed by `pad_zero_bits` zeros.
    ///
    /// Nothing is appended when the word is rejected or empty. Returns the
    /// number of bits queued.
    pub fn enqueue_word(&mut self, text: &str, pad_zero_bits: u32) -> EncodeResult<usize> {
        let bits = encode_word(text)?;
        if bits.is_empty() {
            return Ok(0);
        }
        let padding = std::iter::repeat(Bit::Zero).take(pad_zero_bits as usize);
        let before = self.queue.len();
        self.queue.extend(bits.into_iter().chain(padding));
        Ok(self.queue.len() - before)
    }

    /// Bits waiting in the word queue.
    pub fn queued_bits(&self) -> usize {
        self.queue.len()
    }

    /// True when a poll would return no bit.
    pub fn is_idle(&self) -> bool {
        self.active() == ActiveSource::Idle
    }
}
