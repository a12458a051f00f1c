//! Operator commands and the channel that carries them to the tick loop.
//!
//! The input side holds a cloneable [`CommandSender`] and may live on any
//! thread; `send` never blocks. The tick loop owns the [`CommandInbox`] and
//! drains it without blocking once per tick. A word travels as one message
//! and is expanded into bits inside the core, so a tick sees all of it or
//! none of it.

use thiserror::Error;
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};

use crate::bit::Bit;
use crate::modulator::Amplitude;

/// A state change requested by the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Force every poll to return the bit.
    SetOverride(Bit),
    /// Release the manual override.
    ClearOverride,
    /// Clear the override if it is this bit, otherwise set it.
    ToggleOverride(Bit),
    /// Switch between the two amplitude levels.
    ToggleAmplitude,
    /// Select an amplitude level directly.
    SetAmplitude(Amplitude),
    /// Queue a word for transmission.
    EnqueueWord(String),
    /// Start the BER test pattern.
    StartBer,
    /// Stop the transmitter. Nothing after it is processed.
    Quit,
}

/// The receiving side has gone away.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("command channel closed")]
pub struct ChannelClosed(pub Command);

/// Result of a non-blocking read from the inbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Received {
    /// Next command in arrival order.
    Command(Command),
    /// Nothing pending right now.
    Empty,
    /// Every sender has been dropped.
    Closed,
}

/// Creates a connected sender/inbox pair.
pub fn channel() -> (CommandSender, CommandInbox) {
    let (tx, rx) = mpsc::unbounded_channel();
    (CommandSender { tx }, CommandInbox { rx })
}

/// Posting side of the command channel.
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: UnboundedSender<Command>,
}

impl CommandSender {
    /// Posts a command without blocking.
    pub fn send(&self, command: Command) -> Result<(), ChannelClosed> {
        self.tx.send(command).map_err(|e| ChannelClosed(e.0))
    }

    /// True once the inbox has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Draining side of the command channel, owned by the tick loop.
#[derive(Debug)]
pub struct CommandInbox {
    rx: UnboundedReceiver<Command>,
}

impl CommandInbox {
    /// Takes the next pending command without blocking.
    pub fn try_next(&mut self) -> Received {
        match self.rx.try_recv() {
            Ok(command) => Received::Command(command),
            Err(TryRecvError::Empty) => Received::Empty,
            Err(TryRecvError::Disconnected) => Received::Closed,
        }
    }
}
