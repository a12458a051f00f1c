//! flickercast signaling core
//!
//! This crate turns operator commands into a per-frame overlay intensity that
//! a light sensor pointed at the screen can decode.
//!
//! # Overview
//!
//! The signal is binary FSK on a 60 Hz frame clock:
//!
//! - **Frame clock** - wrapping 0..60 counter advanced once per tick
//! - **Bit source** - manual override, BER test pattern or queued word bits
//! - **Modulator** - bit 0 pulses at 15 Hz, bit 1 at 20 Hz, at one of two depths
//! - **Command channel** - operator input from another thread, drained per tick
//!
//! One bit is latched every 12 frames (5 bits per second). Window creation,
//! image drawing and the console are collaborators outside this crate; they
//! meet it at [`DisplaySurface`] and [`CommandSender`].
//!
//! # Example
//!
//! ```
//! use flickercast_core::{Bit, Command, TransmitterState};
//!
//! let mut tx = TransmitterState::default();
//! tx.apply(Command::EnqueueWord("A".to_string()));
//!
//! let first = tx.tick();
//! assert_eq!(first.sample.bit, Some(Bit::Zero));
//! assert_eq!(first.sample.intensity, 0.0);
//!
//! let second = tx.tick();
//! assert_eq!(second.sample.intensity, 0.1);
//! ```
//!
//! # Crate Structure
//!
//! - [`bit`] - logical bit type
//! - [`clock`] - frame clock and timing constants
//! - [`command`] - commands and the command channel
//! - [`config`] - transmitter tunables
//! - [`encode`] - word to bit encoding
//! - [`error`] - error types
//! - [`modulator`] - FSK intensity function and amplitude levels
//! - [`source`] - bit producers and their precedence
//! - [`surface`] - frame samples and the display seam
//! - [`transmitter`] - owned transmitter state and the tick pipeline

pub mod bit;
pub mod clock;
pub mod command;
pub mod config;
pub mod encode;
pub mod error;
pub mod modulator;
pub mod source;
pub mod surface;
pub mod transmitter;

// Re-export main types at crate root
pub use bit::Bit;
pub use clock::{FrameClock, FRAME_RATE_HZ, POLL_WINDOW, SUPERFRAME_LEN};
pub use command::{channel, ChannelClosed, Command, CommandInbox, CommandSender, Received};
pub use config::TransmitterConfig;
pub use encode::encode_word;
pub use error::{ConfigError, EncodeError, EncodeResult};
pub use modulator::{intensity, Amplitude, Carrier};
pub use source::{ActiveSource, BitSource, SourceKind, DEFAULT_BER_LENGTH};
pub use surface::{DisplaySurface, FrameSample};
pub use transmitter::{Step, Tick, Transmitter, TransmitterState, TxEvent, TxStats};
