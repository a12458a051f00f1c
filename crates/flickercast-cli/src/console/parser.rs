//! Console line parser
//!
//! Reserved lines: `0`, `1`, `ber`, `quit` and anything starting with `:`.
//! Every other line is sent as a word, whitespace included.

use flickercast_core::{Amplitude, Bit, Command};

/// Marks a control line.
pub const CONTROL_PREFIX: char = ':';

/// What a console line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleInput {
    /// Forward to the transmitter.
    Command(Command),
    /// Print console help locally.
    Help,
    /// Blank line.
    Empty,
    /// A control line nobody recognises.
    Unknown(String),
}

/// Control lines: name, description.
pub const CONTROLS: &[(&str, &str)] = &[
    (":amp", "toggle amplitude between 0.1 and 0.5"),
    (":low", "set amplitude to 0.1"),
    (":high", "set amplitude to 0.5"),
    (":clear", "release the manual override"),
    (":help", "show this help"),
];

/// Reserved words: name, description.
pub const RESERVED: &[(&str, &str)] = &[
    ("0", "toggle manual override for bit 0"),
    ("1", "toggle manual override for bit 1"),
    ("ber", "start a BER test pattern"),
    ("quit", "stop the transmitter"),
];

/// Parses one console line.
pub fn parse_line(line: &str) -> ConsoleInput {
    let line = line.trim_end_matches(&['\r', '\n'][..]);

    match line {
        "" => ConsoleInput::Empty,
        "quit" => ConsoleInput::Command(Command::Quit),
        "0" => ConsoleInput::Command(Command::ToggleOverride(Bit::Zero)),
        "1" => ConsoleInput::Command(Command::ToggleOverride(Bit::One)),
        "ber" => ConsoleInput::Command(Command::StartBer),
        _ if line.starts_with(CONTROL_PREFIX) => parse_control(line),
        word => ConsoleInput::Command(Command::EnqueueWord(word.to_string())),
    }
}

fn parse_control(line: &str) -> ConsoleInput {
    match line.trim() {
        ":amp" | ":a" => ConsoleInput::Command(Command::ToggleAmplitude),
        ":low" => ConsoleInput::Command(Command::SetAmplitude(Amplitude::Low)),
        ":high" => ConsoleInput::Command(Command::SetAmplitude(Amplitude::High)),
        ":clear" => ConsoleInput::Command(Command::ClearOverride),
        ":help" | ":h" | ":?" => ConsoleInput::Help,
        other => ConsoleInput::Unknown(other.to_string()),
    }
}
