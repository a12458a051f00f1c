//! Operator input thread.
//!
//! Reading a line is the only blocking call in the program, so it runs on a
//! dedicated thread and talks to the tick loop only through a
//! [`CommandSender`].

use std::io::{self, BufRead, Write};
use std::thread::{self, JoinHandle};

use colored::Colorize;
use flickercast_core::{Command, CommandSender};

use super::parser::{parse_line, ConsoleInput, CONTROLS, RESERVED};

/// Prompt shown before every line.
pub const PROMPT: &str = "Word To Send: ";

/// Why the input loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEnd {
    /// Operator typed `quit`.
    Quit,
    /// End of input; a `Quit` was posted on the operator's behalf.
    Eof,
    /// The transmitter is gone.
    Disconnected,
}

/// Reads lines from `reader` and posts the parsed commands until quit, end
/// of input or disconnection.
pub fn run_input<R: BufRead, W: Write>(
    mut reader: R,
    mut out: W,
    sender: &CommandSender,
    prompt: bool,
) -> io::Result<InputEnd> {
    let mut buf = Vec::new();
    loop {
        if sender.is_closed() {
            return Ok(InputEnd::Disconnected);
        }
        if prompt {
            write!(out, "{}", PROMPT)?;
            out.flush()?;
        }

        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            let _ = sender.send(Command::Quit);
            return Ok(InputEnd::Eof);
        }

        match parse_line(&decode_line(&buf)) {
            ConsoleInput::Command(command) => {
                let quit = command == Command::Quit;
                if sender.send(command).is_err() {
                    return Ok(InputEnd::Disconnected);
                }
                if quit {
                    return Ok(InputEnd::Quit);
                }
            }
            ConsoleInput::Help => write_help(&mut out)?,
            ConsoleInput::Empty => {}
            ConsoleInput::Unknown(control) => {
                writeln!(
                    out,
                    "  {} unknown control '{}' (try :help)",
                    "!!".yellow(),
                    control
                )?;
            }
        }
    }
}

/// Decodes a raw input line. Bytes that are not UTF-8 are taken as Latin-1,
/// so each one maps to the character with the same code.
fn decode_line(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

/// Prints the console reference.
pub fn write_help<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", "Console:".bold())?;
    writeln!(out, "  {:<8} queue the line as a word", "<word>")?;
    for (name, brief) in RESERVED.iter().chain(CONTROLS) {
        writeln!(out, "  {:<8} {}", name, brief)?;
    }
    Ok(())
}

/// Spawns the input loop on stdin. The thread ends after posting `Quit`.
pub fn spawn_stdin(sender: CommandSender, prompt: bool) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("console-input".to_string())
        .spawn(move || {
            let stdin = io::stdin();
            match run_input(stdin.lock(), io::stdout(), &sender, prompt) {
                Ok(_) => {}
                Err(e) => {
                    eprintln!("{} console input failed: {}", "!!".red(), e);
                    let _ = sender.send(Command::Quit);
                }
            }
        })
}
