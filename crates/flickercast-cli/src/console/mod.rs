//! Line-oriented operator console.

pub mod input;
pub mod parser;

pub use input::{run_input, spawn_stdin, write_help, InputEnd, PROMPT};
pub use parser::{parse_line, ConsoleInput};
