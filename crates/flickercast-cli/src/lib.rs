//! flickercast CLI library.
//!
//! This crate hosts the collaborators around the signaling core: the
//! operator console, the fixed-rate tick source, display surfaces and the
//! `run`, `trace` and `info` commands.

pub mod commands;
pub mod config;
pub mod console;
pub mod surface;
pub mod ticker;
