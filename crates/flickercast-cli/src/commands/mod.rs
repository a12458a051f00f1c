//! CLI command implementations

pub mod info;
pub mod run;
pub mod trace;

mod reporting;
