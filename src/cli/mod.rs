//! CLI module - command-line interface
//!
//! Contains argument parsing and config overrides.

pub mod args;

pub use args::Args;
