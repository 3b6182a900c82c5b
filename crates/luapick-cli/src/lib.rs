//! Command-line front end for luapick.
//!
//! The binary in `main.rs` is the composition root; this library holds the
//! argument parser, configuration merging, error mapping and handlers so they
//! can be tested without spawning the binary.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

#[cfg(test)]
use tempfile as _;

// Used only by the binary.
use dotenvy as _;
use tokio as _;
use tracing_subscriber as _;

pub mod commands;
pub mod config;
pub mod error;
pub mod handlers;
pub mod parser;

pub use commands::{Commands, OutputFormat};
pub use config::Settings;
pub use error::{CliError, exit_code_for};
pub use parser::Cli;
