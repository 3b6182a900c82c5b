//! Process and filesystem adapters for luapick.
//!
//! Implements the core ports with real subprocesses ([`ProcessProbe`]) and
//! real directory listings ([`SearchPath`]), detects the host OS and launches
//! the resolved interpreter.

#![deny(unsafe_code)]

mod detect;
pub mod enumerate;
pub mod launch;
pub mod probe;
mod resolve;
pub mod scratch;

pub use detect::detect_os;
pub use enumerate::SearchPath;
pub use launch::{LaunchError, run_interpreter};
pub use probe::{DEFAULT_PROBE_TIMEOUT, ProbeError, ProcessProbe};
pub use resolve::{resolve_interpreter, resolve_with, survey_path, survey_with};
pub use scratch::ScratchDir;
