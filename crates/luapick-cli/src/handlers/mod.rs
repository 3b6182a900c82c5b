//! Command handlers.
//!
//! Each handler turns [`Settings`](crate::config::Settings) into a call on
//! the runtime crate and formats the result for the terminal. Selection
//! logic stays in `luapick-core`.

pub mod list;
pub mod resolve;
pub mod run;

use std::io::Write;

use crate::error::CliError;

/// Write command output followed by a newline.
///
/// Unlike `println!`, a closed or full stdout surfaces as [`CliError::Io`].
pub(crate) fn emit<W: Write>(mut out: W, text: &str) -> Result<(), CliError> {
    writeln!(out, "{text}")?;
    out.flush()?;
    Ok(())
}
