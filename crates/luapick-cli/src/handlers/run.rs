//! Run command handler.

use anyhow::Result;
use luapick_runtime::{detect_os, resolve_interpreter, run_interpreter};
use std::process::ExitStatus;
use tracing::info;

use crate::config::Settings;
use crate::error::CliError;

/// Resolve, launch the interpreter with `args`, and return its exit code.
///
/// # Errors
///
/// Returns a [`CliError`] if resolution fails or the interpreter cannot be
/// started.
pub async fn execute(settings: &Settings, args: &[String]) -> Result<i32> {
    let request = settings.request(detect_os());
    let resolution = resolve_interpreter(&request, settings.probe_timeout)
        .await
        .map_err(CliError::from)?;

    let status = run_interpreter(&resolution, args)
        .await
        .map_err(CliError::from)?;
    info!(%status, "Interpreter exited");
    Ok(exit_code(status))
}

/// Shell-style exit code: the child's own code, or 128 + signal number.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
