//! Launching a resolved interpreter.

use luapick_core::{PreloadDecision, Resolution};
use std::ffi::{OsStr, OsString};
use std::process::ExitStatus;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to start {interpreter}: {source}")]
    Spawn {
        interpreter: String,
        #[source]
        source: std::io::Error,
    },
}

/// Prepend `library` to an existing `LD_PRELOAD` value.
///
/// The loader accepts both spaces and colons as separators; colons are used
/// here.
pub fn preload_value(library: &OsStr, existing: Option<&OsStr>) -> OsString {
    let mut value = library.to_os_string();
    if let Some(existing) = existing.filter(|v| !v.is_empty()) {
        value.push(":");
        value.push(existing);
    }
    value
}

/// Build the command that runs `resolution` with `args`.
///
/// The caller's environment is inherited; only `LD_PRELOAD` is touched, and
/// only when a library was chosen.
pub fn command_for<I, S>(resolution: &Resolution, args: I) -> Command
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::new(&resolution.interpreter.path);
    cmd.args(args);
    if let PreloadDecision::Preload(library) = &resolution.preload {
        let existing = std::env::var_os("LD_PRELOAD");
        cmd.env(
            "LD_PRELOAD",
            preload_value(library.as_os_str(), existing.as_deref()),
        );
    }
    cmd
}

/// Run the resolved interpreter to completion with inherited stdio.
///
/// # Errors
///
/// Returns [`LaunchError::Spawn`] if the process cannot be started. A
/// non-zero exit is not an error; inspect the returned status.
pub async fn run_interpreter<I, S>(
    resolution: &Resolution,
    args: I,
) -> Result<ExitStatus, LaunchError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let interpreter = resolution.interpreter.path.display().to_string();
    debug!(%interpreter, preload = ?resolution.preload.library(), "Launching interpreter");

    let spawn_error = |source| LaunchError::Spawn {
        interpreter: interpreter.clone(),
        source,
    };
    let mut child = command_for(resolution, args).spawn().map_err(spawn_error)?;
    child.wait().await.map_err(spawn_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preload_value_prepends() {
        let lib = OsStr::new("/usr/lib/libpthread.so.27.0");
        assert_eq!(
            preload_value(lib, None),
            OsString::from("/usr/lib/libpthread.so.27.0")
        );
        assert_eq!(
            preload_value(lib, Some(OsStr::new("libfoo.so"))),
            OsString::from("/usr/lib/libpthread.so.27.0:libfoo.so")
        );
        assert_eq!(
            preload_value(lib, Some(OsStr::new(""))),
            OsString::from("/usr/lib/libpthread.so.27.0")
        );
    }
}
