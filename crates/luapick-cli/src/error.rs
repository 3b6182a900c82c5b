//! CLI-specific error types and mappings.
//!
//! Maps resolution failures to exit codes and user-facing messages.

use luapick_core::{RangeError, ResolveError};
use luapick_runtime::LaunchError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid range, override or environment value.
    #[error("configuration error: {0}")]
    Config(String),

    /// Nothing on the search path qualified.
    #[error("{0}")]
    NoInterpreter(String),

    /// A threading library was required and none worked.
    #[error("{0}")]
    Preload(String),

    /// Writing output failed.
    #[error("IO error: {0}")]
    Io(String),

    /// The interpreter could not be started.
    #[error("process error: {0}")]
    Process(String),
}

impl CliError {
    /// Map error to an exit code.
    ///
    /// Codes follow sysexits.h where one fits.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NoInterpreter(_) => 69, // EX_UNAVAILABLE
            CliError::Process(_) => 71,       // EX_OSERR
            CliError::Preload(_) => 72,       // EX_OSFILE
            CliError::Io(_) => 74,            // EX_IOERR
            CliError::Config(_) => 78,        // EX_CONFIG
        }
    }
}

impl From<ResolveError> for CliError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::Config(range_err) => range_err.into(),
            ResolveError::InvalidOverride { .. } => CliError::Config(err.to_string()),
            ResolveError::NoInterpreter { .. } => CliError::NoInterpreter(err.to_string()),
            ResolveError::PreloadUnavailable { .. } => CliError::Preload(err.to_string()),
        }
    }
}

impl From<RangeError> for CliError {
    fn from(err: RangeError) -> Self {
        CliError::Config(err.to_string())
    }
}

impl From<LaunchError> for CliError {
    fn from(err: LaunchError) -> Self {
        CliError::Process(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io(err.to_string())
    }
}

/// Exit code for an error that reached `main`.
///
/// Errors that are not a [`CliError`] exit with 1.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<CliError>().map_or(1, CliError::exit_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let err: CliError = ResolveError::NoInterpreter {
            constraints: "lua 5.2.0-5.2.99".to_string(),
        }
        .into();
        assert_eq!(err.exit_code(), 69);

        let err: CliError = ResolveError::PreloadUnavailable {
            os: "OpenBSD 7.4.0 (amd64)".to_string(),
            reason: "no library loaded".to_string(),
        }
        .into();
        assert_eq!(err.exit_code(), 72);

        let err: CliError =
            ResolveError::invalid_override(std::path::Path::new("/nope"), "missing").into();
        assert_eq!(err.exit_code(), 78);
    }

    #[test]
    fn test_exit_code_through_anyhow() {
        let err = anyhow::Error::from(CliError::Config("bad range".to_string()));
        assert_eq!(exit_code_for(&err), 78);
        assert_eq!(exit_code_for(&anyhow::anyhow!("other")), 1);
    }
}
