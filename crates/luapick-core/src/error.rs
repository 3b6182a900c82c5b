//! Error types for interpreter resolution.
//!
//! Probe failures never appear here: a candidate that cannot be run simply
//! does not qualify. What remains are the outcomes a caller has to report.

use crate::range::RangeError;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal outcomes of a resolution call.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A range expression or other input was malformed.
    #[error("configuration error: {0}")]
    Config(#[from] RangeError),

    /// The whole search path was walked without a qualifying interpreter.
    #[error("no Lua interpreter found matching {constraints}")]
    NoInterpreter { constraints: String },

    /// An explicitly configured interpreter cannot be used.
    #[error("interpreter {path} cannot be used: {reason}")]
    InvalidOverride { path: PathBuf, reason: String },

    /// The host requires a threading library preload and none worked.
    #[error("threading library not found for {os}: {reason}")]
    PreloadUnavailable { os: String, reason: String },
}

impl ResolveError {
    pub fn invalid_override(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidOverride {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by bad input rather than by the host.
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_) | Self::InvalidOverride { .. })
    }
}

/// Result type alias for resolution operations.
pub type ResolveResult<T> = Result<T, ResolveError>;
