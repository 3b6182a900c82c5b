//! Subcommands of the `luapick` binary.

use clap::{Subcommand, ValueEnum};

/// How `resolve` prints its result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The interpreter path, plus the preload library on a second line
    #[default]
    Text,
    /// A JSON object with the full resolution
    Json,
    /// `NAME=value` assignments for shell launchers
    Shell,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the selected interpreter (the default command)
    Resolve {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Resolve, then run the interpreter with the given arguments
    Run {
        /// Arguments passed to the interpreter
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Probe every interpreter on PATH and show which ones qualify
    List,
}

impl Default for Commands {
    fn default() -> Self {
        Self::Resolve {
            format: OutputFormat::default(),
        }
    }
}
