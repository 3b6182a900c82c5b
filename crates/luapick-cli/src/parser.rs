//! Main CLI parser and top-level argument handling.
//!
//! Version constraints are global so they can be given before or after the
//! subcommand. Range flags deliberately have no clap `env` binding: the
//! environment is read separately so a locked value from either source can
//! win (see [`crate::config`]).

use clap::Parser;
use std::path::PathBuf;

use crate::commands::Commands;

/// Find the best installed Lua interpreter for a version range.
#[derive(Parser, Debug)]
#[command(name = "luapick")]
#[command(about = "Locate a Lua interpreter matching a version range")]
#[command(version)]
pub struct Cli {
    /// Acceptable Lua release range, e.g. "5.1-5.3" or "5.4"
    #[arg(long = "lua", value_name = "RANGE", global = true)]
    pub lua: Option<String>,

    /// Acceptable LuaJIT release range
    #[arg(long = "luajit", value_name = "RANGE", global = true)]
    pub luajit: Option<String>,

    /// Never consider LuaJIT interpreters
    #[arg(long = "no-luajit", global = true, conflicts_with = "luajit_only")]
    pub no_luajit: bool,

    /// Only consider LuaJIT interpreters
    #[arg(long = "luajit-only", global = true)]
    pub luajit_only: bool,

    /// Acceptable language API range (defaults to the generations of --lua)
    #[arg(long = "api", value_name = "RANGE", global = true)]
    pub api: Option<String>,

    /// Use this interpreter instead of searching PATH
    #[arg(
        long = "interpreter",
        value_name = "PATH",
        env = "LUAPICK_INTERPRETER",
        global = true
    )]
    pub interpreter: Option<PathBuf>,

    /// Work out which threading library must be preloaded
    #[arg(long = "pthread", env = "LUAPICK_PTHREAD", global = true)]
    pub pthread: bool,

    /// Seconds to wait for each interpreter probe
    #[arg(
        long = "probe-timeout",
        value_name = "SECS",
        default_value_t = 5,
        value_parser = clap::value_parser!(u64).range(1..),
        global = true
    )]
    pub probe_timeout: u64,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
