//! Command-line interface definition.
//!
//! - `modshift transpile` - rewrite individual files (cjs, amd, amd-cjs, yui)
//! - `modshift build` - resolve a module graph and emit `System.register` or CommonJS modules
//! - `modshift check` - validate configuration and print the resolved settings

mod commands;
pub mod enums;
mod validation;

use std::path::PathBuf;

use clap::Parser;

pub use commands::{BuildArgs, CheckArgs, Command, TranspileArgs};
pub use enums::*;
pub use validation::{parse_module_name, parse_registry_name};

/// modshift - rewrite ES modules for module-registry runtimes
#[derive(Parser, Debug)]
#[command(
    name = "modshift",
    version,
    about = "Rewrite ES modules into CommonJS, AMD, YUI or System.register modules",
    long_about = "modshift rewrites ES module import and export syntax into code for\n\
                  registry-based module loaders. Exports become live getters, so circular\n\
                  imports see current values."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Config file to use instead of modshift.toml / modshift.config.json
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}
