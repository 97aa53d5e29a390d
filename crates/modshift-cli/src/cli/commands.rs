use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::cli::enums::*;
use crate::cli::validation::{parse_module_name, parse_registry_name};

/// Available modshift subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rewrite ES module files one by one
    ///
    /// Each file becomes a module that registers itself in the shared module
    /// registry under its registration name.
    Transpile(TranspileArgs),

    /// Resolve a module graph and emit System.register or CommonJS modules
    ///
    /// Starts from the entry modules, follows relative imports, and writes one
    /// output per local module. Bare imports are left to the host.
    Build(BuildArgs),

    /// Validate configuration and print the resolved settings
    Check(CheckArgs),
}

/// Arguments for the transpile command
#[derive(Args, Debug, Default)]
pub struct TranspileArgs {
    /// ES module files to transpile
    ///
    /// Examples:
    ///   modshift transpile app/even.js app/odd.js
    ///   modshift transpile src/app/main.js --root src --format amd-cjs
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Output format [default: cjs]
    #[arg(short, long, value_enum)]
    pub format: Option<Format>,

    /// Name the module registers under (single input file only)
    ///
    /// Derived from the file path relative to --root without its extension
    /// when omitted.
    #[arg(long, value_parser = parse_registry_name, value_name = "NAME")]
    pub registry_name: Option<String>,

    /// AMD module id (amd and amd-cjs only)
    #[arg(long, value_parser = parse_module_name, value_name = "NAME")]
    pub module_name: Option<String>,

    /// Registry directory relative imports are joined onto
    ///
    /// Defaults to the directory part of each registration name.
    #[arg(long, value_name = "DIR")]
    pub dir_path: Option<String>,

    /// Directory registration names are relative to [default: .]
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Output directory [default: dist]
    #[arg(short = 'd', long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Source map output [default: external]
    #[arg(long, value_enum, value_name = "MODE")]
    pub sourcemap: Option<SourceMap>,

    /// Working directory to resolve paths against
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,
}

/// Arguments for the build command
#[derive(Args, Debug, Default)]
pub struct BuildArgs {
    /// Entry modules, relative to --root
    ///
    /// Falls back to `entries` from the config file.
    #[arg(value_name = "ENTRIES")]
    pub entries: Vec<PathBuf>,

    /// Output format [default: system]
    #[arg(short, long, value_enum)]
    pub format: Option<GraphFormat>,

    /// Project root registration names are relative to [default: .]
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Bare module names provided by the host (repeatable)
    ///
    /// Without any, every bare import is treated as external.
    #[arg(short, long, value_name = "NAME")]
    pub external: Vec<String>,

    /// Output directory [default: dist]
    #[arg(short = 'd', long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Also write the System loader to modshift-runtime.js
    #[arg(long)]
    pub runtime: bool,

    /// Source map output [default: external]
    #[arg(long, value_enum, value_name = "MODE")]
    pub sourcemap: Option<SourceMap>,

    /// Working directory to resolve paths against
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,
}

/// Arguments for the check command
#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Print an example modshift.toml instead of checking
    #[arg(long)]
    pub example: bool,

    /// Working directory to look for configuration in
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,
}
