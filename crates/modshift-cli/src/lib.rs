//! modshift CLI - rewrite ES modules for module-registry runtimes.
//!
//! The binary wraps the workspace libraries:
//!
//! - `transpile` rewrites files one at a time with `modshift-rewrite`
//! - `build` resolves a module graph with `modshift-graph` and emits
//!   `System.register` or CommonJS modules
//! - `check` loads and validates `modshift-config` settings
//!
//! ```rust
//! use modshift_cli::{error::Result, logger};
//!
//! fn main() -> Result<()> {
//!     logger::init_logger(false, false, true);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result, ResultExt};
