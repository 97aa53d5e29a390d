//! Conversion from CLI errors to `miette` reports.
//!
//! Library errors carry `miette::Diagnostic` codes and help text, so they are
//! reported as-is.

use miette::Report;

use crate::error::CliError;

pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Config(e) => Report::new(e),
        CliError::Transpile(e) => Report::new(e),
        CliError::Graph(e) => Report::new(e),
        CliError::Module { path, source } => {
            Report::new(source).wrap_err(format!("Failed to transpile {}", path.display()))
        }
        other => miette::miette!("{}", other),
    }
}
