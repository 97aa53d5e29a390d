//! Parser façade for reading module source
//!
//! Modules are always parsed with module goal so that `import`/`export`
//! statements are accepted. The parser's arena-allocated tree borrows the
//! [`Allocator`], so callers own the allocator and keep it alive for as long as
//! they inspect the program.

use crate::error::{Result, TranspileError};
use oxc_allocator::Allocator;
use oxc_ast::ast::Program;
use oxc_parser::Parser;
use oxc_span::SourceType;

/// Parse options for reading module source
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Source type (always module goal)
    pub source_type: SourceType,
    /// File name used in diagnostics
    pub file_name: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            source_type: SourceType::mjs(),
            file_name: "<input>".to_string(),
        }
    }
}

impl ParseOptions {
    /// Parse options labelled with a file name
    pub fn named(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            ..Self::default()
        }
    }
}

/// Parse `source` into a program.
///
/// Any parser diagnostic is fatal: the rewriter never operates on a partial tree.
pub fn parse<'a>(
    allocator: &'a Allocator,
    source: &'a str,
    options: &ParseOptions,
) -> Result<Program<'a>> {
    let result = Parser::new(allocator, source, options.source_type).parse();

    if result.panicked || !result.errors.is_empty() {
        let reason = if result.errors.is_empty() {
            "parser aborted".to_string()
        } else {
            result
                .errors
                .iter()
                .map(|err| err.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };

        return Err(TranspileError::Parse {
            file: options.file_name.clone(),
            reason,
        });
    }

    Ok(result.program)
}
