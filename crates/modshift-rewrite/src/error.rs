//! Error types for module rewriting

use miette::Diagnostic;
use thiserror::Error;

/// Errors that abort a rewrite job
///
/// Every variant is fatal for the module being rewritten. No partial output is
/// produced once one of these is returned.
#[derive(Error, Debug, Diagnostic)]
pub enum TranspileError {
    /// A required option is missing or unusable
    #[error("Missing configuration: {option} - {reason}")]
    #[diagnostic(
        code(modshift::rewrite::missing_configuration),
        help("Pass `{option}` in the transpile options")
    )]
    MissingConfiguration { option: String, reason: String },

    /// An export wraps a declaration kind the rewriter cannot relocate
    #[error("Unsupported declaration in export: {kind} at {line}:{column}")]
    #[diagnostic(code(modshift::rewrite::unsupported_declaration))]
    UnsupportedDeclaration { kind: String, line: u32, column: u32 },

    /// Internal bookkeeping mismatch between the catalog and the syntax tree
    #[error("Internal error: missing catalog entry for {entry}")]
    #[diagnostic(
        code(modshift::rewrite::missing_catalog_entry),
        help("This is a bug in modshift, please report it with the input module")
    )]
    MissingCatalogEntry { entry: String },

    /// Two recorded edits touch the same source bytes
    #[error("Conflicting edits at byte {offset}")]
    #[diagnostic(
        code(modshift::rewrite::conflicting_edit),
        help("This is a bug in modshift, please report it with the input module")
    )]
    ConflictingEdit { offset: u32 },

    /// The generated source map could not be decoded
    #[error("Invalid source map: {reason}")]
    #[diagnostic(code(modshift::rewrite::source_map))]
    SourceMap { reason: String },

    /// The parser rejected the input
    #[error("Failed to parse {file}: {reason}")]
    #[diagnostic(code(modshift::rewrite::parse))]
    Parse { file: String, reason: String },

    /// Two imports bind the same local name
    #[error("Duplicate import binding '{name}'")]
    #[diagnostic(code(modshift::rewrite::duplicate_binding))]
    DuplicateBinding { name: String },

    /// Two exports share a public name
    #[error("Duplicate export '{name}'")]
    #[diagnostic(code(modshift::rewrite::duplicate_export))]
    DuplicateExport { name: String },

    /// No target is registered under the requested name
    #[error("No transpiler found for type '{name}'")]
    #[diagnostic(
        code(modshift::rewrite::unknown_target),
        help("Available targets: cjs, amd, amd-cjs, yui")
    )]
    UnknownTarget { name: String },
}

impl TranspileError {
    /// Create a MissingConfiguration error
    pub fn missing_configuration(option: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MissingConfiguration {
            option: option.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnsupportedDeclaration error at a 0-based line/column
    pub fn unsupported_declaration(kind: impl Into<String>, line: u32, column: u32) -> Self {
        Self::UnsupportedDeclaration {
            kind: kind.into(),
            line: line + 1,
            column: column + 1,
        }
    }

    /// Create a MissingCatalogEntry error
    pub fn missing_catalog_entry(entry: impl Into<String>) -> Self {
        Self::MissingCatalogEntry {
            entry: entry.into(),
        }
    }
}

impl TranspileError {
    pub fn source_map(reason: impl Into<String>) -> Self {
        Self::SourceMap {
            reason: reason.into(),
        }
    }
}

/// Result type for rewrite operations
pub type Result<T> = std::result::Result<T, TranspileError>;
