//! Error types for graph building and multi-module formatting

use std::path::PathBuf;

use miette::Diagnostic;
use modshift_rewrite::TranspileError;
use thiserror::Error;

use crate::module_id::ModuleIdError;

/// Result type for graph operations
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors raised while resolving, loading or formatting a module graph
#[derive(Error, Debug, Diagnostic)]
pub enum GraphError {
    /// No resolver matched an import
    #[error("Unable to resolve '{specifier}' imported from '{importer}'")]
    #[diagnostic(
        code(modshift::graph::unresolved_import),
        help("Check the path, or list the module as external")
    )]
    UnresolvedImport { specifier: String, importer: String },

    /// Reading a module from its loader failed
    #[error("Failed to read '{}'", path.display())]
    #[diagnostic(code(modshift::graph::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A module lives outside the graph root and cannot be named
    #[error("Module '{}' is outside the graph root '{}'", path.display(), root.display())]
    #[diagnostic(
        code(modshift::graph::outside_root),
        help("Pass a --root that contains every local module")
    )]
    OutsideRoot { path: PathBuf, root: PathBuf },

    /// A construct the graph formatter cannot express
    #[error("Unsupported declaration in '{module}': {kind}")]
    #[diagnostic(code(modshift::graph::unsupported_declaration))]
    UnsupportedDeclaration { module: String, kind: String },

    /// The graph is missing a module it recorded an edge to
    #[error("Internal error: module '{id}' is not in the graph")]
    #[diagnostic(
        code(modshift::graph::missing_module),
        help("This is a bug in modshift, please report it with the input modules")
    )]
    MissingModule { id: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Transpile(#[from] TranspileError),

    #[error(transparent)]
    #[diagnostic(code(modshift::graph::module_id))]
    ModuleId(#[from] ModuleIdError),
}

impl GraphError {
    /// Create an UnresolvedImport error
    pub fn unresolved(specifier: impl Into<String>, importer: impl Into<String>) -> Self {
        Self::UnresolvedImport {
            specifier: specifier.into(),
            importer: importer.into(),
        }
    }

    /// Create an Io error
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn missing_module(id: impl ToString) -> Self {
        Self::MissingModule { id: id.to_string() }
    }
}
