//! Scope-aware rewriting of ES module syntax into legacy module formats.
//!
//! `modshift-rewrite` takes one module written with `import`/`export`
//! statements and produces an equivalent module for loaders that do not
//! understand that syntax.
//!
//! # Pipeline
//!
//! 1. **Parse** the source with OXC (module goal).
//! 2. **Catalog** every import and export ([`ModuleCatalog`]). Each distinct
//!    imported path gets a handle named `__imports_<n>__` in first-occurrence
//!    order.
//! 3. **Track scopes** ([`ScopeTable`]) so that only references resolving to
//!    the module-level import binding are rewritten. Parameters, locals,
//!    catch bindings and nested declarations shadow imports even when they are
//!    declared after the reference.
//! 4. **Rewrite** with span-based edits. Imports become target-specific load
//!    statements, `export` keywords are stripped from declarations, default
//!    exports are normalized into one binding, and references become handle
//!    accesses.
//! 5. **Wrap** through the [`ModuleTarget`] hooks and emit a source map.
//!
//! # Examples
//!
//! ```rust
//! use modshift_rewrite::{transpile, TranspileOptions};
//!
//! let source = "import odd from './odd';\nexport default function even(n) {\n  return n === 0 || odd(n - 1);\n}\n";
//! let options = TranspileOptions::new("app/even").with_dir_path("app");
//!
//! let output = transpile(source, "cjs", options)?;
//! assert!(output.code.contains("var __imports_0__ = __es6_module_registry__[\"app/odd\"] || require(\"./odd\");"));
//! assert!(output.code.contains("(__imports_0__[\"default\"] || __imports_0__)(n - 1)"));
//! # Ok::<(), modshift_rewrite::TranspileError>(())
//! ```

pub mod catalog;
pub mod editor;
pub mod error;
pub mod format;
pub mod line_index;
pub mod options;
pub mod parser;
pub mod rewriter;
pub mod scope;
pub mod target;

pub use catalog::{
    DEFAULT_EXPORT_BINDING, DefaultExport, DefaultExportForm, ExportBinding, ExportEntry,
    ImportEntry, ImportKind, ModuleCatalog, access_expression, handle_name,
};
pub use editor::{Mapping, Rendered, SourceEditor};
pub use error::{Result, TranspileError};
pub use format::{FormatOptions, IndentStyle, QuoteStyle};
pub use line_index::LineIndex;
pub use options::{TranspileOptions, is_relative, join_registry_path};
pub use rewriter::{Rewriter, TranspileOutput};
pub use scope::{ScopeKind, ScopeTable};
pub use target::{
    AmdCjsTarget, AmdTarget, CjsTarget, ImportRequest, ModuleTarget, TargetContext, TargetKind,
    Wrapper, YuiTarget,
};

/// Rewrite `source` for the target registered as `target` (`cjs`, `amd`, `amd-cjs`, `yui`).
pub fn transpile(source: &str, target: &str, options: TranspileOptions) -> Result<TranspileOutput> {
    let kind: TargetKind = target.parse()?;
    Rewriter::new(source, options)?.rewrite(kind.target().as_ref())
}

/// Parse and catalog a module without rewriting it.
pub fn analyze(source: &str, file_name: &str) -> Result<ModuleCatalog> {
    let allocator = oxc_allocator::Allocator::default();
    let program = parser::parse(&allocator, source, &parser::ParseOptions::named(file_name))?;
    ModuleCatalog::build(&program, &LineIndex::new(source))
}
