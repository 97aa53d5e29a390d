//! Output targets for the single-module rewriter.
//!
//! A target decides what the rewritten module looks like around the original
//! body: how an imported module is loaded into its handle, how exports are
//! published, and how the whole body is wrapped.

mod amd;
mod amd_cjs;
mod cjs;
mod yui;

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::catalog::{ExportBinding, ModuleCatalog, access_expression};
use crate::error::{Result, TranspileError};
use crate::format::FormatOptions;
use crate::options::TranspileOptions;

pub use amd::AmdTarget;
pub use amd_cjs::AmdCjsTarget;
pub use cjs::CjsTarget;
pub use yui::YuiTarget;

/// Name of the shared registry every generated module registers into.
pub const MODULE_REGISTRY: &str = "__es6_module_registry__";

/// Name of the per-module exports object.
pub const MODULE_OBJECT: &str = "__es6_module__";

/// Everything a target can see about the module being rewritten
pub struct TargetContext<'c> {
    pub registry_name: &'c str,
    pub options: &'c TranspileOptions,
    pub catalog: &'c ModuleCatalog,
    /// Registry key of every imported path, in handle order
    pub registry_keys: &'c IndexMap<String, String>,
}

impl TargetContext<'_> {
    pub fn format(&self) -> &FormatOptions {
        &self.options.format
    }

    pub fn quote(&self, value: &str) -> String {
        self.options.format.quote(value)
    }

    /// `(public name, expression yielding the current value)` per export.
    pub fn export_accessors(&self) -> Result<Vec<(String, String)>> {
        self.catalog
            .exports()
            .iter()
            .map(|entry| {
                let value = match &entry.binding {
                    ExportBinding::Local(local) => local.clone(),
                    ExportBinding::ReExport { source, kind } => {
                        let handle = self.catalog.handle(source).ok_or_else(|| {
                            TranspileError::missing_catalog_entry(format!("handle for '{source}'"))
                        })?;
                        access_expression(handle, kind, self.format())
                    }
                };
                Ok((entry.exported.clone(), value))
            })
            .collect()
    }
}

/// An imported module to load into a handle
#[derive(Debug, Clone, Copy)]
pub struct ImportRequest<'r> {
    pub handle: &'r str,
    /// Path as written in the import statement
    pub source: &'r str,
    /// Registry key the path resolves to
    pub key: &'r str,
}

/// Text placed before and after everything else
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wrapper {
    pub header: String,
    pub footer: String,
}

/// A per-file output format
pub trait ModuleTarget: Send + Sync {
    /// Target name used in configuration and diagnostics
    fn name(&self) -> &'static str;

    /// Code inserted before the first statement of the module.
    fn prologue(&self, ctx: &TargetContext<'_>) -> Result<String>;

    /// Statement replacing the first import (or re-export) of a path.
    fn import_statement(&self, ctx: &TargetContext<'_>, import: &ImportRequest<'_>) -> String;

    /// Statement publishing every export of `handle` (`export * from`).
    fn star_export(&self, ctx: &TargetContext<'_>, handle: &str) -> String;

    /// Code appended after the module body.
    fn epilogue(&self, _ctx: &TargetContext<'_>) -> Result<String> {
        Ok(String::new())
    }

    /// Post-rewrite hook wrapping the finished module.
    fn wrap(&self, _ctx: &TargetContext<'_>, _wrapper: &mut Wrapper) -> Result<()> {
        Ok(())
    }
}

/// Built-in per-file targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetKind {
    /// CommonJS with a shared module registry
    #[default]
    Cjs,
    /// AMD `define` with dependencies as factory arguments
    Amd,
    /// CommonJS wrapped in an AMD `define`
    AmdCjs,
    /// YUI `YUI.add` module
    Yui,
}

impl TargetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TargetKind::Cjs => "cjs",
            TargetKind::Amd => "amd",
            TargetKind::AmdCjs => "amd-cjs",
            TargetKind::Yui => "yui",
        }
    }

    pub fn target(self) -> Box<dyn ModuleTarget> {
        match self {
            TargetKind::Cjs => Box::new(CjsTarget),
            TargetKind::Amd => Box::new(AmdTarget),
            TargetKind::AmdCjs => Box::new(AmdCjsTarget::default()),
            TargetKind::Yui => Box::new(YuiTarget),
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetKind {
    type Err = TranspileError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "cjs" => Ok(TargetKind::Cjs),
            "amd" => Ok(TargetKind::Amd),
            "amd-cjs" | "amdWrappedCjs" => Ok(TargetKind::AmdCjs),
            "yui" => Ok(TargetKind::Yui),
            other => Err(TranspileError::UnknownTarget {
                name: other.to_string(),
            }),
        }
    }
}

/// `Object.defineProperties(object, {...});` with one enumerable getter per accessor.
///
/// Getters read the binding when accessed, so importers observe assignments
/// that happen after they linked against the module.
pub fn export_getters(
    object: &str,
    accessors: &[(String, String)],
    format: &FormatOptions,
    depth: usize,
) -> String {
    if accessors.is_empty() {
        return String::new();
    }

    let outer = format.indent_by(depth);
    let inner = format.indent_by(depth + 1);
    let properties = accessors
        .iter()
        .map(|(name, value)| {
            format!(
                "{inner}{}: {{ enumerable: true, get: function () {{ return {value}; }} }}",
                format.quote(name)
            )
        })
        .collect::<Vec<_>>()
        .join(",\n");

    format!("{outer}Object.defineProperties({object}, {{\n{properties}\n{outer}}});\n")
}

/// Runtime loop defining a getter on `object` for every key of `handle` not
/// already exported.
pub fn star_export_loop(object: &str, handle: &str, format: &FormatOptions) -> String {
    let i1 = format.indent_by(1);
    let i2 = format.indent_by(2);
    let key = "key";
    format!(
        "Object.keys({handle}).forEach(function ({key}) {{\n\
         {i1}if ({key} === {default_key} || {key} === {flag} || Object.prototype.hasOwnProperty.call({object}, {key})) {{\n\
         {i2}return;\n\
         {i1}}}\n\
         {i1}Object.defineProperty({object}, {key}, {{ enumerable: true, get: function () {{ return {handle}[{key}]; }} }});\n\
         }});\n",
        default_key = format.quote("default"),
        flag = format.quote("__es6_transpiled__"),
    )
}
