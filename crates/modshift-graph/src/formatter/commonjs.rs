//! Plain CommonJS output for a whole graph.
//!
//! Every local module becomes a file loading its dependencies with `require`.
//! Paths between local modules are computed from the graph, so the output
//! tree runs under Node without a registry. Exports are getters defined on
//! `exports` before any dependency is required, which keeps import cycles
//! working for hoisted declarations.

use modshift_rewrite::target::{MODULE_OBJECT, export_getters, star_export_loop};
use modshift_rewrite::{FormatOptions, ImportRequest, ModuleTarget, Rewriter, TargetContext, Wrapper};
use rustc_hash::FxHashMap;
use tracing::debug;

use super::{Formatter, OutputProgram, module_options};
use crate::error::{GraphError, Result};
use crate::graph::ModuleGraph;
use crate::module::Module;
use crate::module_id::ModuleId;

/// Writes each local module as a CommonJS file
#[derive(Debug, Default, Clone)]
pub struct CommonJsFormatter {
    format: FormatOptions,
}

impl CommonJsFormatter {
    pub fn new(format: FormatOptions) -> Self {
        Self { format }
    }

    /// Format one local module of `graph`.
    pub fn format_module(&self, graph: &ModuleGraph, id: &ModuleId) -> Result<OutputProgram> {
        let module = graph.module(id).ok_or_else(|| GraphError::missing_module(id))?;
        let target = CommonJsTarget {
            require_paths: require_paths(graph, module)?,
        };

        let options = module_options(graph, module, &self.format);
        let output = Rewriter::new(&module.source, options)?.rewrite(&target)?;
        debug!(module = %module.name, deps = target.require_paths.len(), "formatted module");

        Ok(OutputProgram {
            id: id.clone(),
            name: module.name.clone(),
            output,
        })
    }
}

impl Formatter for CommonJsFormatter {
    fn name(&self) -> &'static str {
        "commonjs"
    }

    fn build(&self, graph: &ModuleGraph) -> Result<Vec<OutputProgram>> {
        graph
            .execution_order()
            .into_iter()
            .filter(|id| !id.is_external())
            .map(|id| self.format_module(graph, id))
            .collect()
    }
}

/// Per-module target used by [`CommonJsFormatter`]
#[derive(Debug, Clone, Default)]
pub struct CommonJsTarget {
    /// `require` argument per imported path as written in the module
    pub require_paths: FxHashMap<String, String>,
}

impl ModuleTarget for CommonJsTarget {
    fn name(&self) -> &'static str {
        "commonjs"
    }

    fn prologue(&self, ctx: &TargetContext<'_>) -> modshift_rewrite::Result<String> {
        let mut out = format!("var {MODULE_OBJECT} = exports;\n");
        out.push_str(&export_getters(
            MODULE_OBJECT,
            &ctx.export_accessors()?,
            ctx.format(),
            0,
        ));
        Ok(out)
    }

    fn import_statement(&self, ctx: &TargetContext<'_>, import: &ImportRequest<'_>) -> String {
        let path = self
            .require_paths
            .get(import.source)
            .map(String::as_str)
            .unwrap_or(import.source);
        format!("var {} = require({});", import.handle, ctx.quote(path))
    }

    fn star_export(&self, ctx: &TargetContext<'_>, handle: &str) -> String {
        star_export_loop(MODULE_OBJECT, handle, ctx.format())
    }

    fn wrap(&self, ctx: &TargetContext<'_>, wrapper: &mut Wrapper) -> modshift_rewrite::Result<()> {
        wrapper
            .header
            .insert_str(0, &format!("{};\n", ctx.quote("use strict")));
        Ok(())
    }
}

fn require_paths(graph: &ModuleGraph, module: &Module) -> Result<FxHashMap<String, String>> {
    module
        .catalog
        .sources()
        .map(|source| {
            let dep = module
                .dependency(source)
                .ok_or_else(|| GraphError::unresolved(source, module.name.clone()))?;
            let dep = graph.module(dep).ok_or_else(|| GraphError::missing_module(dep))?;
            let path = if dep.external {
                dep.name.clone()
            } else {
                relative_require(&module.name, &dep.name)
            };
            Ok((source.to_string(), path))
        })
        .collect()
}

/// `require` path from the output file of `from` to the one of `to`, both
/// registration names.
pub(crate) fn relative_require(from: &str, to: &str) -> String {
    let from_dir: Vec<&str> = match from.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    let target: Vec<&str> = to.split('/').collect();

    let common = from_dir
        .iter()
        .zip(&target)
        .take_while(|(a, b)| a == b)
        .count()
        .min(target.len().saturating_sub(1));

    let mut parts: Vec<&str> = vec![".."; from_dir.len() - common];
    parts.extend(&target[common..]);
    let path = parts.join("/");
    if path.starts_with("..") {
        path
    } else {
        format!("./{path}")
    }
}
