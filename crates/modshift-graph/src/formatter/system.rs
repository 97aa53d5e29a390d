//! `System.register` output with live, sealed export objects.

use modshift_rewrite::target::{MODULE_OBJECT, export_getters};
use modshift_rewrite::{
    FormatOptions, ImportKind, ImportRequest, ModuleTarget, Rewriter, TargetContext, Wrapper,
    access_expression,
};
use rustc_hash::FxHashSet;
use tracing::debug;

use super::{Formatter, OutputProgram, module_options};
use crate::error::{GraphError, Result};
use crate::graph::ModuleGraph;
use crate::module::Module;
use crate::module_id::ModuleId;

/// Wraps each module in a `System.register` call.
///
/// Dependencies arrive as parameters of the module's `fn`, one per import
/// handle. The body of `fn` runs in strict mode. Exports are getters on
/// `__es6_module__` that re-read the binding on every access, and the object
/// is sealed once all of them are defined.
#[derive(Debug, Default, Clone)]
pub struct SystemFormatter {
    format: FormatOptions,
}

impl SystemFormatter {
    pub fn new(format: FormatOptions) -> Self {
        Self { format }
    }

    /// Format one local module of `graph`.
    pub fn format_module(&self, graph: &ModuleGraph, id: &ModuleId) -> Result<OutputProgram> {
        let module = graph.module(id).ok_or_else(|| GraphError::missing_module(id))?;
        let target = SystemTarget {
            dependency_names: dependency_names(graph, module)?,
            star_accessors: star_accessors(graph, module, &self.format)?,
        };

        let options = module_options(graph, module, &self.format);
        let output = Rewriter::new(&module.source, options)?.rewrite(&target)?;
        debug!(module = %module.name, deps = target.dependency_names.len(), "formatted module");

        Ok(OutputProgram {
            id: id.clone(),
            name: module.name.clone(),
            output,
        })
    }
}

impl Formatter for SystemFormatter {
    fn name(&self) -> &'static str {
        "system"
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

/// Per-module target used by [`SystemFormatter`]
#[derive(Debug, Clone, Default)]
pub struct SystemTarget {
    /// Registration name of each imported module, in handle order
    pub dependency_names: Vec<String>,
    /// Accessors for names reached through `export * from`
    pub star_accessors: Vec<(String, String)>,
}

impl SystemTarget {
    fn accessors(&self, ctx: &TargetContext<'_>) -> modshift_rewrite::Result<Vec<(String, String)>> {
        let mut accessors = ctx.export_accessors()?;
        accessors.extend(self.star_accessors.iter().cloned());
        Ok(accessors)
    }

    fn string_list(&self, ctx: &TargetContext<'_>, items: &[String]) -> String {
        let quoted: Vec<String> = items.iter().map(|item| ctx.quote(item)).collect();
        format!("[{}]", quoted.join(", "))
    }
}

impl ModuleTarget for SystemTarget {
    fn name(&self) -> &'static str {
        "system"
    }

    fn prologue(&self, ctx: &TargetContext<'_>) -> modshift_rewrite::Result<String> {
        let mut prologue = export_getters(MODULE_OBJECT, &self.accessors(ctx)?, ctx.format(), 0);
        prologue.push_str(&format!("Object.seal({MODULE_OBJECT});\n"));
        Ok(prologue)
    }

    // Dependencies are parameters of `fn`, nothing to load in the body.
    fn import_statement(&self, _ctx: &TargetContext<'_>, _import: &ImportRequest<'_>) -> String {
        String::new()
    }

    fn star_export(&self, _ctx: &TargetContext<'_>, _handle: &str) -> String {
        String::new()
    }

    fn wrap(&self, ctx: &TargetContext<'_>, wrapper: &mut Wrapper) -> modshift_rewrite::Result<()> {
        let format = ctx.format();
        let (i1, i2) = (format.indent_by(1), format.indent_by(2));

        let bindings: Vec<String> = self
            .accessors(ctx)?
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        let deps = self.string_list(ctx, &self.dependency_names);
        let handles: Vec<&str> = ctx.catalog.handles().map(|(_, handle)| handle).collect();

        let header = format!(
            "System.register({name}, {deps}, function () {{\n\
             {i1}var {MODULE_OBJECT} = {{}};\n\
             {i1}return {{\n\
             {i2}{exports}: {MODULE_OBJECT},\n\
             {i2}{bindings_key}: {bindings},\n\
             {i2}{deps_key}: {deps},\n\
             {i2}{fn_key}: function ({handles}) {{\n\
             {strict};\n",
            name = ctx.quote(ctx.registry_name),
            exports = ctx.quote("exports"),
            bindings_key = ctx.quote("bindings"),
            bindings = self.string_list(ctx, &bindings),
            deps_key = ctx.quote("deps"),
            fn_key = ctx.quote("fn"),
            handles = handles.join(", "),
            strict = ctx.quote("use strict"),
        );
        wrapper.header.insert_str(0, &header);
        wrapper
            .footer
            .push_str(&format!("{i2}}}\n{i1}}};\n}});\n"));
        Ok(())
    }
}

fn dependency_names(graph: &ModuleGraph, module: &Module) -> Result<Vec<String>> {
    module
        .catalog
        .sources()
        .map(|source| {
            let dep = module
                .dependency(source)
                .ok_or_else(|| GraphError::unresolved(source, module.name.clone()))?;
            graph
                .module(dep)
                .map(|dep| dep.name.clone())
                .ok_or_else(|| GraphError::missing_module(dep))
        })
        .collect()
}

/// Accessors for every name `export * from` brings in, expanded through the
/// source modules. `default` and names the module exports itself are skipped;
/// when two sources provide a name the first one wins.
fn star_accessors(
    graph: &ModuleGraph,
    module: &Module,
    format: &FormatOptions,
) -> Result<Vec<(String, String)>> {
    let mut taken: FxHashSet<String> = module.catalog.export_names().map(str::to_string).collect();
    let mut accessors = Vec::new();

    for source in module.catalog.star_exports() {
        let handle = module.catalog.handle(source).ok_or_else(|| {
            modshift_rewrite::TranspileError::missing_catalog_entry(format!("handle for '{source}'"))
        })?;
        let dep = module
            .dependency(source)
            .ok_or_else(|| GraphError::unresolved(source.as_str(), module.name.clone()))?;

        let mut visited = FxHashSet::default();
        for name in public_names(graph, dep, &module.name, &mut visited)? {
            if name == "default" || !taken.insert(name.clone()) {
                continue;
            }
            let value = access_expression(handle, &ImportKind::Named(name.clone()), format);
            accessors.push((name, value));
        }
    }
    Ok(accessors)
}

/// Public names of `id`, following its own star exports.
fn public_names(
    graph: &ModuleGraph,
    id: &ModuleId,
    importer: &str,
    visited: &mut FxHashSet<ModuleId>,
) -> Result<Vec<String>> {
    let module = graph.module(id).ok_or_else(|| GraphError::missing_module(id))?;
    if module.external {
        return Err(GraphError::UnsupportedDeclaration {
            module: importer.to_string(),
            kind: format!("export * from external module '{}'", module.name),
        });
    }
    if !visited.insert(id.clone()) {
        return Ok(Vec::new());
    }

    let mut names: Vec<String> = module.catalog.export_names().map(str::to_string).collect();
    for source in module.catalog.star_exports() {
        let dep = module
            .dependency(source)
            .ok_or_else(|| GraphError::unresolved(source.as_str(), module.name.clone()))?;
        for name in public_names(graph, dep, importer, visited)? {
            if name != "default" && !names.contains(&name) {
                names.push(name);
            }
        }
    }
    Ok(names)
}
