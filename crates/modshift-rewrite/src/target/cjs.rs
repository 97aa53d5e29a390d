//! CommonJS target.
//!
//! Modules register their exports object in a registry shared by every
//! transpiled module before any of their imports run. An importer looks in the
//! registry first and only falls back to `require`, so both halves of an import
//! cycle see the same exports object.

use super::{
    ImportRequest, MODULE_OBJECT, MODULE_REGISTRY, ModuleTarget, TargetContext, export_getters,
    star_export_loop,
};
use crate::error::Result;

/// `require`-based CommonJS output
#[derive(Debug, Clone, Copy, Default)]
pub struct CjsTarget;

impl ModuleTarget for CjsTarget {
    fn name(&self) -> &'static str {
        "cjs"
    }

    fn prologue(&self, ctx: &TargetContext<'_>) -> Result<String> {
        let i1 = ctx.format().indent_by(1);
        let name = ctx.quote(ctx.registry_name);
        let flag = ctx.quote("__es6_transpiled__");
        let undefined = ctx.quote("undefined");

        let mut out = String::new();
        out.push_str(&format!(
            "if (typeof {MODULE_REGISTRY} === {undefined}) {{\n{i1}globalThis.{MODULE_REGISTRY} = {{}};\n}}\n\n"
        ));
        out.push_str(&format!(
            "if ({MODULE_REGISTRY}[{name}]) {{\n{i1}module.exports = {MODULE_REGISTRY}[{name}];\n{i1}return;\n}}\n\n"
        ));
        out.push_str(&format!(
            "var {MODULE_OBJECT} = {{\n{i1}{flag}: true\n}};\n\n"
        ));
        out.push_str(&format!(
            "{MODULE_REGISTRY}[{name}] = module.exports = {MODULE_OBJECT};\n"
        ));
        out.push_str(&export_getters(
            MODULE_OBJECT,
            &ctx.export_accessors()?,
            ctx.format(),
            0,
        ));
        Ok(out)
    }

    fn import_statement(&self, ctx: &TargetContext<'_>, import: &ImportRequest<'_>) -> String {
        format!(
            "var {} = {MODULE_REGISTRY}[{}] || require({});",
            import.handle,
            ctx.quote(import.key),
            ctx.quote(import.source)
        )
    }

    fn star_export(&self, ctx: &TargetContext<'_>, handle: &str) -> String {
        star_export_loop(MODULE_OBJECT, handle, ctx.format())
    }
}
