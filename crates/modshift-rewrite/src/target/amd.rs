//! AMD target.
//!
//! Emits a plain `define([deps], function (...) {...})` module. Dependencies
//! arrive as factory arguments, one per import handle, after the special
//! `exports` dependency that receives the module's getters. Because the
//! loader hands out `exports` before the factory runs, both halves of an
//! import cycle share the same object.

use super::{
    ImportRequest, MODULE_OBJECT, ModuleTarget, TargetContext, Wrapper, export_getters,
    star_export_loop,
};
use crate::error::Result;

/// `define`-based AMD output
#[derive(Debug, Clone, Copy, Default)]
pub struct AmdTarget;

impl ModuleTarget for AmdTarget {
    fn name(&self) -> &'static str {
        "amd"
    }

    fn prologue(&self, ctx: &TargetContext<'_>) -> Result<String> {
        let mut out = format!("var {MODULE_OBJECT} = __exports__;\n");
        out.push_str(&export_getters(
            MODULE_OBJECT,
            &ctx.export_accessors()?,
            ctx.format(),
            0,
        ));
        Ok(out)
    }

    // Handles are factory parameters.
    fn import_statement(&self, _ctx: &TargetContext<'_>, _import: &ImportRequest<'_>) -> String {
        String::new()
    }

    fn star_export(&self, ctx: &TargetContext<'_>, handle: &str) -> String {
        star_export_loop(MODULE_OBJECT, handle, ctx.format())
    }

    fn wrap(&self, ctx: &TargetContext<'_>, wrapper: &mut Wrapper) -> Result<()> {
        let id = ctx
            .options
            .module_name
            .as_deref()
            .map(|name| format!("{}, ", ctx.quote(name)))
            .unwrap_or_default();

        let deps = std::iter::once(ctx.quote("exports"))
            .chain(ctx.registry_keys.values().map(|key| ctx.quote(key)))
            .collect::<Vec<_>>()
            .join(", ");
        let params = std::iter::once("__exports__")
            .chain(ctx.catalog.handles().map(|(_, handle)| handle))
            .collect::<Vec<_>>()
            .join(", ");

        wrapper.header = format!(
            "define({id}[{deps}], function ({params}) {{\n{}",
            wrapper.header
        );
        wrapper.footer.push_str("});\n");
        Ok(())
    }
}
