//! YUI target.
//!
//! Emits `YUI.add` modules in the loader's ES module form: dependencies arrive
//! in `__imports__` keyed by module name, exports are published on
//! `__exports__`, and `requires` lists every dependency so the loader fetches
//! them first.

use super::{
    ImportRequest, MODULE_OBJECT, ModuleTarget, TargetContext, Wrapper, export_getters,
    star_export_loop,
};
use crate::error::Result;

#[derive(Debug, Clone, Copy, Default)]
pub struct YuiTarget;

impl ModuleTarget for YuiTarget {
    fn name(&self) -> &'static str {
        "yui"
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

    fn import_statement(&self, ctx: &TargetContext<'_>, import: &ImportRequest<'_>) -> String {
        format!("var {} = __imports__[{}];", import.handle, ctx.quote(import.key))
    }

    fn star_export(&self, ctx: &TargetContext<'_>, handle: &str) -> String {
        star_export_loop(MODULE_OBJECT, handle, ctx.format())
    }

    fn epilogue(&self, _ctx: &TargetContext<'_>) -> Result<String> {
        Ok(format!("return {MODULE_OBJECT};\n"))
    }

    fn wrap(&self, ctx: &TargetContext<'_>, wrapper: &mut Wrapper) -> Result<()> {
        let requires = ctx
            .registry_keys
            .values()
            .map(|key| ctx.quote(key))
            .collect::<Vec<_>>()
            .join(", ");

        wrapper.header = format!(
            "YUI.add({}, function (Y, NAME, __imports__, __exports__) {{\n{}",
            ctx.quote(ctx.registry_name),
            wrapper.header
        );
        wrapper.footer.push_str(&format!(
            "}}, {}, {{ {}: true, {}: [{requires}] }});\n",
            ctx.quote("@VERSION@"),
            ctx.quote("es"),
            ctx.quote("requires"),
        ));
        Ok(())
    }
}
