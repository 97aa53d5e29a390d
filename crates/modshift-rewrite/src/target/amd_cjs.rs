//! AMD-wrapped CommonJS target.
//!
//! The CommonJS output is wrapped in `define(function (require, exports, module) {...})`,
//! which RequireJS and Almond accept through their CommonJS compatibility layer.

use super::{CjsTarget, ImportRequest, ModuleTarget, TargetContext, Wrapper};
use crate::error::Result;

#[derive(Debug, Clone, Copy, Default)]
pub struct AmdCjsTarget {
    inner: CjsTarget,
}

impl ModuleTarget for AmdCjsTarget {
    fn name(&self) -> &'static str {
        "amd-cjs"
    }

    fn prologue(&self, ctx: &TargetContext<'_>) -> Result<String> {
        self.inner.prologue(ctx)
    }

    fn import_statement(&self, ctx: &TargetContext<'_>, import: &ImportRequest<'_>) -> String {
        self.inner.import_statement(ctx, import)
    }

    fn star_export(&self, ctx: &TargetContext<'_>, handle: &str) -> String {
        self.inner.star_export(ctx, handle)
    }

    fn wrap(&self, ctx: &TargetContext<'_>, wrapper: &mut Wrapper) -> Result<()> {
        let id = ctx
            .options
            .module_name
            .as_deref()
            .map(|name| format!("{}, ", ctx.quote(name)))
            .unwrap_or_default();

        wrapper.header = format!(
            "define({id}function (require, exports, module) {{\n{}",
            wrapper.header
        );
        wrapper.footer.push_str("});\n");
        Ok(())
    }
}
