use modshift_rewrite::is_relative;
use tracing::debug;

use super::{Resolution, ResolveContext, Resolver};
use crate::error::Result;

/// Treats bare module names as externals provided at runtime.
///
/// With an empty whitelist every non-relative name is external. Otherwise only
/// whitelisted names (and their subpaths, `lodash` covering `lodash/map`)
/// are, and other bare names fall through to the next resolver.
#[derive(Debug, Default, Clone)]
pub struct ExternalResolver {
    whitelist: Vec<String>,
}

impl ExternalResolver {
    pub fn new(whitelist: Vec<String>) -> Self {
        Self { whitelist }
    }

    fn is_external(&self, specifier: &str) -> bool {
        if self.whitelist.is_empty() {
            return !is_relative(specifier);
        }
        self.whitelist.iter().any(|name| {
            specifier == name
                || specifier
                    .strip_prefix(name.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }
}

impl Resolver for ExternalResolver {
    fn name(&self) -> &'static str {
        "external"
    }

    fn resolve_module(
        &self,
        specifier: &str,
        ctx: &ResolveContext<'_>,
    ) -> Result<Option<Resolution>> {
        if !self.is_external(specifier) {
            return Ok(None);
        }

        debug!(specifier, importer = %ctx.importer, "External module detected");
        Ok(Some(Resolution::External(specifier.to_string())))
    }
}
